// SPDX-License-Identifier: GPL-3.0-only

//! Dataset properties and the per-dataset property cache

use std::collections::BTreeMap;

use storage_types::{PropertySource, ZfsProperty};
use tracing::{debug, info};

use crate::error::{Result, ZfsError};
use crate::zfs::Zfs;

/// A single property with a pending value that is written on `update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    record: ZfsProperty,
    stored: String,
}

impl Property {
    pub fn new(record: ZfsProperty) -> Self {
        let stored = record.value.clone();
        Self { record, stored }
    }

    pub fn dataset(&self) -> &str {
        &self.record.dataset
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Pending value, which equals the on-disk value unless dirty
    pub fn value(&self) -> &str {
        &self.record.value
    }

    pub fn source(&self) -> &PropertySource {
        &self.record.source
    }

    pub fn record(&self) -> &ZfsProperty {
        &self.record
    }

    pub fn is_editable(&self) -> bool {
        self.record.source.is_editable()
    }

    pub fn is_dirty(&self) -> bool {
        self.record.value != self.stored
    }

    pub fn set(&mut self, value: impl Into<String>) -> Result<()> {
        if !self.is_editable() {
            return Err(ZfsError::ReadOnlyProperty {
                dataset: self.record.dataset.clone(),
                name: self.record.name.clone(),
            });
        }
        self.record.value = value.into();
        Ok(())
    }

    /// Write the pending value with `zfs set`; no-op when clean
    pub fn update(&mut self, zfs: &Zfs) -> Result<()> {
        if !self.is_dirty() {
            return Ok(());
        }
        zfs.set_properties(
            &self.record.dataset,
            &[(self.record.name.as_str(), self.record.value.as_str())],
        )?;
        self.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.stored = self.record.value.clone();
    }
}

/// Lazily loaded properties of one dataset
#[derive(Debug, Clone)]
pub struct Properties {
    zfs: Zfs,
    parent: String,
    entries: BTreeMap<String, Property>,
    loaded: bool,
}

impl Properties {
    pub fn new(zfs: Zfs, parent: impl Into<String>) -> Self {
        Self {
            zfs,
            parent: parent.into(),
            entries: BTreeMap::new(),
            loaded: false,
        }
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Re-read properties. Without `force` a loaded cache is kept as is.
    pub fn refresh(&mut self, force: bool) -> Result<()> {
        if self.is_loaded() && !force {
            return Ok(());
        }

        self.clear();
        let rows = self.zfs.get_properties(&self.parent)?;
        debug!("Cached {} properties for {}", rows.len(), self.parent);
        self.entries = rows
            .into_iter()
            .map(|row| (row.name.clone(), Property::new(row)))
            .collect();
        self.loaded = true;
        Ok(())
    }

    pub fn get(&mut self, name: &str) -> Result<&str> {
        self.property(name).map(Property::value)
    }

    pub fn property(&mut self, name: &str) -> Result<&Property> {
        self.refresh(false)?;
        self.entries
            .get(name)
            .ok_or_else(|| ZfsError::PropertyNotFound {
                dataset: self.parent.clone(),
                name: name.to_string(),
            })
    }

    /// Stage a new value; nothing is written until [`Properties::update`]
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.refresh(false)?;
        match self.entries.get_mut(name) {
            Some(property) => property.set(value),
            None => Err(ZfsError::PropertyNotFound {
                dataset: self.parent.clone(),
                name: name.to_string(),
            }),
        }
    }

    pub fn keys(&mut self) -> Result<Vec<String>> {
        self.refresh(false)?;
        Ok(self.entries.keys().cloned().collect())
    }

    /// Snapshot of the cached rows, loading them first if needed
    pub fn records(&mut self) -> Result<Vec<ZfsProperty>> {
        self.refresh(false)?;
        Ok(self
            .entries
            .values()
            .map(|property| property.record().clone())
            .collect())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.loaded = false;
    }

    pub fn dirty(&self) -> Vec<&str> {
        self.entries
            .values()
            .filter(|property| property.is_dirty())
            .map(Property::name)
            .collect()
    }

    /// Write every pending change with one `zfs set`
    pub fn update(&mut self) -> Result<()> {
        let changes: Vec<(&str, &str)> = self
            .entries
            .values()
            .filter(|property| property.is_dirty())
            .map(|property| (property.name(), property.value()))
            .collect();

        if changes.is_empty() {
            return Ok(());
        }

        info!("Updating {} properties on {}", changes.len(), self.parent);
        self.zfs.set_properties(&self.parent, &changes)?;

        for property in self.entries.values_mut() {
            property.reset();
        }
        Ok(())
    }

    /// Point the cache at a renamed dataset
    pub fn retarget(&mut self, parent: impl Into<String>) {
        self.parent = parent.into();
        self.clear();
    }
}
