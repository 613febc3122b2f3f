// SPDX-License-Identifier: GPL-3.0-only

use storage_types::DatasetKind;
use tracing::info;

use crate::command::option_args;
use crate::error::Result;
use crate::name::validate_dataset_name;
use crate::options::{CreateOptions, DestroyOptions, SnapshotOptions};
use crate::property::Properties;
use crate::snapshot::Snapshot;
use crate::zfs::Zfs;

/// A ZFS filesystem with lazily cached properties, children and snapshots
#[derive(Debug, Clone)]
pub struct FileSystem {
    zfs: Zfs,
    name: String,
    properties: Properties,
    children: Option<Vec<String>>,
    snapshots: Option<Vec<String>>,
}

impl FileSystem {
    /// Create a new filesystem with `zfs create`
    pub fn create(zfs: &Zfs, name: &str, options: &CreateOptions) -> Result<Self> {
        validate_dataset_name(name)?;

        let mut args = vec!["create".to_string()];
        if options.parents {
            args.push("-p".to_string());
        }
        args.extend(option_args(&options.properties));
        args.push(name.to_string());

        info!("Creating filesystem {}", name);
        zfs.run(args)?;
        Self::open(zfs, name)
    }

    /// Wrap an existing filesystem; nothing is read until first access
    pub fn open(zfs: &Zfs, name: &str) -> Result<Self> {
        validate_dataset_name(name)?;
        Ok(Self::listed(zfs, name))
    }

    /// Wrap a name reported by `zfs list`, which is trusted as is
    pub(crate) fn listed(zfs: &Zfs, name: &str) -> Self {
        Self {
            zfs: zfs.clone(),
            name: name.to_string(),
            properties: Properties::new(zfs.clone(), name),
            children: None,
            snapshots: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Rename with `zfs rename`. Staged property changes are written to the
    /// old name first so the cache can follow the new one.
    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        validate_dataset_name(new_name)?;
        self.properties.update()?;

        info!("Renaming filesystem {} to {}", self.name, new_name);
        self.zfs.run(vec![
            "rename".to_string(),
            self.name.clone(),
            new_name.to_string(),
        ])?;

        self.name = new_name.to_string();
        self.properties.retarget(new_name);
        self.children = None;
        self.snapshots = None;
        Ok(())
    }

    pub fn destroy(self, options: &DestroyOptions) -> Result<()> {
        let mut args = vec!["destroy".to_string()];
        args.extend(options.flags());
        args.push(self.name.clone());

        info!("Destroying filesystem {}", self.name);
        self.zfs.run(args)?;
        Ok(())
    }

    /// Write pending property changes
    pub fn update(&mut self) -> Result<()> {
        self.properties.update()
    }

    /// Take `<name>@<short>`
    pub fn snapshot(&mut self, short: &str, options: &SnapshotOptions) -> Result<Snapshot> {
        let snapshot = Snapshot::create_for(&self.zfs, &self.name, short, options)?;
        self.snapshots = None;
        Ok(snapshot)
    }

    /// Direct snapshots of this filesystem, cached until forced
    pub fn snapshots(&mut self, force: bool) -> Result<Vec<Snapshot>> {
        if force || self.snapshots.is_none() {
            self.snapshots = None;
            let names = self
                .zfs
                .list(DatasetKind::Snapshot, Some(&self.name), Some(1))?
                .into_iter()
                .map(|entry| entry.name)
                .collect();
            self.snapshots = Some(names);
        }

        Ok(self
            .snapshots
            .iter()
            .flatten()
            .map(|name| Snapshot::listed(&self.zfs, name))
            .collect())
    }

    /// Direct child filesystems, cached until forced
    pub fn children(&mut self, force: bool) -> Result<Vec<FileSystem>> {
        if force || self.children.is_none() {
            self.children = None;
            let names = self
                .zfs
                .list(DatasetKind::Filesystem, Some(&self.name), Some(1))?
                .into_iter()
                .map(|entry| entry.name)
                .filter(|name| *name != self.name)
                .collect();
            self.children = Some(names);
        }

        Ok(self
            .children
            .iter()
            .flatten()
            .map(|name| FileSystem::listed(&self.zfs, name))
            .collect())
    }

    /// Force-refresh properties, children and snapshots
    pub fn refresh(&mut self) -> Result<()> {
        self.properties.refresh(true)?;
        self.children(true)?;
        self.snapshots(true)?;
        Ok(())
    }

    pub fn used(&mut self) -> Result<&str> {
        self.properties.get("used")
    }

    pub fn available(&mut self) -> Result<&str> {
        self.properties.get("available")
    }

    pub fn compressratio(&mut self) -> Result<&str> {
        self.properties.get("compressratio")
    }

    pub fn referenced(&mut self) -> Result<&str> {
        self.properties.get("referenced")
    }

    pub fn mountpoint(&mut self) -> Result<&str> {
        self.properties.get("mountpoint")
    }

    /// Stage a new mountpoint; written on [`FileSystem::update`]
    pub fn set_mountpoint(&mut self, mountpoint: &str) -> Result<()> {
        self.properties.set("mountpoint", mountpoint)
    }
}
