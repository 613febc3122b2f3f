// SPDX-License-Identifier: GPL-3.0-only

use tracing::info;

use crate::command::option_args;
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::name::{snapshot_name, split_snapshot_name, validate_dataset_name, validate_snapshot_name};
use crate::options::{CreateOptions, SnapshotOptions};
use crate::property::Properties;
use crate::zfs::Zfs;

/// A read-only point-in-time image of a filesystem, named `fs@snap`
#[derive(Debug, Clone)]
pub struct Snapshot {
    zfs: Zfs,
    name: String,
    properties: Properties,
}

impl Snapshot {
    /// Take a snapshot from its full `fs@snap` name
    pub fn create(zfs: &Zfs, name: &str, options: &SnapshotOptions) -> Result<Self> {
        validate_snapshot_name(name)?;

        let mut args = vec!["snapshot".to_string()];
        if options.recursive {
            args.push("-r".to_string());
        }
        args.extend(option_args(&options.properties));
        args.push(name.to_string());

        info!("Creating snapshot {}", name);
        zfs.run(args)?;
        Self::open(zfs, name)
    }

    /// Take `<parent>@<short>`
    pub fn create_for(
        zfs: &Zfs,
        parent: &str,
        short: &str,
        options: &SnapshotOptions,
    ) -> Result<Self> {
        Self::create(zfs, &snapshot_name(parent, short)?, options)
    }

    pub fn open(zfs: &Zfs, name: &str) -> Result<Self> {
        validate_snapshot_name(name)?;
        Ok(Self::listed(zfs, name))
    }

    /// Wrap a name reported by `zfs list`, which is trusted as is
    pub(crate) fn listed(zfs: &Zfs, name: &str) -> Self {
        Self {
            zfs: zfs.clone(),
            name: name.to_string(),
            properties: Properties::new(zfs.clone(), name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The snapshotted filesystem, the part before `@`
    pub fn filesystem_name(&self) -> &str {
        split_snapshot_name(&self.name)
            .map(|(dataset, _)| dataset)
            .unwrap_or(self.name.as_str())
    }

    pub fn short_name(&self) -> &str {
        split_snapshot_name(&self.name)
            .map(|(_, short)| short)
            .unwrap_or(self.name.as_str())
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Create a writable filesystem from this snapshot with `zfs clone`
    pub fn clone_to(&self, target: &str, options: &CreateOptions) -> Result<FileSystem> {
        validate_dataset_name(target)?;

        let mut args = vec!["clone".to_string()];
        if options.parents {
            args.push("-p".to_string());
        }
        args.extend(option_args(&options.properties));
        args.push(self.name.clone());
        args.push(target.to_string());

        info!("Cloning snapshot {} to {}", self.name, target);
        self.zfs.run(args)?;
        FileSystem::open(&self.zfs, target)
    }

    /// Destroy the snapshot; `recursive` also removes same-named snapshots of descendants
    pub fn destroy(self, recursive: bool) -> Result<()> {
        let mut args = vec!["destroy".to_string()];
        if recursive {
            args.push("-r".to_string());
        }
        args.push(self.name.clone());

        info!("Destroying snapshot {}", self.name);
        self.zfs.run(args)?;
        Ok(())
    }

    /// Write pending property changes
    pub fn update(&mut self) -> Result<()> {
        self.properties.update()
    }

    pub fn used(&mut self) -> Result<&str> {
        self.properties.get("used")
    }

    pub fn referenced(&mut self) -> Result<&str> {
        self.properties.get("referenced")
    }

    pub fn creation(&mut self) -> Result<&str> {
        self.properties.get("creation")
    }
}
