// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

/// Options for `zfs create` and `zfs clone`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Create missing parent datasets (`-p`)
    pub parents: bool,
    /// Properties set at creation time (`-o key=value`)
    pub properties: BTreeMap<String, String>,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parents(mut self, parents: bool) -> Self {
        self.parents = parents;
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Options for `zfs snapshot`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Snapshot all descendent filesystems too (`-r`)
    pub recursive: bool,
    pub properties: BTreeMap<String, String>,
}

impl SnapshotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Options for `zfs destroy` on a filesystem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyOptions {
    /// Destroy children and snapshots as well (`-r`)
    pub recursive: bool,
    /// Force unmount of busy filesystems (`-f`)
    pub force: bool,
}

impl DestroyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub(crate) fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.recursive {
            flags.push("-r".to_string());
        }
        if self.force {
            flags.push("-f".to_string());
        }
        flags
    }
}
