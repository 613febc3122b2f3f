// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use storage_types::{DatasetEntry, DatasetKind, ZfsProperty};
use tracing::{debug, info};

use crate::command::{SystemRunner, ZfsRunner};
use crate::config::ZfsConfig;
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::parse::{parse_entries, parse_properties};
use crate::snapshot::Snapshot;

/// Handle to the `zfs` tool, shared by every dataset object
#[derive(Debug, Clone)]
pub struct Zfs {
    runner: Arc<dyn ZfsRunner>,
    parsable: bool,
}

impl Zfs {
    /// Load the default configuration and locate the zfs binary
    pub fn new() -> Result<Self> {
        Self::from_config(&ZfsConfig::load_default()?)
    }

    pub fn from_config(config: &ZfsConfig) -> Result<Self> {
        let binary = config.resolve_binary()?;
        info!("Using zfs binary at {:?}", binary);
        Ok(Self {
            runner: Arc::new(SystemRunner::new(binary)),
            parsable: config.parsable,
        })
    }

    pub fn with_runner(runner: Arc<dyn ZfsRunner>) -> Self {
        Self {
            runner,
            parsable: false,
        }
    }

    pub fn parsable(mut self, parsable: bool) -> Self {
        self.parsable = parsable;
        self
    }

    pub(crate) fn run(&self, args: Vec<String>) -> Result<String> {
        self.runner.run(&args)
    }

    /// Read every property of a dataset
    pub fn get_properties(&self, dataset: &str) -> Result<Vec<ZfsProperty>> {
        let mut args = vec!["get".to_string(), "-H".to_string()];
        if self.parsable {
            args.push("-p".to_string());
        }
        args.extend([
            "-o".to_string(),
            "name,property,value,source".to_string(),
            "all".to_string(),
            dataset.to_string(),
        ]);

        let properties = parse_properties(&self.run(args)?)?;
        debug!("Read {} properties of {}", properties.len(), dataset);
        Ok(properties)
    }

    /// Write several properties with a single `zfs set`
    pub fn set_properties(&self, dataset: &str, assignments: &[(&str, &str)]) -> Result<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let mut args = vec!["set".to_string()];
        args.extend(
            assignments
                .iter()
                .map(|(name, value)| format!("{}={}", name, value)),
        );
        args.push(dataset.to_string());

        info!("Setting {} properties on {}", assignments.len(), dataset);
        self.run(args)?;
        Ok(())
    }

    /// List datasets of one kind.
    ///
    /// With a parent, `depth` limits recursion (`-d`); without one, every
    /// descendant is listed (`-r`). Without a parent the whole host is listed.
    pub fn list(
        &self,
        kind: DatasetKind,
        parent: Option<&str>,
        depth: Option<u32>,
    ) -> Result<Vec<DatasetEntry>> {
        let mut args = vec![
            "list".to_string(),
            "-H".to_string(),
            "-o".to_string(),
            "name,type".to_string(),
            "-t".to_string(),
            kind.to_string(),
        ];
        if let Some(parent) = parent {
            match depth {
                Some(depth) => args.extend(["-d".to_string(), depth.to_string()]),
                None => args.push("-r".to_string()),
            }
            args.push(parent.to_string());
        }

        parse_entries(&self.run(args)?)
    }

    pub fn filesystem(&self, name: &str) -> Result<FileSystem> {
        FileSystem::open(self, name)
    }

    pub fn snapshot(&self, name: &str) -> Result<Snapshot> {
        Snapshot::open(self, name)
    }

    /// Every filesystem on the host
    pub fn filesystems(&self) -> Result<Vec<FileSystem>> {
        Ok(self
            .list(DatasetKind::Filesystem, None, None)?
            .into_iter()
            .map(|entry| FileSystem::listed(self, &entry.name))
            .collect())
    }

    /// Every snapshot on the host
    pub fn snapshots(&self) -> Result<Vec<Snapshot>> {
        Ok(self
            .list(DatasetKind::Snapshot, None, None)?
            .into_iter()
            .map(|entry| Snapshot::listed(self, &entry.name))
            .collect())
    }
}
