// SPDX-License-Identifier: GPL-3.0-only

//! CLI wrapper around the storage-zfs library for scripting and manual operations

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use storage_types::{DatasetKind, PropertyList};
use storage_zfs::name::{validate_dataset_name, validate_snapshot_name};
use storage_zfs::{
    CreateOptions, DestroyOptions, FileSystem, Snapshot, SnapshotOptions, Zfs, ZfsConfig,
    ZfsError,
};

/// Manage ZFS filesystems, snapshots and properties
#[derive(Parser)]
#[command(name = "storage-zfs-cli")]
#[command(about = "CLI tool for ZFS dataset operations", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $STORAGE_ZFS_CONFIG or /etc/storage-zfs.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List filesystems, or snapshots with --snapshots
    List {
        /// Only list below this dataset
        parent: Option<String>,
        #[arg(long)]
        snapshots: bool,
    },
    /// Show all properties of a dataset, or a single one
    Get {
        dataset: String,
        property: Option<String>,
    },
    /// Set one or more properties
    Set {
        dataset: String,
        /// NAME=VALUE assignments
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Create a filesystem
    Create {
        name: String,
        /// Create missing parents
        #[arg(short = 'p', long)]
        parents: bool,
        /// Properties as NAME=VALUE
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },
    /// Destroy a filesystem or snapshot
    Destroy {
        name: String,
        #[arg(short = 'r', long)]
        recursive: bool,
        /// Force unmount (filesystems only)
        #[arg(short = 'f', long)]
        force: bool,
    },
    /// Rename a filesystem
    Rename { name: String, new_name: String },
    /// Snapshot a filesystem (NAME is fs@snap)
    Snapshot {
        name: String,
        #[arg(short = 'r', long)]
        recursive: bool,
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },
    /// Clone a snapshot into a new filesystem
    Clone {
        snapshot: String,
        target: String,
        #[arg(short = 'p', long)]
        parents: bool,
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },
    /// List direct child filesystems
    Children { name: String },
    /// List direct snapshots of a filesystem
    Snapshots { name: String },
}

fn split_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => bail!("expected NAME=VALUE, got '{}'", raw),
    }
}

fn create_options(parents: bool, options: &[String]) -> Result<CreateOptions> {
    options
        .iter()
        .try_fold(CreateOptions::new().parents(parents), |acc, raw| {
            let (name, value) = split_assignment(raw)?;
            Ok(acc.property(name, value))
        })
}

/// An explicit --config must exist; the default location may be absent
fn load_config(path: Option<PathBuf>) -> Result<ZfsConfig> {
    match path {
        Some(path) => {
            ZfsConfig::load_existing(&path).with_context(|| format!("loading {}", path.display()))
        }
        None => {
            let path = ZfsConfig::default_path();
            ZfsConfig::load(&path).with_context(|| format!("loading {}", path.display()))
        }
    }
}

/// Write NAME=VALUE assignments in one `zfs set`. Names that are not listed
/// yet (user properties) are passed through; listed read-only ones are refused.
fn set_assignments(zfs: &Zfs, dataset: &str, assignments: &[String]) -> Result<()> {
    if dataset.contains('@') {
        validate_snapshot_name(dataset)?;
    } else {
        validate_dataset_name(dataset)?;
    }

    let pairs = assignments
        .iter()
        .map(String::as_str)
        .map(split_assignment)
        .collect::<Result<Vec<_>>>()?;

    let records = zfs.get_properties(dataset)?;
    for (name, _) in &pairs {
        let read_only = records
            .iter()
            .any(|record| record.name == *name && !record.source.is_editable());
        if read_only {
            return Err(ZfsError::ReadOnlyProperty {
                dataset: dataset.to_string(),
                name: name.clone(),
            }
            .into());
        }
    }

    let pairs: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    zfs.set_properties(dataset, &pairs)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    // Initialize tracing to stderr so stdout stays JSON
    let default_filter = config.log_filter.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let zfs = Zfs::from_config(&config)?;

    match cli.command {
        Commands::List { parent, snapshots } => {
            let kind = if snapshots {
                DatasetKind::Snapshot
            } else {
                DatasetKind::Filesystem
            };
            let entries = zfs.list(kind, parent.as_deref(), None)?;
            println!("{}", serde_json::to_string(&entries)?);
        }
        Commands::Get { dataset, property } => {
            let records = zfs.get_properties(&dataset)?;
            match property {
                Some(name) => {
                    let record = records
                        .into_iter()
                        .find(|record| record.name == name)
                        .with_context(|| format!("{} has no property '{}'", dataset, name))?;
                    println!("{}", serde_json::to_string(&record)?);
                }
                None => {
                    let output = PropertyList {
                        dataset,
                        properties: records,
                    };
                    println!("{}", serde_json::to_string(&output)?);
                }
            }
        }
        Commands::Set {
            dataset,
            assignments,
        } => {
            set_assignments(&zfs, &dataset, &assignments)?;
            println!("{}", json!({ "success": true }));
        }
        Commands::Create {
            name,
            parents,
            options,
        } => {
            let fs = FileSystem::create(&zfs, &name, &create_options(parents, &options)?)?;
            println!("{}", json!({ "success": true, "name": fs.name() }));
        }
        Commands::Destroy {
            name,
            recursive,
            force,
        } => {
            if name.contains('@') {
                Snapshot::open(&zfs, &name)?.destroy(recursive)?;
            } else {
                FileSystem::open(&zfs, &name)?
                    .destroy(&DestroyOptions::new().recursive(recursive).force(force))?;
            }
            println!("{}", json!({ "success": true }));
        }
        Commands::Rename { name, new_name } => {
            let mut fs = FileSystem::open(&zfs, &name)?;
            fs.rename(&new_name)?;
            println!("{}", json!({ "success": true, "name": fs.name() }));
        }
        Commands::Snapshot {
            name,
            recursive,
            options,
        } => {
            let mut snapshot_options = SnapshotOptions::new().recursive(recursive);
            for raw in &options {
                let (key, value) = split_assignment(raw)?;
                snapshot_options = snapshot_options.property(key, value);
            }
            let snapshot = Snapshot::create(&zfs, &name, &snapshot_options)?;
            println!("{}", json!({ "success": true, "name": snapshot.name() }));
        }
        Commands::Clone {
            snapshot,
            target,
            parents,
            options,
        } => {
            let fs = Snapshot::open(&zfs, &snapshot)?
                .clone_to(&target, &create_options(parents, &options)?)?;
            println!("{}", json!({ "success": true, "name": fs.name() }));
        }
        Commands::Children { name } => {
            let names: Vec<String> = FileSystem::open(&zfs, &name)?
                .children(true)?
                .iter()
                .map(|child| child.name().to_string())
                .collect();
            println!("{}", serde_json::to_string(&names)?);
        }
        Commands::Snapshots { name } => {
            let names: Vec<String> = FileSystem::open(&zfs, &name)?
                .snapshots(true)?
                .iter()
                .map(|snapshot| snapshot.name().to_string())
                .collect();
            println!("{}", serde_json::to_string(&names)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use storage_zfs::ZfsRunner;

    /// Answers every call with the same stdout and records argument lists
    #[derive(Debug, Default)]
    struct CannedRunner {
        stdout: String,
        calls: Mutex<Vec<String>>,
    }

    impl CannedRunner {
        fn new(stdout: &str) -> Arc<Self> {
            Arc::new(Self {
                stdout: stdout.to_string(),
                calls: Mutex::default(),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ZfsRunner for CannedRunner {
        fn run(&self, args: &[String]) -> storage_zfs::Result<String> {
            self.calls.lock().unwrap().push(args.join(" "));
            Ok(self.stdout.clone())
        }
    }

    const TANK: &str = "tank\tused\t1G\t-\ntank\tmountpoint\t/tank\tdefault\n";

    #[test]
    fn set_creates_user_properties() {
        let runner = CannedRunner::new(TANK);
        let zfs = Zfs::with_runner(runner.clone());

        set_assignments(
            &zfs,
            "tank",
            &["com.example:note=hi".to_string(), "mountpoint=/srv".to_string()],
        )
        .unwrap();

        assert_eq!(
            runner.calls()[1],
            "set com.example:note=hi mountpoint=/srv tank"
        );
    }

    #[test]
    fn set_refuses_read_only_properties() {
        let runner = CannedRunner::new(TANK);
        let zfs = Zfs::with_runner(runner.clone());

        let err = set_assignments(&zfs, "tank", &["used=2G".to_string()]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ZfsError>(),
            Some(ZfsError::ReadOnlyProperty { .. })
        ));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn explicit_config_must_exist() {
        assert!(load_config(Some(PathBuf::from("/nonexistent/storage-zfs.toml"))).is_err());
    }

    #[test]
    fn splits_assignments_on_first_equals() {
        assert_eq!(
            split_assignment("com.example:note=a=b").unwrap(),
            ("com.example:note".to_string(), "a=b".to_string())
        );
        assert!(split_assignment("novalue").is_err());
        assert!(split_assignment("=x").is_err());
    }

    #[test]
    fn builds_create_options() {
        let options = create_options(true, &["compression=lz4".to_string()]).unwrap();
        assert!(options.parents);
        assert_eq!(
            options.properties.get("compression").map(String::as_str),
            Some("lz4")
        );
    }

    #[test]
    fn parses_clone_subcommand() {
        let cli = Cli::try_parse_from([
            "storage-zfs-cli",
            "clone",
            "-p",
            "-o",
            "readonly=on",
            "tank@a",
            "tank/b",
        ])
        .unwrap();
        match cli.command {
            Commands::Clone {
                snapshot,
                target,
                parents,
                options,
            } => {
                assert_eq!(snapshot, "tank@a");
                assert_eq!(target, "tank/b");
                assert!(parents);
                assert_eq!(options, vec!["readonly=on"]);
            }
            _ => panic!("expected clone"),
        }
    }
}
