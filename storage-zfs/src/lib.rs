// SPDX-License-Identifier: GPL-3.0-only

//! ZFS dataset management through the `zfs` command-line tool
//!
//! Every operation shells out to `zfs` and parses its line-oriented output.
//! [`FileSystem`] and [`Snapshot`] wrap datasets by name; their properties,
//! children and snapshots are read lazily and cached until refreshed.
//!
//! ```no_run
//! use storage_zfs::{CreateOptions, FileSystem, SnapshotOptions, Zfs};
//!
//! # fn main() -> storage_zfs::Result<()> {
//! let zfs = Zfs::new()?;
//! let mut fs = FileSystem::create(&zfs, "tank/projects", &CreateOptions::new().parents(true))?;
//! fs.set_mountpoint("/srv/projects")?;
//! fs.update()?;
//! fs.snapshot("initial", &SnapshotOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod name;
pub mod options;
pub mod parse;
pub mod property;
pub mod snapshot;
pub mod zfs;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use command::{SystemRunner, ZfsRunner};
pub use config::ZfsConfig;
pub use error::{Result, ZfsError};
pub use filesystem::FileSystem;
pub use options::{CreateOptions, DestroyOptions, SnapshotOptions};
pub use property::{Properties, Property};
pub use snapshot::Snapshot;
pub use zfs::Zfs;

pub use storage_types;
