// SPDX-License-Identifier: GPL-3.0-only

//! Shared data models for ZFS dataset management
//!
//! These types describe what the `zfs` tool reports: datasets, their kinds,
//! and property rows. They are used by:
//!
//! - **storage-zfs**: Returns these types from its public API
//! - **storage-zfs-cli**: Serializes them as JSON output

pub mod zfs;

pub use zfs::{DatasetEntry, DatasetKind, PropertyList, PropertySource, ZfsProperty};
