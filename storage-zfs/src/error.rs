// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Error types for ZFS operations
#[derive(Error, Debug)]
pub enum ZfsError {
    #[error("zfs binary not found: {0}")]
    BinaryNotFound(String),

    #[error("Command execution failed: {command} (status {status:?}): {stderr}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Property not found on {dataset}: {name}")]
    PropertyNotFound { dataset: String, name: String },

    #[error("Property is not editable on {dataset}: {name}")]
    ReadOnlyProperty { dataset: String, name: String },

    #[error("Invalid dataset name: {0}")]
    InvalidName(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ZFS operations
pub type Result<T> = std::result::Result<T, ZfsError>;
