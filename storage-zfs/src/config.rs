// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ZfsError};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/storage-zfs.toml";
pub const CONFIG_PATH_ENV: &str = "STORAGE_ZFS_CONFIG";
pub const BINARY_ENV: &str = "STORAGE_ZFS_BINARY";
pub const FALLBACK_BINARY: &str = "/sbin/zfs";

/// Settings for locating and invoking `zfs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZfsConfig {
    /// Explicit path to the zfs binary
    pub binary: Option<PathBuf>,
    /// Ask `zfs get` for exact numeric values (`-p`)
    pub parsable: bool,
    /// Tracing filter used by the CLI when RUST_LOG is unset
    pub log_filter: Option<String>,
}

impl ZfsConfig {
    /// `$STORAGE_ZFS_CONFIG`, or /etc/storage-zfs.toml when unset
    pub fn default_path() -> PathBuf {
        config_path(std::env::var_os(CONFIG_PATH_ENV))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| ZfsError::Config(e.to_string()))
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_existing(path)
    }

    /// Load a config file that must exist
    pub fn load_existing(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ZfsError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| ZfsError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path())
    }

    /// Resolve the zfs binary: env override, configured path, PATH lookup, then /sbin/zfs
    pub fn resolve_binary(&self) -> Result<PathBuf> {
        self.resolve_binary_with(std::env::var_os(BINARY_ENV))
    }

    fn resolve_binary_with(&self, env_binary: Option<OsString>) -> Result<PathBuf> {
        if let Some(value) = env_binary.filter(|value| !value.is_empty()) {
            return Ok(PathBuf::from(value));
        }

        if let Some(binary) = &self.binary {
            if binary.exists() {
                return Ok(binary.clone());
            }
            return Err(ZfsError::BinaryNotFound(binary.display().to_string()));
        }

        if let Ok(found) = which::which("zfs") {
            return Ok(found);
        }

        let fallback = PathBuf::from(FALLBACK_BINARY);
        if fallback.exists() {
            return Ok(fallback);
        }

        Err(ZfsError::BinaryNotFound(
            "zfs is not in PATH and /sbin/zfs does not exist".to_string(),
        ))
    }
}

fn config_path(env_path: Option<OsString>) -> PathBuf {
    env_path
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ZfsConfig::from_toml("").unwrap();
        assert_eq!(config, ZfsConfig::default());
        assert!(!config.parsable);
    }

    #[test]
    fn parses_all_fields() {
        let config = ZfsConfig::from_toml(
            "binary = \"/usr/local/sbin/zfs\"\nparsable = true\nlog_filter = \"storage_zfs=debug\"\n",
        )
        .unwrap();
        assert_eq!(config.binary, Some(PathBuf::from("/usr/local/sbin/zfs")));
        assert!(config.parsable);
        assert_eq!(config.log_filter.as_deref(), Some("storage_zfs=debug"));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = ZfsConfig::from_toml("parsable = \"yes\"").unwrap_err();
        assert!(matches!(err, ZfsError::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ZfsConfig::load(Path::new("/nonexistent/storage-zfs.toml")).unwrap();
        assert_eq!(config, ZfsConfig::default());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let err = ZfsConfig::load_existing(Path::new("/nonexistent/storage-zfs.toml")).unwrap_err();
        assert!(matches!(err, ZfsError::Config(_)));
    }

    #[test]
    fn config_path_env_replaces_default() {
        assert_eq!(config_path(None), PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(config_path(Some(OsString::new())), PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(
            config_path(Some(OsString::from("/run/zfs.toml"))),
            PathBuf::from("/run/zfs.toml")
        );
    }

    #[test]
    fn configured_binary_must_exist() {
        let config = ZfsConfig {
            binary: Some(PathBuf::from("/nonexistent/zfs")),
            ..ZfsConfig::default()
        };
        assert!(matches!(
            config.resolve_binary_with(None),
            Err(ZfsError::BinaryNotFound(_))
        ));
    }

    #[test]
    fn env_binary_beats_configured_binary() {
        let config = ZfsConfig {
            binary: Some(PathBuf::from("/nonexistent/zfs")),
            ..ZfsConfig::default()
        };

        let resolved = config
            .resolve_binary_with(Some(OsString::from("/opt/zfs/bin/zfs")))
            .unwrap();
        assert_eq!(resolved, PathBuf::from("/opt/zfs/bin/zfs"));

        assert!(config.resolve_binary_with(Some(OsString::new())).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn existing_configured_binary_is_used() {
        let config = ZfsConfig {
            binary: Some(PathBuf::from("/bin/sh")),
            ..ZfsConfig::default()
        };
        assert_eq!(
            config.resolve_binary_with(None).unwrap(),
            PathBuf::from("/bin/sh")
        );
    }
}
