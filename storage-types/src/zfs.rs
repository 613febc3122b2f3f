// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Origin of a property value, as printed in the SOURCE column of `zfs get`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "from", rename_all = "lowercase")]
pub enum PropertySource {
    /// `-`: statistics and other values that cannot be set
    #[default]
    None,
    Default,
    Local,
    Temporary,
    Received,
    /// `inherited from <dataset>`
    Inherited(String),
    Other(String),
}

impl PropertySource {
    pub fn is_editable(&self) -> bool {
        !matches!(self, PropertySource::None)
    }

    /// Parse the SOURCE column text. Never fails; unknown text is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "-" | "" => PropertySource::None,
            "default" => PropertySource::Default,
            "local" => PropertySource::Local,
            "temporary" => PropertySource::Temporary,
            "received" => PropertySource::Received,
            _ => match raw.strip_prefix("inherited from ") {
                Some(from) => PropertySource::Inherited(from.trim().to_string()),
                None => PropertySource::Other(raw.to_string()),
            },
        }
    }
}

impl std::fmt::Display for PropertySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertySource::None => write!(f, "-"),
            PropertySource::Default => write!(f, "default"),
            PropertySource::Local => write!(f, "local"),
            PropertySource::Temporary => write!(f, "temporary"),
            PropertySource::Received => write!(f, "received"),
            PropertySource::Inherited(from) => write!(f, "inherited from {}", from),
            PropertySource::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// One row of `zfs get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZfsProperty {
    pub dataset: String,
    pub name: String,
    pub value: String,
    pub source: PropertySource,
}

/// All properties of a single dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyList {
    pub dataset: String,
    pub properties: Vec<ZfsProperty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Filesystem,
    Volume,
    Snapshot,
    Bookmark,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Filesystem => "filesystem",
            DatasetKind::Volume => "volume",
            DatasetKind::Snapshot => "snapshot",
            DatasetKind::Bookmark => "bookmark",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "filesystem" => Ok(DatasetKind::Filesystem),
            "volume" => Ok(DatasetKind::Volume),
            "snapshot" => Ok(DatasetKind::Snapshot),
            "bookmark" => Ok(DatasetKind::Bookmark),
            _ => Err(format!("Invalid dataset type: {}", s)),
        }
    }
}

/// One row of `zfs list -o name,type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    pub kind: DatasetKind,
}
