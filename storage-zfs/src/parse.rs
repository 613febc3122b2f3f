// SPDX-License-Identifier: GPL-3.0-only

//! Parsers for `zfs get` and `zfs list` output

use storage_types::{DatasetEntry, DatasetKind, PropertySource, ZfsProperty};

use crate::error::{Result, ZfsError};

/// Parse `zfs get -H -o name,property,value,source` output.
///
/// Columns are tab separated, so values may contain spaces.
pub fn parse_properties(output: &str) -> Result<Vec<ZfsProperty>> {
    let mut properties = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 4 {
            return Err(ZfsError::Parse(format!(
                "expected 4 tab separated columns, got {}: {:?}",
                cols.len(),
                line
            )));
        }

        properties.push(ZfsProperty {
            dataset: cols[0].to_string(),
            name: cols[1].to_string(),
            value: cols[2].to_string(),
            source: PropertySource::parse(cols[3]),
        });
    }

    Ok(properties)
}

/// Parse `zfs list -H -o name,type` output
pub fn parse_entries(output: &str) -> Result<Vec<DatasetEntry>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (name, kind) = line.split_once('\t').ok_or_else(|| {
                ZfsError::Parse(format!("expected name and type columns: {:?}", line))
            })?;
            let kind = kind.trim().parse::<DatasetKind>().map_err(ZfsError::Parse)?;
            Ok(DatasetEntry {
                name: name.to_string(),
                kind,
            })
        })
        .collect()
}
