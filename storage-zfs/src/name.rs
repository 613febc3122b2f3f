// SPDX-License-Identifier: GPL-3.0-only

use crate::error::{Result, ZfsError};

const MAX_NAME_LEN: usize = 255;

fn valid_component(component: &str) -> bool {
    !component.is_empty()
        && component
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | ' '))
}

/// Check a filesystem/volume name such as `tank/home/alice`
pub fn validate_dataset_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(ZfsError::InvalidName(format!(
            "'{}' must be 1-{} characters",
            name, MAX_NAME_LEN
        )));
    }

    if name.contains('@') || name.contains('#') {
        return Err(ZfsError::InvalidName(format!(
            "'{}' names a snapshot or bookmark, not a dataset",
            name
        )));
    }

    if !name.split('/').all(valid_component) {
        return Err(ZfsError::InvalidName(format!(
            "'{}' has an empty or malformed component",
            name
        )));
    }

    Ok(())
}

/// Check a snapshot name such as `tank/home@monday`
pub fn validate_snapshot_name(name: &str) -> Result<()> {
    let (dataset, short) = split_snapshot_name(name)?;
    validate_dataset_name(dataset)?;

    if name.len() > MAX_NAME_LEN || !valid_component(short) {
        return Err(ZfsError::InvalidName(format!(
            "'{}' has a malformed snapshot part",
            name
        )));
    }

    Ok(())
}

/// Split `fs@snap` into `("fs", "snap")`
pub fn split_snapshot_name(name: &str) -> Result<(&str, &str)> {
    match name.split_once('@') {
        Some((dataset, short)) if !short.contains('@') => Ok((dataset, short)),
        _ => Err(ZfsError::InvalidName(format!(
            "'{}' must contain exactly one '@'",
            name
        ))),
    }
}

/// Build and validate `parent@short`
pub fn snapshot_name(parent: &str, short: &str) -> Result<String> {
    let name = format!("{}@{}", parent, short);
    validate_snapshot_name(&name)?;
    Ok(name)
}
