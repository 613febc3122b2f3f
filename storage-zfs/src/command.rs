// SPDX-License-Identifier: GPL-3.0-only

//! Process execution for the `zfs` binary
//!
//! All shell integration goes through [`ZfsRunner`] so the object layer can
//! be driven by scripted output in tests.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{Result, ZfsError};

/// Executes one `zfs` invocation and returns its stdout.
///
/// Implementations must report a nonzero exit as [`ZfsError::CommandFailed`].
pub trait ZfsRunner: std::fmt::Debug + Send + Sync {
    fn run(&self, args: &[String]) -> Result<String>;
}

/// Runs the host `zfs` binary
#[derive(Debug, Clone)]
pub struct SystemRunner {
    binary: PathBuf,
}

impl SystemRunner {
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl ZfsRunner for SystemRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        let rendered = render(&self.binary.to_string_lossy(), args);
        debug!("call: {}", rendered);

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| ZfsError::CommandFailed {
                command: rendered.clone(),
                status: None,
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("{} failed: {}", rendered, stderr);
            return Err(ZfsError::CommandFailed {
                command: rendered,
                status: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Render a command line for logs and error messages
pub fn render(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

/// Expand `key=value` pairs into repeated `-o key=value` arguments
pub(crate) fn option_args<'a, I>(properties: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    properties
        .into_iter()
        .flat_map(|(key, value)| ["-o".to_string(), format!("{}={}", key, value)])
        .collect()
}
