// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! External command execution

use crate::error::{BridgeError, Result};
use std::env;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, warn};

/// Run a command to completion and return its stdout.
/// A non-zero exit is turned into `ExternalCommand` carrying the raw stderr.
pub async fn run_command<S: AsRef<str>>(program: &str, args: &[S]) -> Result<String> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let description = format!("{} {}", program, args.join(" "));
    debug!("Running {}", description);

    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| BridgeError::ExternalCommand {
            command: description.clone(),
            status: None,
            stderr: format!("failed to execute: {}", e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!("{} failed: {}", description, stderr);
        return Err(BridgeError::ExternalCommand {
            command: description,
            status: output.status.code(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Fail with `Precondition` unless every tool is found on PATH
pub fn ensure_tools_available(tools: &[&str]) -> Result<()> {
    let path = env::var_os("PATH").unwrap_or_default();
    let dirs: Vec<_> = env::split_paths(&path).collect();

    let missing: Vec<&str> = tools
        .iter()
        .copied()
        .filter(|tool| !dirs.iter().any(|dir| is_executable(&dir.join(tool))))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BridgeError::Precondition(format!(
            "required tools not found on PATH: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
