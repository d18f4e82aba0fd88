// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Resource lookup failed: {0}")]
    ResourceLookup(String),

    #[error("Command `{command}` failed with status {}: {stderr}", status_text(.status))]
    ExternalCommand {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to process kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Failed to parse Corefile: {0}")]
    CorefileError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

fn status_text(status: &Option<i32>) -> String {
    status.map_or_else(|| "unknown".to_string(), |s| s.to_string())
}

impl BridgeError {
    /// Process exit status for this error. A failing external command hands
    /// its own status through, everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BridgeError::ExternalCommand {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
