// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubeconfig federation across the bridged clusters.

pub mod federator;
pub mod store;

pub use federator::{federate_credentials, flatten, merge, rename_context, FederatedCredentials};
pub use kube::config::Kubeconfig;
pub use store::{CredentialStore, KindCredentialStore};

use crate::error::{BridgeError, Result};

/// Parse a kubeconfig document
pub fn parse_kubeconfig(text: &str) -> Result<Kubeconfig> {
    serde_yaml::from_str(text)
        .map_err(|e| BridgeError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))
}

pub fn render_kubeconfig(config: &Kubeconfig) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}
