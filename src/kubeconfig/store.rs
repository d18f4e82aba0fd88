// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{parse_kubeconfig, render_kubeconfig, Kubeconfig};
use crate::constants::tools;
use crate::error::Result;
use crate::exec::run_command;
use crate::types::Cluster;
use async_trait::async_trait;
use std::path::Path;
use tracing::{info, instrument};

#[cfg(test)]
use mockall::automock;

/// Source and sink of kubeconfig files
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Kubeconfig pointing at the cluster's node-network API endpoint
    async fn fetch_internal(&self, cluster: &Cluster) -> Result<Kubeconfig>;

    /// Write a kubeconfig file, replacing any existing one
    async fn write(&self, path: &Path, kubeconfig: &Kubeconfig) -> Result<()>;

    /// Make `context` the active context of the kubeconfig at `path`.
    /// `path` is the kubeconfig the operator works with after the run.
    async fn use_context(&self, path: &Path, context: &str) -> Result<()>;
}

/// Fetches credentials with `kind` and activates contexts with `kubectl`
#[derive(Debug, Default, Clone)]
pub struct KindCredentialStore;

#[async_trait]
impl CredentialStore for KindCredentialStore {
    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    async fn fetch_internal(&self, cluster: &Cluster) -> Result<Kubeconfig> {
        let text = run_command(
            tools::KIND,
            &["get", "kubeconfig", "--internal", "--name", cluster.name.as_str()],
        )
        .await?;
        parse_kubeconfig(&text)
    }

    async fn write(&self, path: &Path, kubeconfig: &Kubeconfig) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, render_kubeconfig(kubeconfig)?).await?;
        Ok(())
    }

    async fn use_context(&self, path: &Path, context: &str) -> Result<()> {
        let path = path.display().to_string();
        run_command(
            tools::KUBECTL,
            &["config", "use-context", context, "--kubeconfig", path.as_str()],
        )
        .await?;
        info!("Active context is now {}", context);
        Ok(())
    }
}
