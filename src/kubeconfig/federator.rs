// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rename, flatten and merge per-cluster kubeconfigs.

use super::{CredentialStore, Kubeconfig};
use crate::constants::kubeconfig as files;
use crate::error::{BridgeError, Result};
use crate::types::Cluster;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Point `current-context` and the first context at `name`
pub fn rename_context(config: &mut Kubeconfig, name: &str) -> Result<()> {
    let Some(first) = config.contexts.first_mut() else {
        return Err(BridgeError::KubeconfigError(format!(
            "cannot rename context to {}: kubeconfig declares no contexts",
            name
        )));
    };

    debug!("Renaming context {} to {}", first.name, name);
    first.name = name.to_string();
    config.current_context = Some(name.to_string());
    Ok(())
}

/// Replace file references to certificates and keys with inline base64 data.
/// Relative paths are resolved against `base_dir`.
pub async fn flatten(config: &mut Kubeconfig, base_dir: &Path) -> Result<()> {
    for named in &mut config.clusters {
        let Some(cluster) = named.cluster.as_mut() else {
            continue;
        };
        if let Some(path) = cluster.certificate_authority.take() {
            cluster.certificate_authority_data = Some(read_base64(base_dir, &path).await?);
        }
    }

    for named in &mut config.auth_infos {
        let Some(auth) = named.auth_info.as_mut() else {
            continue;
        };
        if let Some(path) = auth.client_certificate.take() {
            auth.client_certificate_data = Some(read_base64(base_dir, &path).await?);
        }
        if let Some(path) = auth.client_key.take() {
            auth.client_key_data = Some(read_base64(base_dir, &path).await?.into());
        }
    }
    Ok(())
}

async fn read_base64(base_dir: &Path, path: &str) -> Result<String> {
    let full = base_dir.join(path);
    let bytes = tokio::fs::read(&full).await.map_err(|e| {
        BridgeError::KubeconfigError(format!("Failed to read {}: {}", full.display(), e))
    })?;
    Ok(STANDARD.encode(bytes))
}

/// Merge kubeconfigs the way a `KUBECONFIG` search path does: named entries
/// are concatenated with the first occurrence of a name winning, and scalar
/// fields come from the first file that sets them.
pub fn merge(configs: Vec<Kubeconfig>) -> Result<Kubeconfig> {
    configs
        .into_iter()
        .try_fold(Kubeconfig::default(), Kubeconfig::merge)
        .map_err(|e| BridgeError::KubeconfigError(format!("Failed to merge kubeconfigs: {}", e)))
}

/// Paths written by a federation run
#[derive(Clone, Debug, PartialEq)]
pub struct FederatedCredentials {
    pub renamed: Vec<PathBuf>,
    pub merged: PathBuf,
    pub active_context: String,
}

/// Fetch each cluster's internal kubeconfig, rename its context to the
/// cluster name, and merge all of them into one file under `dir`.
///
/// The merged file is the operator's working kubeconfig for whatever gets
/// deployed onto the bridge. Its `current-context` already names the first
/// cluster after the merge; `use_context` pins it through `kubectl` so the
/// file is left in the state `kubectl` itself would write.
#[instrument(skip(store, clusters), fields(dir = %dir.display()))]
pub async fn federate_credentials<S: CredentialStore + ?Sized>(
    store: &S,
    clusters: &[Cluster],
    dir: &Path,
) -> Result<FederatedCredentials> {
    let Some(first) = clusters.first() else {
        return Err(BridgeError::KubeconfigError(
            "no clusters to federate credentials for".to_string(),
        ));
    };

    let mut renamed_paths = Vec::with_capacity(clusters.len());
    let mut renamed = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        let mut config = store.fetch_internal(cluster).await?;
        rename_context(&mut config, &cluster.name)?;

        let path = dir.join(files::renamed_file(&cluster.name));
        store.write(&path, &config).await?;
        info!("Wrote kubeconfig for cluster {} to {}", cluster.name, path.display());

        renamed_paths.push(path);
        renamed.push(config);
    }

    let mut flattened = Vec::with_capacity(renamed.len());
    for mut config in renamed {
        flatten(&mut config, dir).await?;
        flattened.push(config);
    }

    let merged = merge(flattened)?;
    let merged_path = dir.join(files::MERGED_FILE);
    store.write(&merged_path, &merged).await?;
    info!(
        "Wrote merged kubeconfig with {} contexts to {}",
        merged.contexts.len(),
        merged_path.display()
    );

    store.use_context(&merged_path, &first.name).await?;

    Ok(FederatedCredentials {
        renamed: renamed_paths,
        merged: merged_path,
        active_context: first.name.clone(),
    })
}
