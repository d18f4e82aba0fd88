// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-cluster client creation from the operator kubeconfig

use crate::error::{BridgeError, Result};
use crate::types::Cluster;
use kube::{config::KubeConfigOptions, Client, Config as KConfig};
use std::collections::HashMap;
use tracing::{info, instrument};

/// One API client per bridged cluster, keyed by cluster name
#[derive(Clone, Default)]
pub struct ClusterClients {
    clients: HashMap<String, Client>,
}

impl ClusterClients {
    /// Connect to every cluster through its kubeconfig context
    pub async fn connect(clusters: &[Cluster]) -> Result<Self> {
        let mut clients = HashMap::new();
        for cluster in clusters {
            clients.insert(cluster.name.clone(), create_client_for_context(cluster).await?);
        }
        Ok(Self { clients })
    }

    pub fn insert(&mut self, cluster: &Cluster, client: Client) {
        self.clients.insert(cluster.name.clone(), client);
    }

    pub fn get(&self, cluster: &Cluster) -> Result<Client> {
        self.clients.get(&cluster.name).cloned().ok_or_else(|| {
            BridgeError::Precondition(format!("no API client for cluster {}", cluster.name))
        })
    }
}

/// Create a Kubernetes client for the cluster's context in the operator kubeconfig
#[instrument(skip(cluster), fields(cluster = %cluster.name, context = %cluster.context))]
pub async fn create_client_for_context(cluster: &Cluster) -> Result<Client> {
    let options = KubeConfigOptions {
        context: Some(cluster.context.clone()),
        ..Default::default()
    };

    let client_config = KConfig::from_kubeconfig(&options).await.map_err(|e| {
        BridgeError::KubeconfigError(format!(
            "Failed to load context {} for cluster {}: {}",
            cluster.context, cluster.name, e
        ))
    })?;

    let client = Client::try_from(client_config)
        .map_err(|e| BridgeError::KubeconfigError(format!("Failed to create client: {}", e)))?;

    info!("Connected to cluster {}", cluster.name);
    Ok(client)
}
