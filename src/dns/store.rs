// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::dns;
use crate::error::{BridgeError, Result};
use crate::kubernetes::ClusterClients;
use crate::types::Cluster;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    api::{Patch, PatchParams},
    Api,
};
use tracing::{info, instrument};

#[cfg(test)]
use mockall::automock;

/// Storage of a cluster's DNS forwarder configuration
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DnsConfigStore: Send + Sync {
    /// Current Corefile text
    async fn read_corefile(&self, cluster: &Cluster) -> Result<String>;

    /// Replace the Corefile text
    async fn write_corefile(&self, cluster: &Cluster, corefile: &str) -> Result<()>;
}

/// Reads and merge-patches the `coredns` ConfigMap in `kube-system`
pub struct KubeDnsConfigStore {
    clients: ClusterClients,
}

impl KubeDnsConfigStore {
    pub fn new(clients: ClusterClients) -> Self {
        Self { clients }
    }

    fn configmaps(&self, cluster: &Cluster) -> Result<Api<ConfigMap>> {
        Ok(Api::namespaced(self.clients.get(cluster)?, dns::NAMESPACE))
    }
}

#[async_trait]
impl DnsConfigStore for KubeDnsConfigStore {
    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    async fn read_corefile(&self, cluster: &Cluster) -> Result<String> {
        let configmap = match self.configmaps(cluster)?.get(dns::CONFIGMAP).await {
            Ok(cm) => cm,
            Err(kube::Error::Api(err)) if err.code == 404 => {
                return Err(BridgeError::ResourceLookup(format!(
                    "configmap {}/{} not found in cluster {}",
                    dns::NAMESPACE,
                    dns::CONFIGMAP,
                    cluster.name
                )));
            }
            Err(e) => return Err(e.into()),
        };

        configmap
            .data
            .and_then(|mut data| data.remove(dns::COREFILE_KEY))
            .ok_or_else(|| {
                BridgeError::ResourceLookup(format!(
                    "configmap {}/{} in cluster {} has no '{}' key",
                    dns::NAMESPACE,
                    dns::CONFIGMAP,
                    cluster.name,
                    dns::COREFILE_KEY
                ))
            })
    }

    #[instrument(skip(self, cluster, corefile), fields(cluster = %cluster.name))]
    async fn write_corefile(&self, cluster: &Cluster, corefile: &str) -> Result<()> {
        let mut data = serde_json::Map::new();
        data.insert(dns::COREFILE_KEY.to_string(), corefile.into());
        let patch = serde_json::json!({ "data": data });

        self.configmaps(cluster)?
            .patch(dns::CONFIGMAP, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        info!(
            "Patched configmap {}/{} in cluster {}",
            dns::NAMESPACE,
            dns::CONFIGMAP,
            cluster.name
        );
        Ok(())
    }
}
