// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ClusterAdmin backed by the Kubernetes API

use super::ClusterAdmin;
use crate::constants::dns;
use crate::error::{BridgeError, Result};
use crate::kubernetes::ClusterClients;
use crate::types::{Cluster, Node};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node as KubeNode, Service};
use kube::{api::ListParams, Api};
use std::net::IpAddr;
use tracing::{debug, instrument};

pub struct KubeClusterAdmin {
    clients: ClusterClients,
}

impl KubeClusterAdmin {
    pub fn new(clients: ClusterClients) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl ClusterAdmin for KubeClusterAdmin {
    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    async fn list_nodes(&self, cluster: &Cluster) -> Result<Vec<Node>> {
        let nodes: Api<KubeNode> = Api::all(self.clients.get(cluster)?);
        let node_list = nodes.list(&ListParams::default()).await?;

        let nodes = node_list
            .items
            .iter()
            .map(|n| Node::from_kube(&cluster.name, n))
            .collect::<Result<Vec<_>>>()?;

        for node in &nodes {
            debug!(
                "Node {} ({:?}) ip={} podCIDR={}",
                node.name, node.role, node.internal_ip, node.pod_cidr
            );
        }
        Ok(nodes)
    }

    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    async fn dns_service_ip(&self, cluster: &Cluster) -> Result<IpAddr> {
        let services: Api<Service> = Api::namespaced(self.clients.get(cluster)?, dns::NAMESPACE);

        let service = match services.get(dns::SERVICE).await {
            Ok(s) => s,
            Err(kube::Error::Api(err)) if err.code == 404 => {
                return Err(BridgeError::ResourceLookup(format!(
                    "service {}/{} not found in cluster {}",
                    dns::NAMESPACE,
                    dns::SERVICE,
                    cluster.name
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let Some(cluster_ip) = service.spec.and_then(|s| s.cluster_ip) else {
            return Err(BridgeError::ResourceLookup(format!(
                "service {}/{} in cluster {} has no cluster IP",
                dns::NAMESPACE,
                dns::SERVICE,
                cluster.name
            )));
        };

        cluster_ip.parse().map_err(|e| {
            BridgeError::ResourceLookup(format!(
                "service {}/{} in cluster {} has invalid cluster IP '{}': {}",
                dns::NAMESPACE,
                dns::SERVICE,
                cluster.name,
                cluster_ip,
                e
            ))
        })
    }
}
