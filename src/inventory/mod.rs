// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster inventory: nodes, control-plane address and service network.

pub mod api;

pub use api::KubeClusterAdmin;

use crate::config::ClusterConfig;
use crate::error::{BridgeError, Result};
use crate::types::{Cluster, Node};
use async_trait::async_trait;
use ipnet::IpNet;
use std::net::IpAddr;
use tracing::{info, instrument};

#[cfg(test)]
use mockall::automock;

/// Read access to a cluster's topology
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterAdmin: Send + Sync {
    /// List all nodes of the cluster in API order
    async fn list_nodes(&self, cluster: &Cluster) -> Result<Vec<Node>>;

    /// Cluster IP of the cluster's DNS service
    async fn dns_service_ip(&self, cluster: &Cluster) -> Result<IpAddr>;
}

/// Snapshot of one cluster's topology for a single run
#[derive(Clone, Debug, PartialEq)]
pub struct Inventory {
    pub cluster: Cluster,
    pub nodes: Vec<Node>,
    pub service_network: IpNet,
}

impl Inventory {
    /// Internal IP of the first control-plane node, in listing order
    pub fn control_plane_ip(&self) -> Result<IpAddr> {
        self.nodes
            .iter()
            .find(|n| n.is_control_plane())
            .map(|n| n.internal_ip)
            .ok_or_else(|| {
                BridgeError::ResourceLookup(format!(
                    "cluster {} has no control-plane node",
                    self.cluster.name
                ))
            })
    }

    /// Service CIDR as provisioned, not read from the cluster
    pub fn service_network(&self) -> IpNet {
        self.service_network
    }
}

/// List a cluster's nodes and pair them with its configured service network
#[instrument(skip(admin, config), fields(cluster = %config.cluster.name))]
pub async fn resolve_inventory<A: ClusterAdmin + ?Sized>(
    admin: &A,
    config: &ClusterConfig,
) -> Result<Inventory> {
    let nodes = admin.list_nodes(&config.cluster).await?;
    info!(
        "Cluster {} has {} nodes, service network {}",
        config.cluster.name,
        nodes.len(),
        config.service_network
    );

    Ok(Inventory {
        cluster: config.cluster.clone(),
        nodes,
        service_network: config.service_network,
    })
}
