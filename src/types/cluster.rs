// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::labels;
use crate::error::{BridgeError, Result};
use ipnet::IpNet;
use k8s_openapi::api::core::v1::Node as KubeNode;
use kube::ResourceExt;
use std::fmt;
use std::net::IpAddr;

/// A cluster taking part in the bridge, reached through a kubeconfig context
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cluster {
    pub name: String,
    pub context: String,
}

impl Cluster {
    pub fn new(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    ControlPlane,
    Worker,
}

/// A cluster node as seen by the route reconciler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub cluster: String,
    /// Node name, which kind also uses as the node container name
    pub name: String,
    pub internal_ip: IpAddr,
    pub pod_cidr: IpNet,
    pub role: NodeRole,
}

impl Node {
    pub fn is_control_plane(&self) -> bool {
        self.role == NodeRole::ControlPlane
    }

    /// Build a node from the Kubernetes API representation
    pub fn from_kube(cluster: &str, node: &KubeNode) -> Result<Self> {
        let name = node.name_any();

        let address = node
            .status
            .as_ref()
            .and_then(|s| s.addresses.as_ref())
            .and_then(|addrs| addrs.iter().find(|a| a.type_ == "InternalIP"))
            .ok_or_else(|| {
                BridgeError::ResourceLookup(format!(
                    "node {} in cluster {} has no InternalIP address",
                    name, cluster
                ))
            })?;
        let internal_ip: IpAddr = address.address.parse().map_err(|e| {
            BridgeError::ResourceLookup(format!(
                "node {} in cluster {} has invalid InternalIP '{}': {}",
                name, cluster, address.address, e
            ))
        })?;

        let Some(pod_cidr) = node.spec.as_ref().and_then(|s| s.pod_cidr.as_ref()) else {
            return Err(BridgeError::ResourceLookup(format!(
                "node {} in cluster {} has no podCIDR assigned",
                name, cluster
            )));
        };
        let pod_cidr: IpNet = pod_cidr.parse().map_err(|e| {
            BridgeError::ResourceLookup(format!(
                "node {} in cluster {} has invalid podCIDR '{}': {}",
                name, cluster, pod_cidr, e
            ))
        })?;

        let is_control_plane = node
            .labels()
            .keys()
            .any(|k| k == labels::CONTROL_PLANE || k == labels::MASTER);

        Ok(Node {
            cluster: cluster.to_string(),
            name,
            internal_ip,
            pod_cidr,
            role: if is_control_plane {
                NodeRole::ControlPlane
            } else {
                NodeRole::Worker
            },
        })
    }
}
