// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use ipnet::IpNet;
use std::env;
use std::path::PathBuf;

use crate::dns::ZoneMergeMode;
use crate::types::cluster::Cluster;

/// Settings for one of the two bridged clusters
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub cluster: Cluster,
    /// Service CIDR the cluster was provisioned with. Never checked against
    /// the live cluster, so it has to match the kind config.
    pub service_network: IpNet,
    /// DNS domain the cluster answers for; forwarded to from the peer
    pub dns_domain: String,
}

/// Bootstrap configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub clusters: [ClusterConfig; 2],
    /// Directory receiving the renamed and merged kubeconfig files
    pub components_dir: PathBuf,
    pub zone_merge_mode: ZoneMergeMode,
}

const DEFAULT_SERVICE_CIDRS: [&str; 2] = ["10.96.0.0/16", "10.220.0.0/16"];
const DEFAULT_COMPONENTS_DIR: &str = "k8s/components/kubeconfig";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let clusters = [
            cluster_from_lookup(&lookup, 1)?,
            cluster_from_lookup(&lookup, 2)?,
        ];

        if clusters[0].cluster.name == clusters[1].cluster.name {
            bail!(
                "CLUSTER_1_NAME and CLUSTER_2_NAME must differ, both are '{}'",
                clusters[0].cluster.name
            );
        }

        let components_dir = lookup("COMPONENTS_DIR")
            .unwrap_or_else(|| DEFAULT_COMPONENTS_DIR.to_string())
            .into();

        let zone_merge_mode = match lookup("DNS_ZONE_MERGE_MODE") {
            Some(mode) => mode
                .parse::<ZoneMergeMode>()
                .with_context(|| format!("invalid DNS_ZONE_MERGE_MODE '{}'", mode))?,
            None => ZoneMergeMode::default(),
        };

        Ok(Config {
            clusters,
            components_dir,
            zone_merge_mode,
        })
    }
}

fn cluster_from_lookup<F>(lookup: &F, index: usize) -> Result<ClusterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| lookup(&format!("CLUSTER_{}_{}", index, suffix));

    let name = var("NAME").unwrap_or_else(|| format!("grpc-xds-{}", index));
    let context = var("CONTEXT").unwrap_or_else(|| format!("kind-{}", name));
    let service_cidr =
        var("SERVICE_CIDR").unwrap_or_else(|| DEFAULT_SERVICE_CIDRS[index - 1].to_string());
    let service_network: IpNet = service_cidr
        .parse()
        .with_context(|| format!("CLUSTER_{}_SERVICE_CIDR '{}' is not a CIDR", index, service_cidr))?;
    let dns_domain = var("DNS_DOMAIN").unwrap_or_else(|| format!("cluster{}.local", index));

    Ok(ClusterConfig {
        cluster: Cluster::new(name, context),
        service_network,
        dns_domain,
    })
}
