// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Corefile, DnsConfigStore, ZoneForward, ZoneMergeMode};
use crate::config::ClusterConfig;
use crate::error::Result;
use crate::inventory::ClusterAdmin;
use crate::types::Cluster;
use tracing::{info, instrument, warn};

/// Add a forwarding stanza to the cluster's Corefile and write it back
#[instrument(skip(store, forward), fields(cluster = %cluster.name, zone = %forward.zone))]
pub async fn federate_zone<S: DnsConfigStore + ?Sized>(
    store: &S,
    cluster: &Cluster,
    forward: &ZoneForward,
    mode: ZoneMergeMode,
) -> Result<()> {
    let current = store.read_corefile(cluster).await?;
    let mut corefile = Corefile::parse(&current)?;

    let existing = corefile.count_zone(&forward.zone);
    match mode {
        ZoneMergeMode::Append => {
            if existing > 0 {
                warn!(
                    "Corefile of cluster {} already serves {} ({} blocks), appending another",
                    cluster.name, forward.zone, existing
                );
            }
            corefile.append(forward.to_block());
        }
        ZoneMergeMode::Upsert => {
            corefile.upsert(forward.to_block());
        }
    }

    store.write_corefile(cluster, &corefile.to_string()).await?;
    info!(
        "Cluster {} forwards {} to {}",
        cluster.name,
        forward.key(),
        forward.upstream
    );
    Ok(())
}

/// Make each cluster forward the other's DNS domain to the other's DNS service.
/// Both DNS service addresses are resolved before anything is patched.
pub async fn federate_clusters<A, S>(
    admin: &A,
    store: &S,
    clusters: &[ClusterConfig; 2],
    mode: ZoneMergeMode,
) -> Result<()>
where
    A: ClusterAdmin + ?Sized,
    S: DnsConfigStore + ?Sized,
{
    let dns_ips = [
        admin.dns_service_ip(&clusters[0].cluster).await?,
        admin.dns_service_ip(&clusters[1].cluster).await?,
    ];

    for (own, peer) in [(0, 1), (1, 0)] {
        let forward = ZoneForward::new(clusters[peer].dns_domain.clone(), dns_ips[peer]);
        federate_zone(store, &clusters[own].cluster, &forward, mode).await?;
    }
    Ok(())
}
