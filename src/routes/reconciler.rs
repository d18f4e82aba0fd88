// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Route reconciliation between two clusters.
//!
//! For an ordered pair (source, target) every source node gets one route per
//! target pod network, via the node owning it, and one route to the target
//! service network via the target control plane. Routes are installed with
//! replace semantics, so reruns converge on the same tables.

use super::RouteInstaller;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::types::{Node, Route};
use tracing::{info, instrument};

/// A route together with the node it has to be installed on
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedRoute {
    pub host: Node,
    pub route: Route,
}

/// Compute the routes letting every source node reach the target cluster.
///
/// Fails before producing anything when the target has no control-plane node.
pub fn plan_routes(source: &Inventory, target: &Inventory) -> Result<Vec<PlannedRoute>> {
    let control_plane_ip = target.control_plane_ip()?;
    let service_route = Route::new(target.service_network(), control_plane_ip);

    let mut planned = Vec::with_capacity(source.nodes.len() * (target.nodes.len() + 1));
    for host in &source.nodes {
        for peer in &target.nodes {
            planned.push(PlannedRoute {
                host: host.clone(),
                route: Route::new(peer.pod_cidr, peer.internal_ip),
            });
        }
        planned.push(PlannedRoute {
            host: host.clone(),
            route: service_route.clone(),
        });
    }
    Ok(planned)
}

/// Install all routes from `source` towards `target`, stopping at the first failure.
/// Returns the number of routes installed.
#[instrument(skip_all, fields(source = %source.cluster.name, target = %target.cluster.name))]
pub async fn reconcile_pair<I: RouteInstaller + ?Sized>(
    installer: &I,
    source: &Inventory,
    target: &Inventory,
) -> Result<usize> {
    let planned = plan_routes(source, target)?;

    for PlannedRoute { host, route } in &planned {
        info!("{}: ip route replace {}", host.name, route);
        installer.replace_route(host, route).await?;
    }

    info!(
        "Installed {} routes from cluster {} to cluster {}",
        planned.len(),
        source.cluster.name,
        target.cluster.name
    );
    Ok(planned.len())
}

/// Reconcile routes in both directions, `first → second` then `second → first`.
///
/// There is no rollback: if the second pairing fails, routes installed by the
/// first one stay in place.
pub async fn reconcile_routes<I: RouteInstaller + ?Sized>(
    installer: &I,
    first: &Inventory,
    second: &Inventory,
) -> Result<usize> {
    let mut installed = 0;
    for (source, target) in [(first, second), (second, first)] {
        installed += reconcile_pair(installer, source, target).await?;
    }
    Ok(installed)
}
