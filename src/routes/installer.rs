// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::tools;
use crate::error::Result;
use crate::exec::run_command;
use crate::types::{Node, Route};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[cfg(test)]
use mockall::automock;

/// Installs routes into a node's routing table
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RouteInstaller: Send + Sync {
    /// Install the route on the node, replacing any route to the same destination
    async fn replace_route(&self, node: &Node, route: &Route) -> Result<()>;
}

/// Runs `ip route replace` inside kind node containers
#[derive(Debug, Default, Clone)]
pub struct DockerRouteInstaller;

impl DockerRouteInstaller {
    fn exec_args(node: &Node, route: &Route) -> Vec<String> {
        let mut args = vec!["exec".to_string(), node.name.clone()];
        args.extend(route.replace_args());
        args
    }
}

#[async_trait]
impl RouteInstaller for DockerRouteInstaller {
    #[instrument(skip(self, node, route), fields(node = %node.name, route = %route))]
    async fn replace_route(&self, node: &Node, route: &Route) -> Result<()> {
        let args = Self::exec_args(node, route);
        run_command(tools::DOCKER, args.as_slice()).await?;
        debug!("Route {} installed on {}", route, node.name);
        Ok(())
    }
}
