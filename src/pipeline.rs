// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The bootstrap pipeline: inventory, routes, DNS, credentials, in that order.

use crate::config::Config;
use crate::dns::{federate_clusters, DnsConfigStore};
use crate::error::Result;
use crate::inventory::{resolve_inventory, ClusterAdmin};
use crate::kubeconfig::{federate_credentials, CredentialStore, FederatedCredentials};
use crate::routes::{reconcile_routes, RouteInstaller};
use crate::types::Cluster;
use std::fmt;
use tracing::{error, info, instrument};

/// Progress of a bootstrap run. `Failed` is terminal; there is no resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    InventoryResolved,
    RoutesInstalled,
    DnsFederated,
    CredentialsFederated,
    Complete,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome of a successful run
#[derive(Clone, Debug, PartialEq)]
pub struct BootstrapReport {
    pub routes_installed: usize,
    pub credentials: FederatedCredentials,
}

pub struct Bootstrap<'a> {
    config: &'a Config,
    admin: &'a dyn ClusterAdmin,
    installer: &'a dyn RouteInstaller,
    dns: &'a dyn DnsConfigStore,
    credentials: &'a dyn CredentialStore,
    stage: Stage,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        config: &'a Config,
        admin: &'a dyn ClusterAdmin,
        installer: &'a dyn RouteInstaller,
        dns: &'a dyn DnsConfigStore,
        credentials: &'a dyn CredentialStore,
    ) -> Self {
        Self {
            config,
            admin,
            installer,
            dns,
            credentials,
            stage: Stage::NotStarted,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run every stage in order, stopping at the first error.
    /// Whatever earlier stages changed stays changed.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<BootstrapReport> {
        match self.run_stages().await {
            Ok(report) => {
                self.advance(Stage::Complete);
                Ok(report)
            }
            Err(e) => {
                error!("Bootstrap failed after stage {}: {}", self.stage, e);
                self.stage = Stage::Failed;
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self) -> Result<BootstrapReport> {
        let config = self.config;
        let [first, second] = &config.clusters;

        let first_inventory = resolve_inventory(self.admin, first).await?;
        let second_inventory = resolve_inventory(self.admin, second).await?;
        self.advance(Stage::InventoryResolved);

        let routes_installed =
            reconcile_routes(self.installer, &first_inventory, &second_inventory).await?;
        self.advance(Stage::RoutesInstalled);

        federate_clusters(self.admin, self.dns, &config.clusters, config.zone_merge_mode).await?;
        self.advance(Stage::DnsFederated);

        let clusters: Vec<Cluster> = config.clusters.iter().map(|c| c.cluster.clone()).collect();
        let credentials =
            federate_credentials(self.credentials, &clusters, &config.components_dir).await?;
        self.advance(Stage::CredentialsFederated);

        Ok(BootstrapReport {
            routes_installed,
            credentials,
        })
    }

    fn advance(&mut self, next: Stage) {
        info!("Bootstrap stage {} -> {}", self.stage, next);
        self.stage = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterConfig;
    use crate::dns::store::MockDnsConfigStore;
    use crate::dns::{Corefile, ZoneMergeMode};
    use crate::error::BridgeError;
    use crate::inventory::fixtures::node;
    use crate::inventory::MockClusterAdmin;
    use crate::kubeconfig::fixtures::kind_kubeconfig;
    use crate::kubeconfig::store::MockCredentialStore;
    use crate::kubeconfig::parse_kubeconfig;
    use crate::test_utils::{FakeDnsStore, FakeRouteTables};
    use crate::types::{Node, NodeRole};
    use std::net::IpAddr;
    use std::path::PathBuf;

    const COREFILE: &str = ".:53 {\n    errors\n    forward . /etc/resolv.conf\n}\n";

    fn config() -> Config {
        Config {
            clusters: [
                ClusterConfig {
                    cluster: Cluster::new("grpc-xds-1", "kind-grpc-xds-1"),
                    service_network: "10.96.0.0/16".parse().unwrap(),
                    dns_domain: "cluster1.local".to_string(),
                },
                ClusterConfig {
                    cluster: Cluster::new("grpc-xds-2", "kind-grpc-xds-2"),
                    service_network: "10.220.0.0/16".parse().unwrap(),
                    dns_domain: "cluster2.local".to_string(),
                },
            ],
            components_dir: PathBuf::from("k8s/components/kubeconfig"),
            zone_merge_mode: ZoneMergeMode::Append,
        }
    }

    fn topology(cluster: &str) -> Vec<Node> {
        match cluster {
            "grpc-xds-1" => vec![
                node(cluster, "grpc-xds-1-control-plane", "172.18.0.2", "10.244.0.0/24", NodeRole::ControlPlane),
                node(cluster, "grpc-xds-1-worker", "172.18.0.3", "10.244.1.0/24", NodeRole::Worker),
            ],
            _ => vec![
                node(cluster, "grpc-xds-2-control-plane", "172.18.0.5", "10.245.0.0/24", NodeRole::ControlPlane),
                node(cluster, "grpc-xds-2-worker", "172.18.0.4", "10.245.1.0/24", NodeRole::Worker),
            ],
        }
    }

    fn admin_with<F>(nodes: F) -> MockClusterAdmin
    where
        F: Fn(&str) -> Vec<Node> + Send + Sync + 'static,
    {
        let mut admin = MockClusterAdmin::new();
        admin
            .expect_list_nodes()
            .returning(move |c| Ok(nodes(&c.name)));
        admin.expect_dns_service_ip().returning(|c| {
            Ok(if c.name == "grpc-xds-1" {
                "10.96.0.10".parse().unwrap()
            } else {
                "10.220.0.10".parse().unwrap()
            })
        });
        admin
    }

    fn credentials() -> MockCredentialStore {
        let mut store = MockCredentialStore::new();
        store.expect_fetch_internal().returning(|c| {
            parse_kubeconfig(&kind_kubeconfig(&c.name, &format!("{}-control-plane", c.name)))
        });
        store.expect_write().returning(|_, _| Ok(()));
        store.expect_use_context().returning(|_, _| Ok(()));
        store
    }

    #[tokio::test]
    async fn test_full_run_completes() {
        let config = config();
        let admin = admin_with(topology);
        let routes = FakeRouteTables::default();
        let dns = FakeDnsStore::with(&[
            (&config.clusters[0].cluster, COREFILE),
            (&config.clusters[1].cluster, COREFILE),
        ]);
        let creds = credentials();

        let mut bootstrap = Bootstrap::new(&config, &admin, &routes, &dns, &creds);
        assert_eq!(bootstrap.stage(), Stage::NotStarted);

        let report = bootstrap.run().await.unwrap();

        assert_eq!(bootstrap.stage(), Stage::Complete);
        assert_eq!(report.routes_installed, 12);
        assert_eq!(report.credentials.active_context, "grpc-xds-1");

        assert_eq!(
            routes.route_to("grpc-xds-1-worker", "10.220.0.0/16".parse().unwrap()),
            Some("172.18.0.5".parse::<IpAddr>().unwrap())
        );
        assert_eq!(
            routes.route_to("grpc-xds-2-worker", "10.244.1.0/24".parse().unwrap()),
            Some("172.18.0.3".parse::<IpAddr>().unwrap())
        );

        let corefile = Corefile::parse(&dns.corefile(&config.clusters[0].cluster)).unwrap();
        assert_eq!(corefile.count_zone("cluster2.local"), 1);
    }

    #[tokio::test]
    async fn test_rerun_keeps_routes_but_duplicates_dns_stanza() {
        let config = config();
        let admin = admin_with(topology);
        let routes = FakeRouteTables::default();
        let dns = FakeDnsStore::with(&[
            (&config.clusters[0].cluster, COREFILE),
            (&config.clusters[1].cluster, COREFILE),
        ]);
        let creds = credentials();

        Bootstrap::new(&config, &admin, &routes, &dns, &creds)
            .run()
            .await
            .unwrap();
        let tables = routes.snapshot();
        Bootstrap::new(&config, &admin, &routes, &dns, &creds)
            .run()
            .await
            .unwrap();

        assert_eq!(routes.snapshot(), tables);
        let corefile = Corefile::parse(&dns.corefile(&config.clusters[1].cluster)).unwrap();
        assert_eq!(corefile.count_zone("cluster1.local"), 2);
    }

    #[tokio::test]
    async fn test_missing_control_plane_fails_with_partial_routes() {
        let config = config();
        // grpc-xds-1 lost its control plane: the grpc-xds-2 -> grpc-xds-1 pairing cannot be planned
        let admin = admin_with(|cluster| {
            topology(cluster)
                .into_iter()
                .filter(|n| n.cluster != "grpc-xds-1" || !n.is_control_plane())
                .collect()
        });
        let routes = FakeRouteTables::default();
        let mut dns = MockDnsConfigStore::new();
        dns.expect_read_corefile().never();
        dns.expect_write_corefile().never();
        let mut creds = MockCredentialStore::new();
        creds.expect_fetch_internal().never();

        let mut bootstrap = Bootstrap::new(&config, &admin, &routes, &dns, &creds);
        let err = bootstrap.run().await.unwrap_err();

        assert!(matches!(err, BridgeError::ResourceLookup(_)));
        assert_eq!(bootstrap.stage(), Stage::Failed);

        // routes from the first pairing remain
        assert_eq!(routes.table("grpc-xds-1-worker").len(), 3);
        // nothing reached the second cluster
        assert!(routes.table("grpc-xds-2-control-plane").is_empty());
        assert!(routes.table("grpc-xds-2-worker").is_empty());
    }

    #[tokio::test]
    async fn test_credential_failure_is_terminal() {
        let config = config();
        let admin = admin_with(topology);
        let routes = FakeRouteTables::default();
        let dns = FakeDnsStore::with(&[
            (&config.clusters[0].cluster, COREFILE),
            (&config.clusters[1].cluster, COREFILE),
        ]);
        let mut creds = MockCredentialStore::new();
        creds.expect_fetch_internal().returning(|_| {
            Err(BridgeError::ExternalCommand {
                command: "kind get kubeconfig --internal --name grpc-xds-1".to_string(),
                status: Some(7),
                stderr: "boom".to_string(),
            })
        });

        let mut bootstrap = Bootstrap::new(&config, &admin, &routes, &dns, &creds);
        let err = bootstrap.run().await.unwrap_err();

        assert_eq!(err.exit_code(), 7);
        assert_eq!(bootstrap.stage(), Stage::Failed);
        // DNS was already federated and is left as is
        assert!(dns
            .corefile(&config.clusters[0].cluster)
            .contains("cluster2.local:53"));
    }
}
