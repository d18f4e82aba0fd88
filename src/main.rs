// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use xds_bridge::config::Config;
use xds_bridge::constants::tools;
use xds_bridge::dns::KubeDnsConfigStore;
use xds_bridge::error::BridgeError;
use xds_bridge::exec::ensure_tools_available;
use xds_bridge::inventory::KubeClusterAdmin;
use xds_bridge::kubeconfig::KindCredentialStore;
use xds_bridge::kubernetes::ClusterClients;
use xds_bridge::pipeline::Bootstrap;
use xds_bridge::routes::DockerRouteInstaller;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<BridgeError>()
                .map_or(1, BridgeError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run() -> Result<()> {
    info!("Starting cross-cluster bridge bootstrap");

    // Load configuration
    let config = Config::from_env()?;
    let names: Vec<&str> = config.clusters.iter().map(|c| c.cluster.name.as_str()).collect();
    info!(
        "Configuration loaded: clusters={:?}, components_dir={}, zone_merge_mode={:?}",
        names,
        config.components_dir.display(),
        config.zone_merge_mode
    );

    ensure_tools_available(tools::REQUIRED)?;

    let clusters: Vec<_> = config.clusters.iter().map(|c| c.cluster.clone()).collect();
    let clients = ClusterClients::connect(&clusters).await?;

    let admin = KubeClusterAdmin::new(clients.clone());
    let dns = KubeDnsConfigStore::new(clients);
    let installer = DockerRouteInstaller;
    let credentials = KindCredentialStore;

    let report = Bootstrap::new(&config, &admin, &installer, &dns, &credentials)
        .run()
        .await?;

    info!(
        "Bridge complete: {} routes installed, merged kubeconfig at {}, active context {}",
        report.routes_installed,
        report.credentials.merged.display(),
        report.credentials.active_context
    );
    Ok(())
}
