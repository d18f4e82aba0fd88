// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes API access for the bridged clusters.

pub mod client;

pub use client::{create_client_for_context, ClusterClients};
