// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster topology and routing types.

pub mod cluster;
pub mod route;

pub use cluster::{Cluster, Node, NodeRole};
pub use route::Route;
