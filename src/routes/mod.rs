// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cross-cluster route planning and installation.

pub mod installer;
pub mod reconciler;

pub use installer::{DockerRouteInstaller, RouteInstaller};
pub use reconciler::{plan_routes, reconcile_pair, reconcile_routes, PlannedRoute};
