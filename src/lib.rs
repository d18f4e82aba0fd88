// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod dns;
pub mod error;
pub mod exec;
pub mod inventory;
pub mod kubeconfig;
pub mod kubernetes;
pub mod pipeline;
pub mod routes;
pub mod types;

#[cfg(test)]
pub mod test_utils;
