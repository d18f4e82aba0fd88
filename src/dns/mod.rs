// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! DNS federation between the bridged clusters.

pub mod corefile;
pub mod patcher;
pub mod store;

pub use corefile::{Corefile, ServerBlock, ZoneForward};
pub use patcher::{federate_clusters, federate_zone};
pub use store::{DnsConfigStore, KubeDnsConfigStore};

use std::str::FromStr;
use thiserror::Error;

/// How a forwarding stanza is merged into an existing Corefile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoneMergeMode {
    /// Add the stanza unconditionally; reruns leave duplicate blocks
    #[default]
    Append,
    /// Replace the stanza for the same zone, or add it when absent
    Upsert,
}

#[derive(Error, Debug)]
#[error("unknown zone merge mode '{0}', expected 'append' or 'upsert'")]
pub struct ParseZoneMergeModeError(String);

impl FromStr for ZoneMergeMode {
    type Err = ParseZoneMergeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(ZoneMergeMode::Append),
            "upsert" => Ok(ZoneMergeMode::Upsert),
            _ => Err(ParseZoneMergeModeError(s.to_string())),
        }
    }
}
