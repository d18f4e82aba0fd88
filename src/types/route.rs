// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

/// A kernel route to install on a node
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Route {
    pub destination: IpNet,
    pub via: IpAddr,
}

impl Route {
    pub fn new(destination: IpNet, via: IpAddr) -> Self {
        Self { destination, via }
    }

    /// Arguments for `ip route replace`
    pub fn replace_args(&self) -> Vec<String> {
        vec![
            "ip".to_string(),
            "route".to_string(),
            "replace".to_string(),
            self.destination.to_string(),
            "via".to_string(),
            self.via.to_string(),
        ]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.destination, self.via)
    }
}
