// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Node labels marking the control plane
pub mod labels {
    pub const CONTROL_PLANE: &str = "node-role.kubernetes.io/control-plane";
    /// Pre-1.24 clusters still carry this one
    pub const MASTER: &str = "node-role.kubernetes.io/master";
}

/// Cluster DNS resources
pub mod dns {
    pub const NAMESPACE: &str = "kube-system";
    pub const CONFIGMAP: &str = "coredns";
    pub const COREFILE_KEY: &str = "Corefile";
    pub const SERVICE: &str = "kube-dns";
    pub const PORT: u16 = 53;
    /// Cache TTL in seconds for forwarded zones
    pub const CACHE_TTL_SECS: u32 = 30;
}

/// Kubeconfig output layout under the components directory
pub mod kubeconfig {
    pub const MERGED_FILE: &str = "kubeconfig.yaml";

    pub fn renamed_file(context: &str) -> String {
        format!("kubeconfig-{}.yaml", context)
    }
}

/// External tools the bootstrap drives
pub mod tools {
    pub const DOCKER: &str = "docker";
    pub const KIND: &str = "kind";
    pub const KUBECTL: &str = "kubectl";

    pub const REQUIRED: &[&str] = &[DOCKER, KIND, KUBECTL];
}
