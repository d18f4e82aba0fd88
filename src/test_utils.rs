// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::dns::DnsConfigStore;
use crate::error::{BridgeError, Result as BridgeResult};
use crate::routes::RouteInstaller;
use crate::types::{Cluster, Node, Route};
use async_trait::async_trait;
use http::{Request, Response};
use http_body_util::BodyExt;
use ipnet::IpNet;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request seen by the mock, with its body decoded as UTF-8
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let content_type = req
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                content_type,
                body: String::from_utf8_lossy(&bytes).to_string(),
            });

            let (status, body) = response.unwrap_or_else(|| {
                (404, not_found_json("resource", "unknown"))
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a mock node JSON object
pub fn node_json(name: &str, internal_ip: &str, pod_cidr: &str, control_plane: bool) -> serde_json::Value {
    let mut labels = serde_json::json!({ "kubernetes.io/hostname": name });
    if control_plane {
        labels[crate::constants::labels::CONTROL_PLANE] = serde_json::json!("");
    }
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Node",
        "metadata": { "name": name, "labels": labels },
        "spec": { "podCIDR": pod_cidr },
        "status": {
            "addresses": [
                { "type": "InternalIP", "address": internal_ip },
                { "type": "Hostname", "address": name }
            ]
        }
    })
}

/// Create a mock node list JSON response
pub fn node_list_json(nodes: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "NodeList",
        "metadata": { "resourceVersion": "1" },
        "items": nodes
    })
    .to_string()
}

/// Create a mock service JSON response
pub fn service_json(namespace: &str, name: &str, cluster_ip: Option<&str>) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": { "name": name, "namespace": namespace },
        "spec": { "clusterIP": cluster_ip, "ports": [{ "name": "dns", "port": 53, "protocol": "UDP" }] }
    })
    .to_string()
}

/// Create a mock config map JSON response
pub fn configmap_json(namespace: &str, name: &str, data: &[(&str, &str)]) -> String {
    let data: serde_json::Map<String, serde_json::Value> = data
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
        .collect();
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": { "name": name, "namespace": namespace },
        "data": data
    })
    .to_string()
}

/// In-memory routing tables keyed by node name, with `ip route replace` semantics
#[derive(Clone, Default)]
pub struct FakeRouteTables {
    tables: Arc<Mutex<BTreeMap<String, BTreeMap<IpNet, IpAddr>>>>,
}

impl FakeRouteTables {
    pub fn table(&self, node: &str) -> BTreeMap<IpNet, IpAddr> {
        self.tables
            .lock()
            .unwrap()
            .get(node)
            .cloned()
            .unwrap_or_default()
    }

    pub fn route_to(&self, node: &str, destination: IpNet) -> Option<IpAddr> {
        self.table(node).get(&destination).copied()
    }

    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<IpNet, IpAddr>> {
        self.tables.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteInstaller for FakeRouteTables {
    async fn replace_route(&self, node: &Node, route: &Route) -> BridgeResult<()> {
        self.tables
            .lock()
            .unwrap()
            .entry(node.name.clone())
            .or_default()
            .insert(route.destination, route.via);
        Ok(())
    }
}

/// In-memory Corefile storage keyed by cluster name
#[derive(Clone, Default)]
pub struct FakeDnsStore {
    corefiles: Arc<Mutex<HashMap<String, String>>>,
}

impl FakeDnsStore {
    pub fn with(entries: &[(&Cluster, &str)]) -> Self {
        let store = Self::default();
        for (cluster, corefile) in entries {
            store
                .corefiles
                .lock()
                .unwrap()
                .insert(cluster.name.clone(), corefile.to_string());
        }
        store
    }

    pub fn corefile(&self, cluster: &Cluster) -> String {
        self.corefiles
            .lock()
            .unwrap()
            .get(&cluster.name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DnsConfigStore for FakeDnsStore {
    async fn read_corefile(&self, cluster: &Cluster) -> BridgeResult<String> {
        self.corefiles
            .lock()
            .unwrap()
            .get(&cluster.name)
            .cloned()
            .ok_or_else(|| BridgeError::ResourceLookup(format!("no Corefile for {}", cluster.name)))
    }

    async fn write_corefile(&self, cluster: &Cluster, corefile: &str) -> BridgeResult<()> {
        self.corefiles
            .lock()
            .unwrap()
            .insert(cluster.name.clone(), corefile.to_string());
        Ok(())
    }
}
