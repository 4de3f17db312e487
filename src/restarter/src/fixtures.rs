//! Helper methods only available for tests
use crate::model::WorkloadKind;

use http::{header, Method, Request, Response, StatusCode};
use hyper::Body;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::Resource;
use kube::Client;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

type ApiServerHandle = tower_test::mock::Handle<Request<Body>, Response<Body>>;

fn url_path_segment(kind: WorkloadKind) -> &'static str {
    match kind {
        WorkloadKind::Deployment => Deployment::URL_PATH_SEGMENT,
        WorkloadKind::StatefulSet => StatefulSet::URL_PATH_SEGMENT,
        WorkloadKind::DaemonSet => DaemonSet::URL_PATH_SEGMENT,
    }
}

fn kind_for_segment(segment: &str) -> Option<WorkloadKind> {
    WorkloadKind::ALL
        .into_iter()
        .find(|kind| url_path_segment(*kind) == segment)
}

/// Cluster state served by the mock API server.
#[derive(Clone, Debug, Default)]
pub struct Cluster {
    namespaces: Vec<String>,
    workloads: BTreeMap<(String, WorkloadKind), Vec<String>>,
    failing: BTreeSet<String>,
}

impl Cluster {
    pub fn new(namespaces: &[&str]) -> Self {
        Self {
            namespaces: namespaces.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    pub fn with_workloads(mut self, ns: &str, kind: WorkloadKind, names: &[&str]) -> Self {
        self.workloads
            .entry((ns.to_string(), kind))
            .or_default()
            .extend(names.iter().map(ToString::to_string));
        self
    }

    /// Answer every request for `path` with a 500.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    fn respond(&self, method: &Method, path: &str) -> Response<Body> {
        if self.failing.contains(path) {
            return status_response(StatusCode::INTERNAL_SERVER_ERROR, "InternalError", path);
        }

        let segments = path.trim_start_matches('/').split('/').collect::<Vec<_>>();
        match segments.as_slice() {
            ["api", "v1", "namespaces"] if method == Method::GET => {
                let items = self
                    .namespaces
                    .iter()
                    .map(|name| json!({ "apiVersion": "v1", "kind": "Namespace", "metadata": { "name": name } }))
                    .collect::<Vec<_>>();
                json_response(json!({
                    "apiVersion": "v1",
                    "kind": "NamespaceList",
                    "metadata": { "resourceVersion": "1" },
                    "items": items,
                }))
            }
            ["apis", "apps", "v1", "namespaces", ns, segment] if method == Method::GET => {
                let Some(kind) = kind_for_segment(segment) else {
                    return status_response(StatusCode::NOT_FOUND, "NotFound", path);
                };
                let items = self
                    .workload_names(ns, kind)
                    .iter()
                    .map(|name| workload(kind, ns, name))
                    .collect::<Vec<_>>();
                json_response(json!({
                    "apiVersion": "apps/v1",
                    "kind": format!("{}List", kind),
                    "metadata": { "resourceVersion": "1" },
                    "items": items,
                }))
            }
            ["apis", "apps", "v1", "namespaces", ns, segment, name] if method == Method::PATCH => {
                match kind_for_segment(segment) {
                    Some(kind) if self.workload_names(ns, kind).iter().any(|n| n == name) => {
                        json_response(workload(kind, ns, name))
                    }
                    _ => status_response(StatusCode::NOT_FOUND, "NotFound", path),
                }
            }
            _ => status_response(StatusCode::NOT_FOUND, "NotFound", path),
        }
    }

    fn workload_names(&self, ns: &str, kind: WorkloadKind) -> &[String] {
        self.workloads
            .get(&(ns.to_string(), kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn workload(kind: WorkloadKind, ns: &str, name: &str) -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": kind.as_str(),
        "metadata": { "name": name, "namespace": ns, "resourceVersion": "1" },
    })
}

fn json_response(body: Value) -> Response<Body> {
    Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn status_response(code: StatusCode, reason: &str, path: &str) -> Response<Body> {
    let body = json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": format!("{} serving {}", reason, path),
        "reason": reason,
        "code": code.as_u16(),
    });
    Response::builder()
        .status(code)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Mock API server that answers from a [`Cluster`] and records every request.
pub struct ApiServerVerifier {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ApiServerVerifier {
    /// Must be called from within a tokio runtime.
    pub fn new(cluster: Cluster) -> (Client, Self) {
        let (mock_service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let mock_client = Client::new(mock_service, "default");
        let requests = Arc::new(Mutex::new(Vec::new()));
        tokio::spawn(serve(handle, cluster, requests.clone()));
        (mock_client, Self { requests })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn patches(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == Method::PATCH)
            .collect()
    }

    pub fn list_paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == Method::GET)
            .map(|request| request.path)
            .collect()
    }
}

async fn serve(mut handle: ApiServerHandle, cluster: Cluster, requests: Arc<Mutex<Vec<RecordedRequest>>>) {
    while let Some((request, send)) = handle.next_request().await {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let bytes = hyper::body::to_bytes(request.into_body()).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        let response = cluster.respond(&method, &path);
        requests.lock().unwrap().push(RecordedRequest {
            method,
            path,
            content_type,
            body,
        });
        send.send_response(response);
    }
}
