// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for objcheck integration tests
//!
//! Provides in-process HTTP servers standing in for Google Cloud Storage and for
//! remote check functions, so tests never leave localhost.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

/// Spawn `router` on an ephemeral localhost port and return its address
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// One request seen by [`FakeGcs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcsRequest {
    pub bucket: String,
    pub object: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct GcsState {
    objects: HashMap<(String, String), Vec<u8>>,
    failing: HashMap<(String, String), StatusCode>,
    requests: Vec<GcsRequest>,
    token_requests: usize,
}

/// Fake GCS JSON API: serves `GET /storage/v1/b/:bucket/o/:object?alt=media`
///
/// Also answers the metadata-server token endpoint at
/// `/computeMetadata/v1/instance/service-accounts/default/token`.
///
/// # Example
///
/// ```rust,ignore
/// let gcs = FakeGcs::new()
///     .with_object("objcheck-us-central1", "10_1_1k.obj", vec![0; 1024]);
/// let base = gcs.spawn().await;
/// ```
#[derive(Clone, Default)]
pub struct FakeGcs {
    state: Arc<Mutex<GcsState>>,
}

impl FakeGcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `bucket/object`
    pub fn with_object(self, bucket: &str, object: &str, body: Vec<u8>) -> Self {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert((bucket.to_string(), object.to_string()), body);
        self
    }

    /// Serve every `<pool>_<id>_<tag>.obj` key for ids in `[1, pool)`
    pub fn with_pool(mut self, bucket: &str, pool: i64, size_tag: &str, len: usize) -> Self {
        for id in 1..pool {
            let key = format!("{pool}_{id}_{size_tag}.obj");
            self = self.with_object(bucket, &key, vec![b'x'; len]);
        }
        self
    }

    /// Answer `bucket/object` with `status`
    pub fn with_failure(self, bucket: &str, object: &str, status: StatusCode) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert((bucket.to_string(), object.to_string()), status);
        self
    }

    /// Every object request seen so far
    pub fn requests(&self) -> Vec<GcsRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of metadata token requests seen so far
    pub fn token_requests(&self) -> usize {
        self.state.lock().unwrap().token_requests
    }

    /// Start serving and return the base URL
    pub async fn spawn(&self) -> Url {
        let router = Router::new()
            .route("/storage/v1/b/:bucket/o/:object", get(gcs_object))
            .route(
                "/computeMetadata/v1/instance/service-accounts/default/token",
                get(metadata_token),
            )
            .with_state(self.state.clone());
        let addr = spawn_router(router).await;
        Url::parse(&format!("http://{addr}")).unwrap()
    }
}

async fn gcs_object(
    State(state): State<Arc<Mutex<GcsState>>>,
    Path((bucket, object)): Path<(String, String)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    state.requests.push(GcsRequest {
        bucket: bucket.clone(),
        object: object.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let key = (bucket, object);
    if let Some(status) = state.failing.get(&key) {
        return (*status, Vec::new());
    }
    match state.objects.get(&key) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, b"No such object".to_vec()),
    }
}

async fn metadata_token(
    State(state): State<Arc<Mutex<GcsState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if headers.get("metadata-flavor").and_then(|v| v.to_str().ok()) != Some("Google") {
        return (StatusCode::FORBIDDEN, String::new());
    }
    state.lock().unwrap().token_requests += 1;
    (
        StatusCode::OK,
        r#"{"access_token":"metadata-token","expires_in":3599,"token_type":"Bearer"}"#.to_string(),
    )
}

/// Fake remote check function: answers `POST /HTTPCheck` with a fixed body and
/// records every request body
#[derive(Clone)]
pub struct FakeCheckFunction {
    reply: &'static str,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl FakeCheckFunction {
    pub fn replying(reply: &'static str) -> Self {
        Self {
            reply,
            bodies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Request bodies seen so far
    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }

    /// Start serving and return the function URL
    pub async fn spawn(&self) -> Url {
        let router = Router::new()
            .route("/HTTPCheck", post(check_function))
            .with_state(self.clone());
        let addr = spawn_router(router).await;
        Url::parse(&format!("http://{addr}/HTTPCheck")).unwrap()
    }
}

async fn check_function(State(function): State<FakeCheckFunction>, body: Bytes) -> &'static str {
    function
        .bodies
        .lock()
        .unwrap()
        .push(String::from_utf8_lossy(&body).into_owned());
    function.reply
}
