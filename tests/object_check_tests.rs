// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Object and endpoint checks end to end: HTTP service in front, fake GCS behind

mod helpers;

use axum::http::StatusCode;
use helpers::{spawn_router, FakeGcs};
use objcheck::backend::{BackendRegistry, GcsBackend, MemoryBackend};
use objcheck::config::{GcsAuth, GcsConfig};
use objcheck::server::{router, AppState};
use objcheck::{
    Bucket, CheckRequest, CheckRules, CheckStatus, Dispatcher, EndpointChecker, ObjectChecker,
    Service,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn gcs_dispatcher(base: &Url) -> Dispatcher {
    let config = GcsConfig {
        base_url: base.clone(),
        auth: GcsAuth::Anonymous,
        ..GcsConfig::default()
    };
    let gcs = GcsBackend::new(&config, Duration::from_secs(5)).unwrap();
    Dispatcher::new(BackendRegistry::new().with_backend(Arc::new(gcs)))
}

async fn spawn_service(dispatcher: Dispatcher) -> Url {
    let state = AppState::new(
        ObjectChecker::new(CheckRules::default(), dispatcher.clone()),
        EndpointChecker::new(dispatcher),
    );
    let addr = spawn_router(router(state, 10)).await;
    Url::parse(&format!("http://{addr}/")).unwrap()
}

async fn post(url: Url, body: &str) -> (StatusCode, String) {
    let response = reqwest::Client::new()
        .post(url)
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn deployed_example_fetches_ten_pool_objects() {
    let gcs = FakeGcs::new().with_pool("objcheck-us-central1", 10, "1k", 1024);
    let service = spawn_service(gcs_dispatcher(&gcs.spawn().await)).await;

    let (status, body) = post(
        service.join("ObjCheck").unwrap(),
        r#"{"service":"gcs","region":"us-central1","pool":10,"count":10}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Check Success");

    let requests = gcs.requests();
    assert_eq!(requests.len(), 10);
    let valid: HashSet<String> = (1..10).map(|id| format!("10_{id}_1k.obj")).collect();
    for request in &requests {
        assert_eq!(request.bucket, "objcheck-us-central1");
        assert!(valid.contains(&request.object), "unexpected key {}", request.object);
    }
}

#[tokio::test]
async fn failed_fetches_do_not_stop_the_batch() {
    // only ids 1..=4 exist; the rest 404
    let mut gcs = FakeGcs::new();
    for id in 1..=4 {
        gcs = gcs.with_object("objcheck-us-east1", &format!("10_{id}_1k.obj"), vec![0; 8]);
    }
    let dispatcher = gcs_dispatcher(&gcs.spawn().await);
    let checker = ObjectChecker::new(CheckRules::default(), dispatcher);

    let report = checker
        .check(&CheckRequest::new("gcs", "us-east1", 10, 200))
        .await;

    assert_eq!(report.attempted, 200);
    assert_eq!(gcs.requests().len(), 200);
    assert_eq!(report.bucket, Some(Bucket::for_region("us-east1")));
    // with 200 draws from 9 ids, both present and missing ids are hit
    assert!(report.failed > 0 && report.failed < 200);
    assert_eq!(report.status, CheckStatus::CheckError);
    assert_eq!(report.bytes, 8 * (200 - report.failed) as u64);
}

#[tokio::test]
async fn rejections_never_touch_storage() {
    let gcs = FakeGcs::new().with_pool("objcheck-us-central1", 10, "1k", 1);
    let service = spawn_service(gcs_dispatcher(&gcs.spawn().await)).await;
    let url = service.join("ObjCheck").unwrap();

    for (body, expected) in [
        ("{", "Data Error"),
        (r#"{"service":"azure","region":"us-central1","pool":10,"count":1}"#, "Request Error"),
        (r#"{"service":"gcs","region":"us-east-2","pool":10,"count":1}"#, "Request Error"),
        (r#"{"service":"gcs","region":"us-central1","pool":100,"count":1}"#, "Request Error"),
        (r#"{"service":"gcs","region":"us-central1","pool":10,"count":0}"#, "Request Error"),
    ] {
        let (status, text) = post(url.clone(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, expected);
    }
    assert!(gcs.requests().is_empty());
}

#[tokio::test]
async fn endpoint_check_reads_target_from_probe_bucket() {
    let gcs = FakeGcs::new().with_object("ls-saastrace-mr", "source/3_1k.obj", vec![0; 1024]);
    let service = spawn_service(gcs_dispatcher(&gcs.spawn().await)).await;
    let url = service.join("HTTPCheck").unwrap();

    let (_, found) = post(url.clone(), r#"{"endpoint":"GCS","target":"source/3_1k.obj"}"#).await;
    let (_, missing) = post(url.clone(), r#"{"endpoint":"gcs","target":"source/4_1k.obj"}"#).await;
    let (_, unsupported) = post(url, r#"{"endpoint":"azure","target":"source/3_1k.obj"}"#).await;

    assert_eq!(found, "Check Success");
    assert_eq!(missing, "Check Error");
    assert_eq!(unsupported, "Unsupported Type");
    assert_eq!(gcs.requests().len(), 2);
}

#[tokio::test]
async fn s3_checks_dispatch_to_the_s3_backend() {
    let s3 = Arc::new(MemoryBackend::permissive(Service::S3, 1024));
    let gcs = Arc::new(MemoryBackend::permissive(Service::Gcs, 1024));
    let registry = BackendRegistry::new()
        .with_backend(s3.clone())
        .with_backend(gcs.clone());
    let checker = ObjectChecker::new(CheckRules::default(), Dispatcher::new(registry));

    let report = checker
        .check(&CheckRequest::new("s3", "us-east-2", 10, 25))
        .await;

    assert_eq!(report.status, CheckStatus::CheckSuccess);
    assert_eq!(s3.calls().len(), 25);
    assert!(s3.calls().iter().all(|c| c.region == "us-east-2"));
    assert!(gcs.calls().is_empty());
}
