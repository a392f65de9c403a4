// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Driver runs against fake check functions

mod helpers;

use helpers::FakeCheckFunction;
use objcheck::bootstrap::{run_driver, DriveOptions};
use objcheck::check::EndpointCheck;
use objcheck::client::{RemoteCheckClient, BAD_POST};
use objcheck::config::PoolConfig;
use objcheck::pool::WorkerPool;
use objcheck::ObjcheckConfigBuilder;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[tokio::test]
async fn every_job_is_posted_to_every_function() {
    let functions = [
        FakeCheckFunction::replying("Check Success"),
        FakeCheckFunction::replying("Check Success"),
        FakeCheckFunction::replying("Check Error"),
        FakeCheckFunction::replying("Unsupported Type"),
    ];
    let mut urls = Vec::new();
    for function in &functions {
        urls.push(function.spawn().await);
    }

    // 3 bursts of 4 jobs: pauses of 1, 2 and 4 ms
    let config = ObjcheckConfigBuilder::with_defaults()
        .function_urls(urls)
        .workers(3)
        .schedule(4, Duration::from_millis(1), Duration::from_millis(4))
        .build();

    let report = tokio::time::timeout(
        Duration::from_secs(30),
        run_driver(config, DriveOptions::default()),
    )
    .await
    .expect("driver must finish once the schedule closes the queue")
    .unwrap();

    assert_eq!(report.jobs(), 12);
    assert_eq!(report.results, 48);
    assert_eq!(report.by_result.get("Check Success"), Some(&24));
    assert_eq!(report.by_result.get("Check Error"), Some(&12));
    assert_eq!(report.by_result.get("Unsupported Type"), Some(&12));

    for function in &functions {
        let bodies = function.bodies();
        assert_eq!(bodies.len(), 12);
        let check: EndpointCheck = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(check.endpoint, "GCS");
        assert!(check.target.starts_with("source/") && check.target.ends_with("_1k.obj"));
    }
}

#[tokio::test]
async fn jobs_target_burst_indices() {
    let function = FakeCheckFunction::replying("Check Success");
    let config = ObjcheckConfigBuilder::with_defaults()
        .function_urls(vec![function.spawn().await])
        .workers(1)
        .schedule(3, Duration::from_millis(1), Duration::from_millis(1))
        .build();

    run_driver(config, DriveOptions::default()).await.unwrap();

    let mut targets: Vec<String> = function
        .bodies()
        .iter()
        .map(|b| serde_json::from_str::<EndpointCheck>(b).unwrap().target)
        .collect();
    targets.sort();
    assert_eq!(
        targets,
        vec!["source/0_1k.obj", "source/1_1k.obj", "source/2_1k.obj"]
    );
}

#[tokio::test]
async fn transport_failures_still_produce_results() {
    let live = FakeCheckFunction::replying("Check Success");
    let dead = Url::parse("http://127.0.0.1:9/HTTPCheck").unwrap();
    let client = RemoteCheckClient::new(
        vec![live.spawn().await, dead],
        Duration::from_secs(2),
    )
    .unwrap();

    let pool = WorkerPool::spawn(&PoolConfig::default(), Arc::new(client)).unwrap();
    let jobs = pool.jobs();
    tokio::spawn(async move {
        for i in 0..5 {
            jobs.push(EndpointCheck::new("GCS", format!("source/{i}_1k.obj")))
                .await
                .unwrap();
        }
    });

    let report = pool.drain().await.unwrap();
    assert_eq!(report.results, 10);
    assert_eq!(report.by_result.get("Check Success"), Some(&5));
    assert_eq!(report.by_result.get(BAD_POST), Some(&5));
}
