// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Worker pool drain behaviour across pool shapes

use async_trait::async_trait;
use objcheck::config::PoolConfig;
use objcheck::pool::{CheckRunner, ResultSink, WorkerPool};
use std::sync::Arc;
use std::time::Duration;

/// Sleeps a little per job so workers interleave
struct Slow;

#[async_trait]
impl CheckRunner<u64> for Slow {
    async fn run(&self, job: u64, sink: &ResultSink) {
        tokio::time::sleep(Duration::from_micros(job % 50)).await;
        sink.push(if job % 2 == 0 { "Check Success" } else { "Check Error" })
            .await;
    }
}

async fn run(workers: usize, job_capacity: usize, result_capacity: usize, jobs: u64) {
    let config = PoolConfig {
        workers,
        job_capacity,
        result_capacity,
    };
    let pool = WorkerPool::spawn(&config, Arc::new(Slow)).unwrap();
    let queue = pool.jobs();
    tokio::spawn(async move {
        for job in 0..jobs {
            queue.push(job).await.unwrap();
        }
    });

    let report = tokio::time::timeout(Duration::from_secs(30), pool.drain())
        .await
        .unwrap_or_else(|_| panic!("pool of {workers} stalled on {jobs} jobs"))
        .unwrap();

    assert_eq!(report.results as u64, jobs);
    assert_eq!(report.jobs() as u64, jobs);
    assert_eq!(report.workers.len(), workers);
    let successes = report.by_result.get("Check Success").copied().unwrap_or(0) as u64;
    assert_eq!(successes, jobs.div_ceil(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn yields_exactly_one_result_per_job() {
    for (workers, jobs) in [(1, 0), (1, 17), (10, 440), (10, 600), (32, 5)] {
        run(workers, 100, 10_000, jobs).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tiny_queues_do_not_deadlock() {
    // result queue far smaller than the result count: drain runs concurrently
    run(10, 1, 1, 500).await;
    run(3, 2, 1, 250).await;
}
