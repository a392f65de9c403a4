// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Entry points behind the `objcheck` subcommands
//!
//! - [`run_server`]: the HTTP check service
//! - [`run_driver`]: post scheduled endpoint checks to remote check functions
//! - [`run_probe`]: run object checks locally through the worker pool

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::backend::{BackendRegistry, MemoryBackend};
use crate::check::{EndpointCheck, EndpointChecker, ObjectChecker};
use crate::client::RemoteCheckClient;
use crate::config::ObjcheckConfig;
use crate::dispatch::Dispatcher;
use crate::pool::{RunReport, WorkerPool};
use crate::schedule::BurstSchedule;
use crate::server::{router, serve_api, AppState};
use crate::types::Service;
use crate::validate::CheckRequest;

/// Bytes served per object by dry-run backends
const DRY_RUN_OBJECT_LEN: usize = 1024;

/// Options for [`run_driver`]
#[derive(Debug, Clone)]
pub struct DriveOptions {
    /// Storage type named in every job
    pub endpoint: String,
    /// Size tag of the target objects, as in `source/<i>_<tag>.obj`
    pub size_tag: String,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            endpoint: "GCS".to_string(),
            size_tag: crate::config::constants::DEFAULT_SIZE_TAG.to_string(),
        }
    }
}

/// Options for [`run_probe`]
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub request: CheckRequest,
    /// How many times to run the check
    pub repeat: usize,
    /// Serve every object from memory instead of the real services
    pub dry_run: bool,
}

/// Serve `POST /ObjCheck` and `POST /HTTPCheck` until interrupted
pub async fn run_server(config: ObjcheckConfig) -> anyhow::Result<()> {
    let registry = BackendRegistry::from_config(&config)?;
    let dispatcher = Dispatcher::new(registry);
    let state = AppState::new(
        ObjectChecker::new(config.rules.clone(), dispatcher.clone()),
        EndpointChecker::new(dispatcher),
    );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    serve_api(
        listener,
        router(state, config.pool.workers),
        shutdown_signal(),
    )
    .await
}

/// Post endpoint checks on the burst schedule and collect every response
pub async fn run_driver(
    config: ObjcheckConfig,
    options: DriveOptions,
) -> anyhow::Result<RunReport> {
    if config.function_urls.is_empty() {
        anyhow::bail!("no check function URLs configured");
    }

    let client = RemoteCheckClient::new(config.function_urls.clone(), config.http_timeout)?;
    let schedule = BurstSchedule::new(&config.schedule);
    info!(
        urls = config.function_urls.len(),
        jobs = schedule.total_jobs(),
        bursts = schedule.bursts(),
        duration_secs = schedule.total_duration().as_secs(),
        "Starting driver"
    );

    let pool = WorkerPool::spawn(&config.pool, Arc::new(client))?;
    let jobs = pool.jobs();
    let producer = tokio::spawn(async move {
        schedule
            .enqueue(jobs, |i| {
                EndpointCheck::new(
                    options.endpoint.as_str(),
                    format!("source/{i}_{}.obj", options.size_tag),
                )
            })
            .await
    });

    let report = pool.drain().await?;
    let enqueued = producer.await?;
    log_report("Driver finished", enqueued, &report);
    Ok(report)
}

/// Run one object check `repeat` times through the worker pool
pub async fn run_probe(config: ObjcheckConfig, options: ProbeOptions) -> anyhow::Result<RunReport> {
    let registry = if options.dry_run {
        info!("Dry run: objects are served from memory");
        Service::ALL.iter().fold(BackendRegistry::new(), |registry, service| {
            registry.with_backend(Arc::new(MemoryBackend::permissive(
                *service,
                DRY_RUN_OBJECT_LEN,
            )))
        })
    } else {
        BackendRegistry::from_config(&config)?
    };
    let checker = ObjectChecker::new(config.rules.clone(), Dispatcher::new(registry));

    let pool = WorkerPool::spawn(&config.pool, Arc::new(checker))?;
    let jobs = pool.jobs();
    let ProbeOptions { request, repeat, .. } = options;
    let producer = tokio::spawn(async move {
        let mut enqueued = 0;
        for _ in 0..repeat {
            if jobs.push(request.clone()).await.is_err() {
                break;
            }
            enqueued += 1;
        }
        enqueued
    });

    let report = pool.drain().await?;
    let enqueued = producer.await?;
    log_report("Probe finished", enqueued, &report);
    Ok(report)
}

fn log_report(message: &str, enqueued: usize, report: &RunReport) {
    for worker in &report.workers {
        info!(
            worker_id = worker.worker_id,
            jobs = worker.jobs,
            results = worker.results,
            "Worker summary"
        );
    }
    for (result, count) in &report.by_result {
        info!(result = %result, count, "Result tally");
    }
    info!(enqueued, results = report.results, "{message}");
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}
