// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Bounded worker pool
//!
//! A fixed set of workers shares one bounded job queue and one bounded result
//! queue. Each worker pulls jobs until the job queue is closed and empty, hands
//! every job to a [`CheckRunner`], and exits. Every worker owns a clone of the
//! result sender, so the result queue closes exactly when the last worker has
//! exited. [`WorkerPool::drain`] reads results until that happens and then joins
//! the workers, so the number of results never has to be known up front.
//!
//! ```text
//!  producer ──► [ jobs: 100 ] ──► worker 0..N ──► [ results: 10 000 ] ──► drain
//! ```
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use objcheck::config::PoolConfig;
//! use objcheck::pool::{CheckRunner, ResultSink, WorkerPool};
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl CheckRunner<u32> for Echo {
//!     async fn run(&self, job: u32, sink: &ResultSink) {
//!         sink.push(job.to_string()).await;
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pool = WorkerPool::spawn(&PoolConfig::default(), Arc::new(Echo)).unwrap();
//! let jobs = pool.jobs();
//! tokio::spawn(async move {
//!     for i in 0..25 {
//!         jobs.push(i).await.unwrap();
//!     }
//! });
//!
//! let report = pool.drain().await.unwrap();
//! assert_eq!(report.results, 25);
//! # }
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn, Instrument, Span};

use crate::config::PoolConfig;
use crate::errors::PoolError;
use crate::spans;

/// Unit of work performed by a pool worker
///
/// A runner pushes zero or more results per job onto the sink.
#[async_trait]
pub trait CheckRunner<J>: Send + Sync + 'static {
    async fn run(&self, job: J, sink: &ResultSink);
}

/// A worker's handle on the shared result queue
#[derive(Debug)]
pub struct ResultSink {
    tx: mpsc::Sender<String>,
    pushed: AtomicUsize,
}

impl ResultSink {
    fn new(tx: mpsc::Sender<String>) -> Self {
        Self {
            tx,
            pushed: AtomicUsize::new(0),
        }
    }

    /// Push one result, waiting while the queue is full
    ///
    /// Returns `false` if the drain side has gone away.
    pub async fn push(&self, result: impl Into<String>) -> bool {
        match self.tx.send(result.into()).await {
            Ok(()) => {
                self.pushed.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                warn!("Result queue closed; dropping result");
                false
            }
        }
    }

    fn pushed(&self) -> usize {
        self.pushed.load(Ordering::Relaxed)
    }
}

/// Producer side of the job queue
///
/// The queue closes once every `JobQueue` clone and the pool's own handle are
/// dropped.
#[derive(Debug)]
pub struct JobQueue<J> {
    tx: mpsc::Sender<J>,
}

impl<J> Clone for JobQueue<J> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<J: Send> JobQueue<J> {
    /// Enqueue a job, waiting while the queue is full
    ///
    /// # Errors
    ///
    /// Gives the job back if every worker has exited.
    pub async fn push(&self, job: J) -> Result<(), J> {
        self.tx.send(job).await.map_err(|e| e.0)
    }
}

/// What one worker did during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker_id: usize,
    pub jobs: usize,
    pub results: usize,
}

/// Outcome of a complete pool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Per-worker counts, ordered by worker id
    pub workers: Vec<WorkerSummary>,
    /// Total results drained
    pub results: usize,
    /// Results grouped by their text
    pub by_result: BTreeMap<String, usize>,
}

impl RunReport {
    /// Total jobs processed across all workers
    pub fn jobs(&self) -> usize {
        self.workers.iter().map(|w| w.jobs).sum()
    }
}

/// A running pool of workers
pub struct WorkerPool<J> {
    jobs: JobQueue<J>,
    results: mpsc::Receiver<String>,
    workers: JoinSet<WorkerSummary>,
    span: Span,
}

impl<J: Send + 'static> WorkerPool<J> {
    /// Start `config.workers` workers running `runner`
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NoWorkers`] when the pool is configured with zero
    /// workers, which could never drain a job.
    pub fn spawn<R>(config: &PoolConfig, runner: Arc<R>) -> Result<Self, PoolError>
    where
        R: CheckRunner<J>,
    {
        if config.workers == 0 {
            return Err(PoolError::NoWorkers);
        }

        let (job_tx, job_rx) = mpsc::channel(config.job_capacity.max(1));
        let (result_tx, result_rx) = mpsc::channel(config.result_capacity.max(1));
        let job_rx = Arc::new(Mutex::new(job_rx));
        let span = spans::pool_run(config.workers);

        let mut workers = JoinSet::new();
        for worker_id in 0..config.workers {
            let jobs = Arc::clone(&job_rx);
            let sink = ResultSink::new(result_tx.clone());
            let runner = Arc::clone(&runner);
            let parent = span.clone();
            workers.spawn(
                worker_loop(worker_id, jobs, sink, runner, parent.clone()).instrument(parent),
            );
        }

        debug!(workers = config.workers, "Worker pool started");
        Ok(Self {
            jobs: JobQueue { tx: job_tx },
            results: result_rx,
            workers,
            span,
        })
    }

    /// A producer handle for the job queue
    pub fn jobs(&self) -> JobQueue<J> {
        self.jobs.clone()
    }

    /// Close the pool's own job handle, drain every result, and join the workers
    ///
    /// Returns once all producers have dropped their [`JobQueue`] handles and
    /// every worker has finished.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::WorkerFailed`] if a worker panicked. All other
    /// workers are still joined first.
    pub async fn drain(self) -> Result<RunReport, PoolError> {
        let Self {
            jobs,
            mut results,
            mut workers,
            span,
        } = self;
        drop(jobs);

        let mut report = RunReport::default();
        while let Some(result) = results.recv().await {
            report.results += 1;
            *report.by_result.entry(result).or_default() += 1;
        }

        let mut failure = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(summary) => report.workers.push(summary),
                Err(err) => {
                    warn!(parent: &span, error = %err, "Worker task failed");
                    failure.get_or_insert(PoolError::WorkerFailed {
                        details: err.to_string(),
                    });
                }
            }
        }
        report.workers.sort_by_key(|w| w.worker_id);

        span.record("results", report.results);
        info!(
            parent: &span,
            jobs = report.jobs(),
            results = report.results,
            distinct = report.by_result.len(),
            "Worker pool drained"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }
}

async fn worker_loop<J, R>(
    worker_id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<J>>>,
    sink: ResultSink,
    runner: Arc<R>,
    parent: Span,
) -> WorkerSummary
where
    J: Send + 'static,
    R: CheckRunner<J>,
{
    let mut handled = 0usize;
    loop {
        // the lock is held only while waiting for the next job
        let job = jobs.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };

        let span = spans::worker_job(&parent, worker_id, handled as u64);
        runner.run(job, &sink).instrument(span).await;
        handled += 1;
    }

    debug!(worker_id, jobs = handled, results = sink.pushed(), "Worker exiting");
    WorkerSummary {
        worker_id,
        jobs: handled,
        results: sink.pushed(),
    }
}
