// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Geometric burst schedule for the driver
//!
//! The driver enqueues a burst of jobs, sleeps, and repeats with the sleep
//! doubling each time until it would pass the ceiling. With the defaults that is
//! 11 bursts of 10 jobs with pauses of 1, 2, 4, ... 1024 seconds. The queue is
//! closed after the last pause.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ScheduleConfig;
use crate::pool::JobQueue;

/// Burst sizes and the pause after each burst
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurstSchedule {
    burst_size: usize,
    pauses: Vec<Duration>,
}

impl BurstSchedule {
    /// Expand a schedule configuration into its pauses
    ///
    /// A zero initial pause cannot grow, so it yields a single burst.
    pub fn new(config: &ScheduleConfig) -> Self {
        let mut pauses = Vec::new();
        let mut pause = config.initial_pause;
        while pause <= config.max_pause {
            pauses.push(pause);
            if pause.is_zero() {
                break;
            }
            pause = match pause.checked_mul(2) {
                Some(next) => next,
                None => break,
            };
        }
        Self {
            burst_size: config.burst_size,
            pauses,
        }
    }

    pub fn burst_size(&self) -> usize {
        self.burst_size
    }

    /// Number of bursts
    pub fn bursts(&self) -> usize {
        self.pauses.len()
    }

    /// Jobs enqueued over the whole schedule
    pub fn total_jobs(&self) -> usize {
        self.burst_size * self.bursts()
    }

    /// Pause after each burst, in order
    pub fn pauses(&self) -> impl Iterator<Item = Duration> + '_ {
        self.pauses.iter().copied()
    }

    /// Sum of all pauses
    pub fn total_duration(&self) -> Duration {
        self.pauses.iter().sum()
    }

    /// Enqueue every burst, sleeping between them, then drop the queue handle
    ///
    /// `make_job` receives the index of the job within its burst. Returns the
    /// number of jobs enqueued, which is less than [`total_jobs`] only if the
    /// workers went away early.
    ///
    /// [`total_jobs`]: BurstSchedule::total_jobs
    pub async fn enqueue<J, F>(&self, queue: JobQueue<J>, mut make_job: F) -> usize
    where
        J: Send,
        F: FnMut(usize) -> J,
    {
        let mut enqueued = 0;
        for (burst, pause) in self.pauses().enumerate() {
            for index in 0..self.burst_size {
                if queue.push(make_job(index)).await.is_err() {
                    warn!(burst, enqueued, "Job queue closed; stopping schedule");
                    return enqueued;
                }
                enqueued += 1;
            }
            debug!(burst, pause_secs = pause.as_secs_f64(), "Burst enqueued");
            tokio::time::sleep(pause).await;
        }

        info!(enqueued, bursts = self.bursts(), "Schedule complete; closing job queue");
        enqueued
    }
}
