// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

/// Errors from running a worker pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// A worker task panicked or was cancelled before it finished.
    #[error("Worker task failed: {details}")]
    WorkerFailed { details: String },

    /// The pool was asked to start with no workers.
    #[error("Worker pool needs at least one worker")]
    NoWorkers,
}
