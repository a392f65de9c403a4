// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for objcheck operations.
//!
//! Telemetry concerns stay out of the business logic: every traced operation has
//! a span helper here, and the operation receives its parent span explicitly
//! instead of relying on the ambient current span.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, parent: &Span, param: Type) -> Result<T> {
//!     let span = spans::my_operation(parent, param);
//!     async { /* business logic */ }.instrument(span.clone()).await
//! }
//! ```
//!
//! Fields declared as `Empty` are filled in when the operation finishes; failures
//! always set `error = true` plus an `event` label and the error text.

use std::fmt::Display;

use tracing::{field::Empty, Span};

use crate::types::{Bucket, ObjectKey, Service};

/// Create span for one object check (`POST /ObjCheck` or a pooled probe job).
///
/// Parent: None (root span for this operation)
/// Children: create_obj_list, request_object spans (one per object)
#[inline]
pub(crate) fn obj_check() -> Span {
    tracing::info_span!(
        "objcheck.obj_check",
        service = Empty,
        region = Empty,
        pool = Empty,
        count = Empty,
        status = Empty,
        failed_objects = Empty,
        error = Empty,
        event = Empty,
    )
}

/// Create span for generating the object list of a check.
///
/// Parent: obj_check span
#[inline]
pub(crate) fn create_obj_list(
    parent: &Span,
    pool_size: i64,
    count: usize,
    size_tag: &str,
) -> Span {
    tracing::info_span!(
        parent: parent,
        "objcheck.create_obj_list",
        pool_size = pool_size,
        count = count,
        size_tag = size_tag,
        error = Empty,
        event = Empty,
        error.message = Empty,
    )
}

/// Create span for fetching and discarding a single object.
///
/// Parent: obj_check or endpoint_check span
/// Children: backend HTTP/SDK spans
#[inline]
pub(crate) fn request_object(
    parent: &Span,
    service: Service,
    bucket: &Bucket,
    object: &ObjectKey,
    seq: usize,
) -> Span {
    tracing::info_span!(
        parent: parent,
        "objcheck.request_object",
        service = %service,
        bucket = %bucket,
        object = %object,
        seq = seq,
        bytes = Empty,
        elapsed_ms = Empty,
        error = Empty,
        event = Empty,
        error.message = Empty,
    )
}

/// Create span for an endpoint check (`POST /HTTPCheck`).
///
/// Parent: None (root span for this operation)
/// Children: request_object span for the target
#[inline]
pub(crate) fn endpoint_check(endpoint: &str, target: &str) -> Span {
    tracing::info_span!(
        "objcheck.endpoint_check",
        endpoint = endpoint,
        normalized = Empty,
        target = target,
        status = Empty,
    )
}

/// Create span for one job handled by a pool worker.
///
/// Parent: pool_run span
#[inline]
pub(crate) fn worker_job(parent: &Span, worker_id: usize, seq: u64) -> Span {
    tracing::debug_span!(parent: parent, "objcheck.worker_job", worker_id = worker_id, seq = seq)
}

/// Create span covering a whole worker pool run.
///
/// Parent: None (root span for this operation)
/// Children: worker_job spans
#[inline]
pub(crate) fn pool_run(workers: usize) -> Span {
    tracing::info_span!("objcheck.pool_run", workers = workers, results = Empty)
}

/// Create span for one CLI-driver call to a remote check function.
///
/// Parent: worker_job span
#[inline]
pub(crate) fn remote_check(parent: &Span, url: &str, target: &str) -> Span {
    tracing::debug_span!(
        parent: parent,
        "objcheck.remote_check",
        url = url,
        target = target,
        elapsed_ms = Empty,
    )
}

/// Tag `span` as failed with an event label and the error text.
pub(crate) fn record_error(span: &Span, event: &str, error: &dyn Display) {
    span.record("error", true);
    span.record("event", event);
    span.record("error.message", tracing::field::display(error));
}
