// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Backend dispatch
//!
//! [`Dispatcher::fetch`] routes one object fetch to the backend registered for
//! its service and times it under a `request_object` span. Failures never
//! propagate: they are recorded on the span and returned inside the
//! [`FetchOutcome`], so a batch can move on to its next object.

use std::time::{Duration, Instant};
use tracing::{debug, warn, Instrument, Span};

use crate::backend::BackendRegistry;
use crate::errors::FetchError;
use crate::spans;
use crate::types::{Bucket, ObjectKey, Service};

/// Result of a single fetch
#[derive(Debug)]
pub struct FetchOutcome {
    /// Bytes read and discarded, including any read before an I/O failure
    pub bytes: u64,
    pub elapsed: Duration,
    pub error: Option<FetchError>,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Routes fetches to backends by service
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: BackendRegistry,
}

impl Dispatcher {
    pub fn new(registry: BackendRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Fetch `key` from `bucket` on `service`, discarding the body
    ///
    /// `seq` is the position of the object in its batch and only labels the span.
    pub async fn fetch(
        &self,
        parent: &Span,
        service: Service,
        region: &str,
        bucket: &Bucket,
        key: &ObjectKey,
        seq: usize,
    ) -> FetchOutcome {
        let span = spans::request_object(parent, service, bucket, key, seq);
        let started = Instant::now();

        let result = match self.registry.get(service) {
            Some(backend) => {
                backend
                    .fetch(region, bucket, key)
                    .instrument(span.clone())
                    .await
            }
            None => Err(FetchError::client(service, "no backend registered")),
        };

        let elapsed = started.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        span.record("elapsed_ms", elapsed_ms);

        match result {
            Ok(bytes) => {
                span.record("bytes", bytes);
                debug!(parent: &span, bytes, elapsed_ms, "Fetched object");
                FetchOutcome {
                    bytes,
                    elapsed,
                    error: None,
                }
            }
            Err(err) => {
                let bytes = match &err {
                    FetchError::Io { bytes_read, .. } => *bytes_read,
                    _ => 0,
                };
                span.record("bytes", bytes);
                spans::record_error(&span, err.event(), &err);
                warn!(
                    parent: &span,
                    event = err.event(),
                    error = %err,
                    elapsed_ms,
                    "Object fetch failed"
                );
                FetchOutcome {
                    bytes,
                    elapsed,
                    error: Some(err),
                }
            }
        }
    }
}
