// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Check pipelines
//!
//! Two checks are served:
//!
//! - [`ObjectChecker`]: decode a [`CheckRequest`], validate it, generate `count`
//!   random keys from the pool, and fetch each one in order from the region's
//!   bucket. Decode, validation and list failures end the check early with their
//!   status. Fetch failures are recorded and the batch continues; any failure
//!   turns the final status into "Check Error".
//! - [`EndpointChecker`]: fetch a single named target from the endpoint-check
//!   bucket on the requested storage type.
//!
//! # Examples
//!
//! ```rust
//! use objcheck::backend::{BackendRegistry, MemoryBackend};
//! use objcheck::check::ObjectChecker;
//! use objcheck::dispatch::Dispatcher;
//! use objcheck::{CheckRequest, CheckRules, CheckStatus, Service};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = BackendRegistry::new()
//!     .with_backend(Arc::new(MemoryBackend::permissive(Service::Gcs, 1024)));
//! let checker = ObjectChecker::new(CheckRules::default(), Dispatcher::new(registry));
//!
//! let report = checker.check(&CheckRequest::new("gcs", "us-east1", 10, 5)).await;
//! assert_eq!(report.status, CheckStatus::CheckSuccess);
//! assert_eq!(report.bytes, 5 * 1024);
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn, Instrument, Span};

use crate::config::{constants::ENDPOINT_CHECK_BUCKET, CheckRules};
use crate::dispatch::Dispatcher;
use crate::errors::CheckError;
use crate::keys::traced_object_list;
use crate::pool::{CheckRunner, ResultSink};
use crate::spans;
use crate::types::{Bucket, CheckStatus, ObjectKey, Service};
use crate::validate::{null_as_default, CheckRequest};

/// Summary of one object check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub status: CheckStatus,
    /// Bucket probed, once the request has validated
    pub bucket: Option<Bucket>,
    pub attempted: usize,
    pub failed: usize,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl CheckReport {
    fn rejected(status: CheckStatus, elapsed: Duration) -> Self {
        Self {
            status,
            bucket: None,
            attempted: 0,
            failed: 0,
            bytes: 0,
            elapsed,
        }
    }
}

/// Runs object checks against registered backends
#[derive(Debug, Clone)]
pub struct ObjectChecker {
    rules: CheckRules,
    dispatcher: Dispatcher,
}

impl ObjectChecker {
    pub fn new(rules: CheckRules, dispatcher: Dispatcher) -> Self {
        Self { rules, dispatcher }
    }

    pub fn rules(&self) -> &CheckRules {
        &self.rules
    }

    /// Check a raw JSON request body
    pub async fn check_body(&self, body: &[u8]) -> CheckReport {
        let span = spans::obj_check();
        let started = Instant::now();
        match serde_json::from_slice::<CheckRequest>(body) {
            Ok(request) => self.run(span, &request).await,
            Err(err) => {
                let err = CheckError::from(err);
                reject(&span, &err);
                CheckReport::rejected(err.status(), started.elapsed())
            }
        }
    }

    /// Check a decoded request
    pub async fn check(&self, request: &CheckRequest) -> CheckReport {
        self.run(spans::obj_check(), request).await
    }

    async fn run(&self, span: Span, request: &CheckRequest) -> CheckReport {
        let started = Instant::now();
        span.record("service", request.service.as_str());
        span.record("region", request.region.as_str());
        span.record("pool", request.pool);
        span.record("count", request.count);

        let report = match self.probe(&span, request).instrument(span.clone()).await {
            Ok(mut report) => {
                report.elapsed = started.elapsed();
                report
            }
            Err(err) => {
                reject(&span, &err);
                CheckReport::rejected(err.status(), started.elapsed())
            }
        };

        span.record("status", report.status.as_str());
        report
    }

    async fn probe(&self, span: &Span, request: &CheckRequest) -> Result<CheckReport, CheckError> {
        let check = request.validate(&self.rules)?;
        let keys = traced_object_list(span, check.pool, check.count, &self.rules.size_tag)?;
        let bucket = check.bucket();

        let mut failed = 0;
        let mut bytes = 0;
        for (seq, key) in keys.iter().enumerate() {
            let outcome = self
                .dispatcher
                .fetch(span, check.service, &check.region, &bucket, key, seq)
                .await;
            bytes += outcome.bytes;
            if !outcome.is_success() {
                failed += 1;
            }
        }

        let status = if failed == 0 {
            CheckStatus::CheckSuccess
        } else {
            span.record("error", true);
            span.record("failed_objects", failed);
            CheckStatus::CheckError
        };

        info!(
            bucket = %bucket,
            attempted = keys.len(),
            failed,
            bytes,
            status = %status,
            "Object check finished"
        );

        Ok(CheckReport {
            status,
            bucket: Some(bucket),
            attempted: keys.len(),
            failed,
            bytes,
            elapsed: Duration::ZERO,
        })
    }
}

/// Pool jobs for `probe`: one status per check
#[async_trait]
impl CheckRunner<CheckRequest> for ObjectChecker {
    async fn run(&self, job: CheckRequest, sink: &ResultSink) {
        let report = self.check(&job).await;
        sink.push(report.status.as_str()).await;
    }
}

fn reject(span: &Span, err: &CheckError) {
    let event = match err {
        CheckError::Decode(_) => "data error",
        CheckError::Validation(_) => "request error",
        CheckError::ListGeneration(_) => "list error",
    };
    span.record("error", true);
    span.record("event", event);
    warn!(parent: span, status = %err.status(), error = %err, "Check rejected");
}

/// Wire form of an endpoint check: `{"endpoint": "GCS", "target": "source/1_1k.obj"}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointCheck {
    #[serde(alias = "Endpoint", alias = "ENDPOINT", deserialize_with = "null_as_default")]
    pub endpoint: String,
    #[serde(alias = "Target", alias = "TARGET", deserialize_with = "null_as_default")]
    pub target: String,
}

impl EndpointCheck {
    pub fn new(endpoint: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            target: target.into(),
        }
    }

    /// Storage service named by `endpoint`, compared case-insensitively
    ///
    /// Only GCS is served by endpoint checks.
    pub fn service(&self) -> Option<Service> {
        match self.endpoint.to_lowercase().as_str() {
            "gcs" => Some(Service::Gcs),
            _ => None,
        }
    }
}

/// Fetches single named targets from the endpoint-check bucket
#[derive(Debug, Clone)]
pub struct EndpointChecker {
    dispatcher: Dispatcher,
    bucket: Bucket,
}

impl EndpointChecker {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_bucket(dispatcher, Bucket::named(ENDPOINT_CHECK_BUCKET))
    }

    pub fn with_bucket(dispatcher: Dispatcher, bucket: Bucket) -> Self {
        Self { dispatcher, bucket }
    }

    /// Check a raw JSON request body
    pub async fn check_body(&self, body: &[u8]) -> CheckStatus {
        match serde_json::from_slice::<EndpointCheck>(body) {
            Ok(check) => self.check(&check).await,
            Err(err) => {
                warn!(error = %err, "Malformed endpoint check");
                CheckStatus::DataError
            }
        }
    }

    pub async fn check(&self, check: &EndpointCheck) -> CheckStatus {
        let span = spans::endpoint_check(&check.endpoint, &check.target);

        let status = match check.service() {
            Some(service) => {
                span.record("normalized", service.as_str());
                let key = ObjectKey::new(check.target.as_str());
                let outcome = self
                    .dispatcher
                    .fetch(&span, service, "", &self.bucket, &key, 0)
                    .await;
                if outcome.is_success() {
                    CheckStatus::CheckSuccess
                } else {
                    CheckStatus::CheckError
                }
            }
            None => {
                warn!(parent: &span, endpoint = %check.endpoint, "Unsupported endpoint type");
                CheckStatus::UnsupportedType
            }
        };

        span.record("status", status.as_str());
        status
    }
}
