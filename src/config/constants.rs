// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known names and default limits
//!
//! This module centralizes the constants the probe engine was deployed with, so
//! the validator, the key generator and the CLI driver agree on them.

use crate::types::Service;

/// Prefix of every probed bucket; the region name follows it
pub const BUCKET_PREFIX: &str = "objcheck-";

/// Bucket read by endpoint checks (`POST /HTTPCheck`)
pub const ENDPOINT_CHECK_BUCKET: &str = "ls-saastrace-mr";

/// The only pool size a check request may name
pub const ACCEPTED_POOL_SIZE: i64 = 10;

/// Smallest number of objects a single check may fetch
pub const MIN_OBJECT_COUNT: i64 = 1;

/// Largest number of objects a single check may fetch
pub const MAX_OBJECT_COUNT: i64 = 1000;

/// Size tag embedded in generated object keys
pub const DEFAULT_SIZE_TAG: &str = "1k";

/// Region allow-list and the service that hosts each region's bucket
pub const BUCKET_REGIONS: [(&str, Service); 4] = [
    ("us-central1", Service::Gcs),
    ("us-east1", Service::Gcs),
    ("europe-west2", Service::Gcs),
    ("us-east-2", Service::S3),
];

/// Deployed `HTTPCheck` functions the CLI driver fans out to
pub const FUNCTION_URLS: [&str; 4] = [
    "https://us-east1-ls-poc-land.cloudfunctions.net/HTTPCheck",
    "https://us-central1-ls-poc-land.cloudfunctions.net/HTTPCheck",
    "https://europe-west1-ls-poc-land.cloudfunctions.net/HTTPCheck",
    "https://asia-northeast1-ls-poc-land.cloudfunctions.net/HTTPCheck",
];

/// Worker pool defaults
pub mod pool {
    /// Number of concurrent workers
    pub const WORKERS: usize = 10;
    /// Capacity of the job queue
    pub const JOB_QUEUE_CAPACITY: usize = 100;
    /// Capacity of the result queue
    pub const RESULT_QUEUE_CAPACITY: usize = 10_000;
}

/// Burst schedule defaults for the CLI driver
pub mod schedule {
    /// Jobs enqueued per burst
    pub const BURST_SIZE: usize = 10;
    /// Pause after the first burst, in seconds
    pub const INITIAL_PAUSE_SECS: u64 = 1;
    /// Longest pause; the schedule ends after the burst that precedes it
    pub const MAX_PAUSE_SECS: u64 = 1024;
}

/// Tracing export defaults
pub mod telemetry {
    /// OTLP/HTTP trace ingest used when a token is configured
    pub const DEFAULT_OTLP_ENDPOINT: &str = "https://ingest.lightstep.com/traces/otlp/v0.9";
    /// Header carrying the access token
    pub const ACCESS_TOKEN_HEADER: &str = "lightstep-access-token";
    /// Service name reported on exported spans
    pub const SERVICE_NAME: &str = "objcheck";
}

/// GCS defaults
pub mod gcs {
    /// Public JSON API root
    pub const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";
    /// Token endpoint of the GCE metadata server
    pub const METADATA_TOKEN_URL: &str =
        "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
}
