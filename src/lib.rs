// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # objcheck
//!
//! Latency probes for object storage. A check picks random objects from a
//! fixed-size pool in a regional bucket and times reading each one end to end,
//! on Google Cloud Storage or Amazon S3. Results are reported as fixed status
//! strings and as `tracing` spans, optionally exported over OTLP.
//!
//! ## Parts
//!
//! - [`validate`]: decode and validate check requests
//! - [`keys`]: generate the random object list
//! - [`backend`] and [`dispatch`]: fetch and discard objects per service
//! - [`check`]: the object check and the endpoint check
//! - [`pool`] and [`schedule`]: bounded worker pool and burst schedule for the driver
//! - [`server`]: the HTTP surface (`POST /ObjCheck`, `POST /HTTPCheck`)
//! - [`telemetry`]: log and span export setup
//!
//! ## Quick start
//!
//! ```rust
//! use objcheck::{generate_object_keys, CheckRequest, CheckRules};
//!
//! let check = CheckRequest::new("gcs", "us-central1", 10, 10)
//!     .validate(&CheckRules::default())
//!     .unwrap();
//! let keys = generate_object_keys(check.pool, check.count, "1k").unwrap();
//! assert_eq!(keys.len(), 10);
//! assert_eq!(check.bucket().as_str(), "objcheck-us-central1");
//! ```

pub mod backend;
pub mod bootstrap;
pub mod check;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod keys;
pub mod pool;
pub mod schedule;
pub mod server;
mod spans;
pub mod telemetry;
pub mod types;
pub mod validate;

pub use check::{CheckReport, EndpointCheck, EndpointChecker, ObjectChecker};
pub use config::{CheckRules, ObjcheckConfig, ObjcheckConfigBuilder};
pub use dispatch::{Dispatcher, FetchOutcome};
pub use errors::{
    CheckError, ConfigError, FetchError, KeyGenerationError, ObjcheckError, PoolError,
    TelemetryError, ValidationError,
};
pub use keys::{generate_object_keys, generate_object_keys_with_rng};
pub use pool::{RunReport, WorkerPool};
pub use telemetry::Telemetry;
pub use types::{Bucket, CheckStatus, ObjectKey, Service};
pub use validate::{CheckRequest, ValidatedCheck};
