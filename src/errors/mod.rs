// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for objcheck.
//!
//! Each stage of a check has its own error type, and [`ObjcheckError`] wraps them
//! all for callers that do not need to tell them apart.
//!
//! # Architecture
//!
//! - [`ValidationError`] - A decoded request broke one of the check rules
//! - [`KeyGenerationError`] - The object list could not be generated
//! - [`FetchError`] - A single object fetch failed (client, object, or I/O)
//! - [`CheckError`] - A check was aborted before probing (decode, validation, list)
//! - [`PoolError`] - A pool worker failed
//! - [`ConfigError`] - Malformed configuration
//! - [`TelemetryError`] - Span export could not be set up
//!
//! Only [`CheckError`] aborts a request. [`FetchError`]s are recorded on the fetch
//! span and the batch moves on to the next object.
//!
//! # Examples
//!
//! ```rust
//! use objcheck::{CheckError, CheckStatus, ValidationError};
//!
//! let err = CheckError::from(ValidationError::InvalidCount { count: 0 });
//! assert_eq!(err.status(), CheckStatus::RequestError);
//! ```

mod check;
mod config;
mod fetch;
mod keys;
mod pool;
mod telemetry;
mod validation;

pub use check::CheckError;
pub use config::ConfigError;
pub use fetch::FetchError;
pub use keys::KeyGenerationError;
pub use pool::PoolError;
pub use telemetry::TelemetryError;
pub use validation::ValidationError;

/// Unified error type for all objcheck operations.
///
/// All module-specific error types convert into `ObjcheckError` via `From`, so
/// `?` works across module boundaries.
#[derive(Debug, thiserror::Error)]
pub enum ObjcheckError {
    #[error("Check error: {0}")]
    Check(#[from] CheckError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl From<ValidationError> for ObjcheckError {
    fn from(err: ValidationError) -> Self {
        ObjcheckError::Check(err.into())
    }
}

impl From<KeyGenerationError> for ObjcheckError {
    fn from(err: KeyGenerationError) -> Self {
        ObjcheckError::Check(err.into())
    }
}
