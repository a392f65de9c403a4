// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for check request validation.

/// A rule a check request violated.
///
/// Rules are checked in a fixed order (service, region, service/region match,
/// pool, count) and only the first violation is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The service is not one we probe.
    #[error("Bad service {service}")]
    InvalidService {
        /// The service as sent
        service: String,
    },

    /// The region is not in the allow-list.
    #[error("Bad region {region}")]
    InvalidRegion {
        /// The region as sent
        region: String,
    },

    /// The region exists but its bucket lives on another service.
    #[error("Bad service / region combination: {service} and {region}")]
    ServiceRegionMismatch {
        service: String,
        region: String,
        /// Service that actually hosts the region's bucket
        expected: String,
    },

    /// The pool differs from the single accepted pool size.
    #[error("Bad pool {pool}")]
    InvalidPool { pool: i64, expected: i64 },

    /// The object count is out of bounds.
    #[error("Bad count {count}")]
    InvalidCount { count: i64 },
}

impl ValidationError {
    /// Short machine-friendly name of the violated rule
    pub const fn rule(&self) -> &'static str {
        match self {
            ValidationError::InvalidService { .. } => "service",
            ValidationError::InvalidRegion { .. } => "region",
            ValidationError::ServiceRegionMismatch { .. } => "service_region",
            ValidationError::InvalidPool { .. } => "pool",
            ValidationError::InvalidCount { .. } => "count",
        }
    }
}
