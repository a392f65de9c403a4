// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Check requests and their validation
//!
//! A [`CheckRequest`] is the decoded JSON body of `POST /ObjCheck`. Its fields
//! are loosely typed: an unknown service or a missing field is a validation
//! failure ("Request Error"), not a decode failure ("Data Error"). A `null`
//! field counts as missing, and keys are also accepted capitalized
//! (`"Service"`) or upper case (`"SERVICE"`).
//! [`CheckRequest::validate`] turns it into a [`ValidatedCheck`] with a typed
//! service, or reports the first rule it breaks.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::CheckRules;
use crate::errors::ValidationError;
use crate::types::{Bucket, Service};

/// Wire form of an object check
///
/// Missing and `null` fields decode to empty strings and zeros.
///
/// # Examples
///
/// ```
/// use objcheck::{CheckRequest, CheckRules, Service};
///
/// let request: CheckRequest = serde_json::from_str(
///     r#"{"service":"gcs","region":"us-central1","pool":10,"count":10}"#,
/// ).unwrap();
/// let check = request.validate(&CheckRules::default()).unwrap();
/// assert_eq!(check.service, Service::Gcs);
/// assert_eq!(check.bucket().as_str(), "objcheck-us-central1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckRequest {
    #[serde(alias = "Service", alias = "SERVICE", deserialize_with = "null_as_default")]
    pub service: String,
    #[serde(alias = "Region", alias = "REGION", deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(alias = "Pool", alias = "POOL", deserialize_with = "null_as_default")]
    pub pool: i64,
    #[serde(alias = "Count", alias = "COUNT", deserialize_with = "null_as_default")]
    pub count: i64,
}

/// Decode a JSON `null` as the field's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CheckRequest {
    pub fn new(
        service: impl Into<String>,
        region: impl Into<String>,
        pool: i64,
        count: i64,
    ) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            pool,
            count,
        }
    }

    /// Check the request against `rules`
    ///
    /// Rules are applied in order: service, region, service/region match, pool,
    /// count. The first violation is returned.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first broken rule.
    pub fn validate(&self, rules: &CheckRules) -> Result<ValidatedCheck, ValidationError> {
        let service: Service = self
            .service
            .parse()
            .map_err(|_| ValidationError::InvalidService {
                service: self.service.clone(),
            })?;

        let region_service =
            rules
                .service_for_region(&self.region)
                .ok_or_else(|| ValidationError::InvalidRegion {
                    region: self.region.clone(),
                })?;

        if region_service != service {
            return Err(ValidationError::ServiceRegionMismatch {
                service: self.service.clone(),
                region: self.region.clone(),
                expected: region_service.to_string(),
            });
        }

        if self.pool != rules.accepted_pool {
            return Err(ValidationError::InvalidPool {
                pool: self.pool,
                expected: rules.accepted_pool,
            });
        }

        if self.count < rules.min_count || self.count > rules.max_count {
            return Err(ValidationError::InvalidCount { count: self.count });
        }

        Ok(ValidatedCheck {
            service,
            region: self.region.clone(),
            pool: self.pool,
            // bounded by max_count above
            count: self.count as usize,
        })
    }
}

/// A check request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheck {
    pub service: Service,
    pub region: String,
    pub pool: i64,
    pub count: usize,
}

impl ValidatedCheck {
    /// Bucket probed by this check
    pub fn bucket(&self) -> Bucket {
        Bucket::for_region(&self.region)
    }
}
