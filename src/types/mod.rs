// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types shared across the probe engine
//!
//! These keep service tags, bucket names, object keys and status strings from
//! being confused with each other as they move between the validator, the key
//! generator, the dispatcher and the worker pool.

mod status;

pub use status::CheckStatus;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::constants::BUCKET_PREFIX;

/// Object-storage service a check targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// Google Cloud Storage
    Gcs,
    /// Amazon S3
    S3,
}

impl Service {
    /// All supported services, in registry order
    pub const ALL: [Service; 2] = [Service::Gcs, Service::S3];

    /// Wire name of the service (`"gcs"` or `"s3"`)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Service::Gcs => "gcs",
            Service::S3 => "s3",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a supported service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported service: {0}")]
pub struct UnknownService(pub String);

impl FromStr for Service {
    type Err = UnknownService;

    /// Service names are matched exactly; `"GCS"` is not `"gcs"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcs" => Ok(Service::Gcs),
            "s3" => Ok(Service::S3),
            other => Err(UnknownService(other.to_string())),
        }
    }
}

/// Bucket name, derived from a region as `objcheck-<region>`
///
/// # Examples
///
/// ```
/// use objcheck::Bucket;
///
/// let bucket = Bucket::for_region("us-central1");
/// assert_eq!(bucket.as_str(), "objcheck-us-central1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bucket(String);

impl Bucket {
    /// Bucket probed for a region
    pub fn for_region(region: &str) -> Self {
        Self(format!("{BUCKET_PREFIX}{region}"))
    }

    /// Bucket with an explicit name
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a single object inside a bucket
///
/// Generated keys have the form `<pool>_<id>_<size>.obj`; endpoint checks carry
/// arbitrary keys such as `source/3_1k.obj`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for object `id` of a pool with the given size tag
    pub fn pooled(pool_size: i64, id: i64, size_tag: &str) -> Self {
        Self(format!("{pool_size}_{id}_{size_tag}.obj"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
