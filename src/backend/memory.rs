// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory backend
//!
//! Serves objects from a map and logs every fetch it sees. Used by tests and
//! by `--dry-run` probes, where it stands in for a real service without
//! touching the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::ObjectBackend;
use crate::errors::FetchError;
use crate::types::{Bucket, ObjectKey, Service};

/// One fetch seen by a [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRecord {
    pub region: String,
    pub bucket: Bucket,
    pub key: ObjectKey,
}

/// Backend serving objects from memory
///
/// # Examples
///
/// ```rust
/// use objcheck::backend::MemoryBackend;
/// use objcheck::{Bucket, ObjectKey, Service};
///
/// let backend = MemoryBackend::new(Service::Gcs)
///     .with_object(Bucket::named("b"), ObjectKey::new("k"), vec![0; 1024]);
/// assert_eq!(backend.object_count(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryBackend {
    service: Service,
    objects: HashMap<(Bucket, ObjectKey), Vec<u8>>,
    fallback_len: Option<usize>,
    client_failure: Option<String>,
    calls: Mutex<Vec<FetchRecord>>,
}

impl MemoryBackend {
    /// Empty backend: every fetch is [`FetchError::NotFound`]
    pub fn new(service: Service) -> Self {
        Self {
            service,
            objects: HashMap::new(),
            fallback_len: None,
            client_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Backend that serves `len` zero bytes for any key
    pub fn permissive(service: Service, len: usize) -> Self {
        Self {
            fallback_len: Some(len),
            ..Self::new(service)
        }
    }

    /// Add an object
    pub fn with_object(mut self, bucket: Bucket, key: ObjectKey, body: Vec<u8>) -> Self {
        self.objects.insert((bucket, key), body);
        self
    }

    /// Fail every fetch before it reaches an object, as a missing client would
    pub fn with_client_failure(mut self, details: impl Into<String>) -> Self {
        self.client_failure = Some(details.into());
        self
    }

    /// Number of stored objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Every fetch seen so far, in order
    pub fn calls(&self) -> Vec<FetchRecord> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    fn service(&self) -> Service {
        self.service
    }

    async fn fetch(
        &self,
        region: &str,
        bucket: &Bucket,
        key: &ObjectKey,
    ) -> Result<u64, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(FetchRecord {
                region: region.to_string(),
                bucket: bucket.clone(),
                key: key.clone(),
            });
        }

        if let Some(details) = &self.client_failure {
            return Err(FetchError::client(self.service, details));
        }

        match self.objects.get(&(bucket.clone(), key.clone())) {
            Some(body) => Ok(body.len() as u64),
            None => match self.fallback_len {
                Some(len) => Ok(len as u64),
                None => Err(FetchError::NotFound {
                    bucket: bucket.to_string(),
                    object: key.to_string(),
                }),
            },
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
