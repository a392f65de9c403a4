// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Storage backends for object probes
//!
//! Each backend fetches one object by key and throws its body away, reporting
//! how many bytes it read. Backends are selected by [`Service`] through a
//! [`BackendRegistry`]:
//!
//! - [`GcsBackend`]: Google Cloud Storage JSON API over `reqwest`
//! - [`S3Backend`]: Amazon S3 via `aws-sdk-s3`, one dual-stack client per region
//! - [`MemoryBackend`]: in-memory objects with a fetch log (tests, dry runs)
//!
//! # Examples
//!
//! ```rust
//! use objcheck::backend::{BackendRegistry, MemoryBackend};
//! use objcheck::Service;
//! use std::sync::Arc;
//!
//! let registry = BackendRegistry::new()
//!     .with_backend(Arc::new(MemoryBackend::new(Service::Gcs)));
//! assert!(registry.get(Service::Gcs).is_some());
//! assert!(registry.get(Service::S3).is_none());
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::config::ObjcheckConfig;
use crate::errors::FetchError;
use crate::types::{Bucket, ObjectKey, Service};

mod gcs;
mod memory;
mod s3;

pub use gcs::GcsBackend;
pub use memory::{FetchRecord, MemoryBackend};
pub use s3::S3Backend;

/// A storage service that can fetch single objects
///
/// # Error Handling
///
/// Implementations classify failures by stage: [`FetchError::Client`] before the
/// request is sent, [`FetchError::NotFound`]/[`FetchError::Object`] when opening
/// the object, [`FetchError::Io`] while draining the body. Callers record the
/// error and keep going; nothing here is retried.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Service this backend serves
    fn service(&self) -> Service;

    /// Read `key` from `bucket` to the end, discard the bytes, return the count
    ///
    /// `region` selects region-scoped clients where the service needs them.
    async fn fetch(&self, region: &str, bucket: &Bucket, key: &ObjectKey)
        -> Result<u64, FetchError>;

    /// Human-readable backend name
    fn name(&self) -> &'static str;
}

/// Backends keyed by the service they serve
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<Service, Arc<dyn ObjectBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the production GCS and S3 backends
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the GCS HTTP client cannot be built.
    pub fn from_config(config: &ObjcheckConfig) -> Result<Self, FetchError> {
        let gcs = GcsBackend::new(&config.gcs, config.http_timeout)?;
        Ok(Self::new()
            .with_backend(Arc::new(gcs))
            .with_backend(Arc::new(S3Backend::new())))
    }

    /// Add a backend, replacing any previous one for the same service
    pub fn with_backend(mut self, backend: Arc<dyn ObjectBackend>) -> Self {
        self.register(backend);
        self
    }

    /// Add a backend, replacing any previous one for the same service
    pub fn register(&mut self, backend: Arc<dyn ObjectBackend>) {
        let service = backend.service();
        info!(service = %service, backend = backend.name(), "Registered object backend");
        self.backends.insert(service, backend);
    }

    /// Backend for a service
    pub fn get(&self, service: Service) -> Option<Arc<dyn ObjectBackend>> {
        self.backends.get(&service).cloned()
    }

    /// Services with a registered backend, sorted
    pub fn services(&self) -> Vec<Service> {
        let mut services: Vec<_> = self.backends.keys().copied().collect();
        services.sort();
        services
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.backends.iter().map(|(service, backend)| (service, backend.name())))
            .finish()
    }
}
