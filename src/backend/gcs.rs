// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Google Cloud Storage backend
//!
//! Objects are read through the JSON API media endpoint
//! (`{base}/storage/v1/b/{bucket}/o/{object}?alt=media`) and drained chunk by chunk.
//! Credentials come from [`GcsAuth`]: none, a fixed bearer token, or the compute
//! metadata server, whose token is cached until shortly before it expires.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

use super::ObjectBackend;
use crate::config::{GcsAuth, GcsConfig};
use crate::errors::FetchError;
use crate::types::{Bucket, ObjectKey, Service};

/// Tokens are refreshed this long before the metadata server says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Fetches objects from Google Cloud Storage
#[derive(Debug)]
pub struct GcsBackend {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

#[derive(Debug)]
enum Credentials {
    Anonymous,
    Static(String),
    Metadata {
        url: Url,
        cached: Mutex<Option<CachedToken>>,
    },
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

impl GcsBackend {
    /// Build a backend with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &GcsConfig, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::client(Service::Gcs, e))?;
        Ok(Self::with_client(http, config))
    }

    /// Build a backend around an existing HTTP client
    pub fn with_client(http: reqwest::Client, config: &GcsConfig) -> Self {
        let credentials = match &config.auth {
            GcsAuth::Anonymous => Credentials::Anonymous,
            GcsAuth::Token(token) => Credentials::Static(token.clone()),
            GcsAuth::Metadata => Credentials::Metadata {
                url: config.metadata_token_url.clone(),
                cached: Mutex::new(None),
            },
        };
        Self {
            http,
            base_url: config.base_url.clone(),
            credentials,
        }
    }

    /// Media download URL for an object
    fn object_url(&self, bucket: &Bucket, key: &ObjectKey) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::client(Service::Gcs, "base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["storage", "v1", "b", bucket.as_str(), "o", key.as_str()]);
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }

    /// Bearer token for the next request, if any
    async fn access_token(&self) -> Result<Option<String>, FetchError> {
        match &self.credentials {
            Credentials::Anonymous => Ok(None),
            Credentials::Static(token) => Ok(Some(token.clone())),
            Credentials::Metadata { url, cached } => {
                let mut cached = cached.lock().await;
                if let Some(token) = cached.as_ref().filter(|t| Instant::now() < t.refresh_at) {
                    return Ok(Some(token.value.clone()));
                }

                let token = self.fetch_metadata_token(url).await?;
                let value = token.value.clone();
                *cached = Some(token);
                Ok(Some(value))
            }
        }
    }

    async fn fetch_metadata_token(&self, url: &Url) -> Result<CachedToken, FetchError> {
        debug!(url = %url, "Fetching access token from metadata server");
        let response = self
            .http
            .get(url.clone())
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::client(Service::Gcs, e))?;
        let token: MetadataToken = response
            .json()
            .await
            .map_err(|e| FetchError::client(Service::Gcs, e))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        Ok(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl ObjectBackend for GcsBackend {
    fn service(&self) -> Service {
        Service::Gcs
    }

    async fn fetch(
        &self,
        _region: &str,
        bucket: &Bucket,
        key: &ObjectKey,
    ) -> Result<u64, FetchError> {
        let url = self.object_url(bucket, key)?;
        let token = self.access_token().await?;

        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| FetchError::object(key.as_str(), e))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(FetchError::NotFound {
                    bucket: bucket.to_string(),
                    object: key.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(FetchError::object(key.as_str(), format!("HTTP {status}")))
            }
            _ => {}
        }

        let mut bytes_read = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::io(key.as_str(), bytes_read, e))?
        {
            bytes_read += chunk.len() as u64;
        }

        trace!(bucket = %bucket, object = %key, bytes_read, "Drained GCS object");
        Ok(bytes_read)
    }

    fn name(&self) -> &'static str {
        "gcs"
    }
}
