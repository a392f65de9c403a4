// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Amazon S3 backend
//!
//! S3 clients are region-scoped. One dual-stack client is built per region on
//! first use and reused for the life of the backend.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use super::ObjectBackend;
use crate::errors::FetchError;
use crate::types::{Bucket, ObjectKey, Service};

/// Fetches objects from Amazon S3
#[derive(Debug, Default)]
pub struct S3Backend {
    clients: RwLock<HashMap<String, Client>>,
}

impl S3Backend {
    /// Backend that loads credentials from the default AWS chain on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client for `region` instead of building one
    pub async fn insert_client(&self, region: impl Into<String>, client: Client) {
        self.clients.write().await.insert(region.into(), client);
    }

    /// Number of regions with a cached client
    pub async fn cached_regions(&self) -> usize {
        self.clients.read().await.len()
    }

    async fn client_for(&self, region: &str) -> Result<Client, FetchError> {
        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(region) {
                trace!(region, "Reusing cached S3 client");
                return Ok(client.clone());
            }
        }

        if region.is_empty() {
            return Err(FetchError::client(Service::S3, "no region given"));
        }

        debug!(region, "Building S3 client");
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .use_dual_stack(true)
            .build();
        let client = Client::from_conf(config);

        // Another task may have raced us here; keep whichever landed first.
        let mut clients = self.clients.write().await;
        let client = clients
            .entry(region.to_owned())
            .or_insert_with(|| {
                info!(region, "Cached new S3 client");
                client
            })
            .clone();
        Ok(client)
    }
}

#[async_trait]
impl ObjectBackend for S3Backend {
    fn service(&self) -> Service {
        Service::S3
    }

    async fn fetch(
        &self,
        region: &str,
        bucket: &Bucket,
        key: &ObjectKey,
    ) -> Result<u64, FetchError> {
        let client = self.client_for(region).await?;

        let output = client
            .get_object()
            .bucket(bucket.as_str())
            .key(key.as_str())
            .send()
            .await
            .map_err(|err| {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    FetchError::NotFound {
                        bucket: bucket.to_string(),
                        object: key.to_string(),
                    }
                } else {
                    FetchError::object(key.as_str(), DisplayErrorContext(&err))
                }
            })?;

        let mut body = output.body;
        let mut bytes_read = 0u64;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| FetchError::io(key.as_str(), bytes_read, e))?
        {
            bytes_read += chunk.len() as u64;
        }

        trace!(bucket = %bucket, object = %key, bytes_read, "Drained S3 object");
        Ok(bytes_read)
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
