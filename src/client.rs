// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Remote check client used by the driver
//!
//! Each job is an [`EndpointCheck`] posted as JSON to every configured function
//! URL. The raw response text becomes the result. Transport failures are turned
//! into fixed strings instead of errors, so the driver always gets exactly one
//! result per URL per job.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};
use tracing::{debug, warn, Instrument, Span};
use url::Url;

use crate::check::EndpointCheck;
use crate::pool::{CheckRunner, ResultSink};
use crate::spans;

/// Result when the job cannot be encoded
pub const BAD_STRUCTURE: &str = "bad structure";
/// Result when the request cannot be sent
pub const BAD_POST: &str = "bad post";
/// Result when the response body cannot be read
pub const BAD_READ: &str = "bad read";

/// Posts endpoint checks to remote check functions
#[derive(Debug, Clone)]
pub struct RemoteCheckClient {
    http: reqwest::Client,
    urls: Vec<Url>,
}

impl RemoteCheckClient {
    /// Client with its own HTTP connection pool
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(urls: Vec<Url>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, urls))
    }

    pub fn with_client(http: reqwest::Client, urls: Vec<Url>) -> Self {
        Self { http, urls }
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// Post one check to one URL and return the response text
    pub async fn post(&self, parent: &Span, url: &Url, check: &EndpointCheck) -> String {
        let span = spans::remote_check(parent, url.as_str(), &check.target);
        let started = Instant::now();
        let result = self.round_trip(url, check).instrument(span.clone()).await;
        span.record("elapsed_ms", started.elapsed().as_millis() as u64);
        result
    }

    async fn round_trip(&self, url: &Url, check: &EndpointCheck) -> String {
        let body = match serde_json::to_vec(check) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "Failed to encode endpoint check");
                return BAD_STRUCTURE.to_string();
            }
        };

        let response = match self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %url, error = %err, "Failed to post endpoint check");
                return BAD_POST.to_string();
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(text) => {
                debug!(url = %url, %status, result = %text, "Remote check answered");
                text
            }
            Err(err) => {
                warn!(url = %url, error = %err, "Failed to read remote check response");
                BAD_READ.to_string()
            }
        }
    }
}

#[async_trait]
impl CheckRunner<EndpointCheck> for RemoteCheckClient {
    async fn run(&self, job: EndpointCheck, sink: &ResultSink) {
        let parent = Span::current();
        for url in &self.urls {
            let result = self.post(&parent, url, &job).await;
            sink.push(result).await;
        }
    }
}
