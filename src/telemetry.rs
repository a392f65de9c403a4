// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Logging and span export
//!
//! [`Telemetry`] is built once in `main` and owns the span exporter. Logs always
//! go to stdout through `tracing-subscriber` (`RUST_LOG` filters, default
//! `info`). When an access token is configured, spans are also exported over
//! OTLP/HTTP with the token in the `lightstep-access-token` header. Without a
//! token nothing is exported.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};
use std::collections::HashMap;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::constants::telemetry::{ACCESS_TOKEN_HEADER, SERVICE_NAME};
use crate::config::TelemetryConfig;
use crate::errors::TelemetryError;

/// Installed logging and, optionally, span export
#[derive(Debug)]
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// - [`TelemetryError::Exporter`] if the OTLP exporter cannot be built
    /// - [`TelemetryError::Subscriber`] if a global subscriber is already set
    pub fn init(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let provider = match config.access_token.as_deref() {
            Some(token) => Some(build_provider(config, token)?),
            None => None,
        };
        let otel = provider
            .as_ref()
            .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));
        let json = config.log_json.then(|| tracing_subscriber::fmt::layer().json());
        let plain = (!config.log_json).then(tracing_subscriber::fmt::layer);

        tracing_subscriber::registry()
            .with(filter)
            .with(json)
            .with(plain)
            .with(otel)
            .try_init()
            .map_err(|e| TelemetryError::Subscriber {
                details: e.to_string(),
            })?;

        match &provider {
            Some(_) => info!(
                endpoint = %config.otlp_endpoint,
                region = config.region.as_deref().unwrap_or("unknown"),
                "Exporting spans over OTLP"
            ),
            None => info!("No access token configured; spans are logged only"),
        }

        Ok(Self { provider })
    }

    /// Whether spans leave the process
    pub fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }

    /// Flush pending spans and stop the exporter
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(err) = provider.shutdown() {
                warn!(error = %err, "Span exporter did not shut down cleanly");
            }
        }
    }
}

fn build_provider(
    config: &TelemetryConfig,
    token: &str,
) -> Result<TracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(config.otlp_endpoint.clone())
        .with_headers(HashMap::from([(
            ACCESS_TOKEN_HEADER.to_string(),
            token.to_string(),
        )]))
        .build()
        .map_err(|e| TelemetryError::Exporter {
            details: e.to_string(),
        })?;

    let mut attributes = vec![KeyValue::new("service.name", SERVICE_NAME)];
    if let Some(region) = &config.region {
        attributes.push(KeyValue::new("region", region.clone()));
    }

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(attributes))
        .build())
}
