// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for objcheck
//!
//! One [`ObjcheckConfig`] drives every entry point: the validation rules a check
//! request is held to, the worker pool and burst schedule of the CLI driver, span
//! export, and backend access.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use objcheck::ObjcheckConfig;
//!
//! // Deployed constants: pool 10, count 1..=1000, four regions
//! let config = ObjcheckConfig::default();
//! assert_eq!(config.rules.accepted_pool, 10);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use objcheck::{ObjcheckConfigBuilder, Service};
//!
//! let config = ObjcheckConfigBuilder::with_defaults()
//!     .region("asia-northeast1", Service::Gcs)
//!     .workers(4)
//!     .build();
//! assert_eq!(config.rules.service_for_region("asia-northeast1"), Some(Service::Gcs));
//! ```
//!
//! # Example: From the environment
//!
//! ```rust,ignore
//! use objcheck::ObjcheckConfig;
//!
//! // Reads `.env` if present, then process variables
//! let config = ObjcheckConfig::from_env()?;
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;
use crate::types::Service;

pub mod constants;

/// Default bind address for `objcheck serve`
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default timeout for outbound HTTP calls (GCS, metadata server, check functions)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct ObjcheckConfig {
    /// Rules check requests are validated against
    pub rules: CheckRules,
    /// Worker pool sizing
    pub pool: PoolConfig,
    /// Burst schedule of the CLI driver
    pub schedule: ScheduleConfig,
    /// Span export
    pub telemetry: TelemetryConfig,
    /// GCS access
    pub gcs: GcsConfig,
    /// Address `objcheck serve` listens on
    pub bind_addr: String,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout: Duration,
    /// Check functions the CLI driver posts to
    pub function_urls: Vec<Url>,
}

/// Allow-list and numeric bounds for check requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRules {
    /// Region name to the service hosting that region's bucket
    pub regions: BTreeMap<String, Service>,
    /// The only accepted pool size
    pub accepted_pool: i64,
    /// Smallest accepted object count
    pub min_count: i64,
    /// Largest accepted object count
    pub max_count: i64,
    /// Size tag used when generating keys
    pub size_tag: String,
}

impl Default for CheckRules {
    fn default() -> Self {
        Self {
            regions: constants::BUCKET_REGIONS
                .iter()
                .map(|(name, service)| ((*name).to_string(), *service))
                .collect(),
            accepted_pool: constants::ACCEPTED_POOL_SIZE,
            min_count: constants::MIN_OBJECT_COUNT,
            max_count: constants::MAX_OBJECT_COUNT,
            size_tag: constants::DEFAULT_SIZE_TAG.to_string(),
        }
    }
}

impl CheckRules {
    /// Service hosting the bucket of `region`, if the region is known
    pub fn service_for_region(&self, region: &str) -> Option<Service> {
        self.regions.get(region).copied()
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of concurrent workers
    pub workers: usize,
    /// Capacity of the job queue
    pub job_capacity: usize,
    /// Capacity of the result queue
    pub result_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: constants::pool::WORKERS,
            job_capacity: constants::pool::JOB_QUEUE_CAPACITY,
            result_capacity: constants::pool::RESULT_QUEUE_CAPACITY,
        }
    }
}

/// Geometric burst schedule: `burst_size` jobs, pause, double the pause, repeat
/// until the pause would exceed `max_pause`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub burst_size: usize,
    pub initial_pause: Duration,
    pub max_pause: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            burst_size: constants::schedule::BURST_SIZE,
            initial_pause: Duration::from_secs(constants::schedule::INITIAL_PAUSE_SECS),
            max_pause: Duration::from_secs(constants::schedule::MAX_PAUSE_SECS),
        }
    }
}

/// Span export settings
///
/// Without an access token spans are only logged locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub access_token: Option<String>,
    /// Region tag attached to exported spans
    pub region: Option<String>,
    pub otlp_endpoint: String,
    /// Emit JSON lines instead of human-readable logs
    pub log_json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            region: None,
            otlp_endpoint: constants::telemetry::DEFAULT_OTLP_ENDPOINT.to_string(),
            log_json: false,
        }
    }
}

/// How GCS requests are authorized
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GcsAuth {
    /// No credentials; only public objects are readable
    #[default]
    Anonymous,
    /// A fixed OAuth bearer token
    Token(String),
    /// Tokens from the GCE metadata server
    Metadata,
}

/// GCS access settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcsConfig {
    pub base_url: Url,
    pub metadata_token_url: Url,
    pub auth: GcsAuth,
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(constants::gcs::DEFAULT_BASE_URL)
                .expect("default GCS base URL is valid"),
            metadata_token_url: Url::parse(constants::gcs::METADATA_TOKEN_URL)
                .expect("metadata token URL is valid"),
            auth: GcsAuth::Anonymous,
        }
    }
}

impl Default for ObjcheckConfig {
    fn default() -> Self {
        Self {
            rules: CheckRules::default(),
            pool: PoolConfig::default(),
            schedule: ScheduleConfig::default(),
            telemetry: TelemetryConfig::default(),
            gcs: GcsConfig::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            function_urls: constants::FUNCTION_URLS
                .iter()
                .map(|url| Url::parse(url).expect("function URLs are valid"))
                .collect(),
        }
    }
}

impl ObjcheckConfig {
    /// Load configuration from `.env` (if present) and process variables
    ///
    /// Recognized variables:
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `OBJCHECK_BIND`, `PORT` | listen address, or just the port |
    /// | `LS_API_KEY` | span export token |
    /// | `FUNCTION_REGION` | region tag on exported spans |
    /// | `OBJCHECK_OTLP_ENDPOINT` | OTLP/HTTP trace endpoint |
    /// | `OBJCHECK_LOG_JSON` | `1`/`true` for JSON logs |
    /// | `OBJCHECK_GCS_BASE_URL` | GCS JSON API root |
    /// | `OBJCHECK_GCS_AUTH` | `anonymous`, `token` or `metadata` |
    /// | `OBJCHECK_GCS_TOKEN` | bearer token (implies `token` auth) |
    /// | `OBJCHECK_HTTP_TIMEOUT_MS` | outbound request timeout |
    /// | `OBJCHECK_WORKERS` | worker count |
    /// | `OBJCHECK_FUNCTION_URLS` | comma-separated check function URLs |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Unset and empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(bind) = var("OBJCHECK_BIND") {
            config.bind_addr = bind;
        } else if let Some(port) = var("PORT") {
            let port: u16 = parse_number("PORT", &port)?;
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        config.telemetry.access_token = var("LS_API_KEY");
        config.telemetry.region = var("FUNCTION_REGION");
        if let Some(endpoint) = var("OBJCHECK_OTLP_ENDPOINT") {
            config.telemetry.otlp_endpoint = endpoint;
        }
        if let Some(flag) = var("OBJCHECK_LOG_JSON") {
            config.telemetry.log_json = parse_bool("OBJCHECK_LOG_JSON", &flag)?;
        }

        if let Some(base) = var("OBJCHECK_GCS_BASE_URL") {
            config.gcs.base_url = parse_url("OBJCHECK_GCS_BASE_URL", &base)?;
        }
        config.gcs.auth = match (var("OBJCHECK_GCS_AUTH"), var("OBJCHECK_GCS_TOKEN")) {
            (None, None) => GcsAuth::Anonymous,
            (None, Some(token)) => GcsAuth::Token(token),
            (Some(mode), token) => parse_gcs_auth(&mode, token)?,
        };

        if let Some(timeout) = var("OBJCHECK_HTTP_TIMEOUT_MS") {
            config.http_timeout =
                Duration::from_millis(parse_number("OBJCHECK_HTTP_TIMEOUT_MS", &timeout)?);
        }
        if let Some(workers) = var("OBJCHECK_WORKERS") {
            config.pool.workers = parse_number("OBJCHECK_WORKERS", &workers)?;
        }
        if let Some(urls) = var("OBJCHECK_FUNCTION_URLS") {
            config.function_urls = urls
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(|url| parse_url("OBJCHECK_FUNCTION_URLS", url))
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_value(name, value))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        _ => Err(ConfigError::invalid_value(name, value)),
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        variable: name.to_string(),
        source,
    })
}

fn parse_gcs_auth(mode: &str, token: Option<String>) -> Result<GcsAuth, ConfigError> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "anonymous" | "none" => Ok(GcsAuth::Anonymous),
        "metadata" => Ok(GcsAuth::Metadata),
        "token" => token
            .map(GcsAuth::Token)
            .ok_or_else(|| ConfigError::MissingVariable {
                variable: "OBJCHECK_GCS_TOKEN".to_string(),
            }),
        _ => Err(ConfigError::invalid_value("OBJCHECK_GCS_AUTH", mode)),
    }
}

/// Builder for [`ObjcheckConfig`]
///
/// # Example
///
/// ```rust
/// use objcheck::ObjcheckConfigBuilder;
/// use std::time::Duration;
///
/// let config = ObjcheckConfigBuilder::new()
///     .workers(2)
///     .schedule(3, Duration::from_millis(1), Duration::from_millis(4))
///     .build();
/// assert_eq!(config.pool.workers, 2);
/// ```
pub struct ObjcheckConfigBuilder {
    config: ObjcheckConfig,
}

impl Default for ObjcheckConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjcheckConfigBuilder {
    /// Start from the deployed defaults
    pub fn new() -> Self {
        Self {
            config: ObjcheckConfig::default(),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from the environment
    pub fn from_config(config: ObjcheckConfig) -> Self {
        Self { config }
    }

    /// Alias of [`ObjcheckConfigBuilder::new`]
    pub fn with_defaults() -> Self {
        Self::new()
    }

    /// Add or remap a region
    pub fn region(mut self, name: impl Into<String>, service: Service) -> Self {
        self.config.rules.regions.insert(name.into(), service);
        self
    }

    /// Drop every known region
    pub fn clear_regions(mut self) -> Self {
        self.config.rules.regions.clear();
        self
    }

    pub fn accepted_pool(mut self, pool: i64) -> Self {
        self.config.rules.accepted_pool = pool;
        self
    }

    pub fn count_range(mut self, min: i64, max: i64) -> Self {
        self.config.rules.min_count = min;
        self.config.rules.max_count = max;
        self
    }

    pub fn size_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.rules.size_tag = tag.into();
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.pool.workers = workers;
        self
    }

    pub fn queue_capacities(mut self, jobs: usize, results: usize) -> Self {
        self.config.pool.job_capacity = jobs;
        self.config.pool.result_capacity = results;
        self
    }

    pub fn schedule(
        mut self,
        burst_size: usize,
        initial_pause: Duration,
        max_pause: Duration,
    ) -> Self {
        self.config.schedule = ScheduleConfig {
            burst_size,
            initial_pause,
            max_pause,
        };
        self
    }

    pub fn telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.config.telemetry = telemetry;
        self
    }

    pub fn gcs_base_url(mut self, url: Url) -> Self {
        self.config.gcs.base_url = url;
        self
    }

    pub fn gcs_auth(mut self, auth: GcsAuth) -> Self {
        self.config.gcs.auth = auth;
        self
    }

    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn function_urls(mut self, urls: Vec<Url>) -> Self {
        self.config.function_urls = urls;
        self
    }

    pub fn build(self) -> ObjcheckConfig {
        self.config
    }
}
