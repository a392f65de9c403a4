// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for single-object fetches.
//!
//! Each variant maps to one stage of a fetch: getting a client, opening the
//! object, and draining its body. The stage is what ends up in the `event` field
//! of the fetch span.

use crate::types::Service;

/// Errors that can occur while fetching one object from a backend.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No usable client or credentials for the backend.
    #[error("Client error for {service}: {details}")]
    Client {
        service: Service,
        details: String,
    },

    /// The object does not exist in the bucket.
    #[error("Object {object} not found in {bucket}")]
    NotFound { bucket: String, object: String },

    /// The backend refused or failed to open the object.
    #[error("Object error for {object}: {details}")]
    Object { object: String, details: String },

    /// The body stream failed part-way.
    #[error("I/O error for {object} after {bytes_read} bytes: {details}")]
    Io {
        object: String,
        bytes_read: u64,
        details: String,
    },
}

impl FetchError {
    /// Helper to create a `Client` error from any error type.
    pub fn client(service: Service, source: impl std::fmt::Display) -> Self {
        FetchError::Client {
            service,
            details: source.to_string(),
        }
    }

    /// Helper to create an `Object` error from any error type.
    pub fn object(object: impl Into<String>, source: impl std::fmt::Display) -> Self {
        FetchError::Object {
            object: object.into(),
            details: source.to_string(),
        }
    }

    /// Helper to create an `Io` error from any error type.
    pub fn io(object: impl Into<String>, bytes_read: u64, source: impl std::fmt::Display) -> Self {
        FetchError::Io {
            object: object.into(),
            bytes_read,
            details: source.to_string(),
        }
    }

    /// Stage label recorded on the span (`client error`, `obj error`, `io error`)
    pub const fn event(&self) -> &'static str {
        match self {
            FetchError::Client { .. } => "client error",
            FetchError::NotFound { .. } | FetchError::Object { .. } => "obj error",
            FetchError::Io { .. } => "io error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_follow_fetch_stage() {
        assert_eq!(FetchError::client(Service::Gcs, "no creds").event(), "client error");
        assert_eq!(
            FetchError::NotFound {
                bucket: "b".into(),
                object: "o".into()
            }
            .event(),
            "obj error"
        );
        assert_eq!(FetchError::object("o", "denied").event(), "obj error");
        assert_eq!(FetchError::io("o", 12, "reset").event(), "io error");
    }

    #[test]
    fn io_error_reports_progress() {
        let err = FetchError::io("10_1_1k.obj", 512, "connection reset");
        assert_eq!(
            err.to_string(),
            "I/O error for 10_1_1k.obj after 512 bytes: connection reset"
        );
    }
}
