// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

/// Errors from setting up logging and span export.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The OTLP exporter could not be built.
    #[error("Failed to build span exporter: {details}")]
    Exporter { details: String },

    /// A global subscriber was already installed.
    #[error("Failed to install tracing subscriber: {details}")]
    Subscriber { details: String },
}
