// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {variable}: {value:?}")]
    InvalidValue { variable: String, value: String },

    /// A variable holds a malformed URL.
    #[error("Invalid URL in {variable}")]
    InvalidUrl {
        variable: String,
        #[source]
        source: url::ParseError,
    },

    /// A variable required by another setting is missing.
    #[error("{variable} must be set")]
    MissingVariable { variable: String },
}

impl ConfigError {
    pub fn invalid_value(variable: impl Into<String>, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            variable: variable.into(),
            value: value.into(),
        }
    }
}
