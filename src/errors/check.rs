// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors that abort a check before any object is fetched.

use super::{KeyGenerationError, ValidationError};
use crate::types::CheckStatus;

/// Early-abort errors of a check request.
///
/// Every variant maps to exactly one fixed status string via [`CheckError::status`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The request body is not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request broke a validation rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The object list could not be generated.
    #[error("List generation error: {0}")]
    ListGeneration(#[from] KeyGenerationError),
}

impl CheckError {
    /// Status string returned to the caller
    pub const fn status(&self) -> CheckStatus {
        match self {
            CheckError::Decode(_) => CheckStatus::DataError,
            CheckError::Validation(_) => CheckStatus::RequestError,
            CheckError::ListGeneration(_) => CheckStatus::ListError,
        }
    }
}
