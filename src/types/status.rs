// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Result vocabulary written back to callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed status strings returned by the check endpoints
///
/// The text of each variant is part of the wire contract: the CLI driver and any
/// dashboards built on top of it match on these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Every stage ran; individual fetches may still have failed
    CheckSuccess,
    /// An endpoint check could not fetch its target
    CheckError,
    /// The request body could not be decoded
    DataError,
    /// The request decoded but failed validation
    RequestError,
    /// The object list could not be generated
    ListError,
    /// The endpoint check named an endpoint type we do not probe
    UnsupportedType,
}

impl CheckStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::CheckSuccess => "Check Success",
            CheckStatus::CheckError => "Check Error",
            CheckStatus::DataError => "Data Error",
            CheckStatus::RequestError => "Request Error",
            CheckStatus::ListError => "List Error",
            CheckStatus::UnsupportedType => "Unsupported Type",
        }
    }

    /// Whether the request was rejected before any probing happened
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            CheckStatus::DataError | CheckStatus::RequestError | CheckStatus::ListError
        )
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
