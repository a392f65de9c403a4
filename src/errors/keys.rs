// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

/// Errors from object-key generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyGenerationError {
    /// The pool has no objects at all.
    #[error("Bad pool size {pool_size}")]
    InvalidPoolSize { pool_size: i64 },

    /// Ids are drawn from `[1, pool_size)`, which is empty for a pool of one.
    #[error("Pool size {pool_size} leaves no object ids to draw from")]
    EmptyIdRange { pool_size: i64 },
}
