// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Object-key generation
//!
//! A check fetches `count` random objects from a pool. Keys have the form
//! `<pool>_<id>_<size>.obj` with `id` drawn uniformly from `[1, pool)`. The top id
//! of the pool is never drawn; buckets are seeded to match.
//!
//! Draws are independent, so the same key can appear more than once in a list.
//! [`generate_object_keys`] reseeds from the clock on every call and is not
//! reproducible; use [`generate_object_keys_with_rng`] when a test needs fixed
//! output.

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, Span};

use crate::errors::KeyGenerationError;
use crate::spans;
use crate::types::ObjectKey;

/// Generate `count` keys for a pool, seeding from the current time
///
/// # Errors
///
/// - [`KeyGenerationError::InvalidPoolSize`] when `pool_size <= 0`
/// - [`KeyGenerationError::EmptyIdRange`] when `pool_size == 1`
///
/// # Examples
///
/// ```
/// use objcheck::generate_object_keys;
///
/// let keys = generate_object_keys(10, 3, "1k").unwrap();
/// assert_eq!(keys.len(), 3);
/// assert!(keys.iter().all(|k| k.as_str().starts_with("10_") && k.as_str().ends_with("_1k.obj")));
/// ```
pub fn generate_object_keys(
    pool_size: i64,
    count: usize,
    size_tag: &str,
) -> Result<Vec<ObjectKey>, KeyGenerationError> {
    let mut rng = StdRng::seed_from_u64(time_seed());
    generate_object_keys_with_rng(&mut rng, pool_size, count, size_tag)
}

/// Generate `count` keys for a pool from the given random source
///
/// # Errors
///
/// Same as [`generate_object_keys`].
pub fn generate_object_keys_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    pool_size: i64,
    count: usize,
    size_tag: &str,
) -> Result<Vec<ObjectKey>, KeyGenerationError> {
    if pool_size <= 0 {
        return Err(KeyGenerationError::InvalidPoolSize { pool_size });
    }
    if pool_size == 1 {
        return Err(KeyGenerationError::EmptyIdRange { pool_size });
    }

    Ok((0..count)
        .map(|_| ObjectKey::pooled(pool_size, rng.gen_range(1..pool_size), size_tag))
        .collect())
}

/// [`generate_object_keys`] under its own span, tagged on failure
pub(crate) fn traced_object_list(
    parent: &Span,
    pool_size: i64,
    count: usize,
    size_tag: &str,
) -> Result<Vec<ObjectKey>, KeyGenerationError> {
    let span = spans::create_obj_list(parent, pool_size, count, size_tag);
    let _guard = span.enter();

    match generate_object_keys(pool_size, count, size_tag) {
        Ok(keys) => {
            debug!(keys = keys.len(), "Generated object list");
            Ok(keys)
        }
        Err(err) => {
            spans::record_error(&span, "list error", &err);
            Err(err)
        }
    }
}

fn time_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .map(|nanos| nanos as u64)
        .unwrap_or_else(|| now.timestamp_micros() as u64)
}
