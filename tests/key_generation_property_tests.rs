// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for object-key generation
//!
//! These tests check the shape of generated object lists across pool sizes,
//! counts, and random seeds.

use objcheck::{generate_object_keys, generate_object_keys_with_rng, KeyGenerationError};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

// Helper to split a key back into (pool, id, size tag)
fn parse_key(key: &str) -> Option<(i64, i64, String)> {
    let stem = key.strip_suffix(".obj")?;
    let mut parts = stem.splitn(3, '_');
    let pool = parts.next()?.parse().ok()?;
    let id = parts.next()?.parse().ok()?;
    let tag = parts.next()?.to_string();
    Some((pool, id, tag))
}

fn arb_size_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1k".to_string()),
        Just("4k".to_string()),
        Just("1m".to_string()),
        "[a-z0-9]{1,4}",
    ]
}

proptest! {
    /// Property: Non-positive pool sizes are rejected for any count
    #[test]
    fn prop_non_positive_pool_rejected(pool in i64::MIN..=0, count in 0usize..200) {
        prop_assert_eq!(
            generate_object_keys(pool, count, "1k"),
            Err(KeyGenerationError::InvalidPoolSize { pool_size: pool })
        );
    }

    /// Property: Exactly `count` keys for any usable pool
    #[test]
    fn prop_exact_count(pool in 2i64..100_000, count in 0usize..500, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let keys = generate_object_keys_with_rng(&mut rng, pool, count, "1k").unwrap();
        prop_assert_eq!(keys.len(), count);
    }

    /// Property: Every key is `<pool>_<id>_<tag>.obj` with 1 <= id < pool
    #[test]
    fn prop_key_shape(
        pool in 2i64..10_000,
        count in 1usize..200,
        tag in arb_size_tag(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let keys = generate_object_keys_with_rng(&mut rng, pool, count, &tag).unwrap();

        for key in &keys {
            let (key_pool, id, key_tag) = parse_key(key.as_str())
                .ok_or_else(|| TestCaseError::fail(format!("malformed key {key}")))?;
            prop_assert_eq!(key_pool, pool);
            prop_assert!(id >= 1 && id < pool, "id {} outside [1, {})", id, pool);
            prop_assert_eq!(&key_tag, &tag);
        }
    }

    /// Property: The same seed gives the same list
    #[test]
    fn prop_seeded_lists_repeat(pool in 2i64..1_000, count in 0usize..100, seed in any::<u64>()) {
        let first =
            generate_object_keys_with_rng(&mut StdRng::seed_from_u64(seed), pool, count, "1k");
        let second =
            generate_object_keys_with_rng(&mut StdRng::seed_from_u64(seed), pool, count, "1k");
        prop_assert_eq!(first, second);
    }
}

#[test]
fn deployed_pool_draws_ids_one_through_nine() {
    let keys = generate_object_keys(10, 1000, "1k").unwrap();
    let ids: std::collections::BTreeSet<i64> = keys
        .iter()
        .filter_map(|k| parse_key(k.as_str()))
        .map(|(_, id, _)| id)
        .collect();
    assert_eq!(ids, (1..10).collect());
}
