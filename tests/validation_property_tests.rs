// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for check request validation

use objcheck::{CheckRequest, CheckRules, Service, ValidationError};
use proptest::prelude::*;

fn arb_known_region() -> impl Strategy<Value = (&'static str, Service)> {
    prop_oneof![
        Just(("us-central1", Service::Gcs)),
        Just(("us-east1", Service::Gcs)),
        Just(("europe-west2", Service::Gcs)),
        Just(("us-east-2", Service::S3)),
    ]
}

fn arb_service() -> impl Strategy<Value = Service> {
    prop_oneof![Just(Service::Gcs), Just(Service::S3)]
}

proptest! {
    /// Property: Matching service/region, pool 10 and count in range always validate
    #[test]
    fn prop_valid_requests_accepted((region, service) in arb_known_region(), count in 1i64..=1000) {
        let check = CheckRequest::new(service.as_str(), region, 10, count)
            .validate(&CheckRules::default())
            .unwrap();
        prop_assert_eq!(check.service, service);
        prop_assert_eq!(check.count, count as usize);
        let bucket = check.bucket();
        prop_assert_eq!(bucket.as_str(), format!("objcheck-{region}"));
    }

    /// Property: Counts outside [1, 1000] are rejected
    #[test]
    fn prop_out_of_range_count_rejected(
        (region, service) in arb_known_region(),
        count in prop_oneof![i64::MIN..1, 1001i64..i64::MAX],
    ) {
        let err = CheckRequest::new(service.as_str(), region, 10, count)
            .validate(&CheckRules::default())
            .unwrap_err();
        prop_assert_eq!(err, ValidationError::InvalidCount { count });
    }

    /// Property: Any pool other than 10 is rejected before the count is looked at
    #[test]
    fn prop_other_pools_rejected(
        (region, service) in arb_known_region(),
        pool in any::<i64>().prop_filter("not the accepted pool", |p| *p != 10),
        count in any::<i64>(),
    ) {
        let err = CheckRequest::new(service.as_str(), region, pool, count)
            .validate(&CheckRules::default())
            .unwrap_err();
        prop_assert_eq!(err.rule(), "pool");
    }

    /// Property: A known region with the other service is a mismatch, never an unknown region
    #[test]
    fn prop_mismatch_is_distinct((region, service) in arb_known_region(), other in arb_service()) {
        prop_assume!(other != service);
        let err = CheckRequest::new(other.as_str(), region, 10, 10)
            .validate(&CheckRules::default())
            .unwrap_err();
        prop_assert_eq!(err.rule(), "service_region");
    }

    /// Property: Unknown regions are rejected for every valid service
    #[test]
    fn prop_unknown_region_rejected(
        region in "[a-z]{2,8}-[a-z]{3,8}[0-9]",
        service in arb_service(),
    ) {
        prop_assume!(CheckRules::default().service_for_region(&region).is_none());
        let err = CheckRequest::new(service.as_str(), region.as_str(), 10, 10)
            .validate(&CheckRules::default())
            .unwrap_err();
        prop_assert_eq!(err, ValidationError::InvalidRegion { region: region.clone() });
    }

    /// Property: Service names are case-sensitive
    #[test]
    fn prop_service_case_matters(service in "(GCS|Gcs|S3|gCs)") {
        let err = CheckRequest::new(service.as_str(), "us-central1", 10, 10)
            .validate(&CheckRules::default())
            .unwrap_err();
        prop_assert_eq!(err.rule(), "service");
    }
}
