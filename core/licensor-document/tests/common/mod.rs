//! Shared test helpers for document tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use licensor_document::{EntitlementDocument, EntitlementPlan, Timestamp};
use uuid::Uuid;

/// A fixed issuance instant with whole-millisecond precision.
pub fn issued_at() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
        + chrono::Duration::milliseconds(535)
}

/// Builds a document from the default plan with a fixed entitlement id.
pub fn sample_document() -> EntitlementDocument {
    let issued = issued_at();
    let expires = issued + chrono::Duration::days(365);
    let plan = EntitlementPlan {
        entitlement_id: Some(Uuid::from_u128(1)),
        ..EntitlementPlan::default()
    };

    EntitlementDocument {
        consumer_id: "c1".to_string(),
        version: 2,
        tenant_id: 1,
        renewal_token: "t1".to_string(),
        device_lock: true,
        device_fingerprint: "f1".to_string(),
        created_at: issued,
        issued_at: issued,
        expires_at: expires,
        terminates_at: expires,
        entitlements: vec![plan.entitlement(issued, expires)],
        detached_entitlements_count: 0,
        management_jwt: String::new(),
        is_ephemeral: false,
    }
}
