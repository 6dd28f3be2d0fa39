//! Shared test helpers: fixture key material and ready-made contexts.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use licensor_crypto::{Certificate, PrivateKey};
use licensor_document::Timestamp;
use licensor_envelope::{
    ConsumerContext, IssuancePolicy, IssuerContext, KeyWrapMode, RenewalRequest,
};

pub const ISSUER_KEY_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/issuer_key.pem"));
pub const ISSUER_CERT_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/issuer_cert.pem"));
pub const OTHER_KEY_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/other_key.pem"));
pub const OTHER_CERT_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/other_cert.pem"));

/// A fixed issuance instant with whole-millisecond precision.
pub fn issued_at() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
        + chrono::Duration::milliseconds(535)
}

pub fn request() -> RenewalRequest {
    RenewalRequest::new("c1", "t1", "f1")
}

pub fn issuer() -> IssuerContext {
    IssuerContext::from_pem(ISSUER_KEY_PEM, ISSUER_CERT_PEM, IssuancePolicy::default()).unwrap()
}

/// An issuer that wraps payload keys to the holder of `other_key.pem`.
pub fn recipient_issuer() -> IssuerContext {
    let recipient = PrivateKey::from_pem(OTHER_KEY_PEM).unwrap().public_key();
    issuer().with_wrap_mode(KeyWrapMode::RecipientPublicKey(recipient))
}

pub fn consumer() -> ConsumerContext {
    ConsumerContext::from_pem(ISSUER_CERT_PEM).unwrap()
}

pub fn recipient_consumer() -> ConsumerContext {
    ConsumerContext::with_recipient_key(
        Certificate::from_pem(ISSUER_CERT_PEM).unwrap(),
        PrivateKey::from_pem(OTHER_KEY_PEM).unwrap(),
    )
}

/// A license issued for c1/t1/f1 at [`issued_at`].
pub fn issued_envelope() -> String {
    issuer().issue_at(&request(), issued_at()).unwrap().envelope
}

/// Splits an envelope into its three body segments.
pub fn segments(envelope: &str) -> Vec<String> {
    envelope
        .lines()
        .nth(1)
        .unwrap()
        .split("||")
        .map(str::to_string)
        .collect()
}

/// Reassembles an envelope from three body segments.
pub fn assemble(segments: &[String]) -> String {
    format!(
        "-----BEGIN LICENSE KEY-----\n{}\n-----END LICENSE KEY-----",
        segments.join("||")
    )
}
