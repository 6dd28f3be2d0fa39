//! Shared test helpers: PEM fixtures and OpenSSL-generated vectors.

#![allow(dead_code)]

use licensor_crypto::{Certificate, IssuerKeyPair, PrivateKey};

pub const ISSUER_KEY_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/issuer_key.pem"));
pub const ISSUER_CERT_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/issuer_cert.pem"));
pub const OTHER_KEY_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/other_key.pem"));
pub const OTHER_CERT_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/other_cert.pem"));

/// `openssl pkeyutl -sign -pkeyopt rsa_padding_mode:pkcs1` over bytes 1..=32
/// with the issuer key, base64.
pub const WRAPPED_KEY_VECTOR: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/wrapped_key_vector.b64"));

/// `openssl dgst -sha256 -sign` over [`SIGNED_MESSAGE`] with the issuer key, base64.
pub const SIGNATURE_VECTOR: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/signature_vector.b64"));

pub const SIGNED_MESSAGE: &[u8] = br#"{"consumerId":"c1"}"#;

/// The key bytes wrapped in [`WRAPPED_KEY_VECTOR`].
pub fn vector_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    for (i, b) in key.iter_mut().enumerate() {
        *b = (i + 1) as u8;
    }
    key
}

pub fn issuer_key() -> PrivateKey {
    PrivateKey::from_pem(ISSUER_KEY_PEM).unwrap()
}

pub fn issuer_cert() -> Certificate {
    Certificate::from_pem(ISSUER_CERT_PEM).unwrap()
}

pub fn other_key() -> PrivateKey {
    PrivateKey::from_pem(OTHER_KEY_PEM).unwrap()
}

pub fn other_cert() -> Certificate {
    Certificate::from_pem(OTHER_CERT_PEM).unwrap()
}

pub fn issuer_pair() -> IssuerKeyPair {
    IssuerKeyPair::from_pem(ISSUER_KEY_PEM, ISSUER_CERT_PEM).unwrap()
}

pub fn decode_b64(text: &str) -> Vec<u8> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD.decode(text.trim()).unwrap()
}
