//! Cryptographic building blocks for Licensor envelopes.
//!
//! - [`cipher`]: ChaCha20-Poly1305 payload encryption under a fresh key
//! - [`wrap`]: RSA PKCS#1 v1.5 wrapping of that key
//! - [`signature`]: RSA PKCS#1 v1.5 / SHA-256 signatures over plaintext
//! - [`keys`]: PEM private keys and X.509 certificates
//!
//! All randomness comes from the operating system CSPRNG.

pub mod cipher;
mod error;
mod key;
pub mod keys;
pub mod signature;
pub mod wrap;

pub use cipher::{
    open, open_text, seal, seal_to_text, SealedPayload, ALG_CHACHA20_POLY1305, NONCE_SIZE,
    TAG_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{generate_payload_key, PayloadKey, KEY_SIZE};
pub use keys::{Certificate, IssuerKeyPair, PrivateKey, PublicKey};
pub use signature::{sign, verify};
pub use wrap::{
    max_wrappable_len, unwrap_as_recipient, unwrap_with_public_key, wrap_for_recipient,
    wrap_with_private_key, PKCS1_OVERHEAD,
};
