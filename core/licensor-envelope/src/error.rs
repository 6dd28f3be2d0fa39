//! Error types for the envelope module.

use licensor_crypto::CryptoError;
use licensor_document::DocumentError;
use thiserror::Error;

/// The only thing external callers learn about a rejected envelope.
pub const ENVELOPE_INVALID: &str = "envelope invalid";

/// Envelope-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Decrypted payload is not a valid entitlement document.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Payload could not be decrypted.
    #[error("payload decryption failed")]
    DecryptionFailed,

    /// Payload key could not be unwrapped.
    #[error("key unwrap failed")]
    KeyUnwrapFailed,

    /// Payload key does not fit the issuer's modulus.
    #[error("key too large to wrap: {actual} bytes, at most {max} allowed")]
    KeyTooLarge { max: usize, actual: usize },

    /// Signature bytes are unusable for the trusted key.
    #[error("invalid signature input: {0}")]
    InvalidSignatureInput(String),

    /// Envelope text does not have the expected structure.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Document decoded fine but is past its expiry.
    #[error("license expired at {0}")]
    ExpiredDocument(String),

    /// Document decoded fine but its signature does not verify.
    #[error("license signature invalid")]
    SignatureInvalid,

    /// Key or certificate could not be loaded.
    #[error("invalid key material: {0}")]
    KeyMaterial(String),

    /// Issuance policy cannot produce a valid document.
    #[error("invalid issuance policy: {0}")]
    InvalidPolicy(String),

    /// Any other cryptographic failure (RNG, RSA internals).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    /// Returns true for failures that must look identical to outsiders.
    #[must_use]
    pub fn is_envelope_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedDocument(_)
                | Self::DecryptionFailed
                | Self::KeyUnwrapFailed
                | Self::InvalidSignatureInput(_)
                | Self::MalformedEnvelope(_)
                | Self::SignatureInvalid
        )
    }

    /// Message safe to hand to an external caller.
    ///
    /// Every envelope rejection collapses to [`ENVELOPE_INVALID`] so a
    /// caller cannot learn which stage failed.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_envelope_rejection() {
            ENVELOPE_INVALID.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<CryptoError> for LicenseError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::DecryptionFailed => Self::DecryptionFailed,
            CryptoError::KeyUnwrapFailed => Self::KeyUnwrapFailed,
            CryptoError::KeyTooLarge { max, actual } => Self::KeyTooLarge { max, actual },
            CryptoError::InvalidSignatureInput(msg) => Self::InvalidSignatureInput(msg),
            CryptoError::KeyMaterial(msg) => Self::KeyMaterial(msg),
            other => Self::Crypto(other.to_string()),
        }
    }
}

impl From<DocumentError> for LicenseError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::MalformedDocument(msg) => Self::MalformedDocument(msg),
            DocumentError::Serialization(e) => Self::Serialization(e),
            DocumentError::InvalidTimestamp(msg) => Self::MalformedDocument(msg),
        }
    }
}

/// Result type for envelope operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
