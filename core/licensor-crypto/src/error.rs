//! Error types for the crypto layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Private key or certificate could not be loaded.
    #[error("invalid key material: {0}")]
    KeyMaterial(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key, corrupted ciphertext or tag mismatch).
    #[error("decryption failed")]
    DecryptionFailed,

    /// Wrapped key could not be recovered.
    #[error("key unwrap failed")]
    KeyUnwrapFailed,

    /// Key is too long for the modulus once padding is added.
    #[error("key too large to wrap: {actual} bytes, at most {max} allowed")]
    KeyTooLarge { max: usize, actual: usize },

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Signature bytes or key are unusable for verification.
    #[error("invalid signature input: {0}")]
    InvalidSignatureInput(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}
