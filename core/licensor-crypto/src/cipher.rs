//! Payload encryption using ChaCha20-Poly1305.
//!
//! The sealed text form is standard base64 over
//! `alg_tag || nonce || ciphertext || tag`, so decryption needs nothing
//! but the key. The base64 alphabet never contains `|`.

use crate::error::{CryptoError, CryptoResult};
use crate::key::PayloadKey;
use base64::{engine::general_purpose::STANDARD, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Algorithm tag for ChaCha20-Poly1305 with a 96-bit random nonce.
pub const ALG_CHACHA20_POLY1305: u8 = 0x01;

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encrypted payload with everything needed for decryption except the key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPayload {
    /// The nonce used for encryption (unique per encryption).
    pub nonce: [u8; NONCE_SIZE],
    /// The encrypted ciphertext (includes auth tag).
    pub ciphertext: Vec<u8>,
}

impl SealedPayload {
    /// Returns the size of the binary form, including the algorithm tag.
    pub fn len(&self) -> usize {
        1 + NONCE_SIZE + self.ciphertext.len()
    }

    /// Returns true if the ciphertext is empty.
    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Encodes to the self-describing text form.
    pub fn to_text(&self) -> String {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.push(ALG_CHACHA20_POLY1305);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        STANDARD.encode(&bytes)
    }

    /// Decodes from the text form.
    ///
    /// Any structural problem is reported as [`CryptoError::DecryptionFailed`]
    /// so callers cannot tell a bad encoding from a bad key.
    pub fn from_text(encoded: &str) -> CryptoResult<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        if bytes.len() < 1 + NONCE_SIZE + TAG_SIZE || bytes[0] != ALG_CHACHA20_POLY1305 {
            return Err(CryptoError::DecryptionFailed);
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[1..=NONCE_SIZE]);
        let ciphertext = bytes[1 + NONCE_SIZE..].to_vec();

        Ok(Self { nonce, ciphertext })
    }
}

/// Encrypts plaintext under `key` with a fresh random nonce.
pub fn seal(key: &PayloadKey, plaintext: &[u8]) -> CryptoResult<SealedPayload> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(SealedPayload {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypts a sealed payload.
///
/// Wrong key, corrupted ciphertext and tag mismatch all yield
/// [`CryptoError::DecryptionFailed`].
pub fn open(key: &PayloadKey, sealed: &SealedPayload) -> CryptoResult<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(&sealed.nonce);

    cipher
        .decrypt(nonce, sealed.ciphertext.as_ref())
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// Encrypts and returns the text form.
pub fn seal_to_text(key: &PayloadKey, plaintext: &[u8]) -> CryptoResult<String> {
    Ok(seal(key, plaintext)?.to_text())
}

/// Decrypts the text form.
pub fn open_text(key: &PayloadKey, encoded: &str) -> CryptoResult<Vec<u8>> {
    let sealed = SealedPayload::from_text(encoded)?;
    open(key, &sealed)
}
