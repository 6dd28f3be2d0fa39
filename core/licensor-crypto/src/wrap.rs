//! RSA PKCS#1 v1.5 key wrapping.
//!
//! Two directions are supported:
//!
//! - **Issuer-private** (the legacy license format): the payload key is
//!   padded with block type 1 (`00 01 FF.. 00 key`) and raised to the
//!   private exponent, exactly like OpenSSL's `RSA_private_encrypt`. Anyone
//!   holding the certificate can unwrap it, so this binds the key to the
//!   issuer but does not hide it from certificate holders.
//! - **Recipient-public**: conventional block type 2 encryption to a
//!   recipient's public key, unwrapped with the recipient's private key.

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Encrypt, Pkcs1v15Sign};

/// Bytes of PKCS#1 v1.5 padding overhead (`00 BT PS(>=8) 00`).
pub const PKCS1_OVERHEAD: usize = 11;

/// Minimum run of padding bytes required by PKCS#1 v1.5.
const MIN_PADDING: usize = 8;

/// Returns the longest key that can be wrapped under a modulus of
/// `modulus_len` bytes.
pub fn max_wrappable_len(modulus_len: usize) -> usize {
    modulus_len.saturating_sub(PKCS1_OVERHEAD)
}

fn ensure_fits(key: &[u8], modulus_len: usize) -> CryptoResult<()> {
    let max = max_wrappable_len(modulus_len);
    if key.len() > max {
        return Err(CryptoError::KeyTooLarge {
            max,
            actual: key.len(),
        });
    }
    Ok(())
}

/// Wraps `key` with the issuer's private key (block type 1).
///
/// Deterministic: the same key and private key always give the same bytes.
pub fn wrap_with_private_key(key: &[u8], private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    ensure_fits(key, private_key.modulus_len())?;
    private_key
        .as_rsa()
        .sign(Pkcs1v15Sign::new_unprefixed(), key)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Recovers a key wrapped by [`wrap_with_private_key`] using the matching
/// public key.
///
/// A wrong key pair, a corrupted block or bad padding all yield
/// [`CryptoError::KeyUnwrapFailed`].
pub fn unwrap_with_public_key(wrapped: &[u8], public_key: &PublicKey) -> CryptoResult<Vec<u8>> {
    let key = public_key.as_rsa();
    let k = key.size();
    if wrapped.len() != k {
        return Err(CryptoError::KeyUnwrapFailed);
    }

    let c = BigUint::from_bytes_be(wrapped);
    if &c >= key.n() {
        return Err(CryptoError::KeyUnwrapFailed);
    }
    let m = c.modpow(key.e(), key.n()).to_bytes_be();
    if m.len() > k {
        return Err(CryptoError::KeyUnwrapFailed);
    }

    let mut em = vec![0u8; k];
    em[k - m.len()..].copy_from_slice(&m);
    strip_block_type_1(&em).map(<[u8]>::to_vec)
}

/// Validates `00 01 FF.. 00` and returns the payload after it.
fn strip_block_type_1(em: &[u8]) -> CryptoResult<&[u8]> {
    if em.len() < PKCS1_OVERHEAD || em[0] != 0x00 || em[1] != 0x01 {
        return Err(CryptoError::KeyUnwrapFailed);
    }
    let padding = em[2..].iter().take_while(|b| **b == 0xFF).count();
    let separator = 2 + padding;
    if padding < MIN_PADDING || separator >= em.len() || em[separator] != 0x00 {
        return Err(CryptoError::KeyUnwrapFailed);
    }
    Ok(&em[separator + 1..])
}

/// Wraps `key` to a recipient's public key (block type 2, randomized).
pub fn wrap_for_recipient(key: &[u8], recipient: &PublicKey) -> CryptoResult<Vec<u8>> {
    ensure_fits(key, recipient.modulus_len())?;
    recipient
        .as_rsa()
        .encrypt(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, key)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Recovers a key wrapped by [`wrap_for_recipient`].
pub fn unwrap_as_recipient(wrapped: &[u8], recipient: &PrivateKey) -> CryptoResult<Vec<u8>> {
    recipient
        .as_rsa()
        .decrypt(Pkcs1v15Encrypt, wrapped)
        .map_err(|_| CryptoError::KeyUnwrapFailed)
}
