//! RSASSA-PKCS1-v1_5 signatures over SHA-256.
//!
//! Signatures are computed over the canonical plaintext document, never
//! over ciphertext. Output matches `openssl dgst -sha256 -sign`.

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use sha2::Sha256;

/// Signs `message` with the issuer's private key.
pub fn sign(message: &[u8], private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    let signing_key = SigningKey::<Sha256>::new(private_key.as_rsa().clone());
    let signature = signing_key
        .try_sign(message)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    Ok(signature.to_vec())
}

/// Verifies `signature` over `message`.
///
/// A signature that simply does not match is `Ok(false)`. Only input that
/// cannot be a signature for this key is an error.
pub fn verify(message: &[u8], signature: &[u8], public_key: &PublicKey) -> CryptoResult<bool> {
    let expected = public_key.modulus_len();
    if signature.len() != expected {
        return Err(CryptoError::InvalidSignatureInput(format!(
            "signature is {} bytes, key expects {expected}",
            signature.len()
        )));
    }
    let signature = Signature::try_from(signature)
        .map_err(|e| CryptoError::InvalidSignatureInput(e.to_string()))?;

    let verifying_key = VerifyingKey::<Sha256>::new(public_key.as_rsa().clone());
    Ok(verifying_key.verify(message, &signature).is_ok())
}
