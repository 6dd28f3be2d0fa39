//! Issuer key material: RSA private keys and X.509 certificates.
//!
//! Both arrive as PEM text from whatever provisions them. Everything here
//! is parsed once at startup and is read-only afterwards, so the types are
//! `Send + Sync` and can be shared behind an `Arc`.

use crate::error::{CryptoError, CryptoResult};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use x509_cert::der::{DecodePem, Encode};
use x509_cert::Certificate as X509Certificate;

/// An RSA private key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// Parses a PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`) PEM document.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let pem = pem.trim();
        let inner = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| CryptoError::KeyMaterial(format!("unreadable RSA private key: {e}")))?;
        inner
            .validate()
            .map_err(|e| CryptoError::KeyMaterial(format!("inconsistent RSA private key: {e}")))?;
        Ok(Self { inner })
    }

    /// Returns the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.to_public_key(),
        }
    }

    /// Returns the modulus size in bytes.
    pub fn modulus_len(&self) -> usize {
        self.inner.size()
    }

    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("modulus_bits", &(self.modulus_len() * 8))
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// An RSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// Parses a DER-encoded `SubjectPublicKeyInfo`.
    pub fn from_spki_der(der: &[u8]) -> CryptoResult<Self> {
        let inner = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| CryptoError::KeyMaterial(format!("not an RSA public key: {e}")))?;
        Ok(Self { inner })
    }

    /// Returns the modulus size in bytes.
    pub fn modulus_len(&self) -> usize {
        self.inner.size()
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.inner
    }
}

/// A PEM certificate together with the RSA public key it carries.
///
/// The certificate is trusted as supplied; chain validation is the
/// caller's business.
#[derive(Clone, Debug)]
pub struct Certificate {
    pem: String,
    public_key: PublicKey,
}

impl Certificate {
    /// Parses an X.509 certificate PEM and extracts its RSA public key.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let cert = X509Certificate::from_pem(pem.trim().as_bytes())
            .map_err(|e| CryptoError::KeyMaterial(format!("unreadable certificate: {e}")))?;
        let spki = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| CryptoError::KeyMaterial(format!("unreadable certificate key: {e}")))?;
        let public_key = PublicKey::from_spki_der(&spki)?;

        Ok(Self {
            pem: pem.to_string(),
            public_key,
        })
    }

    /// Returns the PEM text exactly as supplied.
    pub fn pem(&self) -> &str {
        &self.pem
    }

    /// Returns the certificate's public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// The issuer's private key paired with its certificate.
#[derive(Clone, Debug)]
pub struct IssuerKeyPair {
    private_key: PrivateKey,
    certificate: Certificate,
}

impl IssuerKeyPair {
    /// Pairs a private key with a certificate, rejecting mismatches.
    pub fn new(private_key: PrivateKey, certificate: Certificate) -> CryptoResult<Self> {
        if &private_key.public_key() != certificate.public_key() {
            return Err(CryptoError::KeyMaterial(
                "certificate public key does not match the private key".to_string(),
            ));
        }
        Ok(Self {
            private_key,
            certificate,
        })
    }

    /// Parses both PEM documents and pairs them.
    pub fn from_pem(private_key_pem: &str, certificate_pem: &str) -> CryptoResult<Self> {
        Self::new(
            PrivateKey::from_pem(private_key_pem)?,
            Certificate::from_pem(certificate_pem)?,
        )
    }

    /// Returns the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Returns the certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }
}
