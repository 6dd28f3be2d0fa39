//! License consumption.
//!
//! Opening an envelope runs decode, unwrap, decrypt, verify and parse in
//! that order. Policy (signature validity, then expiry) is applied on top
//! by [`OpenedEnvelope::verify_at`].

use crate::codec::LicenseEnvelope;
use crate::error::{LicenseError, LicenseResult};
use chrono::Utc;
use licensor_crypto::{
    open_text, unwrap_as_recipient, unwrap_with_public_key, verify, Certificate, PayloadKey,
    PrivateKey,
};
use licensor_document::{format_timestamp, EntitlementDocument, Timestamp};
use tracing::{debug, warn};

/// A decrypted envelope before policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedEnvelope {
    pub document: EntitlementDocument,
    /// Whether the signature matched the decrypted plaintext.
    pub signature_valid: bool,
}

impl OpenedEnvelope {
    /// Applies consumer policy as of `now`.
    ///
    /// # Errors
    ///
    /// [`LicenseError::SignatureInvalid`] takes precedence over
    /// [`LicenseError::ExpiredDocument`].
    pub fn verify_at(self, now: Timestamp) -> LicenseResult<EntitlementDocument> {
        if !self.signature_valid {
            return Err(LicenseError::SignatureInvalid);
        }
        if self.document.is_expired_at(now) {
            return Err(LicenseError::ExpiredDocument(format_timestamp(
                &self.document.expires_at,
            )));
        }
        Ok(self.document)
    }
}

/// How the consumer recovers the payload key.
#[derive(Debug, Clone)]
enum KeyUnwrap {
    IssuerCertificate,
    RecipientKey(PrivateKey),
}

/// Consumer-side trust anchor and unwrap material.
#[derive(Debug, Clone)]
pub struct ConsumerContext {
    certificate: Certificate,
    unwrap: KeyUnwrap,
}

impl ConsumerContext {
    /// Trusts `certificate` and unwraps payload keys with it.
    #[must_use]
    pub fn new(certificate: Certificate) -> Self {
        Self {
            certificate,
            unwrap: KeyUnwrap::IssuerCertificate,
        }
    }

    /// Trusts `certificate` and unwraps payload keys with the recipient's
    /// own private key.
    #[must_use]
    pub fn with_recipient_key(certificate: Certificate, recipient: PrivateKey) -> Self {
        Self {
            certificate,
            unwrap: KeyUnwrap::RecipientKey(recipient),
        }
    }

    /// Parses the trusted certificate from PEM.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::KeyMaterial`] if the certificate is unreadable.
    pub fn from_pem(certificate_pem: &str) -> LicenseResult<Self> {
        Ok(Self::new(Certificate::from_pem(certificate_pem)?))
    }

    /// Returns the trusted certificate.
    #[must_use]
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Decodes, decrypts and parses an envelope without applying policy.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage: [`LicenseError::MalformedEnvelope`],
    /// [`LicenseError::KeyUnwrapFailed`], [`LicenseError::DecryptionFailed`],
    /// [`LicenseError::InvalidSignatureInput`] or
    /// [`LicenseError::MalformedDocument`].
    pub fn open(&self, text: &str) -> LicenseResult<OpenedEnvelope> {
        let envelope = LicenseEnvelope::decode(text)?;

        let key_bytes = match &self.unwrap {
            KeyUnwrap::IssuerCertificate => {
                unwrap_with_public_key(&envelope.wrapped_key, self.certificate.public_key())?
            }
            KeyUnwrap::RecipientKey(recipient) => {
                unwrap_as_recipient(&envelope.wrapped_key, recipient)?
            }
        };
        let payload_key =
            PayloadKey::from_slice(&key_bytes).map_err(|_| LicenseError::KeyUnwrapFailed)?;

        let plaintext = open_text(&payload_key, &envelope.ciphertext)?;
        let signature_valid = verify(
            &plaintext,
            &envelope.signature,
            self.certificate.public_key(),
        )?;

        let document = EntitlementDocument::from_canonical_bytes(&plaintext)?;
        debug!(
            consumer_id = %document.consumer_id,
            signature_valid,
            "opened license envelope"
        );

        Ok(OpenedEnvelope {
            document,
            signature_valid,
        })
    }

    /// Opens an envelope and applies policy as of `now`.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::open`], then [`LicenseError::SignatureInvalid`]
    /// or [`LicenseError::ExpiredDocument`].
    pub fn consume_at(&self, text: &str, now: Timestamp) -> LicenseResult<EntitlementDocument> {
        let result = self.open(text).and_then(|opened| opened.verify_at(now));
        if let Err(err) = &result {
            warn!(error = %err, "rejected license envelope");
        }
        result
    }

    /// Opens an envelope and applies policy as of now.
    ///
    /// The clock is read at full precision; expiry is not rounded.
    ///
    /// # Errors
    ///
    /// Same as [`Self::consume_at`].
    pub fn consume(&self, text: &str) -> LicenseResult<EntitlementDocument> {
        self.consume_at(text, Utc::now())
    }
}
