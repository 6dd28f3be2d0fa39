//! License issuance.
//!
//! An [`IssuerContext`] is built once from the issuer's key material and
//! policy, then shared immutably across requests. Each call to
//! [`IssuerContext::issue`] builds a fresh document and seals it with a
//! fresh payload key.

use crate::codec::LicenseEnvelope;
use crate::error::{LicenseError, LicenseResult};
use chrono::{Datelike, Months};
use licensor_crypto::{
    generate_payload_key, seal_to_text, sign, wrap_for_recipient, wrap_with_private_key,
    IssuerKeyPair, PublicKey,
};
use licensor_document::{
    now_millis, EntitlementDocument, EntitlementPlan, Timestamp, MAX_YEAR,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default validity window in calendar years.
pub const DEFAULT_VALIDITY_YEARS: u32 = 20;

/// Tenant stamped into documents unless configured otherwise.
pub const DEFAULT_TENANT_ID: i64 = 1;

/// What goes into each issued document besides the request fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuancePolicy {
    /// Whole calendar years between `issuedAt` and `expiresAt`.
    pub validity_years: u32,
    pub tenant_id: i64,
    pub device_lock: bool,
    pub plan: EntitlementPlan,
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self {
            validity_years: DEFAULT_VALIDITY_YEARS,
            tenant_id: DEFAULT_TENANT_ID,
            device_lock: true,
            plan: EntitlementPlan::default(),
        }
    }
}

impl IssuancePolicy {
    /// Returns the expiry for a document issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidPolicy`] if the window overflows the
    /// representable date range or ends after year [`MAX_YEAR`].
    pub fn expiry_for(&self, issued_at: Timestamp) -> LicenseResult<Timestamp> {
        let months = self.validity_years.checked_mul(12).ok_or_else(|| {
            LicenseError::InvalidPolicy(format!("{} years is too long", self.validity_years))
        })?;
        issued_at
            .checked_add_months(Months::new(months))
            .filter(|expires_at| expires_at.year() <= MAX_YEAR)
            .ok_or_else(|| {
                LicenseError::InvalidPolicy(format!(
                    "{} years after {issued_at} ends past year {MAX_YEAR}",
                    self.validity_years
                ))
            })
    }

    /// Checks that documents issued now would carry a valid expiry.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidPolicy`] as [`Self::expiry_for`] does.
    pub fn validate(&self) -> LicenseResult<()> {
        self.expiry_for(now_millis()).map(|_| ())
    }
}

/// How the payload key is wrapped.
#[derive(Debug, Clone, Default)]
pub enum KeyWrapMode {
    /// Wrap with the issuer's private key (legacy format); unwrapped with
    /// the issuer certificate.
    #[default]
    IssuerPrivateKey,
    /// Wrap to a recipient's public key; unwrapped with the recipient's
    /// private key.
    RecipientPublicKey(PublicKey),
}

/// Renewal request fields supplied by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenewalRequest {
    pub consumer_id: Option<String>,
    pub renewal_token: Option<String>,
    pub device_fingerprint: Option<String>,
}

impl RenewalRequest {
    /// Creates a request with all three fields present.
    #[must_use]
    pub fn new(
        consumer_id: impl Into<String>,
        renewal_token: impl Into<String>,
        device_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            consumer_id: Some(consumer_id.into()),
            renewal_token: Some(renewal_token.into()),
            device_fingerprint: Some(device_fingerprint.into()),
        }
    }
}

/// An issued license as handed back to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedLicense {
    /// The bracketed envelope string.
    #[serde(rename = "licenseKey")]
    pub envelope: String,
    /// The issuer certificate PEM, carried alongside.
    #[serde(rename = "x509")]
    pub certificate: String,
    #[serde(rename = "detachedEntitlementsCount")]
    pub detached_entitlements_count: u32,
}

/// Immutable issuer state shared across requests.
#[derive(Debug, Clone)]
pub struct IssuerContext {
    keys: IssuerKeyPair,
    policy: IssuancePolicy,
    wrap_mode: KeyWrapMode,
}

impl IssuerContext {
    /// Creates a context that wraps keys in the legacy direction.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidPolicy`] if the policy cannot issue
    /// a document today.
    pub fn new(keys: IssuerKeyPair, policy: IssuancePolicy) -> LicenseResult<Self> {
        policy.validate()?;
        Ok(Self {
            keys,
            policy,
            wrap_mode: KeyWrapMode::IssuerPrivateKey,
        })
    }

    /// Loads key material from PEM text.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::KeyMaterial`] if either document is unreadable
    /// or they do not belong together, and [`LicenseError::InvalidPolicy`]
    /// as [`Self::new`] does.
    pub fn from_pem(
        private_key_pem: &str,
        certificate_pem: &str,
        policy: IssuancePolicy,
    ) -> LicenseResult<Self> {
        let keys = IssuerKeyPair::from_pem(private_key_pem, certificate_pem)?;
        Self::new(keys, policy)
    }

    /// Switches the key wrap direction.
    #[must_use]
    pub fn with_wrap_mode(mut self, wrap_mode: KeyWrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self
    }

    /// Returns the issuance policy.
    #[must_use]
    pub fn policy(&self) -> &IssuancePolicy {
        &self.policy
    }

    /// Returns the issuer certificate PEM.
    #[must_use]
    pub fn certificate_pem(&self) -> &str {
        self.keys.certificate().pem()
    }

    /// Issues a license for `request` as of now.
    ///
    /// # Errors
    ///
    /// Fails only on policy overflow or an internal crypto fault.
    pub fn issue(&self, request: &RenewalRequest) -> LicenseResult<IssuedLicense> {
        self.issue_at(request, now_millis())
    }

    /// Issues a license for `request` as of `now`.
    ///
    /// # Errors
    ///
    /// Fails only on policy overflow or an internal crypto fault.
    pub fn issue_at(
        &self,
        request: &RenewalRequest,
        now: Timestamp,
    ) -> LicenseResult<IssuedLicense> {
        let document = self.build_document(request, now)?;
        let envelope = self.seal(&document)?;

        debug!(
            consumer_id = %document.consumer_id,
            entitlements = document.entitlements.len(),
            expires_at = %document.expires_at,
            "issued license envelope"
        );

        Ok(IssuedLicense {
            envelope: envelope.encode(),
            certificate: self.certificate_pem().to_string(),
            detached_entitlements_count: document.detached_entitlements_count,
        })
    }

    /// Builds the document for `request` with `now` as creation time.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidPolicy`] if the validity window
    /// overflows.
    pub fn build_document(
        &self,
        request: &RenewalRequest,
        now: Timestamp,
    ) -> LicenseResult<EntitlementDocument> {
        let expires_at = self.policy.expiry_for(now)?;

        Ok(EntitlementDocument {
            consumer_id: request.consumer_id.clone().unwrap_or_default(),
            version: licensor_document::CURRENT_VERSION,
            tenant_id: self.policy.tenant_id,
            renewal_token: request.renewal_token.clone().unwrap_or_default(),
            device_lock: self.policy.device_lock,
            device_fingerprint: request.device_fingerprint.clone().unwrap_or_default(),
            created_at: now,
            issued_at: now,
            expires_at,
            terminates_at: expires_at,
            entitlements: vec![self.policy.plan.entitlement(now, expires_at)],
            detached_entitlements_count: 0,
            management_jwt: String::new(),
            is_ephemeral: false,
        })
    }

    /// Seals an existing document into an envelope.
    ///
    /// Serializes canonically, encrypts under a fresh payload key, wraps
    /// that key, and signs the plaintext.
    ///
    /// # Errors
    ///
    /// Fails on an internal crypto fault or if the key does not fit the
    /// wrap modulus.
    pub fn seal(&self, document: &EntitlementDocument) -> LicenseResult<LicenseEnvelope> {
        let plaintext = document.to_canonical_bytes()?;

        let payload_key = generate_payload_key();
        let ciphertext = seal_to_text(&payload_key, &plaintext)?;

        let wrapped_key = match &self.wrap_mode {
            KeyWrapMode::IssuerPrivateKey => {
                wrap_with_private_key(payload_key.as_bytes(), self.keys.private_key())?
            }
            KeyWrapMode::RecipientPublicKey(recipient) => {
                wrap_for_recipient(payload_key.as_bytes(), recipient)?
            }
        };

        let signature = sign(&plaintext, self.keys.private_key())?;

        Ok(LicenseEnvelope {
            wrapped_key,
            ciphertext,
            signature,
        })
    }
}

