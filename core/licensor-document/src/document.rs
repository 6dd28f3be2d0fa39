//! The entitlement document and its canonical serialization.
//!
//! Canonical form is compact JSON with struct fields in declaration order
//! and map keys sorted. Strings are JSON-escaped, so control characters
//! can never blur a field boundary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entitlement::Entitlement;
use crate::timestamp::{format_timestamp, iso8601, Timestamp};
use crate::{DocumentError, Result};

/// Document format version written by current issuers.
pub const CURRENT_VERSION: u32 = 2;

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// The structured entitlement document protected by a license envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementDocument {
    pub consumer_id: String,
    #[serde(default = "current_version")]
    pub version: u32,
    pub tenant_id: i64,
    pub renewal_token: String,
    pub device_lock: bool,
    pub device_fingerprint: String,
    #[serde(with = "iso8601")]
    pub created_at: Timestamp,
    #[serde(with = "iso8601")]
    pub issued_at: Timestamp,
    #[serde(with = "iso8601")]
    pub expires_at: Timestamp,
    #[serde(with = "iso8601")]
    pub terminates_at: Timestamp,
    pub entitlements: Vec<Entitlement>,
    #[serde(default)]
    pub detached_entitlements_count: u32,
    #[serde(default)]
    pub management_jwt: String,
    #[serde(default)]
    pub is_ephemeral: bool,
}

impl EntitlementDocument {
    /// Serializes the document to its canonical byte form.
    ///
    /// # Errors
    ///
    /// Returns an error only if a metadata value cannot be represented as
    /// JSON, which cannot happen for documents built through this crate.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses a document from canonical bytes and checks its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MalformedDocument`] for invalid UTF-8,
    /// invalid JSON, missing fields, or violated invariants.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DocumentError::MalformedDocument(format!("invalid UTF-8: {e}")))?;
        let document: Self = serde_json::from_str(text)
            .map_err(|e| DocumentError::MalformedDocument(format!("invalid JSON: {e}")))?;
        document.validate()?;
        Ok(document)
    }

    /// Checks the ordering and uniqueness invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MalformedDocument`] naming the first
    /// violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.expires_at < self.issued_at {
            return Err(DocumentError::MalformedDocument(format!(
                "expiresAt {} precedes issuedAt {}",
                format_timestamp(&self.expires_at),
                format_timestamp(&self.issued_at)
            )));
        }
        if self.terminates_at < self.issued_at {
            return Err(DocumentError::MalformedDocument(format!(
                "terminatesAt {} precedes issuedAt {}",
                format_timestamp(&self.terminates_at),
                format_timestamp(&self.issued_at)
            )));
        }

        let mut seen = HashSet::with_capacity(self.entitlements.len());
        for entitlement in &self.entitlements {
            if entitlement.valid_to < entitlement.valid_from {
                return Err(DocumentError::MalformedDocument(format!(
                    "entitlement {} ends before it starts",
                    entitlement.id
                )));
            }
            if !seen.insert(entitlement.id) {
                return Err(DocumentError::MalformedDocument(format!(
                    "duplicate entitlement id {}",
                    entitlement.id
                )));
            }
        }
        Ok(())
    }

    /// Returns true if the document is past its expiry at `now`.
    ///
    /// A document whose `expires_at` equals `now` is still valid.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Returns the entitlement for `product_id`, if the document has one.
    #[must_use]
    pub fn entitlement_for(&self, product_id: &uuid::Uuid) -> Option<&Entitlement> {
        self.entitlements.iter().find(|e| &e.product_id == product_id)
    }
}
