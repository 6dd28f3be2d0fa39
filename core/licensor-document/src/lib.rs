//! Entitlement document model for Licensor.
//!
//! This crate defines the plain-text structure that a license envelope
//! protects:
//! - The entitlement document and its per-product entitlements
//! - Feature values (`bool | integer | string`)
//! - Issuance plans used to stamp entitlements into fresh documents
//! - RFC 3339 timestamps with byte-stable formatting
//!
//! The canonical serialization produced here is what gets signed, so it
//! must be identical byte-for-byte for identical field values.

mod document;
mod entitlement;
mod plan;
mod timestamp;

pub use document::{EntitlementDocument, CURRENT_VERSION};
pub use entitlement::{Entitlement, FeatureValue};
pub use plan::EntitlementPlan;
pub use timestamp::{format_timestamp, now_millis, parse_timestamp, Timestamp, MAX_YEAR};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors that can occur while building or parsing documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Input bytes are not a well-formed entitlement document.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
