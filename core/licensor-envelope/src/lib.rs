//! License envelopes for Licensor.
//!
//! An envelope carries one entitlement document across an untrusted
//! channel:
//!
//! - the document is serialized canonically and sealed under a fresh key
//! - that key is wrapped with RSA
//! - the plaintext is signed with the issuer's private key
//!
//! # Flow
//!
//! - [`IssuerContext::issue`] builds a document from a [`RenewalRequest`]
//!   and returns an [`IssuedLicense`]
//! - [`ConsumerContext::consume`] reverses it and applies expiry policy
//!
//! Rejections surface to outsiders only as [`ENVELOPE_INVALID`]; see
//! [`LicenseError::public_message`].

mod codec;
mod consumer;
mod error;
mod issuer;

pub use codec::{LicenseEnvelope, FOOTER, HEADER, SEPARATOR};
pub use consumer::{ConsumerContext, OpenedEnvelope};
pub use error::{LicenseError, LicenseResult, ENVELOPE_INVALID};
pub use issuer::{
    IssuancePolicy, IssuedLicense, IssuerContext, KeyWrapMode, RenewalRequest,
    DEFAULT_TENANT_ID, DEFAULT_VALIDITY_YEARS,
};
