//! License envelope text format.
//!
//! ```text
//! -----BEGIN LICENSE KEY-----
//! base64(wrapped_key)||sealed_payload_text||base64(signature)
//! -----END LICENSE KEY-----
//! ```
//!
//! Every segment uses the standard base64 alphabet, which has no `|`, so
//! splitting on `||` is unambiguous.

use crate::error::{LicenseError, LicenseResult};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Opening bracket line.
pub const HEADER: &str = "-----BEGIN LICENSE KEY-----";

/// Closing bracket line.
pub const FOOTER: &str = "-----END LICENSE KEY-----";

/// Segment separator.
pub const SEPARATOR: &str = "||";

/// The three artifacts carried by a license envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseEnvelope {
    /// Payload key wrapped with RSA.
    pub wrapped_key: Vec<u8>,
    /// Sealed payload in its text form.
    pub ciphertext: String,
    /// Signature over the plaintext document.
    pub signature: Vec<u8>,
}

impl LicenseEnvelope {
    /// Encodes to the bracketed wire format.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{HEADER}\n{}{SEPARATOR}{}{SEPARATOR}{}\n{FOOTER}",
            STANDARD.encode(&self.wrapped_key),
            self.ciphertext,
            STANDARD.encode(&self.signature),
        )
    }

    /// Parses the bracketed wire format.
    ///
    /// Surrounding whitespace and CRLF line endings are tolerated. The body
    /// must contain exactly two separators and three non-empty base64
    /// segments.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::MalformedEnvelope`] for any structural problem.
    pub fn decode(text: &str) -> LicenseResult<Self> {
        let body = strip_brackets(text)?;

        let segments: Vec<&str> = body.split(SEPARATOR).collect();
        if segments.len() != 3 {
            return Err(LicenseError::MalformedEnvelope(format!(
                "expected 3 segments separated by {SEPARATOR:?}, found {}",
                segments.len()
            )));
        }

        let wrapped_key = decode_segment("wrapped key", segments[0])?;
        // Validated here, kept as text for the cipher.
        decode_segment("ciphertext", segments[1])?;
        let signature = decode_segment("signature", segments[2])?;

        Ok(Self {
            wrapped_key,
            ciphertext: segments[1].to_string(),
            signature,
        })
    }
}

fn strip_brackets(text: &str) -> LicenseResult<&str> {
    let text = text.trim();
    let inner = text
        .strip_prefix(HEADER)
        .and_then(|rest| rest.strip_suffix(FOOTER))
        .ok_or_else(|| {
            LicenseError::MalformedEnvelope("missing LICENSE KEY header or footer".to_string())
        })?;

    let body = inner.trim_matches(|c| c == '\r' || c == '\n');
    if body.contains(['\r', '\n']) {
        return Err(LicenseError::MalformedEnvelope(
            "body must be a single line".to_string(),
        ));
    }
    Ok(body)
}

fn decode_segment(name: &str, segment: &str) -> LicenseResult<Vec<u8>> {
    if segment.is_empty() {
        return Err(LicenseError::MalformedEnvelope(format!("{name} segment is empty")));
    }
    STANDARD
        .decode(segment)
        .map_err(|e| LicenseError::MalformedEnvelope(format!("{name} segment is not base64: {e}")))
}
