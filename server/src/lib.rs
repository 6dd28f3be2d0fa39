//! HTTP renewal endpoint for Licensor.
//!
//! A single route, `/v1/renew`, turns an optional JSON renewal request into
//! a freshly issued license envelope.

mod config;
mod error;

use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Json, routing::any, Router};
use licensor_envelope::{IssuedLicense, IssuerContext, RenewalRequest};
use tracing::{error, info};

pub use config::{load_issuer, IssuerConfig, KEYGEN_HINT};
pub use error::ApiError;

/// Renewal route path.
pub const RENEW_PATH: &str = "/v1/renew";

/// Parses a request body; a blank body means all defaults.
pub fn parse_renewal_request(body: &[u8]) -> Result<RenewalRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RenewalRequest::default());
    }
    Ok(serde_json::from_slice(body)?)
}

async fn renew_handler(
    State(issuer): State<Arc<IssuerContext>>,
    body: Bytes,
) -> Result<Json<IssuedLicense>, ApiError> {
    let request = parse_renewal_request(&body)?;

    // RSA private operations are CPU-bound.
    let issued = tokio::task::spawn_blocking(move || issuer.issue(&request))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .inspect_err(|e| error!(error = %e, "license issuance failed"))?;

    info!(
        detached_entitlements = issued.detached_entitlements_count,
        "issued license"
    );
    Ok(Json(issued))
}

/// Build the HTTP API router around a shared issuer.
pub fn build_router(issuer: Arc<IssuerContext>) -> Router {
    Router::new()
        .route(RENEW_PATH, any(renew_handler))
        .with_state(issuer)
}
