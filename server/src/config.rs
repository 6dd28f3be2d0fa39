//! Issuer key material and policy loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use licensor_document::EntitlementPlan;
use licensor_envelope::{IssuancePolicy, IssuerContext, DEFAULT_VALIDITY_YEARS};
use tracing::info;

/// Printed with every key material failure.
pub const KEYGEN_HINT: &str = "generate issuer key material with:
  openssl genrsa -out private_key.pem 2048
  openssl req -new -x509 -key private_key.pem -out certificate.pem -days 7300 -subj \"/CN=licensor\"";

/// Where the issuer's key material and plan live.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    pub private_key: PathBuf,
    pub certificate: PathBuf,
    pub validity_years: u32,
    /// JSON plan file; the built-in plan when absent.
    pub plan: Option<PathBuf>,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            private_key: PathBuf::from("private_key.pem"),
            certificate: PathBuf::from("certificate.pem"),
            validity_years: DEFAULT_VALIDITY_YEARS,
            plan: None,
        }
    }
}

/// Loads key material and plan into an issuer.
///
/// Any failure here is fatal for the server.
pub fn load_issuer(config: &IssuerConfig) -> Result<IssuerContext> {
    let private_key = read_key_file(&config.private_key, "issuer private key")?;
    let certificate = read_key_file(&config.certificate, "issuer certificate")?;

    let plan = match &config.plan {
        Some(path) => load_plan(path)?,
        None => EntitlementPlan::default(),
    };

    let policy = IssuancePolicy {
        validity_years: config.validity_years,
        plan,
        ..IssuancePolicy::default()
    };

    policy
        .validate()
        .with_context(|| format!("invalid validity window of {} years", config.validity_years))?;

    IssuerContext::from_pem(&private_key, &certificate, policy).with_context(|| {
        format!(
            "failed to load key material from {} and {}\n{KEYGEN_HINT}",
            config.private_key.display(),
            config.certificate.display()
        )
    })
}

fn load_plan(path: &Path) -> Result<EntitlementPlan> {
    info!("Loading entitlement plan from {:?}", path);
    let bytes =
        fs::read(path).with_context(|| format!("failed to read plan file {}", path.display()))?;
    EntitlementPlan::from_json(&bytes)
        .with_context(|| format!("failed to parse plan file {}", path.display()))
}

fn read_key_file(path: &Path, what: &str) -> Result<String> {
    info!("Loading {} from {:?}", what, path);
    fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} from {}\n{KEYGEN_HINT}", path.display()))
}
