use std::fs;

use licensor_envelope::ConsumerContext;
use licensor_server::{load_issuer, IssuerConfig, KEYGEN_HINT};
use tempfile::TempDir;

const ISSUER_KEY_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/issuer_key.pem"));
const ISSUER_CERT_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/issuer_cert.pem"));
const OTHER_CERT_PEM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/other_cert.pem"));

fn key_dir(certificate_pem: &str) -> (TempDir, IssuerConfig) {
    let dir = TempDir::new().unwrap();
    let private_key = dir.path().join("private_key.pem");
    let certificate = dir.path().join("certificate.pem");
    fs::write(&private_key, ISSUER_KEY_PEM).unwrap();
    fs::write(&certificate, certificate_pem).unwrap();

    let config = IssuerConfig {
        private_key,
        certificate,
        ..IssuerConfig::default()
    };
    (dir, config)
}

#[test]
fn loads_issuer_from_files() {
    let (_dir, config) = key_dir(ISSUER_CERT_PEM);

    let issuer = load_issuer(&config).unwrap();
    assert_eq!(issuer.certificate_pem(), ISSUER_CERT_PEM);
    assert_eq!(issuer.policy().validity_years, 20);
}

#[test]
fn missing_key_file_names_path_and_suggests_openssl() {
    let dir = TempDir::new().unwrap();
    let config = IssuerConfig {
        private_key: dir.path().join("absent.pem"),
        certificate: dir.path().join("certificate.pem"),
        ..IssuerConfig::default()
    };

    let err = format!("{:#}", load_issuer(&config).unwrap_err());
    assert!(err.contains("absent.pem"));
    assert!(err.contains(KEYGEN_HINT));
}

#[test]
fn mismatched_certificate_is_fatal() {
    let (_dir, config) = key_dir(OTHER_CERT_PEM);

    let err = format!("{:#}", load_issuer(&config).unwrap_err());
    assert!(err.contains("does not match"));
    assert!(err.contains("openssl genrsa"));
}

#[test]
fn plan_file_replaces_default_plan() {
    let (dir, mut config) = key_dir(ISSUER_CERT_PEM);
    let plan = dir.path().join("plan.json");
    fs::write(
        &plan,
        r#"{
            "productId": "00000000-0000-0000-0000-000000000042",
            "features": { "planName": "Community", "quota:seats": 3 }
        }"#,
    )
    .unwrap();
    config.plan = Some(plan);
    config.validity_years = 2;

    let issuer = load_issuer(&config).unwrap();
    let issued = issuer.issue(&Default::default()).unwrap();
    let document = ConsumerContext::from_pem(ISSUER_CERT_PEM)
        .unwrap()
        .consume(&issued.envelope)
        .unwrap();

    let entitlement = &document.entitlements[0];
    assert_eq!(entitlement.product_id.as_u128(), 0x42);
    assert_eq!(
        entitlement.feature("quota:seats").and_then(|v| v.as_i64()),
        Some(3)
    );
    assert_eq!(
        (document.expires_at - document.issued_at).num_days() / 365,
        2
    );
}

#[test]
fn malformed_plan_file_is_fatal() {
    let (dir, mut config) = key_dir(ISSUER_CERT_PEM);
    let plan = dir.path().join("plan.json");
    fs::write(&plan, "{}").unwrap();
    config.plan = Some(plan);

    let err = format!("{:#}", load_issuer(&config).unwrap_err());
    assert!(err.contains("plan.json"));
}

#[test]
fn validity_window_past_year_9999_is_fatal() {
    let (_dir, mut config) = key_dir(ISSUER_CERT_PEM);
    config.validity_years = 8000;

    let err = format!("{:#}", load_issuer(&config).unwrap_err());
    assert!(err.contains("8000 years"));
    assert!(err.contains("9999"));
}

#[test]
fn overflowing_validity_window_is_fatal() {
    let (_dir, mut config) = key_dir(ISSUER_CERT_PEM);
    config.validity_years = u32::MAX;

    assert!(load_issuer(&config).is_err());
}
