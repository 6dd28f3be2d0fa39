use licensor_crypto::CryptoError;

#[test]
fn error_display_key_material() {
    let err = CryptoError::KeyMaterial("bad pem".into());
    assert!(format!("{err}").contains("invalid key material"));
    assert!(format!("{err}").contains("bad pem"));
}

#[test]
fn error_display_encryption() {
    let err = CryptoError::Encryption("oops".into());
    assert!(format!("{err}").contains("encryption failed"));
}

#[test]
fn error_display_decryption_has_no_detail() {
    let err = CryptoError::DecryptionFailed;
    assert_eq!(format!("{err}"), "decryption failed");
}

#[test]
fn error_display_key_unwrap() {
    let err = CryptoError::KeyUnwrapFailed;
    assert_eq!(format!("{err}"), "key unwrap failed");
}

#[test]
fn error_display_key_too_large() {
    let err = CryptoError::KeyTooLarge { max: 245, actual: 300 };
    let msg = format!("{err}");
    assert!(msg.contains("245"));
    assert!(msg.contains("300"));
}

#[test]
fn error_display_invalid_signature_input() {
    let err = CryptoError::InvalidSignatureInput("short".into());
    assert!(format!("{err}").contains("invalid signature input"));
}

#[test]
fn error_display_invalid_key_length() {
    let err = CryptoError::InvalidKeyLength {
        expected: 32,
        actual: 16,
    };
    let msg = format!("{err}");
    assert!(msg.contains("32"));
    assert!(msg.contains("16"));
}

#[test]
fn error_is_debug() {
    let err = CryptoError::Signing("test".into());
    let _ = format!("{err:?}");
}
