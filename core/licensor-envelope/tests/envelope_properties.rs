//! Property-based tests for envelopes.

mod common;

use common::{consumer, issued_at, issuer};
use licensor_envelope::{LicenseError, RenewalRequest};
use proptest::prelude::*;

proptest! {
    // Each case does two RSA private operations.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn arbitrary_request_fields_round_trip(
        consumer_id in ".{0,40}",
        renewal_token in ".{0,40}",
        device_fingerprint in "[ -~]{0,64}",
    ) {
        let request = RenewalRequest::new(
            consumer_id.clone(),
            renewal_token.clone(),
            device_fingerprint.clone(),
        );
        let issued = issuer().issue_at(&request, issued_at()).unwrap();

        prop_assert_eq!(issued.envelope.lines().count(), 3);
        prop_assert_eq!(common::segments(&issued.envelope).len(), 3);

        let document = consumer().consume_at(&issued.envelope, issued_at()).unwrap();
        prop_assert_eq!(document.consumer_id, consumer_id);
        prop_assert_eq!(document.renewal_token, renewal_token);
        prop_assert_eq!(document.device_fingerprint, device_fingerprint);
    }

    #[test]
    fn any_single_character_edit_is_rejected(position in any::<prop::sample::Index>()) {
        let envelope = issuer()
            .issue_at(&common::request(), issued_at())
            .unwrap()
            .envelope;
        let body = envelope.lines().nth(1).unwrap();
        let index = position.index(body.len());
        let original = body.as_bytes()[index];
        let replacement = if original == b'A' { 'B' } else { 'A' };

        let mut edited = body.to_string();
        edited.replace_range(index..=index, &replacement.to_string());
        let text = envelope.replace(body, &edited);

        let err = consumer().consume_at(&text, issued_at()).unwrap_err();
        prop_assert!(err.is_envelope_rejection(), "{:?}", err);
        prop_assert!(!matches!(err, LicenseError::ExpiredDocument(_)));
    }
}
