//! # Webhook Signature Verification
//!
//! Stripe signs each webhook with HMAC-SHA256 over `"{timestamp}.{body}"`
//! and sends the result in the `Stripe-Signature` header:
//!
//! ```text
//! Stripe-Signature: t=1492774577,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! Several `v1` entries may be present while a secret is being rolled.

use chrono::Utc;
use hmac::{Hmac, Mac};
use payments_core::{PaymentError, PaymentResult};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

const EXPECTED_SCHEME: &str = "v1";

/// Parsed `Stripe-Signature` header
#[derive(Debug, PartialEq, Eq)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            EXPECTED_SCHEME => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed(
            "Unable to extract timestamp and signatures from header".to_string(),
        )
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found with expected scheme".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn signing_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts keys of any size"));
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Verify `payload` against a `Stripe-Signature` header at time `now`.
///
/// A `tolerance_secs` of zero disables the timestamp check.
pub fn verify_at(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> PaymentResult<()> {
    let parsed = parse_signature_header(header)?;
    let mac = signing_mac(secret, parsed.timestamp, payload);

    let matched = parsed.signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if !matched {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found matching the expected signature for payload. \
             Are you passing the raw request body you received from Stripe?"
                .to_string(),
        ));
    }

    if tolerance_secs > 0 && now - parsed.timestamp > tolerance_secs {
        return Err(PaymentError::WebhookVerificationFailed(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    Ok(())
}

/// Verify `payload` against a `Stripe-Signature` header using the current time
pub fn verify(payload: &[u8], header: &str, secret: &str, tolerance_secs: i64) -> PaymentResult<()> {
    verify_at(payload, header, secret, tolerance_secs, Utc::now().timestamp())
}

/// Build a valid `Stripe-Signature` header for `payload`.
///
/// Used to exercise webhook endpoints without the Stripe CLI.
pub fn sign_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = signing_mac(secret, timestamp, payload).finalize().into_bytes();
    format!("t={},{}={}", timestamp, EXPECTED_SCHEME, hex::encode(signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"charge.succeeded"}"#;
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_parse_signature_header() {
        let header = "t=1234567890,v1=abc123,v1=def456,v0=legacy";
        let parsed = parse_signature_header(header).unwrap();

        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures, vec!["abc123", "def456"]);
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        let err = parse_signature_header("v1=abc").unwrap_err();
        assert!(err.to_string().contains("Unable to extract timestamp"));

        let err = parse_signature_header("t=123,v0=abc").unwrap_err();
        assert!(err.to_string().contains("expected scheme"));
    }

    #[test]
    fn test_signed_header_verifies() {
        let header = sign_header(PAYLOAD, SECRET, NOW);
        assert!(verify_at(PAYLOAD, &header, SECRET, 300, NOW + 10).is_ok());
    }

    #[test]
    fn test_header_format() {
        let header = sign_header(b"{}", SECRET, NOW);
        assert!(header.starts_with("t=1700000000,v1="));

        let (_, signature) = header.split_once("v1=").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_any_rolled_signature_matches() {
        let valid = sign_header(PAYLOAD, SECRET, NOW);
        let (_, good) = valid.split_once("v1=").unwrap();
        let header = format!("t={},v1={},v1={}", NOW, "00".repeat(32), good);

        assert!(verify_at(PAYLOAD, &header, SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let header = sign_header(PAYLOAD, "whsec_other", NOW);
        let err = verify_at(PAYLOAD, &header, SECRET, 300, NOW).unwrap_err();

        assert!(matches!(err, PaymentError::WebhookVerificationFailed(_)));
        assert!(err.to_string().contains("No signatures found matching"));
    }

    #[test]
    fn test_modified_payload_fails() {
        let header = sign_header(PAYLOAD, SECRET, NOW);
        let tampered = br#"{"id":"evt_1","type":"charge.refunded"}"#;

        assert!(verify_at(tampered, &header, SECRET, 300, NOW).is_err());
    }

    #[test]
    fn test_non_hex_signature_fails() {
        let header = format!("t={},v1=not-hex", NOW);
        assert!(verify_at(PAYLOAD, &header, SECRET, 300, NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp_fails() {
        let header = sign_header(PAYLOAD, SECRET, NOW - 600);
        let err = verify_at(PAYLOAD, &header, SECRET, 300, NOW).unwrap_err();

        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_zero_tolerance_skips_timestamp_check() {
        let header = sign_header(PAYLOAD, SECRET, NOW - 86_400);
        assert!(verify_at(PAYLOAD, &header, SECRET, 0, NOW).is_ok());
    }
}
