//! Webhook signature verification.
//!
//! GitHub-style signing: the sender puts `sha256=<hex HMAC-SHA256 of the raw
//! body>` in the `X-Hub-Signature-256` header, keyed with the shared secret.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Required prefix of the header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a webhook signature header against the raw request body.
///
/// Returns `false` for a missing header, a missing `sha256=` prefix, a hex
/// payload that does not decode, or a digest mismatch. The caller gets no
/// distinction between these cases; the specific reason is only logged here,
/// so a probing sender cannot tell how close a forged signature came.
///
/// The digest comparison runs in constant time (`Mac::verify_slice`, backed
/// by `subtle`), so timing does not leak the position of the first differing
/// byte. A wrong-length digest is unequal without a timing-observable early
/// exit.
pub fn verify_signature(header: Option<&str>, body: &[u8], secret: &[u8]) -> bool {
    let Some(header) = header else {
        warn!("signature_header_missing");
        return false;
    };

    let Some(sig_hex) = header.strip_prefix(SIGNATURE_PREFIX) else {
        warn!("signature_prefix_missing");
        return false;
    };

    let sig = match hex::decode(sig_hex) {
        Ok(v) => v,
        Err(_) => {
            warn!("signature_hex_invalid");
            return false;
        }
    };

    // HMAC accepts keys of any length, so this only fails on an empty/broken
    // Mac construction, which we still refuse to treat as verified.
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => {
            warn!("signature_key_invalid");
            return false;
        }
    };

    mac.update(body);

    let valid = mac.verify_slice(&sig).is_ok();
    if !valid {
        warn!("signature_mismatch");
    }
    valid
}

/// Compute the signature header value for `body` under `secret`.
///
/// What a well-behaved sender would put in `X-Hub-Signature-256`; used by
/// tests and handy for local curl checks.
pub fn sign(body: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"s3cr3t";
    const BODY: &[u8] = br#"{"ok":true}"#;

    #[test]
    fn test_verify_valid_signature() {
        let header = sign(BODY, SECRET);
        assert!(verify_signature(Some(&header), BODY, SECRET));
    }

    #[test]
    fn test_verify_missing_header() {
        assert!(!verify_signature(None, BODY, SECRET));
    }

    #[test]
    fn test_verify_missing_prefix() {
        // Correct digest, but without the required "sha256=" prefix
        let header = sign(BODY, SECRET);
        let bare = header.strip_prefix(SIGNATURE_PREFIX).unwrap();
        assert!(!verify_signature(Some(bare), BODY, SECRET));

        assert!(!verify_signature(Some("sha1=abcdef"), BODY, SECRET));
    }

    #[test]
    fn test_verify_invalid_hex() {
        assert!(!verify_signature(Some("sha256=not-hex!"), BODY, SECRET));
        // Odd number of hex digits
        assert!(!verify_signature(Some("sha256=abc"), BODY, SECRET));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let header = sign(BODY, b"wrong");
        assert!(!verify_signature(Some(&header), BODY, SECRET));
    }

    #[test]
    fn test_verify_wrong_body() {
        let header = sign(b"other body", SECRET);
        assert!(!verify_signature(Some(&header), BODY, SECRET));
    }

    #[test]
    fn test_verify_bit_flip() {
        // Flipping any single bit of the digest must fail verification
        let header = sign(BODY, SECRET);
        let digest = hex::decode(header.strip_prefix(SIGNATURE_PREFIX).unwrap()).unwrap();

        for byte in 0..digest.len() {
            for bit in 0..8 {
                let mut corrupt = digest.clone();
                corrupt[byte] ^= 1 << bit;
                let forged = format!("{}{}", SIGNATURE_PREFIX, hex::encode(&corrupt));
                assert!(
                    !verify_signature(Some(&forged), BODY, SECRET),
                    "bit {bit} of byte {byte} flipped but signature verified"
                );
            }
        }
    }

    #[test]
    fn test_verify_truncated_digest() {
        let header = sign(BODY, SECRET);
        let truncated = &header[..header.len() - 2];
        assert!(!verify_signature(Some(truncated), BODY, SECRET));
    }
}
