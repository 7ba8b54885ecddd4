//! Request signing
//!
//! The gateway authenticates token requests and status callbacks with a keyed
//! digest over a canonical field concatenation. The digest is pluggable so
//! tests can substitute a deterministic signer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Produces the signing token for a canonical payload
pub trait Signer: Send + Sync {
    /// Sign the payload, returning the token in the gateway's wire encoding
    fn sign(&self, payload: &[u8]) -> String;
}

/// Production signer: HMAC-SHA256 keyed with the merchant key, base64-encoded
pub struct HmacSha256Signer {
    key: Vec<u8>,
}

impl HmacSha256Signer {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }
}

impl Signer for HmacSha256Signer {
    fn sign(&self, payload: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(payload);
        BASE64.encode(mac.finalize().into_bytes())
    }
}

/// Test double returning a fixed token regardless of input
pub struct FixedSigner(pub &'static str);

impl Signer for FixedSigner {
    fn sign(&self, _payload: &[u8]) -> String {
        self.0.to_string()
    }
}

/// Compare two signatures without leaking the mismatch position through timing
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_known_vector() {
        // RFC 4231 test case 2
        let signer = HmacSha256Signer::new("Jefe".as_bytes().to_vec());
        let token = signer.sign(b"what do ya want for nothing?");
        assert_eq!(token, "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=");
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = HmacSha256Signer::new("merchant-key".as_bytes().to_vec());
        assert_eq!(signer.sign(b"payload"), signer.sign(b"payload"));
        assert_ne!(signer.sign(b"payload"), signer.sign(b"payload2"));
    }

    #[test]
    fn test_different_keys_produce_different_tokens() {
        let a = HmacSha256Signer::new("key-a".as_bytes().to_vec());
        let b = HmacSha256Signer::new("key-b".as_bytes().to_vec());
        assert_ne!(a.sign(b"payload"), b.sign(b"payload"));
    }

    #[test]
    fn test_fixed_signer_ignores_payload() {
        let signer = FixedSigner("tok");
        assert_eq!(signer.sign(b"a"), "tok");
        assert_eq!(signer.sign(b"b"), "tok");
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
