//! Shared-secret credential with constant-time verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The single password that guards every flash briefing.
///
/// Candidates are compared by HMAC-SHA256 tag using `verify_slice`, so the
/// check takes the same time wherever the first differing byte is and
/// whatever length the candidate has.
#[derive(Clone)]
pub struct SharedSecret {
    secret: Vec<u8>,
    tag: Vec<u8>,
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into().into_bytes();
        let tag = match mac_for(&secret) {
            Some(mut mac) => {
                mac.update(&secret);
                mac.finalize().into_bytes().to_vec()
            }
            None => Vec::new(),
        };
        Self { secret, tag }
    }

    /// Check a supplied credential against the secret.
    pub fn verify(&self, candidate: &str) -> bool {
        let Some(mut mac) = mac_for(&self.secret) else {
            return false;
        };
        mac.update(candidate.as_bytes());
        mac.verify_slice(&self.tag).is_ok()
    }
}

fn mac_for(key: &[u8]) -> Option<HmacSha256> {
    match HmacSha256::new_from_slice(key) {
        Ok(mac) => Some(mac),
        Err(e) => {
            tracing::error!("Failed to create HMAC: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_secret() {
        let secret = SharedSecret::new("secret");
        assert!(secret.verify("secret"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let secret = SharedSecret::new("secret");
        assert!(!secret.verify("Secret"));
        assert!(!secret.verify("secret "));
        assert!(!secret.verify("secre"));
        assert!(!secret.verify(""));
    }

    #[test]
    fn compares_bytes_not_normalized_text() {
        let secret = SharedSecret::new("pässword");
        assert!(secret.verify("pässword"));
        // Decomposed form: same glyphs, different bytes.
        assert!(!secret.verify("pa\u{308}ssword"));
    }

    #[test]
    fn debug_is_redacted() {
        let secret = SharedSecret::new("hunter2");
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }
}
