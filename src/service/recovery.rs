//! PIN recovery challenges.
//!
//! A challenge is a `(code, email)` pair held in a private session cookie
//! with its issue time. Challenges are strictly single-use: the cookie is
//! consumed before the submitted code is even compared, and a challenge
//! whose delivery failed is invalidated rather than left pending.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

pub const CHALLENGE_COOKIE: &str = "pin_reset";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub code: String,
    pub email: String,
    pub issued_at: i64,
}

impl Challenge {
    /// New challenge with a uniform random 4-digit code.
    pub fn issue(email: String) -> Self {
        let code = rand::thread_rng().gen_range(1000..=9999).to_string();
        Self {
            code,
            email,
            issued_at: Utc::now().timestamp(),
        }
    }

    pub fn expired(&self, ttl_secs: i64, now: i64) -> bool {
        now - self.issued_at > ttl_secs
    }

    pub fn code_matches(&self, submitted: &str) -> bool {
        bool::from(self.code.as_bytes().ct_eq(submitted.as_bytes()))
    }

    pub fn encode(&self) -> String {
        // Serialization of three plain fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_code_is_four_digits_in_range() {
        for _ in 0..100 {
            let challenge = Challenge::issue("a@b.test".to_string());
            let code: u32 = challenge.code.parse().expect("numeric code");
            assert!((1000..=9999).contains(&code), "code out of range: {code}");
        }
    }

    #[test]
    fn challenge_round_trips_through_the_cookie_encoding() {
        let challenge = Challenge::issue("a@b.test".to_string());
        let decoded = Challenge::decode(&challenge.encode()).expect("decode");
        assert_eq!(decoded, challenge);
    }

    #[test]
    fn tampered_cookie_payloads_decode_to_none() {
        assert_eq!(Challenge::decode(""), None);
        assert_eq!(Challenge::decode("{\"code\":1}"), None);
        assert_eq!(Challenge::decode("not json"), None);
    }

    #[test]
    fn expiry_is_a_strict_ttl() {
        let challenge = Challenge {
            code: "1234".to_string(),
            email: "a@b.test".to_string(),
            issued_at: 1_000,
        };
        assert!(!challenge.expired(600, 1_000));
        assert!(!challenge.expired(600, 1_600));
        assert!(challenge.expired(600, 1_601));
    }

    #[test]
    fn code_comparison_is_exact() {
        let challenge = Challenge {
            code: "1234".to_string(),
            email: "a@b.test".to_string(),
            issued_at: 0,
        };
        assert!(challenge.code_matches("1234"));
        assert!(!challenge.code_matches("1235"));
        assert!(!challenge.code_matches("123"));
        assert!(!challenge.code_matches(""));
    }
}
