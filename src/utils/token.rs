use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

/// Verification links are issued with a 24-hour expiry window.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Opaque verification token: 32 random bytes, hex-encoded.
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn token_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::hours(TOKEN_TTL_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_hex_chars() {
        let token = generate_verification_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_verification_token(), generate_verification_token());
    }

    #[test]
    fn expiry_is_about_24_hours_out() {
        let expiry = token_expiry();
        let delta = expiry - Utc::now();
        assert!(delta > Duration::hours(23) && delta <= Duration::hours(24));
    }
}
