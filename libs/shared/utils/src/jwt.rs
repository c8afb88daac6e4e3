use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;
use shared_models::auth::JwtClaims;

/// Reads the claims of a provider-issued access token.
///
/// The signature is not checked. Only use this on tokens the auth provider issued to us.
pub fn decode_claims(token: &str) -> Result<JwtClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(e) => {
            debug!("Failed to decode claims: {}", e);
            return Err("Invalid claims encoding".to_string());
        }
    };

    serde_json::from_str(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        "Invalid claims format".to_string()
    })
}

/// Expiry instant carried by the token, if any.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    decode_claims(token)
        .ok()
        .and_then(|claims| claims.exp)
        .and_then(|exp| Utc.timestamp_opt(exp as i64, 0).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::JwtTestUtils;

    #[test]
    fn test_decode_claims_roundtrip_of_test_token() {
        let token = JwtTestUtils::create_anonymous_token("user-1", 3600);
        let claims = decode_claims(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.is_anonymous, Some(true));
        assert!(claims.exp.is_some());
    }

    #[test]
    fn test_token_expiry() {
        let token = JwtTestUtils::create_anonymous_token("user-1", 3600);
        let expiry = token_expiry(&token).unwrap();
        let remaining = (expiry - Utc::now()).num_seconds();

        assert!(remaining > 3500 && remaining <= 3600);
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(decode_claims("not-a-jwt").unwrap_err(), "Invalid token format");
        assert_eq!(decode_claims("a.!!!.c").unwrap_err(), "Invalid claims encoding");
        assert!(token_expiry("a.b").is_none());
    }
}
