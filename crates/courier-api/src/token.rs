//! Signed bearer tokens: minting at login, verification on every request.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use courier_types::api::Claims;

pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Clock skew tolerated on `exp` / `nbf`.
pub const LEEWAY_SECS: u64 = 60;

/// Keys and validation rules derived once from the configured secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Any HMAC variant is fine; everything else (RS*, ES*, none) is refused.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = LEEWAY_SECS;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        // `exp` is enforced when present, not required.
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, user_id: &str, email: &str) -> Result<String> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, email: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            user_id: Some(user_id.to_string()),
            email: Some(email.to_string()),
            iat: Some(now.timestamp()),
            exp: Some((now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}
