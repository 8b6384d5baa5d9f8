use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod password;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn token_round_trips_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "a@b.test".into(), "student".into(), 1);
        let token = generate_jwt(&claims, SECRET).unwrap();

        let decoded = decode_jwt(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.email, "a@b.test");
        assert_eq!(decoded.role, "student");
    }

    #[test]
    fn empty_secret_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.test".into(), "student".into(), 1);
        assert!(matches!(
            generate_jwt(&claims, ""),
            Err(JwtError::InvalidSecret)
        ));
        assert!(matches!(decode_jwt("x.y.z", ""), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn expired_token_fails_validation() {
        let mut claims = Claims::new(Uuid::new_v4(), "a@b.test".into(), "admin".into(), 1);
        // Two hours in the past, beyond the default validation leeway
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = generate_jwt(&claims, SECRET).unwrap();

        assert!(matches!(
            decode_jwt(&token, SECRET),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.test".into(), "admin".into(), 1);
        let token = generate_jwt(&claims, SECRET).unwrap();

        assert!(decode_jwt(&token, "other-secret").is_err());
    }
}
