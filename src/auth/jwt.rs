use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HS512 needs at least 512 bits of key material.
pub const MIN_SECRET_BYTES: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Issues and validates the backend's own bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    /// Builds the service from a base64 configured secret. A missing, undecodable
    /// or too short secret is replaced by a random key that lives as long as the
    /// process, so issued tokens do not survive a restart.
    pub fn from_config(secret: Option<&str>, lifetime: Duration) -> Self {
        let key = match secret.map(|s| STANDARD.decode(s.trim())) {
            Some(Ok(bytes)) if bytes.len() >= MIN_SECRET_BYTES => {
                tracing::info!("JWT secret key loaded from configuration");
                bytes
            }
            Some(Ok(_)) => {
                tracing::warn!(
                    "JWT_SECRET decodes to fewer than {} bytes; using a random per-process key",
                    MIN_SECRET_BYTES
                );
                random_key()
            }
            Some(Err(e)) => {
                tracing::error!("JWT_SECRET is not valid base64 ({}); using a random per-process key", e);
                random_key()
            }
            None => {
                tracing::warn!("JWT_SECRET is not set; using a random per-process key");
                random_key()
            }
        };

        Self::new(&key, lifetime)
    }

    pub fn issue(&self, user_id: &str, role: &str, email: &str, name: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verifies signature and expiry. Every failure is reported the same way.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

fn random_key() -> Vec<u8> {
    let mut key = vec![0u8; MIN_SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&[7u8; MIN_SECRET_BYTES], Duration::hours(1))
    }

    #[test]
    fn test_issued_token_round_trips_claims() {
        let tokens = service();
        let token = tokens.issue("u1", "USER", "a@b.io", "Ada").unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, "USER");
        assert_eq!(claims.email, "a@b.io");
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new(&[7u8; MIN_SECRET_BYTES], Duration::minutes(-5));
        let token = tokens.issue("u1", "USER", "a@b.io", "Ada").unwrap();
        assert!(tokens.validate(&token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let other = TokenService::new(&[9u8; MIN_SECRET_BYTES], Duration::hours(1));
        let token = other.issue("u1", "USER", "a@b.io", "Ada").unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert!(service().validate("not.a.token").is_err());
    }

    #[test]
    fn test_short_secret_falls_back_to_random_key() {
        let short = STANDARD.encode(b"too-short");
        let a = TokenService::from_config(Some(&short), Duration::hours(1));
        let b = TokenService::from_config(Some(&short), Duration::hours(1));

        let token = a.issue("u1", "USER", "a@b.io", "Ada").unwrap();
        assert!(a.validate(&token).is_ok());
        assert!(b.validate(&token).is_err());
    }

    #[test]
    fn test_strong_configured_secret_is_shared_between_instances() {
        let secret = STANDARD.encode([3u8; MIN_SECRET_BYTES]);
        let a = TokenService::from_config(Some(&secret), Duration::hours(1));
        let b = TokenService::from_config(Some(&secret), Duration::hours(1));

        let token = a.issue("u1", "ADMIN", "a@b.io", "Ada").unwrap();
        assert_eq!(b.validate(&token).unwrap().role, "ADMIN");
    }
}
