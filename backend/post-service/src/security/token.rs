/// Access tokens for post-service
///
/// Tokens are HS256-signed JWTs whose `sub` claim is the numeric user id.
/// The signing secret comes from configuration; there is no built-in key.
use crate::error::{AppError, Result};
use crate::models::UserIdentity;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims issued by this service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as decimal string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub username: String,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue an access token for `user`
    pub fn issue(&self, user: &UserIdentity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            username: user.username.clone(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Validate `token` and return the user id it was issued for
    pub fn validate(&self, token: &str) -> Result<i64> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(JWT_ALGORITHM))
            .map_err(|e| AppError::Unauthorized(format!("Invalid or expired token: {}", e)))?;

        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid user ID".to_string()))
    }
}
