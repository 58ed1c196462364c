//! JWT Token Handler
//! Mission: Issue and verify stateless session tokens

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key and 24-hour tokens
    pub fn new(secret: &str) -> Self {
        Self::with_expiration(secret, 24)
    }

    pub fn with_expiration(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_hours,
        }
    }

    /// Generate a JWT token bound to a user's id
    pub fn generate_token(&self, user: &User) -> Result<(String, usize)> {
        let now = Utc::now();
        let ttl = Duration::try_hours(self.expiration_hours)
            .context("Token lifetime out of range")?;
        let expiration = now
            .checked_add_signed(ttl)
            .context("Token expiry out of range")?
            .timestamp() as usize;

        // Already-expired handlers report zero
        let expires_in = usize::try_from(ttl.num_seconds().max(0))
            .context("Token lifetime out of range")?;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        debug!(
            "Generating JWT for user {} ({}), expires in {}h",
            user.email, user.id, self.expiration_hours
        );

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to generate JWT")?;

        Ok((token, expires_in))
    }

    /// Validate a JWT token (signature + expiry) and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid or expired token")?;

        debug!("Validated JWT for user {}", decoded.claims.sub);

        Ok(decoded.claims)
    }
}
