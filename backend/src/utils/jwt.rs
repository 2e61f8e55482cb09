//! JWT session token utilities.
//!
//! Provides token creation and validation for cookie-based sessions. Tokens
//! are HS256-signed, carry only the user id and an absolute expiry, and are
//! never stored server-side: a token stays valid until it expires or the
//! secret changes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult, TokenError};

/// Upper bound on accepted token length, checked before any decoding.
pub const MAX_TOKEN_LEN: usize = 4096;

/// JWT Claims structure carried inside a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// `None` when the configured lifetime does not fit a time delta.
    expires_in: Option<Duration>,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from a shared secret and token lifetime
    pub fn new(secret: &str, expires_in_seconds: u64) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in: i64::try_from(expires_in_seconds)
                .ok()
                .and_then(Duration::try_seconds),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expires_in_seconds)
    }

    /// Generate a new session token for `user_id`
    pub fn generate_token(&self, user_id: &str) -> ServiceResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = self
            .expires_in
            .and_then(|ttl| now.checked_add_signed(ttl))
            .and_then(|at| DateTime::from_timestamp(at.timestamp(), 0))
            .ok_or_else(|| ServiceError::token_signing("Token expiry out of range"))?;
        let exp = expires_at.timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp as usize,
            iat: now.timestamp() as usize,
        };

        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validate and decode a session token
    ///
    /// The signature is checked before the expiry, so a forged token reports
    /// `InvalidSignature` even when its embedded expiry has passed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Malformed("empty token".to_string()));
        }
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::Malformed(format!(
                "token exceeds {} bytes",
                MAX_TOKEN_LEN
            )));
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)?;

        // jsonwebtoken accepts exp == now; a session ends at its expiry instant.
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> ServiceResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ServiceError::token_signing(e.to_string()))
    }
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        self.exp <= now
    }
}
