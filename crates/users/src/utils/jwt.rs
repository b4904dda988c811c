//! Session tokens: HS256 JWTs carried in the session cookie.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use circle_config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::{UserError, UserResult};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Public id of the user
    pub sub: String,
    pub exp: u64,
    pub iat: u64,
    pub nbf: u64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    token_duration: Duration,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_duration", &self.token_duration)
            .finish_non_exhaustive()
    }
}

impl SessionIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
            token_duration: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Build from configuration. Fails when no secret is configured.
    pub fn from_config(config: &AuthConfig) -> UserResult<Self> {
        let secret = config
            .token_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| {
                UserError::TokenCreationFailed("auth.token_secret is not configured".to_string())
            })?;

        Ok(Self::new(secret, config.issuer.clone(), config.audience.clone())
            .with_duration(Duration::from_secs(config.session_ttl_seconds)))
    }

    /// Set custom token duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.token_duration = duration;
        self
    }

    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    /// Sign a token for the given user public id
    pub fn issue(&self, subject: &str) -> UserResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| UserError::TokenCreationFailed("System time error".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            exp: now.as_secs().saturating_add(self.token_duration.as_secs()),
            iat: now.as_secs(),
            nbf: now.as_secs(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| UserError::TokenCreationFailed(err.to_string()))
    }

    /// Validate signature, issuer, audience and expiry, returning the claims
    pub fn validate(&self, token: &str) -> UserResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| UserError::InvalidToken(err.to_string()))
    }
}
