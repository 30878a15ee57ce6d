use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: usize,
}

/// Signs and checks the session tokens handed out at login.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::TimeDelta,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Fails when `ttl_hours` does not fit in a duration.
    pub fn new(secret: &SecretString, ttl_hours: i64) -> anyhow::Result<Self> {
        let ttl = chrono::TimeDelta::try_hours(ttl_hours)
            .ok_or_else(|| anyhow::anyhow!("session ttl of {} hours is out of range", ttl_hours))?;
        let secret = secret.expose_secret().as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let expires_at = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| {
                tracing::error!("Session expiry overflows with ttl {:?}", self.ttl);
                AuthError::TokenCreation
            })?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!("JWT encoding failed: {:?}", e);
            AuthError::TokenCreation
        })
    }

    /// The user id carried by a still-valid token.
    pub fn verify(&self, token: &str) -> Option<String> {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                tracing::debug!("Rejected session token: {:?}", e);
                None
            }
        }
    }
}
