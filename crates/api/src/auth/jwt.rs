//! Bearer access tokens.
//!
//! Tokens are HS256 JWTs carrying [`Claims`]. Only `sub` is trusted by the
//! identity extractor; the role is a snapshot for clients and is re-read from
//! `profiles` on every request.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskboard_core::roles::UserRole;
use taskboard_core::types::DbId;
use taskboard_db::models::profile::Profile;
use uuid::Uuid;

use crate::config::{env_parse, env_required, ConfigError};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Profile id.
    pub sub: DbId,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// `JWT_SECRET` is required; `JWT_ACCESS_EXPIRY_MINS` defaults to 60 and
    /// must be positive.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        let access_token_expiry_mins: i64 = env_parse("JWT_ACCESS_EXPIRY_MINS", "60")?;
        if access_token_expiry_mins <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_EXPIRY_MINS",
                value: access_token_expiry_mins.to_string(),
            });
        }
        Ok(Self {
            secret,
            access_token_expiry_mins,
        })
    }

    /// Lifetime reported to clients as `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Sign a fresh access token for `profile`.
pub fn issue_access_token(
    profile: &Profile,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: profile.id,
        role: profile.role,
        exp: iat + config.expires_in_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key())
}

/// Check signature and expiry, returning the claims.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, &config.decoding_key(), &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
}
