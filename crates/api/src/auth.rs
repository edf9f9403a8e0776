//! Bearer token signing and verification.

use chrono::{Duration, Utc};
use galerie_common::{AppError, AppResult};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Must equal the user's current token version.
    pub auth_token_version: i32,
    /// Expiration timestamp.
    pub exp: usize,
}

/// Sign a token for a user.
pub fn sign(
    secret: &[u8],
    user_id: &str,
    auth_token_version: i32,
    ttl: Duration,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal("token expiration overflow".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_owned(),
        auth_token_version,
        exp: expiration as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
}

/// Verify and decode a token.
pub fn verify(secret: &[u8], token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}
