use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Issuer written into and required from every token.
pub const ISSUER: &str = "filmtweet:api";

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: i32,    // User ID
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a new HS256 token for a user, valid for `ttl_secs`.
pub fn sign(
    user_id: i32,
    username: &str,
    role: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String> {
    let now = Utc::now().timestamp();
    let ttl = i64::try_from(ttl_secs).context("token lifetime out of range")?;

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        role: role.to_owned(),
        iss: ISSUER.to_owned(),
        iat: now,
        exp: now.checked_add(ttl).context("token expiry overflow")?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify signature, expiry and issuer, then decode the claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
