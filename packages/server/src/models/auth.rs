use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-32 chars, alphanumeric and underscores).
    #[schema(example = "alice")]
    pub username: String,
    /// Unique contact address. Compared case-insensitively.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

/// Registration input after validation and normalization.
#[derive(Debug, PartialEq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
}

impl RegisterRequest {
    /// Check every field and return the normalized username and email.
    pub fn validate(&self) -> Result<NewAccount, AppError> {
        let username = self.username.trim();
        if username.is_empty() || username.chars().count() > 32 {
            return Err(AppError::Validation(
                "Username must be 1-32 characters".into(),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::Validation(
                "Username must contain only letters, digits, and underscores".into(),
            ));
        }

        let email = self.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(AppError::Validation(
                "Email must be a valid address".into(),
            ));
        }

        let password_len = self.password.chars().count();
        if !(8..=128).contains(&password_len) {
            return Err(AppError::Validation(
                "Password must be 8-128 characters".into(),
            ));
        }

        Ok(NewAccount {
            username: username.to_string(),
            email,
        })
    }
}

/// `local@domain.tld` shape, at most 254 characters, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Successful login response.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// HS256 bearer token. Lifetime is `auth.token_ttl_secs`.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "member")]
    pub role: String,
}

/// Current authenticated user's profile.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "member")]
    pub role: String,
}
