use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use filmtweet_common::Identity;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::{jwt, permission::permissions_for_role};

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication, or take
/// `Option<AuthUser>` to let the handler decide what a missing identity means.
/// Permission checks happen via `require_permission()` in the handler body.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl AuthUser {
    /// Returns `Ok(())` if the user has the given permission, `Err(PermissionDenied)` otherwise.
    pub fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.permissions.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "Missing permission: {permission}"
            )))
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.username.clone())
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    let claims = jwt::verify(token, &state.config.auth.jwt_secret)
        .map_err(|_| AppError::TokenInvalid)?;

    Ok(AuthUser {
        user_id: claims.uid,
        username: claims.sub,
        permissions: permissions_for_role(&claims.role),
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)
    }
}

/// A missing or unverifiable token yields `None`.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let user = authenticate(parts, state);
        if let Err(ref e) = user {
            tracing::debug!("Proceeding without identity: {:?}", e);
        }
        Ok(user.ok())
    }
}
