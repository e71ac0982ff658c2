use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse,
    validate_login_request,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new account",
    description = "Creates a `member` account. Usernames are 1-32 letters, digits or underscores; emails are unique and case-insensitive; passwords are 8-128 characters.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username or email already taken (USERNAME_TAKEN, EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = payload.validate()?;

    let clash = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(account.username.as_str()))
                .add(user::Column::Email.eq(account.email.as_str())),
        )
        .one(&state.db)
        .await?;
    if let Some(existing) = clash {
        return Err(if existing.username == account.username {
            AppError::UsernameTaken
        } else {
            AppError::EmailTaken
        });
    }

    let password = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let user = user::ActiveModel {
        username: Set(account.username),
        email: Set(account.email),
        password: Set(password),
        role: Set(user::DEFAULT_ROLE.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(registration_conflict)?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
}

fn password_matches(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    hash::verify_password(password, stored_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))
}

/// A concurrent registration can still win between the lookup and the insert.
fn registration_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("Registration race caught by unique constraint: {}", detail);
            if detail.contains("email") {
                AppError::EmailTaken
            } else {
                AppError::UsernameTaken
            }
        }
        _ => AppError::from(err),
    }
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Exchange credentials for a bearer token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong username or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let account = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.trim()))
        .one(&state.db)
        .await?;

    // Unknown users and wrong passwords are indistinguishable to the caller.
    let user = match account {
        Some(user) if password_matches(&payload.password, &user.password)? => user,
        _ => return Err(AppError::InvalidCredentials),
    };

    let auth = &state.config.auth;
    let token = jwt::sign(
        user.id,
        &user.username,
        &user.role,
        &auth.jwt_secret,
        auth.token_ttl_secs,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        role: user.role,
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user",
    responses(
        (status = 200, description = "Authenticated user", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.user_id,
        username: auth_user.username,
        role: auth_user.role,
    })
}
