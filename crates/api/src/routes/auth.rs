//! Authentication routes: login, register, token refresh, logout, and
//! password recovery.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::IntoResponse,
    routing::post,
};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use crate::routes::valid_currency;
use plata_core::auth::{hash_password, verify_password};
use plata_db::{PasswordResetRepository, SessionRepository, UserRepository};
use plata_shared::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest,
    RegisterRequest, ResetPasswordRequest, UserInfo,
};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
}

/// POST /auth/login - Authenticate user and return tokens.
#[allow(clippy::too_many_lines)]
async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by email
    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "INVALID_CREDENTIALS",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    // Check if user is active
    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "ACCOUNT_DISABLED",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "INVALID_CREDENTIALS",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    }

    // Generate tokens and open a refresh session
    let tokens = match issue_tokens(&state, user.id, &headers, addr).await {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(user_id = %user.id, "User logged in successfully");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            currency: user.currency,
        },
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/register - Register a new user and return tokens.
#[allow(clippy::too_many_lines)]
async fn register(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.password.len() < MIN_PASSWORD_LEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "PASSWORD_TOO_SHORT",
                "message": "Password must be at least 8 characters"
            })),
        )
            .into_response();
    }
    if !valid_currency(&payload.currency) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_CURRENCY",
                "message": "Currency must be a three-letter ISO 4217 code"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    // Check if email already exists
    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "EMAIL_EXISTS",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    // Create user
    let user = match user_repo
        .create(
            &payload.email,
            &password_hash,
            &payload.full_name,
            &payload.currency,
        )
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    let tokens = match issue_tokens(&state, user.id, &headers, addr).await {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(user_id = %user.id, email = %user.email, "New user registered");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            currency: user.currency,
        },
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
    };

    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /auth/refresh - Rotate the refresh session and return new tokens.
async fn refresh(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // Validate refresh token signature and expiry
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            let (error, message) = match e {
                plata_shared::JwtError::Expired => ("TOKEN_EXPIRED", "Refresh token has expired"),
                _ => ("INVALID_TOKEN", "Invalid refresh token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response();
        }
    };

    // The token must also name a live session; a revoked one cannot be reused
    let session_repo = SessionRepository::new((*state.db).clone());
    match session_repo.revoke_by_token(&payload.refresh_token).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(user_id = %claims.user_id(), "Refresh attempt with revoked or unknown session");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "INVALID_TOKEN",
                    "message": "Refresh session is no longer valid"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during token refresh"
                })),
            )
                .into_response();
        }
    }

    let tokens = match issue_tokens(&state, claims.user_id(), &headers, addr).await {
        Ok(t) => t,
        Err(response) => return response,
    };

    (
        StatusCode::OK,
        Json(json!({
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
            "expires_in": tokens.expires_in
        })),
    )
        .into_response()
}

/// POST /auth/logout - Revoke the refresh session.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.revoke_by_token(&payload.refresh_token).await {
        Ok(revoked) => {
            if !revoked {
                info!("Logout with unknown or already revoked session");
            }
            (
                StatusCode::OK,
                Json(json!({ "message": "Logged out successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error during logout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during logout"
                })),
            )
                .into_response()
        }
    }
}

/// POST /auth/forgot-password - Send a reset link when the account exists.
///
/// Always answers 200 so the endpoint cannot be used to probe which
/// emails are registered.
async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> impl IntoResponse {
    let accepted = (
        StatusCode::OK,
        Json(json!({
            "message": "If that email is registered, a reset link has been sent"
        })),
    )
        .into_response();

    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) if u.is_active => u,
        Ok(_) => {
            info!(email = %payload.email, "Password reset requested for unknown or inactive account");
            return accepted;
        }
        Err(e) => {
            error!(error = %e, "Database error during password reset request");
            return accepted;
        }
    };

    let reset_repo = PasswordResetRepository::new((*state.db).clone());

    // Only the newest token stays redeemable
    if let Err(e) = reset_repo.invalidate_user_tokens(user.id).await {
        error!(error = %e, user_id = %user.id, "Failed to invalidate previous reset tokens");
    }

    let token = match reset_repo.create_token(user.id).await {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "Failed to create password reset token");
            return accepted;
        }
    };

    if let Err(e) = state
        .email_service
        .send_password_reset_email(&user.email, &user.full_name, &token)
        .await
    {
        error!(error = %e, user_id = %user.id, "Failed to send password reset email");
        return accepted;
    }

    info!(user_id = %user.id, "Password reset email sent");
    accepted
}

/// POST /auth/reset-password - Set a new password using a reset token.
async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> impl IntoResponse {
    if payload.new_password.len() < MIN_PASSWORD_LEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "PASSWORD_TOO_SHORT",
                "message": "Password must be at least 8 characters"
            })),
        )
            .into_response();
    }

    let reset_repo = PasswordResetRepository::new((*state.db).clone());
    let reset = match reset_repo.find_valid(&payload.token).await {
        Ok(Some(r)) => r,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "INVALID_RESET_TOKEN",
                    "message": "Reset token is invalid, used, or expired"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during password reset");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during password reset"
                })),
            )
                .into_response();
        }
    };

    let password_hash = match hash_password(&payload.new_password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during password reset"
                })),
            )
                .into_response();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    if let Err(e) = user_repo.set_password(reset.user_id, &password_hash).await {
        error!(error = %e, user_id = %reset.user_id, "Failed to update password");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "INTERNAL_ERROR",
                "message": "An error occurred during password reset"
            })),
        )
            .into_response();
    }

    if let Err(e) = reset_repo.mark_used(reset.id).await {
        error!(error = %e, "Failed to mark reset token as used");
    }

    // Every open session dies with the old password
    let session_repo = SessionRepository::new((*state.db).clone());
    if let Err(e) = session_repo.revoke_all_for_user(reset.user_id).await {
        error!(error = %e, user_id = %reset.user_id, "Failed to revoke sessions after password reset");
    }

    info!(user_id = %reset.user_id, "Password reset completed");

    (
        StatusCode::OK,
        Json(json!({ "message": "Password updated successfully" })),
    )
        .into_response()
}

/// A freshly issued token pair plus the access-token TTL.
struct IssuedTokens {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

/// Generates an access/refresh pair and records the refresh session.
async fn issue_tokens(
    state: &AppState,
    user_id: uuid::Uuid,
    headers: &HeaderMap,
    addr: SocketAddr,
) -> Result<IssuedTokens, axum::response::Response> {
    let internal = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "INTERNAL_ERROR",
                "message": "An error occurred while issuing tokens"
            })),
        )
            .into_response()
    };

    let access_token = state.jwt_service.generate_access_token(user_id).map_err(|e| {
        error!(error = %e, "Failed to generate access token");
        internal()
    })?;

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user_id)
        .map_err(|e| {
            error!(error = %e, "Failed to generate refresh token");
            internal()
        })?;

    let user_agent = headers.get(USER_AGENT).and_then(|h| h.to_str().ok());
    let ip_address = addr.ip().to_string();
    let expires_at = Utc::now() + Duration::seconds(state.jwt_service.refresh_token_expires_in());

    let session_repo = SessionRepository::new((*state.db).clone());
    session_repo
        .create(
            user_id,
            &refresh_token,
            expires_at,
            user_agent,
            Some(&ip_address),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create refresh session");
            internal()
        })?;

    Ok(IssuedTokens {
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}
