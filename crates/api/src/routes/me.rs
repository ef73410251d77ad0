//! Profile routes for the authenticated user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;
use tracing::{error, info};

use crate::routes::valid_currency;
use crate::{AppState, middleware::AuthUser};
use plata_db::UserRepository;
use plata_shared::auth::{UpdateProfileRequest, UserInfo};

/// Creates the profile routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile))
        .route("/me", put(update_profile))
}

/// GET `/me` - Fetch the authenticated user's profile.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(UserInfo {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
                currency: user.currency,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "USER_NOT_FOUND",
                "message": "User no longer exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load profile");
            crate::routes::internal_error()
        }
    }
}

/// PUT `/me` - Update the authenticated user's profile.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    if let Some(name) = &payload.full_name {
        if name.trim().is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "EMPTY_NAME",
                    "message": "Full name cannot be empty"
                })),
            )
                .into_response();
        }
    }
    if let Some(currency) = &payload.currency {
        if !valid_currency(currency) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "INVALID_CURRENCY",
                    "message": "Currency must be a three-letter ISO 4217 code"
                })),
            )
                .into_response();
        }
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo
        .update_profile(
            auth.user_id(),
            payload.full_name.as_deref(),
            payload.currency.as_deref(),
        )
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "Profile updated");
            (
                StatusCode::OK,
                Json(UserInfo {
                    id: user.id,
                    email: user.email,
                    full_name: user.full_name,
                    currency: user.currency,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update profile");
            crate::routes::internal_error()
        }
    }
}
