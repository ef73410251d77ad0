//! Category management routes.
//!
//! Listings include the global defaults alongside the user's own
//! categories; only the latter can be changed.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;
use tracing::{error, info};

use crate::routes::{finance_repo, internal_error, ledger_error_response, user_ledger};
use crate::{AppState, middleware::AuthUser};
use plata_core::ledger::{CategoryUpdate, NewCategory};
use plata_shared::types::{CategoryId, UserId};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(update_category))
        .route("/categories/{id}", delete(delete_category))
}

/// GET `/categories` - List default and user categories.
async fn list_categories(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    (
        StatusCode::OK,
        Json(json!({ "categories": ledger.categories() })),
    )
        .into_response()
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewCategory>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let category = match ledger.create_category(payload) {
        Ok(c) => c,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).insert_category(&category).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist category");
        return internal_error();
    }

    info!(user_id = %user_id, category_id = %category.id, "Category created");

    (StatusCode::CREATED, Json(category)).into_response()
}

/// PUT `/categories/{id}` - Update one of the user's own categories.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<CategoryId>,
    Json(payload): Json<CategoryUpdate>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let category = match ledger.update_category(category_id, payload) {
        Ok(c) => c,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).update_category(&category).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist category update");
        return internal_error();
    }

    info!(user_id = %user_id, category_id = %category.id, "Category updated");

    (StatusCode::OK, Json(category)).into_response()
}

/// DELETE `/categories/{id}` - Delete an unused user category.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<CategoryId>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    if let Err(e) = ledger.delete_category(category_id) {
        return ledger_error_response(&e);
    }

    if let Err(e) = finance_repo(&state).delete_category(category_id).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist category deletion");
        return internal_error();
    }

    info!(user_id = %user_id, category_id = %category_id, "Category deleted");

    (StatusCode::NO_CONTENT, ()).into_response()
}
