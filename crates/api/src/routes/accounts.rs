//! Account management routes.

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
use plata_core::ledger::{AccountUpdate, NewAccount};
use plata_shared::types::{AccountId, UserId};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", put(update_account))
        .route("/accounts/{id}", delete(delete_account))
}

/// GET `/accounts` - List the user's accounts with live balances.
async fn list_accounts(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    (StatusCode::OK, Json(json!({ "accounts": ledger.accounts() }))).into_response()
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewAccount>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let account = match ledger.create_account(payload) {
        Ok(a) => a,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).insert_account(&account).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist account");
        return internal_error();
    }

    info!(user_id = %user_id, account_id = %account.id, "Account created");

    (StatusCode::CREATED, Json(account)).into_response()
}

/// PUT `/accounts/{id}` - Update an account's descriptive fields.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<AccountId>,
    Json(payload): Json<AccountUpdate>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let account = match ledger.update_account(account_id, payload) {
        Ok(a) => a,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).update_account(&account).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist account update");
        return internal_error();
    }

    info!(user_id = %user_id, account_id = %account.id, "Account updated");

    (StatusCode::OK, Json(account)).into_response()
}

/// DELETE `/accounts/{id}` - Delete an account with no transaction history.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    if let Err(e) = ledger.delete_account(account_id) {
        return ledger_error_response(&e);
    }

    if let Err(e) = finance_repo(&state).delete_account(account_id).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist account deletion");
        return internal_error();
    }

    info!(user_id = %user_id, account_id = %account_id, "Account deleted");

    (StatusCode::NO_CONTENT, ()).into_response()
}
