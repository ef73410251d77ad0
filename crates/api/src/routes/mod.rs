//! API route definitions.

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware};
use plata_core::{Ledger, LedgerError};
use plata_db::FinanceRepository;
use plata_shared::types::UserId;

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod goals;
pub mod health;
pub mod me;
pub mod reports;
pub mod transactions;

/// Creates the API router: public routes plus protected routes guarded by
/// the authentication middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(me::routes())
        .merge(accounts::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
        .merge(budgets::routes())
        .merge(goals::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Builds a finance repository over the shared connection pool.
pub(crate) fn finance_repo(state: &AppState) -> FinanceRepository {
    FinanceRepository::new((*state.db).clone())
}

/// Display currencies are three uppercase ASCII letters (ISO 4217).
pub(crate) fn valid_currency(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// Maps a ledger failure to its HTTP response.
pub(crate) fn ledger_error_response(err: &LedgerError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": err.error_code(), "message": err.to_string() })),
    )
        .into_response()
}

/// The catch-all 500 body for storage and other infrastructure failures.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "INTERNAL_ERROR",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// Fetches the caller's ledger session, hydrating it on first access.
pub(crate) async fn user_ledger(
    state: &AppState,
    user_id: UserId,
) -> Result<Arc<Mutex<Ledger>>, Response> {
    let repo = finance_repo(state);
    state.sessions.ledger(&repo, user_id).await.map_err(|e| {
        error!(error = %e, user_id = %user_id, "Failed to load ledger session");
        internal_error()
    })
}
