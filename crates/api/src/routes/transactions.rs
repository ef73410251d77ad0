//! Transaction routes: history, recording, and voiding.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::routes::{finance_repo, internal_error, ledger_error_response, user_ledger};
use crate::{AppState, middleware::AuthUser};
use plata_core::ledger::NewTransaction;
use plata_shared::types::{AccountId, TransactionId, UserId};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{id}/void", post(void_transaction))
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Only transactions touching this account.
    pub account_id: Option<AccountId>,
    /// Start date filter (inclusive, YYYY-MM-DD format).
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive, YYYY-MM-DD format).
    pub to: Option<NaiveDate>,
}

/// GET `/transactions` - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let transactions = ledger.transactions_filtered(query.account_id, query.from, query.to);

    (
        StatusCode::OK,
        Json(json!({ "transactions": transactions })),
    )
        .into_response()
}

/// POST `/transactions` - Record a transaction and apply its balance effects.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewTransaction>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let applied = match ledger.apply(payload) {
        Ok(a) => a,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).record_applied(&applied).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist transaction");
        return internal_error();
    }

    info!(
        user_id = %user_id,
        transaction_id = %applied.transaction.id,
        kind = applied.transaction.kind.type_name(),
        "Transaction recorded"
    );

    (
        StatusCode::CREATED,
        Json(json!({
            "transaction": applied.transaction,
            "accounts": applied.accounts
        })),
    )
        .into_response()
}

/// POST `/transactions/{id}/void` - Void a transaction, reversing its effects.
async fn void_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<TransactionId>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let outcome = match ledger.void(transaction_id) {
        Ok(o) => o,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).record_void(&outcome).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist void");
        return internal_error();
    }

    info!(
        user_id = %user_id,
        transaction_id = %outcome.original.id,
        reversal_id = %outcome.reversal.id,
        "Transaction voided"
    );

    (
        StatusCode::OK,
        Json(json!({
            "original": outcome.original,
            "reversal": outcome.reversal,
            "accounts": outcome.accounts
        })),
    )
        .into_response()
}
