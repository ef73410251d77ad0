//! Budget management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::routes::{finance_repo, internal_error, ledger_error_response, user_ledger};
use crate::{AppState, middleware::AuthUser};
use plata_core::MetricsService;
use plata_core::ledger::{BudgetUpdate, NewBudget};
use plata_shared::types::{BudgetId, UserId};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets))
        .route("/budgets", post(create_budget))
        .route("/budgets/status", get(budget_status))
        .route("/budgets/{id}", put(update_budget))
        .route("/budgets/{id}", delete(delete_budget))
}

/// GET `/budgets` - List the user's budgets.
async fn list_budgets(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    (StatusCode::OK, Json(json!({ "budgets": ledger.budgets() }))).into_response()
}

/// GET `/budgets/status` - Current-period spend against every budget.
async fn budget_status(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let statuses = MetricsService::budget_statuses(&ledger, Utc::now().date_naive());

    (StatusCode::OK, Json(json!({ "budgets": statuses }))).into_response()
}

/// POST `/budgets` - Create a budget for a category.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewBudget>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let budget = match ledger.create_budget(payload) {
        Ok(b) => b,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).insert_budget(&budget).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist budget");
        return internal_error();
    }

    info!(user_id = %user_id, budget_id = %budget.id, "Budget created");

    (StatusCode::CREATED, Json(budget)).into_response()
}

/// PUT `/budgets/{id}` - Update a budget.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<BudgetId>,
    Json(payload): Json<BudgetUpdate>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let budget = match ledger.update_budget(budget_id, payload) {
        Ok(b) => b,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).update_budget(&budget).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist budget update");
        return internal_error();
    }

    info!(user_id = %user_id, budget_id = %budget.id, "Budget updated");

    (StatusCode::OK, Json(budget)).into_response()
}

/// DELETE `/budgets/{id}` - Delete a budget.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<BudgetId>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    if let Err(e) = ledger.delete_budget(budget_id) {
        return ledger_error_response(&e);
    }

    if let Err(e) = finance_repo(&state).delete_budget(budget_id).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist budget deletion");
        return internal_error();
    }

    info!(user_id = %user_id, budget_id = %budget_id, "Budget deleted");

    (StatusCode::NO_CONTENT, ()).into_response()
}
