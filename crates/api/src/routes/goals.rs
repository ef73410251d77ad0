//! Savings goal routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::routes::{finance_repo, internal_error, ledger_error_response, user_ledger};
use crate::{AppState, middleware::AuthUser};
use plata_core::MetricsService;
use plata_core::ledger::{GoalUpdate, NewGoal};
use plata_shared::types::{AccountId, GoalId, Money, UserId};

/// Creates the goal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals))
        .route("/goals", post(create_goal))
        .route("/goals/progress", get(goal_progress))
        .route("/goals/{id}", put(update_goal))
        .route("/goals/{id}", delete(delete_goal))
        .route("/goals/{id}/contribute", post(contribute))
}

/// Request body for a goal contribution.
#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    /// Account the money comes out of.
    pub account_id: AccountId,
    /// Amount to move into the goal.
    pub amount: Money,
}

/// GET `/goals` - List the user's savings goals.
async fn list_goals(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    (StatusCode::OK, Json(json!({ "goals": ledger.goals() }))).into_response()
}

/// GET `/goals/progress` - Funding progress for every goal.
async fn goal_progress(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let progress = MetricsService::goal_progress(&ledger);

    (StatusCode::OK, Json(json!({ "goals": progress }))).into_response()
}

/// POST `/goals` - Create a savings goal.
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewGoal>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let goal = match ledger.create_goal(payload) {
        Ok(g) => g,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).insert_goal(&goal).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist goal");
        return internal_error();
    }

    info!(user_id = %user_id, goal_id = %goal.id, "Goal created");

    (StatusCode::CREATED, Json(goal)).into_response()
}

/// PUT `/goals/{id}` - Update a goal.
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<GoalId>,
    Json(payload): Json<GoalUpdate>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let goal = match ledger.update_goal(goal_id, payload) {
        Ok(g) => g,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).update_goal(&goal).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist goal update");
        return internal_error();
    }

    info!(user_id = %user_id, goal_id = %goal.id, "Goal updated");

    (StatusCode::OK, Json(goal)).into_response()
}

/// DELETE `/goals/{id}` - Delete a goal.
///
/// Money already contributed stays out of the source accounts; deleting
/// the goal only stops tracking it.
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<GoalId>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    if let Err(e) = ledger.delete_goal(goal_id) {
        return ledger_error_response(&e);
    }

    if let Err(e) = finance_repo(&state).delete_goal(goal_id).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist goal deletion");
        return internal_error();
    }

    info!(user_id = %user_id, goal_id = %goal_id, "Goal deleted");

    (StatusCode::NO_CONTENT, ()).into_response()
}

/// POST `/goals/{id}/contribute` - Move money from an account into a goal.
async fn contribute(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<GoalId>,
    Json(payload): Json<ContributeRequest>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let mut ledger = session.lock().await;

    let contribution = match ledger.contribute(goal_id, payload.account_id, payload.amount) {
        Ok(c) => c,
        Err(e) => return ledger_error_response(&e),
    };

    if let Err(e) = finance_repo(&state).record_contribution(&contribution).await {
        drop(ledger);
        state.sessions.evict(user_id);
        error!(error = %e, user_id = %user_id, "Failed to persist contribution");
        return internal_error();
    }

    info!(
        user_id = %user_id,
        goal_id = %contribution.goal.id,
        account_id = %contribution.account.id,
        "Goal contribution recorded"
    );

    (
        StatusCode::OK,
        Json(json!({
            "goal": contribution.goal,
            "account": contribution.account
        })),
    )
        .into_response()
}
