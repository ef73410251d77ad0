//! Dashboard routes: headline indicators and card payment planning.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde_json::json;

use crate::routes::user_ledger;
use crate::{AppState, middleware::AuthUser};
use plata_core::MetricsService;
use plata_shared::types::UserId;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/kpis", get(kpis))
        .route("/dashboard/card-payments", get(card_payments))
}

/// GET `/dashboard/kpis` - Headline indicators for the current month.
async fn kpis(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let kpis = MetricsService::kpis(&ledger, Utc::now().date_naive(), &state.metrics_config);

    (StatusCode::OK, Json(kpis)).into_response()
}

/// GET `/dashboard/card-payments` - Upcoming statement for each credit card.
async fn card_payments(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let statements = MetricsService::card_statements(&ledger, Utc::now().date_naive());

    (StatusCode::OK, Json(json!({ "cards": statements }))).into_response()
}
