//! Report routes: monthly summaries, category breakdowns, and daily series.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::routes::user_ledger;
use crate::{AppState, middleware::AuthUser};
use plata_core::MetricsService;
use plata_shared::types::UserId;

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/monthly", get(monthly_summary))
        .route("/reports/category-breakdown", get(category_breakdown))
        .route("/reports/daily-expenses", get(daily_expenses))
}

/// Query parameters selecting a report month. Defaults to the current one.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// Report year.
    pub year: Option<i32>,
    /// Report month (1-12).
    pub month: Option<u32>,
}

impl MonthQuery {
    /// Fills in missing fields from `today`; `None` when the month is out of range.
    fn selected(&self, today: NaiveDate) -> Option<(i32, u32)> {
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        (1..=12).contains(&month).then_some((year, month))
    }

    /// Resolves the query against the current date.
    fn resolve(&self) -> Result<(i32, u32), Response> {
        self.selected(Utc::now().date_naive()).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "INVALID_MONTH",
                    "message": "Month must be between 1 and 12"
                })),
            )
                .into_response()
        })
    }
}

/// GET `/reports/monthly` - Income, expenses, and savings for one month.
async fn monthly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let (year, month) = match query.resolve() {
        Ok(selected) => selected,
        Err(response) => return response,
    };

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let summary = MetricsService::monthly_summary(&ledger, year, month);

    (StatusCode::OK, Json(summary)).into_response()
}

/// GET `/reports/category-breakdown` - Expense shares by category for one month.
async fn category_breakdown(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let (year, month) = match query.resolve() {
        Ok(selected) => selected,
        Err(response) => return response,
    };

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let breakdown = MetricsService::category_breakdown(&ledger, year, month);

    (StatusCode::OK, Json(json!({ "categories": breakdown }))).into_response()
}

/// GET `/reports/daily-expenses` - Per-day expense totals for one month.
async fn daily_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(auth.user_id());

    let (year, month) = match query.resolve() {
        Ok(selected) => selected,
        Err(response) => return response,
    };

    let session = match user_ledger(&state, user_id).await {
        Ok(s) => s,
        Err(response) => return response,
    };
    let ledger = session.lock().await;

    let series = MetricsService::daily_expenses(&ledger, year, month);

    (StatusCode::OK, Json(json!({ "days": series }))).into_response()
}
