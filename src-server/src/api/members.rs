use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use teamfolio_core::earnings::DerivedEarnings;
use teamfolio_core::members::MemberDashboard;

use crate::{
    api::extract::{ApiJson, ApiQuery},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsOfQuery {
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawalCheckRequest {
    amount: Decimal,
    as_of: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawalCheckResponse {
    amount: Decimal,
    remaining_withdrawable: Decimal,
}

/// Dashboard figures for a member
/// Query params:
///   asOf: RFC 3339 timestamp (optional, defaults to now)
async fn get_dashboard(
    Path(member_id): Path<String>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MemberDashboard>> {
    let now = query.as_of.unwrap_or_else(Utc::now);
    let dashboard = state.member_service.get_dashboard(&member_id, now).await?;
    Ok(Json(dashboard))
}

async fn get_earnings(
    Path(member_id): Path<String>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DerivedEarnings>> {
    let now = query.as_of.unwrap_or_else(Utc::now);
    let earnings = state.member_service.get_earnings(&member_id, now).await?;
    Ok(Json(earnings))
}

/// Whether a withdrawal of `amount` fits the member's withdrawable balance
async fn check_withdrawal(
    Path(member_id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<WithdrawalCheckRequest>,
) -> ApiResult<Json<WithdrawalCheckResponse>> {
    let now = req.as_of.unwrap_or_else(Utc::now);
    let remaining_withdrawable = state
        .member_service
        .check_withdrawal(&member_id, req.amount, now)
        .await?;
    Ok(Json(WithdrawalCheckResponse {
        amount: req.amount,
        remaining_withdrawable,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/members/:id/dashboard", get(get_dashboard))
        .route("/members/:id/earnings", get(get_earnings))
        .route("/members/:id/withdrawals/check", post(check_withdrawal))
}
