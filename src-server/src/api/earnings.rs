use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use teamfolio_core::earnings::{derive_earnings, AccrualPolicy, DerivedEarnings};
use teamfolio_core::members::{parse_joined_at, parse_plan_amount, AccountSnapshot, DownlineTree};
use teamfolio_core::rank::{rank_progress, RankProgress};

use crate::{
    api::extract::{ApiJson, ApiQuery},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Snapshot fields as posted. The plan amount stays untyped so that bad values
/// are reported as snapshot errors, the same way backend documents are.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotBody {
    #[serde(default)]
    plan_amount: Option<Value>,
    #[serde(default, alias = "joinedDate")]
    joined_at: Option<String>,
    #[serde(default)]
    payment_completed: bool,
}

impl SnapshotBody {
    fn into_snapshot(self) -> ApiResult<AccountSnapshot> {
        let plan_amount = parse_plan_amount(self.plan_amount.as_ref())?;
        let joined_at = parse_joined_at(self.joined_at.as_deref())?;
        Ok(AccountSnapshot::new(plan_amount, joined_at, self.payment_completed)?)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRequest {
    snapshot: SnapshotBody,
    #[serde(default)]
    downline: DownlineTree,
    as_of: Option<DateTime<Utc>>,
    /// Overrides the configured policy for this request
    policy: Option<AccrualPolicy>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankQuery {
    team_size: Option<usize>,
}

/// Run the earnings model over a snapshot supplied by the caller
async fn compute_earnings(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ComputeRequest>,
) -> ApiResult<Json<DerivedEarnings>> {
    let now = req.as_of.unwrap_or_else(Utc::now);
    let policy = req.policy.unwrap_or(state.accrual_policy);
    let snapshot = req.snapshot.into_snapshot()?;
    let earnings = derive_earnings(&snapshot, &req.downline, now, policy)?;
    Ok(Json(earnings))
}

async fn get_rank(ApiQuery(query): ApiQuery<RankQuery>) -> ApiResult<Json<RankProgress>> {
    let team_size = query
        .team_size
        .ok_or_else(|| ApiError::BadRequest("teamSize is required".to_string()))?;
    Ok(Json(rank_progress(team_size)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/earnings/compute", post(compute_earnings))
        .route("/rank", get(get_rank))
}
