use std::sync::Arc;

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use teamfolio_core::admin::{platform_stats, search_users, AdminUserRow, PlatformStats};

use crate::{
    api::extract::{ApiJson, ApiQuery},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn get_platform_stats(
    ApiJson(users): ApiJson<Vec<AdminUserRow>>,
) -> ApiResult<Json<PlatformStats>> {
    Ok(Json(platform_stats(&users)?))
}

async fn search(
    ApiQuery(query): ApiQuery<SearchQuery>,
    ApiJson(users): ApiJson<Vec<AdminUserRow>>,
) -> ApiResult<Json<Vec<AdminUserRow>>> {
    Ok(Json(search_users(&users, &query.q)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/stats", post(get_platform_stats))
        .route("/admin/search", post(search))
}
