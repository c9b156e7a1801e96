use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::main_lib::AppState;

pub mod admin;
pub mod earnings;
pub mod extract;
pub mod members;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(members::router())
        .merge(earnings::router())
        .merge(admin::router())
}
