//! 운영자 핸들러

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::db::{Document, Order};
use crate::error::Result;
use crate::state::AppState;

use super::require_admin;

/// GET /admin/activity (admin)
///
/// 최근 활동 100건을 최신순으로 반환합니다.
pub async fn admin_activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    require_admin(&state, &headers).await?;

    let docs = state
        .store
        .list("activity", &[], Order::CreatedDesc, 100)
        .await?;
    let items: Vec<Value> = docs.into_iter().map(Document::into_json).collect();

    Ok(Json(json!({"items": items})))
}
