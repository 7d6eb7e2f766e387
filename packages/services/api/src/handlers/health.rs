//! 헬스체크 핸들러

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({"name": "Libris API", "status": "ok"}))
}

/// GET /test
///
/// 저장소 연결 상태를 보고합니다. 실패해도 200으로 응답하고
/// 본문에 상태를 담습니다.
pub async fn test_database(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.store.collections().await {
        Ok(collections) => Json(json!({
            "backend": "running",
            "database": "connected",
            "collections": collections,
        })),
        Err(e) => {
            let mut detail = e.to_string();
            detail.truncate(80);
            Json(json!({
                "backend": "running",
                "database": format!("error: {detail}"),
            }))
        }
    }
}
