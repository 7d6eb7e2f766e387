//! 대출/반납 핸들러

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::models::Borrow;
use crate::state::AppState;

use super::{log_activity, require_user};

/// 이용자당 동시 대출 한도
const MAX_ACTIVE_BORROWS: i64 = 3;

/// POST /borrow
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(borrow): Json<Borrow>,
) -> Result<Json<Value>> {
    let user = require_user(&state, &headers).await?;

    if borrow.user_id != user.id {
        return Err(ApiError::Forbidden {
            message: "User mismatch".to_string(),
        });
    }

    let active = state
        .store
        .count_by(
            "borrow",
            &[
                ("user_id", json!(borrow.user_id)),
                ("status", json!("borrowed")),
            ],
        )
        .await?;
    if active >= MAX_ACTIVE_BORROWS {
        return Err(ApiError::BadRequest {
            message: "Borrow limit reached".to_string(),
        });
    }

    let borrow_id = state
        .store
        .insert("borrow", &serde_json::to_value(&borrow)?)
        .await?;
    log_activity(
        &state,
        "borrow",
        Some(&user.id),
        json!({"book_id": borrow.book_id}),
    )
    .await?;

    Ok(Json(json!({"id": borrow_id})))
}

/// POST /return/{borrow_id}
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(borrow_id): Path<String>,
) -> Result<Json<Value>> {
    let user = require_user(&state, &headers).await?;

    let doc = state
        .store
        .get("borrow", &borrow_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: "Not found".to_string(),
        })?;
    if doc.field_str("user_id") != Some(user.id.as_str()) {
        return Err(ApiError::Forbidden {
            message: "Forbidden".to_string(),
        });
    }

    state
        .store
        .merge("borrow", &borrow_id, &json!({"status": "returned"}))
        .await?;
    log_activity(
        &state,
        "return",
        Some(&user.id),
        json!({"borrow_id": borrow_id}),
    )
    .await?;

    Ok(Json(json!({"returned": true})))
}
