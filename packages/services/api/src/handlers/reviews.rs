//! 리뷰 핸들러

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{Document, Order};
use crate::error::{ApiError, Result};
use crate::models::Review;
use crate::state::AppState;

use super::{log_activity, require_user};

/// POST /books/{book_id}/reviews
pub async fn add_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(book_id): Path<String>,
    Json(review): Json<Review>,
) -> Result<Json<Value>> {
    let user = require_user(&state, &headers).await?;

    if review.user_id != user.id {
        return Err(ApiError::Forbidden {
            message: "User mismatch".to_string(),
        });
    }
    if !(1..=5).contains(&review.rating) {
        return Err(ApiError::BadRequest {
            message: "rating must be between 1 and 5".to_string(),
        });
    }
    if state.store.get("book", &book_id).await?.is_none() {
        return Err(ApiError::NotFound {
            message: "Book not found".to_string(),
        });
    }

    let rid = state
        .store
        .insert("review", &serde_json::to_value(&review)?)
        .await?;
    log_activity(
        &state,
        "review",
        Some(&user.id),
        json!({"book_id": book_id, "review_id": rid}),
    )
    .await?;

    Ok(Json(json!({"id": rid})))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReviewListQuery {
    pub limit: i64,
}

impl Default for ReviewListQuery {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// GET /books/{book_id}/reviews (공개)
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Value>> {
    let docs = state
        .store
        .list(
            "review",
            &[("book_id", json!(book_id))],
            Order::CreatedAsc,
            query.limit,
        )
        .await?;

    let items: Vec<Value> = docs.into_iter().map(Document::into_json).collect();
    Ok(Json(json!({"items": items})))
}
