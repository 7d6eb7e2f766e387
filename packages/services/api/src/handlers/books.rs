//! 도서 카탈로그 핸들러
//!
//! 생성/수정/삭제는 admin 전용, 조회/검색/홈 피드는 공개입니다.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::db::{Document, Order};
use crate::error::{ApiError, Result};
use crate::models::Book;
use crate::state::AppState;

use super::{log_activity, require_admin};

/// POST /books (admin)
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(book): Json<Book>,
) -> Result<Json<Value>> {
    let admin = require_admin(&state, &headers).await?;

    let bid = state
        .store
        .insert("book", &serde_json::to_value(&book)?)
        .await?;
    log_activity(&state, "create_book", Some(&admin.id), json!({"book_id": bid})).await?;

    Ok(Json(json!({"id": bid})))
}

/// 도서 검색 조건
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BookQuery {
    /// title/author/tags/description/isbn 부분 일치 (대소문자 무시)
    pub q: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
    pub featured: Option<bool>,
    pub limit: i64,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            q: None,
            genre: None,
            author: None,
            year: None,
            featured: None,
            limit: 24,
        }
    }
}

/// POST /books/search (공개)
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Json(query): Json<BookQuery>,
) -> Result<Json<Value>> {
    let mut filters: Vec<(&str, Value)> = Vec::new();
    if let Some(genre) = &query.genre {
        filters.push(("genre", json!(genre)));
    }
    if let Some(author) = &query.author {
        filters.push(("author", json!(author)));
    }
    if let Some(year) = query.year {
        filters.push(("year", json!(year)));
    }
    if let Some(featured) = query.featured {
        filters.push(("featured", json!(featured)));
    }

    // 텍스트 검색이 있으면 제한 없이 가져와 본문에서 거른다 (LIMIT -1 = 무제한)
    let fetch_limit = if query.q.is_some() { -1 } else { query.limit };
    let docs = state
        .store
        .list("book", &filters, Order::CreatedAsc, fetch_limit)
        .await?;

    let needle = query.q.as_deref().map(str::to_lowercase);
    let items: Vec<Value> = docs
        .into_iter()
        .filter(|doc| match &needle {
            Some(n) => matches_text(doc, n),
            None => true,
        })
        .take(query.limit.max(0) as usize)
        .map(Document::into_json)
        .collect();

    Ok(Json(json!({"items": items})))
}

fn matches_text(doc: &Document, needle: &str) -> bool {
    const TEXT_FIELDS: [&str; 4] = ["title", "author", "description", "isbn"];

    let field_hit = TEXT_FIELDS.iter().any(|field| {
        doc.field_str(field)
            .map(|v| v.to_lowercase().contains(needle))
            .unwrap_or(false)
    });
    if field_hit {
        return true;
    }

    doc.body
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .any(|t| t.to_lowercase().contains(needle))
        })
        .unwrap_or(false)
}

/// GET /books/{book_id} (공개)
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>> {
    let doc = state
        .store
        .get("book", &book_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: "Not found".to_string(),
        })?;
    Ok(Json(doc.into_json()))
}

/// 도서 부분 수정 요청 (제공된 필드만 반영)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
}

impl UpdateBookPayload {
    fn into_patch(self) -> Value {
        let mut patch = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                patch.insert(key.to_string(), v);
            }
        };
        put("title", self.title.map(Value::String));
        put("author", self.author.map(Value::String));
        put("genre", self.genre.map(Value::String));
        put("year", self.year.map(|v| json!(v)));
        put("isbn", self.isbn.map(Value::String));
        put("description", self.description.map(Value::String));
        put("cover_url", self.cover_url.map(Value::String));
        put("file_url", self.file_url.map(Value::String));
        put("tags", self.tags.map(|v| json!(v)));
        put("featured", self.featured.map(Value::Bool));
        Value::Object(patch)
    }
}

/// PUT /books/{book_id} (admin)
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(book_id): Path<String>,
    Json(payload): Json<UpdateBookPayload>,
) -> Result<Json<Value>> {
    let admin = require_admin(&state, &headers).await?;

    let matched = state
        .store
        .merge("book", &book_id, &payload.into_patch())
        .await?;
    if !matched {
        return Err(ApiError::NotFound {
            message: "Not found".to_string(),
        });
    }
    log_activity(&state, "update_book", Some(&admin.id), json!({"book_id": book_id})).await?;

    Ok(Json(json!({"updated": true})))
}

/// DELETE /books/{book_id} (admin)
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(book_id): Path<String>,
) -> Result<Json<Value>> {
    let admin = require_admin(&state, &headers).await?;

    let deleted = state.store.delete("book", &book_id).await?;
    if !deleted {
        return Err(ApiError::NotFound {
            message: "Not found".to_string(),
        });
    }
    log_activity(&state, "delete_book", Some(&admin.id), json!({"book_id": book_id})).await?;

    Ok(Json(json!({"deleted": true})))
}

/// GET /home (공개)
///
/// 추천/최신/인기 섹션과 공지 목록을 반환합니다.
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let featured = state
        .store
        .list("book", &[("featured", json!(true))], Order::CreatedAsc, 10)
        .await?;
    let latest = state.store.list("book", &[], Order::CreatedDesc, 12).await?;
    let trending = state.store.list("book", &[], Order::UpdatedDesc, 12).await?;

    let to_items = |docs: Vec<Document>| -> Vec<Value> {
        docs.into_iter().map(Document::into_json).collect()
    };

    Ok(Json(json!({
        "featured": to_items(featured),
        "latest": to_items(latest),
        "trending": to_items(trending),
        "announcements": [
            {
                "id": 1,
                "title": "Welcome to the Digital Library",
                "body": "Explore featured collections and the latest additions.",
            },
        ],
    })))
}
