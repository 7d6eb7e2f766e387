//! 컬렉션 모델
//!
//! 각 구조체는 문서 저장소의 컬렉션 하나에 대응합니다.
//! 컬렉션 이름은 구조체 이름의 소문자입니다. (예: `Book` → `book`)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 도서관 이용자 (`libraryuser` 컬렉션)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,

    /// "user" 또는 "admin"
    #[serde(default = "default_role")]
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// 접근성/독서 환경 설정
    #[serde(default = "empty_object")]
    pub preferences: Value,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// 도서 (`book` 컬렉션)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i64,
    pub isbn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// 홈 화면 추천 노출 여부
    #[serde(default)]
    pub featured: bool,
}

/// 리뷰 (`review` 컬렉션)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub book_id: String,
    pub user_id: String,

    /// 1~5
    pub rating: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// 대출 (`borrow` 컬렉션)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrow {
    pub book_id: String,
    pub user_id: String,

    /// "borrowed" 또는 "returned"
    #[serde(default = "default_borrow_status")]
    pub status: String,

    /// 반납 예정일 (ISO 날짜 문자열)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// 활동 로그 (`activity` 컬렉션)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// login, register, borrow, return, review, create_book, update_book, delete_book
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default = "empty_object")]
    pub meta: Value,
}

fn default_role() -> String {
    "user".to_string()
}

fn default_borrow_status() -> String {
    "borrowed".to_string()
}

fn default_true() -> bool {
    true
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
