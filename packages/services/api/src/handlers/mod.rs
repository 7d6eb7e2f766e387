//! 라우트 핸들러
//!
//! 인증 가드와 활동 로그 헬퍼를 공유합니다.

pub mod admin;
pub mod auth;
pub mod books;
pub mod borrows;
pub mod health;
pub mod reviews;

use axum::http::HeaderMap;
use serde_json::Value;

use crate::db::Document;
use crate::error::{ApiError, Result};
use crate::models::Activity;
use crate::state::AppState;

/// Bearer 토큰을 검증하고 현재 이용자 문서를 반환
///
/// 토큰 부재, 검증 실패, 계정 미존재 모두 동일한 401로 수렴합니다.
/// (어느 단계에서 실패했는지는 외부에서 구분할 수 없습니다.)
pub(crate) async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<Document> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized {
            message: "invalid or expired token".to_string(),
        })?;

    let subject_id = state.auth.verify(token)?;

    state
        .store
        .get("libraryuser", &subject_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized {
            message: "invalid or expired token".to_string(),
        })
}

/// admin 역할 이용자만 통과
pub(crate) async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Document> {
    let user = require_user(state, headers).await?;
    if user.field_str("role") != Some("admin") {
        return Err(ApiError::Forbidden {
            message: "Admins only".to_string(),
        });
    }
    Ok(user)
}

/// 활동 로그 기록
pub(crate) async fn log_activity(
    state: &AppState,
    kind: &str,
    user_id: Option<&str>,
    meta: Value,
) -> Result<()> {
    let activity = Activity {
        user_id: user_id.map(str::to_string),
        kind: kind.to_string(),
        meta,
    };
    state
        .store
        .insert("activity", &serde_json::to_value(&activity)?)
        .await?;
    Ok(())
}
