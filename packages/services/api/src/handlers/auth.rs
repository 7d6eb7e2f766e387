//! 인증/계정 핸들러

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use libris_core::auth::{hash_password, verify_password};

use crate::error::{ApiError, Result};
use crate::models::LibraryUser;
use crate::state::AppState;

use super::{log_activity, require_user};

/// 발급된 토큰 응답
#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: &'static str,
}

impl Token {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<Token>> {
    let existing = state
        .store
        .find_one_by("libraryuser", "email", &json!(payload.email))
        .await?;
    if existing.is_some() {
        return Err(ApiError::BadRequest {
            message: "Email already registered".to_string(),
        });
    }

    let user = LibraryUser {
        name: payload.name,
        email: payload.email,
        password_hash: hash_password(&payload.password, state.config.secret()),
        role: "user".to_string(),
        avatar_url: None,
        preferences: json!({"theme": "light", "fontSize": 16, "highContrast": false}),
        is_active: true,
    };
    let uid = state
        .store
        .insert("libraryuser", &serde_json::to_value(&user)?)
        .await?;

    let token = state.auth.issue(&uid)?;
    log_activity(&state, "register", Some(&uid), json!({"email": user.email})).await?;

    Ok(Json(Token::bearer(token)))
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
///
/// 이메일 미존재와 비밀번호 불일치는 같은 401로 응답합니다.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Token>> {
    let invalid = || ApiError::Unauthorized {
        message: "Invalid credentials".to_string(),
    };

    let user = state
        .store
        .find_one_by("libraryuser", "email", &json!(payload.email))
        .await?
        .ok_or_else(invalid)?;

    let stored_hash = user.field_str("password_hash").unwrap_or_default();
    if !verify_password(&payload.password, state.config.secret(), stored_hash) {
        return Err(invalid());
    }

    let token = state.auth.issue(&user.id)?;
    log_activity(&state, "login", Some(&user.id), json!({})).await?;

    Ok(Json(Token::bearer(token)))
}

/// GET /me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let user = require_user(&state, &headers).await?;

    let mut body = user.into_json();
    if let Value::Object(map) = &mut body {
        map.remove("password_hash");
    }
    Ok(Json(body))
}
