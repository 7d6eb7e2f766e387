//! libris-core: Libris 공통 핵심 라이브러리
//!
//! 이 크레이트는 API 서비스가 사용하는 보안 핵심 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `auth`: 토큰 발급/검증 및 비밀번호 해싱
//! - `error`: 공통 에러 타입

pub mod auth;
pub mod error;

pub use error::{AuthError, Result};
