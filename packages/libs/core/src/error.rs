//! 공통 에러 타입
//!
//! Libris 인증 핵심에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

/// 인증 에러
///
/// 검증 실패 세 종류는 내부적으로 구분되지만, HTTP 경계에서는
/// 모두 동일한 401 응답으로 수렴합니다. (어떤 검사가 실패했는지
/// 외부에 노출하지 않습니다.)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// 구조적으로 잘못된 토큰 (필드 수 불일치, 만료 시각 파싱 실패)
    #[error("malformed credential")]
    Malformed,

    /// 서명 불일치
    #[error("credential signature mismatch")]
    Tampered,

    /// 서명은 유효하나 만료됨
    #[error("credential expired")]
    Expired,

    /// 발급 불가능한 subject id (빈 문자열 또는 구분자 포함)
    ///
    /// 호출자 입력이 아니라 서버 버그를 의미합니다.
    #[error("invalid subject id")]
    InvalidSubject,
}

impl AuthError {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Malformed | AuthError::Tampered | AuthError::Expired => 401,
            AuthError::InvalidSubject => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    ///
    /// 검증 실패는 한 가지 코드로 수렴합니다.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Malformed | AuthError::Tampered | AuthError::Expired => "INVALID_TOKEN",
            AuthError::InvalidSubject => "INTERNAL_ERROR",
        }
    }
}
