//! 인증 관련 로직
//!
//! # 개요
//!
//! Libris의 인증은 서버측 세션 없이 자기완결적(self-contained) 토큰으로
//! 동작합니다:
//!
//! - **토큰**: `subject_id|expiry|signature` 형식의 서명된 문자열.
//!   발급 후 서버에 저장되지 않으며, 만료 외의 폐기 수단은 없습니다.
//! - **비밀번호 해시**: SHA-256 기반 단방향 해시.
//!
//! 서명/해시에 쓰이는 Secret은 프로세스 시작 시 설정에서 한 번 주입되며,
//! 전역 상태로 읽지 않습니다.

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{TokenAuthenticator, DELIMITER, TOKEN_TTL_SECS};
