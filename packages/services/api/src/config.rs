//! API 서비스 설정

use std::env;

/// 배포 환경에서 반드시 교체해야 하는 개발용 기본 Secret
pub const DEFAULT_SECRET: &str = "dev-secret";

/// API 서비스 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// Database URL (sqlite)
    pub db_url: String,

    /// 토큰 서명/비밀번호 해시에 쓰이는 Secret
    pub secret_key: String,
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: env::var("LIBRIS_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,

            db_url: env::var("LIBRIS_DB_URL")
                .unwrap_or_else(|_| "sqlite://data/libris.db?mode=rwc".to_string()),

            secret_key: env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET.to_string()),
        })
    }

    /// Secret 바이트 참조
    pub fn secret(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    /// 개발용 기본 Secret 사용 여부
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET
    }
}
