//! API 앱 상태

use libris_core::auth::TokenAuthenticator;

use crate::config::Config;
use crate::db::Store;

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다. Secret은 시작 시 한 번
/// 인증기에 주입되고 이후에는 읽기 전용입니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 문서 저장소
    pub store: Store,

    /// 토큰 발급/검증기
    pub auth: TokenAuthenticator,
}

impl AppState {
    /// 새 상태 생성 (저장소 연결 포함)
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::connect(&config.db_url).await?;
        let auth = TokenAuthenticator::new(config.secret());
        Ok(Self {
            config,
            store,
            auth,
        })
    }
}
