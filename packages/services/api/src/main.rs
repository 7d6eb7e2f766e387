//! Libris API
//!
//! 디지털 도서관 백엔드: 회원가입/로그인, 도서 카탈로그, 리뷰,
//! 대출/반납, 활동 로그를 HTTP로 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "libris_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!(port = config.port, db_url = %config.db_url, "Starting Libris API");
    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is the insecure dev default; override it in any deployment");
    }

    // 앱 상태 초기화
    let port = config.port;
    let state = Arc::new(AppState::new(config).await?);

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Libris API listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/", get(handlers::health::root))
        .route("/test", get(handlers::health::test_database))
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        // Books
        .route("/books", post(handlers::books::create_book))
        .route("/books/search", post(handlers::books::search_books))
        .route(
            "/books/{book_id}",
            get(handlers::books::get_book)
                .put(handlers::books::update_book)
                .delete(handlers::books::delete_book),
        )
        .route(
            "/books/{book_id}/reviews",
            post(handlers::reviews::add_review).get(handlers::reviews::list_reviews),
        )
        // Borrow / Return
        .route("/borrow", post(handlers::borrows::borrow_book))
        .route("/return/{borrow_id}", post(handlers::borrows::return_book))
        // Home feed
        .route("/home", get(handlers::books::home))
        // Admin
        .route("/admin/activity", get(handlers::admin::admin_activity))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}
