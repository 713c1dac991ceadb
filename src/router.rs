// region:    --- Imports
use crate::handlers;
use crate::store::MarketStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// endregion: --- Imports

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }
}

/// 라우터 설정
pub fn build_router(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/register", post(handlers::handle_register))
        .route(
            "/create",
            get(handlers::handle_create_form).post(handlers::handle_create_listing),
        )
        .route("/listing/:id", get(handlers::handle_get_listing))
        .route(
            "/close/:id",
            get(handlers::handle_close).post(handlers::handle_close),
        )
        .route("/bid/:id", post(handlers::handle_bid))
        .route("/comment/:id", post(handlers::handle_comment))
        .route("/watchlist", get(handlers::handle_get_watchlist))
        .route(
            "/watchlist/:id",
            get(handlers::handle_toggle_watch).post(handlers::handle_toggle_watch),
        )
        .route(
            "/categories",
            get(handlers::handle_get_categories).post(handlers::handle_create_category),
        )
        .route("/category/:name", get(handlers::handle_get_category))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 64))
        .with_state(state)
}
