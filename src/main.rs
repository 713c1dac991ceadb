// region:    --- Imports
use auction_market::config::AppConfig;
use auction_market::router::{build_router, AppState};
use auction_market::store;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };

    // 저장소 생성 및 초기화
    let store = match store::open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("{:<12} --> 저장소 초기화 실패: {}", "Main", e);
            return Err(e.into());
        }
    };

    let routes_all = build_router(AppState::new(store));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all).await {
        error!("{:<12} --> Server error: {}", "Main", err);
        return Err(err.into());
    }
    Ok(())
}
// endregion: --- Main
