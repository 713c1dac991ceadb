//! 저장소 트레이트
//!
//! 도메인 커맨드와 저장소 사이의 경계. `place_bid`, `close_listing`, `add_comment`,
//! `toggle_watch`는 각 구현체 안에서 하나의 원자적 단위(트랜잭션 또는 단일 잠금)로
//! 실행되며, 판정 규칙은 `bidding::rules`와 `lifecycle`의 순수 함수를 그대로 호출한다.

// region:    --- Imports
use crate::config::{AppConfig, StoreBackend};
use crate::database::DatabaseManager;
use crate::error::MarketError;
use crate::market::model::{Bid, Category, Comment, Listing, ListingSummary, User};
use crate::market::validation::{NewListing, NewUser};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

pub mod memory;
pub mod postgres;

pub use memory::MemoryMarketStore;
pub use postgres::PostgresMarketStore;

// region:    --- Market Store Trait
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, MarketError>;
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, MarketError>;

    async fn create_category(&self, name: String) -> Result<Category, MarketError>;
    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, MarketError>;
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, MarketError>;
    /// 이름순
    async fn list_categories(&self) -> Result<Vec<Category>, MarketError>;

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: NewListing,
    ) -> Result<Listing, MarketError>;
    async fn find_listing(&self, listing_id: i64) -> Result<Option<Listing>, MarketError>;
    /// 진행 중인 상품, 최신순. `category_id`가 있으면 해당 카테고리만.
    async fn active_listings(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<ListingSummary>, MarketError>;
    /// 사용자의 관심 상품 (종료 여부 무관), 최신순
    async fn watched_listings(&self, user_id: i64) -> Result<Vec<ListingSummary>, MarketError>;

    /// 금액 내림차순
    async fn listing_bids(&self, listing_id: i64) -> Result<Vec<Bid>, MarketError>;
    /// 최신순
    async fn listing_comments(&self, listing_id: i64) -> Result<Vec<Comment>, MarketError>;
    async fn listing_watchers(&self, listing_id: i64) -> Result<Vec<i64>, MarketError>;

    /// 최고가 조회, 규칙 판정, 입찰 저장, 관심 목록 추가를 하나의 단위로 실행
    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<Bid, MarketError>;
    /// 최고 입찰자를 낙찰자로 고정하고 비활성화
    async fn close_listing(
        &self,
        listing_id: i64,
        requester_id: i64,
    ) -> Result<Listing, MarketError>;
    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: String,
    ) -> Result<Comment, MarketError>;
    /// 토글 후 관심 여부 반환
    async fn toggle_watch(&self, listing_id: i64, user_id: i64) -> Result<bool, MarketError>;
}
// endregion: --- Market Store Trait

// region:    --- Factory
/// 설정에 따라 저장소 생성
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn MarketStore>, MarketError> {
    match &config.store_backend {
        StoreBackend::Postgres { database_url } => {
            let db_manager = DatabaseManager::connect(database_url, config.max_connections).await?;
            db_manager
                .initialize_database(config.reset_database)
                .await?;
            info!("{:<12} --> PostgreSQL 저장소 초기화 성공", "Store");
            Ok(Arc::new(PostgresMarketStore::new(Arc::new(db_manager))))
        }
        StoreBackend::Memory => {
            info!("{:<12} --> 메모리 저장소 사용", "Store");
            Ok(Arc::new(MemoryMarketStore::new()))
        }
    }
}
// endregion: --- Factory
