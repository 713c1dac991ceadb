// region:    --- Imports
use super::MarketStore;
use crate::bidding::rules;
use crate::database::DatabaseManager;
use crate::error::{BusinessRuleViolation, MarketError};
use crate::lifecycle;
use crate::market::model::{Bid, Category, Comment, Listing, ListingSummary, User};
use crate::market::validation::{NewListing, NewUser};
use crate::query::queries;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Market Store
/// PostgreSQL 저장소 구현체
pub struct PostgresMarketStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresMarketStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[async_trait]
impl MarketStore for PostgresMarketStore {
    async fn create_user(&self, user: NewUser) -> Result<User, MarketError> {
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    BusinessRuleViolation::UsernameTaken(user.username.clone()).into()
                } else {
                    MarketError::Store(e)
                }
            })
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, MarketError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn create_category(&self, name: String) -> Result<Category, MarketError> {
        sqlx::query_as::<_, Category>(queries::INSERT_CATEGORY)
            .bind(&name)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    BusinessRuleViolation::CategoryExists(name.clone()).into()
                } else {
                    MarketError::Store(e)
                }
            })
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, MarketError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(category_id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, MarketError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY_BY_NAME)
            .bind(name)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, MarketError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: NewListing,
    ) -> Result<Listing, MarketError> {
        Ok(sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(owner_id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.category_id)
            .bind(listing.starting_price)
            .bind(&listing.image)
            .fetch_one(self.db_manager.pool())
            .await?)
    }

    async fn find_listing(&self, listing_id: i64) -> Result<Option<Listing>, MarketError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?)
    }

    async fn active_listings(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<ListingSummary>, MarketError> {
        Ok(sqlx::query_as::<_, ListingSummary>(queries::GET_ACTIVE_LISTINGS)
            .bind(category_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn watched_listings(&self, user_id: i64) -> Result<Vec<ListingSummary>, MarketError> {
        Ok(sqlx::query_as::<_, ListingSummary>(queries::GET_WATCHED_LISTINGS)
            .bind(user_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn listing_bids(&self, listing_id: i64) -> Result<Vec<Bid>, MarketError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn listing_comments(&self, listing_id: i64) -> Result<Vec<Comment>, MarketError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn listing_watchers(&self, listing_id: i64) -> Result<Vec<i64>, MarketError> {
        Ok(sqlx::query_scalar::<_, i64>(queries::GET_LISTING_WATCHERS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?)
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<Bid, MarketError> {
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    // 상품 행을 잠가 동시 입찰을 직렬화
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| MarketError::not_found("listing", listing_id))?;

                    let highest_bid: Option<Decimal> =
                        sqlx::query_scalar(queries::GET_HIGHEST_BID_AMOUNT)
                            .bind(listing_id)
                            .fetch_one(&mut **tx)
                            .await?;

                    rules::evaluate_bid(&listing, highest_bid, amount)?;

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(listing_id)
                        .bind(bidder_id)
                        .bind(amount)
                        .fetch_one(&mut **tx)
                        .await?;

                    sqlx::query(queries::ADD_WATCHER)
                        .bind(listing_id)
                        .bind(bidder_id)
                        .execute(&mut **tx)
                        .await?;

                    debug!(
                        "{:<12} --> 입찰 저장: listing={}, amount={}",
                        "Store", listing_id, bid.amount
                    );
                    Ok::<_, MarketError>(bid)
                })
            })
            .await
    }

    async fn close_listing(
        &self,
        listing_id: i64,
        requester_id: i64,
    ) -> Result<Listing, MarketError> {
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| MarketError::not_found("listing", listing_id))?;

                    let highest_bid = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;

                    let winner_id =
                        lifecycle::evaluate_close(&listing, requester_id, highest_bid.as_ref())?;

                    let closed = sqlx::query_as::<_, Listing>(queries::CLOSE_LISTING)
                        .bind(listing_id)
                        .bind(winner_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, MarketError>(closed)
                })
            })
            .await
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: String,
    ) -> Result<Comment, MarketError> {
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| MarketError::not_found("listing", listing_id))?;

                    lifecycle::ensure_active(&listing, "댓글을 작성")?;

                    let comment = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
                        .bind(listing_id)
                        .bind(author_id)
                        .bind(&text)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, MarketError>(comment)
                })
            })
            .await
    }

    async fn toggle_watch(&self, listing_id: i64, user_id: i64) -> Result<bool, MarketError> {
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| MarketError::not_found("listing", listing_id))?;

                    let removed = sqlx::query(queries::REMOVE_WATCHER)
                        .bind(listing_id)
                        .bind(user_id)
                        .execute(&mut **tx)
                        .await?
                        .rows_affected();

                    if removed > 0 {
                        info!(
                            "{:<12} --> 관심 목록 제거: listing={}, user={}",
                            "Store", listing_id, user_id
                        );
                        return Ok::<_, MarketError>(false);
                    }

                    sqlx::query(queries::ADD_WATCHER)
                        .bind(listing_id)
                        .bind(user_id)
                        .execute(&mut **tx)
                        .await?;
                    info!(
                        "{:<12} --> 관심 목록 추가: listing={}, user={}",
                        "Store", listing_id, user_id
                    );
                    Ok(true)
                })
            })
            .await
    }
}
// endregion: --- Postgres Market Store
