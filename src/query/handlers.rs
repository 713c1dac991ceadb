// region:    --- Imports
use crate::bidding::rules;
use crate::error::MarketError;
use crate::market::model::{Category, CategoryListings, ListingDetail, ListingSummary};
use crate::store::MarketStore;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 진행 중인 모든 상품 조회
pub async fn get_active_listings(
    store: &dyn MarketStore,
) -> Result<Vec<ListingSummary>, MarketError> {
    info!("{:<12} --> 진행 중인 상품 조회", "Query");
    store.active_listings(None).await
}

/// 상품 상세 조회 (viewer가 있으면 관심 여부 포함)
pub async fn get_listing_detail(
    store: &dyn MarketStore,
    listing_id: i64,
    viewer_id: Option<i64>,
) -> Result<ListingDetail, MarketError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", listing_id);
    let listing = store
        .find_listing(listing_id)
        .await?
        .ok_or_else(|| MarketError::not_found("listing", listing_id))?;

    let bids = store.listing_bids(listing_id).await?;
    let comments = store.listing_comments(listing_id).await?;
    let watchers = store.listing_watchers(listing_id).await?;

    let highest_bid = bids.iter().map(|b| b.amount).max();
    let current_price = rules::current_price(listing.starting_price, highest_bid);

    Ok(ListingDetail {
        current_price,
        watcher_count: watchers.len(),
        watching: viewer_id.map(|id| watchers.contains(&id)),
        listing,
        bids,
        comments,
    })
}

/// 사용자 관심 목록 조회
pub async fn get_watchlist(
    store: &dyn MarketStore,
    user_id: i64,
) -> Result<Vec<ListingSummary>, MarketError> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user_id);
    store.watched_listings(user_id).await
}

/// 모든 카테고리 조회
pub async fn get_categories(store: &dyn MarketStore) -> Result<Vec<Category>, MarketError> {
    info!("{:<12} --> 카테고리 목록 조회", "Query");
    store.list_categories().await
}

/// 카테고리별 진행 중인 상품 조회
pub async fn get_category_listings(
    store: &dyn MarketStore,
    name: &str,
) -> Result<CategoryListings, MarketError> {
    info!("{:<12} --> 카테고리별 상품 조회: {}", "Query", name);
    let category = store
        .find_category_by_name(name)
        .await?
        .ok_or_else(|| MarketError::not_found("category", name))?;
    let listings = store.active_listings(Some(category.id)).await?;
    Ok(CategoryListings { category, listings })
}

// endregion: --- Query Handlers

// endregion: --- Tests
