//! 사용자, 카테고리, 상품, 댓글 생성 커맨드

// region:    --- Imports
use super::model::{Category, Comment, Listing, User};
use super::validation::{NewListing, NewUser};
use crate::error::{MarketError, ValidationError};
use crate::store::MarketStore;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 사용자 등록
pub async fn handle_register_user(
    user: NewUser,
    store: &dyn MarketStore,
) -> Result<User, MarketError> {
    info!("{:<12} --> 사용자 등록: {}", "Command", user.username);
    let user = store.create_user(user).await?;
    info!("{:<12} --> 사용자 등록 성공: id={}", "Command", user.id);
    Ok(user)
}

/// 카테고리 등록
pub async fn handle_create_category(
    name: String,
    store: &dyn MarketStore,
) -> Result<Category, MarketError> {
    info!("{:<12} --> 카테고리 등록: {}", "Command", name);
    store.create_category(name).await
}

/// 상품 등록
pub async fn handle_create_listing(
    owner_id: i64,
    listing: NewListing,
    store: &dyn MarketStore,
) -> Result<Listing, MarketError> {
    info!(
        "{:<12} --> 상품 등록 요청: owner={}, title={}",
        "Command", owner_id, listing.title
    );

    if let Some(category_id) = listing.category_id {
        if store.find_category(category_id).await?.is_none() {
            warn!(
                "{:<12} --> 존재하지 않는 카테고리: {}",
                "Command", category_id
            );
            return Err(ValidationError::field(
                "category",
                format!("존재하지 않는 카테고리입니다: {}", category_id),
            )
            .into());
        }
    }

    let listing = store.create_listing(owner_id, listing).await?;
    info!("{:<12} --> 상품 등록 성공: id={}", "Command", listing.id);
    Ok(listing)
}

/// 댓글 작성
pub async fn handle_add_comment(
    listing_id: i64,
    author_id: i64,
    text: String,
    store: &dyn MarketStore,
) -> Result<Comment, MarketError> {
    info!(
        "{:<12} --> 댓글 작성 요청: listing={}, author={}",
        "Command", listing_id, author_id
    );
    store
        .add_comment(listing_id, author_id, text)
        .await
        .inspect_err(|e| warn!("{:<12} --> 댓글 거절: {}", "Command", e))
}
// endregion: --- Commands
