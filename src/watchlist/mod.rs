//! 관심 목록 관리

// region:    --- Imports
use crate::error::MarketError;
use crate::market::model::WatchState;
use crate::store::MarketStore;
use tracing::info;

// endregion: --- Imports

/// 관심 목록 토글 (등록되어 있으면 제거, 없으면 추가)
/// 종료된 상품도 토글할 수 있다.
pub async fn handle_toggle_watch(
    listing_id: i64,
    user_id: i64,
    store: &dyn MarketStore,
) -> Result<WatchState, MarketError> {
    info!(
        "{:<12} --> 관심 목록 토글: listing={}, user={}",
        "Command", listing_id, user_id
    );
    let watching = store.toggle_watch(listing_id, user_id).await?;
    Ok(WatchState {
        listing_id,
        watching,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::validation::{NewListing, NewUser};
    use crate::store::MemoryMarketStore;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_toggle_twice_restores_watchers() {
        let store = MemoryMarketStore::new();
        let owner = store
            .create_user(NewUser {
                username: "owner".to_string(),
                email: String::new(),
            })
            .await
            .unwrap();
        let listing = store
            .create_listing(
                owner.id,
                NewListing {
                    title: "Lamp".to_string(),
                    description: "Brass lamp".to_string(),
                    category_id: None,
                    starting_price: Decimal::new(500, 2),
                    image: None,
                },
            )
            .await
            .unwrap();

        let before = store.listing_watchers(listing.id).await.unwrap();
        let first = handle_toggle_watch(listing.id, owner.id, &store).await.unwrap();
        let second = handle_toggle_watch(listing.id, owner.id, &store).await.unwrap();

        assert!(first.watching);
        assert!(!second.watching);
        assert_eq!(store.listing_watchers(listing.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_toggle_unknown_listing() {
        let store = MemoryMarketStore::new();
        assert!(matches!(
            handle_toggle_watch(7, 1, &store).await,
            Err(MarketError::NotFound { .. })
        ));
    }
}
