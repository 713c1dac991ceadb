// region:    --- Imports
use super::MarketStore;
use crate::bidding::rules;
use crate::error::{BusinessRuleViolation, MarketError};
use crate::lifecycle;
use crate::market::model::{Bid, Category, Comment, Listing, ListingSummary, User};
use crate::market::validation::{NewListing, NewUser};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use tokio::sync::Mutex;

// endregion: --- Imports

// region:    --- Tables
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    listings: Vec<Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    /// (listing_id, user_id)
    watchers: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn listing(&self, listing_id: i64) -> Result<&Listing, MarketError> {
        self.listings
            .iter()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| MarketError::not_found("listing", listing_id))
    }

    fn highest_bid(&self, listing_id: i64) -> Option<&Bid> {
        // 동일 금액은 먼저 들어온 입찰 우선
        self.bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .min_by_key(|b| (Reverse(b.amount), b.id))
    }

    fn summary(&self, listing: &Listing) -> ListingSummary {
        let highest = self.highest_bid(listing.id).map(|b| b.amount);
        ListingSummary {
            listing: listing.clone(),
            current_price: rules::current_price(listing.starting_price, highest),
        }
    }

    fn newest_first(mut summaries: Vec<ListingSummary>) -> Vec<ListingSummary> {
        summaries.sort_by_key(|s| Reverse((s.listing.created_at, s.listing.id)));
        summaries
    }
}
// endregion: --- Tables

// region:    --- Memory Market Store
/// 메모리 저장소 구현체 (로컬 실행 및 테스트용)
/// 모든 연산이 하나의 뮤텍스 아래에서 실행된다.
#[derive(Default)]
pub struct MemoryMarketStore {
    tables: Mutex<Tables>,
}

impl MemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for MemoryMarketStore {
    async fn create_user(&self, user: NewUser) -> Result<User, MarketError> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(BusinessRuleViolation::UsernameTaken(user.username).into());
        }
        let user = User {
            id: tables.users.len() as i64 + 1,
            username: user.username,
            email: user.email,
            date_joined: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, MarketError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn create_category(&self, name: String) -> Result<Category, MarketError> {
        let mut tables = self.tables.lock().await;
        if tables.categories.iter().any(|c| c.name == name) {
            return Err(BusinessRuleViolation::CategoryExists(name).into());
        }
        let category = Category {
            id: tables.categories.len() as i64 + 1,
            name,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, MarketError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, MarketError> {
        let tables = self.tables.lock().await;
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, MarketError> {
        let tables = self.tables.lock().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_listing(
        &self,
        owner_id: i64,
        listing: NewListing,
    ) -> Result<Listing, MarketError> {
        let mut tables = self.tables.lock().await;
        let listing = Listing {
            id: tables.listings.len() as i64 + 1,
            owner_id,
            title: listing.title,
            description: listing.description,
            category_id: listing.category_id,
            starting_price: listing.starting_price,
            image: listing.image,
            created_at: Utc::now(),
            active: true,
            winner_id: None,
        };
        tables.listings.push(listing.clone());
        Ok(listing)
    }

    async fn find_listing(&self, listing_id: i64) -> Result<Option<Listing>, MarketError> {
        let tables = self.tables.lock().await;
        Ok(tables.listings.iter().find(|l| l.id == listing_id).cloned())
    }

    async fn active_listings(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<ListingSummary>, MarketError> {
        let tables = self.tables.lock().await;
        let summaries = tables
            .listings
            .iter()
            .filter(|l| l.active)
            .filter(|l| category_id.is_none() || l.category_id == category_id)
            .map(|l| tables.summary(l))
            .collect();
        Ok(Tables::newest_first(summaries))
    }

    async fn watched_listings(&self, user_id: i64) -> Result<Vec<ListingSummary>, MarketError> {
        let tables = self.tables.lock().await;
        let summaries = tables
            .listings
            .iter()
            .filter(|l| tables.watchers.contains(&(l.id, user_id)))
            .map(|l| tables.summary(l))
            .collect();
        Ok(Tables::newest_first(summaries))
    }

    async fn listing_bids(&self, listing_id: i64) -> Result<Vec<Bid>, MarketError> {
        let tables = self.tables.lock().await;
        let mut bids: Vec<Bid> = tables
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect();
        bids.sort_by_key(|b| (Reverse(b.amount), b.id));
        Ok(bids)
    }

    async fn listing_comments(&self, listing_id: i64) -> Result<Vec<Comment>, MarketError> {
        let tables = self.tables.lock().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| Reverse((c.created_at, c.id)));
        Ok(comments)
    }

    async fn listing_watchers(&self, listing_id: i64) -> Result<Vec<i64>, MarketError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .watchers
            .range((listing_id, i64::MIN)..=(listing_id, i64::MAX))
            .map(|(_, user_id)| *user_id)
            .collect())
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<Bid, MarketError> {
        let mut tables = self.tables.lock().await;
        let listing = tables.listing(listing_id)?;
        let highest_bid = tables.highest_bid(listing_id).map(|b| b.amount);
        rules::evaluate_bid(listing, highest_bid, amount)?;

        let bid = Bid {
            id: tables.bids.len() as i64 + 1,
            listing_id,
            bidder_id,
            amount,
            created_at: Utc::now(),
        };
        tables.bids.push(bid.clone());
        tables.watchers.insert((listing_id, bidder_id));
        Ok(bid)
    }

    async fn close_listing(
        &self,
        listing_id: i64,
        requester_id: i64,
    ) -> Result<Listing, MarketError> {
        let mut tables = self.tables.lock().await;
        let listing = tables.listing(listing_id)?;
        let winner_id =
            lifecycle::evaluate_close(listing, requester_id, tables.highest_bid(listing_id))?;

        let listing = tables
            .listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| MarketError::not_found("listing", listing_id))?;
        listing.active = false;
        listing.winner_id = winner_id;
        Ok(listing.clone())
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: String,
    ) -> Result<Comment, MarketError> {
        let mut tables = self.tables.lock().await;
        lifecycle::ensure_active(tables.listing(listing_id)?, "댓글을 작성")?;

        let comment = Comment {
            id: tables.comments.len() as i64 + 1,
            listing_id,
            author_id,
            text,
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn toggle_watch(&self, listing_id: i64, user_id: i64) -> Result<bool, MarketError> {
        let mut tables = self.tables.lock().await;
        tables.listing(listing_id)?;

        if tables.watchers.remove(&(listing_id, user_id)) {
            Ok(false)
        } else {
            tables.watchers.insert((listing_id, user_id));
            Ok(true)
        }
    }
}
// endregion: --- Memory Market Store

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    async fn seed_user(store: &MemoryMarketStore, name: &str) -> User {
        store
            .create_user(NewUser {
                username: name.to_string(),
                email: String::new(),
            })
            .await
            .unwrap()
    }

    async fn seed_listing(store: &MemoryMarketStore, owner: &User, cents: i64) -> Listing {
        store
            .create_listing(
                owner.id,
                NewListing {
                    title: "Camera".to_string(),
                    description: "Film camera".to_string(),
                    category_id: None,
                    starting_price: dec(cents),
                    image: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_place_bid_persists_and_watches() {
        let store = MemoryMarketStore::new();
        let owner = seed_user(&store, "owner").await;
        let bidder = seed_user(&store, "bidder").await;
        let listing = seed_listing(&store, &owner, 1000).await;

        let bid = store.place_bid(listing.id, bidder.id, dec(1250)).await.unwrap();
        assert_eq!(bid.amount, dec(1250));
        assert_eq!(
            store.listing_watchers(listing.id).await.unwrap(),
            vec![bidder.id]
        );

        // 두 번째 입찰도 관심 목록은 중복되지 않는다
        store.place_bid(listing.id, bidder.id, dec(1300)).await.unwrap();
        assert_eq!(
            store.listing_watchers(listing.id).await.unwrap(),
            vec![bidder.id]
        );
    }

    #[tokio::test]
    async fn test_rejected_bid_is_not_persisted() {
        let store = MemoryMarketStore::new();
        let owner = seed_user(&store, "owner").await;
        let bidder = seed_user(&store, "bidder").await;
        let listing = seed_listing(&store, &owner, 1000).await;

        let err = store
            .place_bid(listing.id, bidder.id, dec(1000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation(ValidationError::BusinessRule(_))
        ));
        assert!(store.listing_bids(listing.id).await.unwrap().is_empty());
        assert!(store.listing_watchers(listing.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_bid_unknown_listing() {
        let store = MemoryMarketStore::new();
        let bidder = seed_user(&store, "bidder").await;
        assert!(matches!(
            store.place_bid(99, bidder.id, dec(1000)).await,
            Err(MarketError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_close_fixes_winner_and_blocks_further_activity() {
        let store = MemoryMarketStore::new();
        let owner = seed_user(&store, "owner").await;
        let a = seed_user(&store, "a").await;
        let b = seed_user(&store, "b").await;
        let listing = seed_listing(&store, &owner, 1000).await;

        store.place_bid(listing.id, a.id, dec(1250)).await.unwrap();
        store.place_bid(listing.id, b.id, dec(1500)).await.unwrap();

        assert!(matches!(
            store.close_listing(listing.id, a.id).await,
            Err(MarketError::Permission(_))
        ));

        let closed = store.close_listing(listing.id, owner.id).await.unwrap();
        assert!(!closed.active);
        assert_eq!(closed.winner_id, Some(b.id));

        assert!(matches!(
            store.close_listing(listing.id, owner.id).await,
            Err(MarketError::InvalidState(_))
        ));
        assert!(matches!(
            store.place_bid(listing.id, a.id, dec(9000)).await,
            Err(MarketError::InvalidState(_))
        ));
        assert!(matches!(
            store.add_comment(listing.id, a.id, "late".to_string()).await,
            Err(MarketError::InvalidState(_))
        ));
        assert!(store.active_listings(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_watch_round_trip() {
        let store = MemoryMarketStore::new();
        let owner = seed_user(&store, "owner").await;
        let viewer = seed_user(&store, "viewer").await;
        let listing = seed_listing(&store, &owner, 1000).await;

        assert!(store.toggle_watch(listing.id, viewer.id).await.unwrap());
        assert_eq!(store.watched_listings(viewer.id).await.unwrap().len(), 1);
        assert!(!store.toggle_watch(listing.id, viewer.id).await.unwrap());
        assert!(store.watched_listings(viewer.id).await.unwrap().is_empty());
        assert!(store.listing_watchers(listing.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_listings_report_current_price() {
        let store = MemoryMarketStore::new();
        let owner = seed_user(&store, "owner").await;
        let bidder = seed_user(&store, "bidder").await;
        let first = seed_listing(&store, &owner, 1000).await;
        let second = seed_listing(&store, &owner, 500).await;
        store.place_bid(first.id, bidder.id, dec(1750)).await.unwrap();

        let summaries = store.active_listings(None).await.unwrap();
        assert_eq!(summaries.len(), 2);
        let price_of = |id: i64| {
            summaries
                .iter()
                .find(|s| s.listing.id == id)
                .map(|s| s.current_price)
        };
        assert_eq!(price_of(first.id), Some(dec(1750)));
        assert_eq!(price_of(second.id), Some(dec(500)));
    }

    #[tokio::test]
    async fn test_duplicate_username_and_category() {
        let store = MemoryMarketStore::new();
        seed_user(&store, "alice").await;
        let err = store
            .create_user(NewUser {
                username: "alice".to_string(),
                email: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "USERNAME_TAKEN");

        store.create_category("Books".to_string()).await.unwrap();
        let err = store
            .create_category("Books".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CATEGORY_EXISTS");
    }
}
// endregion: --- Tests
