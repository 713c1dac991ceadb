//! 경매 종료 처리
//! 진행 중(active) -> 종료(inactive) 단방향 전이. 재개 기능은 없다.

// region:    --- Imports
use crate::error::MarketError;
use crate::market::model::{Bid, Listing};
use crate::store::MarketStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Rules
/// 진행 중인 상품인지 확인
pub fn ensure_active(listing: &Listing, action: &str) -> Result<(), MarketError> {
    if !listing.active {
        return Err(MarketError::InvalidState(format!(
            "종료된 경매에는 {}할 수 없습니다 (listing {})",
            action, listing.id
        )));
    }
    Ok(())
}

/// 종료 가능 여부 판정 후 낙찰자 반환 (입찰이 없으면 None)
pub fn evaluate_close(
    listing: &Listing,
    requester_id: i64,
    highest_bid: Option<&Bid>,
) -> Result<Option<i64>, MarketError> {
    if listing.owner_id != requester_id {
        return Err(MarketError::Permission(format!(
            "판매자만 경매를 종료할 수 있습니다 (listing {})",
            listing.id
        )));
    }
    if !listing.active {
        return Err(MarketError::InvalidState(format!(
            "이미 종료된 경매입니다 (listing {})",
            listing.id
        )));
    }
    Ok(highest_bid.map(|bid| bid.bidder_id))
}
// endregion: --- Rules

// region:    --- Commands
/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseListingCommand {
    pub listing_id: i64,
    pub requester_id: i64,
}

/// 경매 종료
pub async fn handle_close_listing(
    cmd: CloseListingCommand,
    store: &dyn MarketStore,
) -> Result<Listing, MarketError> {
    info!("{:<12} --> 경매 종료 요청 처리 시작: {:?}", "Command", cmd);

    match store.close_listing(cmd.listing_id, cmd.requester_id).await {
        Ok(listing) => {
            info!(
                "{:<12} --> 경매 종료: listing={}, winner={:?}",
                "Command", listing.id, listing.winner_id
            );
            Ok(listing)
        }
        Err(e) => {
            warn!("{:<12} --> 경매 종료 거절: {}", "Command", e);
            Err(e)
        }
    }
}
// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    const OWNER: i64 = 10;

    fn listing(active: bool) -> Listing {
        Listing {
            id: 1,
            owner_id: OWNER,
            title: "Camera".to_string(),
            description: "Film camera".to_string(),
            category_id: None,
            starting_price: Decimal::new(1000, 2),
            image: None,
            created_at: Utc::now(),
            active,
            winner_id: None,
        }
    }

    fn bid(bidder_id: i64, cents: i64) -> Bid {
        Bid {
            id: 5,
            listing_id: 1,
            bidder_id,
            amount: Decimal::new(cents, 2),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_closes_with_highest_bidder_as_winner() {
        let highest = bid(42, 1500);
        assert_eq!(
            evaluate_close(&listing(true), OWNER, Some(&highest)).unwrap(),
            Some(42)
        );
    }

    #[test]
    fn test_close_without_bids_leaves_winner_unset() {
        assert_eq!(evaluate_close(&listing(true), OWNER, None).unwrap(), None);
    }

    #[test]
    fn test_non_owner_cannot_close() {
        assert!(matches!(
            evaluate_close(&listing(true), OWNER + 1, None),
            Err(MarketError::Permission(_))
        ));
    }

    #[test]
    fn test_inactive_listing_cannot_be_closed_by_anyone() {
        for requester in [OWNER, OWNER + 1] {
            assert!(evaluate_close(&listing(false), requester, None).is_err());
        }
        assert!(matches!(
            evaluate_close(&listing(false), OWNER, None),
            Err(MarketError::InvalidState(_))
        ));
    }

    #[test]
    fn test_ensure_active() {
        assert!(ensure_active(&listing(true), "댓글").is_ok());
        assert!(matches!(
            ensure_active(&listing(false), "댓글"),
            Err(MarketError::InvalidState(_))
        ));
    }
}
// endregion: --- Tests
