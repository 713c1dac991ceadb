//! 입찰 관련 커맨드 처리

// region:    --- Imports
use crate::error::MarketError;
use crate::market::model::BidReceipt;
use crate::store::MarketStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령 (금액은 검증을 통과한 값)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Decimal,
}

/// 입찰
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    store: &dyn MarketStore,
) -> Result<BidReceipt, MarketError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    match store
        .place_bid(cmd.listing_id, cmd.bidder_id, cmd.amount)
        .await
    {
        Ok(bid) => {
            info!(
                "{:<12} --> 입찰 성공: listing={}, 현재 가격 {}",
                "Command", bid.listing_id, bid.amount
            );
            // 방금 저장된 입찰이 최고가
            let current_price = bid.amount;
            Ok(BidReceipt { bid, current_price })
        }
        Err(e) => {
            warn!("{:<12} --> 입찰 거절: {}", "Command", e);
            Err(e)
        }
    }
}
// endregion: --- Commands
