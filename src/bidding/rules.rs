//! 입찰 판정 규칙
//! 저장소 구현체가 잠금을 잡은 상태에서 호출한다.

// region:    --- Imports
use crate::error::{BusinessRuleViolation, MarketError};
use crate::lifecycle;
use crate::market::model::Listing;
use rust_decimal::Decimal;

// endregion: --- Imports

/// 현재 가격: 최고 입찰가, 입찰이 없으면 시작 가격
pub fn current_price(starting_price: Decimal, highest_bid: Option<Decimal>) -> Decimal {
    highest_bid.unwrap_or(starting_price)
}

/// 입찰 가능 여부 판정
pub fn evaluate_bid(
    listing: &Listing,
    highest_bid: Option<Decimal>,
    amount: Decimal,
) -> Result<(), MarketError> {
    lifecycle::ensure_active(listing, "입찰")?;

    let current_price = current_price(listing.starting_price, highest_bid);
    if amount <= current_price {
        return Err(BusinessRuleViolation::BidTooLow {
            amount,
            current_price,
        }
        .into());
    }

    // 시작 가격 하한은 입찰 이력과 무관하게 다시 확인
    if amount < listing.starting_price {
        return Err(BusinessRuleViolation::BelowStartingPrice {
            amount,
            starting_price: listing.starting_price,
        }
        .into());
    }

    Ok(())
}

// endregion: --- Tests
