//! 경매 마켓 도메인 모델, 입력 검증, 생성 커맨드

pub mod commands;
pub mod model;
pub mod validation;

pub use model::{Bid, Category, Comment, Listing, ListingDetail, ListingSummary, User};
pub use validation::{AmountInput, NewListing, NewUser};
