use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 사용자 모델 (인증 정보는 외부 인증 시스템이 관리)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
}

// 카테고리 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// 경매 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub starting_price: Decimal,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub winner_id: Option<i64>,
}

// 입찰 모델 (생성 후 변경 불가)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// 댓글 모델 (생성 후 변경 불가)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// 목록 화면용 상품 + 현재 가격
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ListingSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub current_price: Decimal,
}

/// 상품 상세 조회 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub current_price: Decimal,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
    pub watcher_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watching: Option<bool>,
}

/// 카테고리별 상품 조회 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListings {
    pub category: Category,
    pub listings: Vec<ListingSummary>,
}

/// 입찰 성공 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidReceipt {
    pub bid: Bid,
    pub current_price: Decimal,
}

/// 관심 목록 토글 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchState {
    pub listing_id: i64,
    pub watching: bool,
}
