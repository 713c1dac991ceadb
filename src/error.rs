//! 도메인 에러 정의
//! 요청 경계에서 모두 JSON 거절 응답으로 변환된다.

// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::error;

// endregion: --- Imports

// region:    --- Market Error
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("{entity} {key}을(를) 찾을 수 없습니다.")]
    NotFound { entity: &'static str, key: String },

    #[error("권한이 없습니다: {0}")]
    Permission(String),

    #[error("현재 상태에서 처리할 수 없는 요청입니다: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("인증되지 않은 요청입니다.")]
    Unauthenticated,

    #[error("저장소 오류: {0}")]
    Store(#[from] sqlx::Error),
}

impl MarketError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// 클라이언트가 분기할 수 있는 고정 코드
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Permission(_) => "FORBIDDEN",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Validation(ValidationError::Field { .. }) => "INVALID_FIELD",
            Self::Validation(ValidationError::BusinessRule(rule)) => rule.code(),
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Permission(_) => StatusCode::FORBIDDEN,
            Self::InvalidState(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Store(e) => {
                error!("{:<12} --> 저장소 오류: {:?}", "Store", e);
                json!({
                    "error": "저장소 처리 중 오류가 발생했습니다.",
                    "code": self.code(),
                })
            }
            Self::Validation(ValidationError::Field { field, .. }) => json!({
                "error": self.to_string(),
                "code": self.code(),
                "field": field,
            }),
            Self::Validation(ValidationError::BusinessRule(BusinessRuleViolation::BidTooLow {
                amount,
                current_price,
            })) => json!({
                "error": self.to_string(),
                "code": self.code(),
                "bid_amount": amount,
                "current_price": current_price,
            }),
            _ => json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
// endregion: --- Market Error

// region:    --- Validation Error
/// 입력 형식 오류(Field)와 도메인 규칙 위반(BusinessRule)을 구분한다.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} 값이 올바르지 않습니다: {reason}")]
    Field { field: &'static str, reason: String },

    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleViolation),
}

impl ValidationError {
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Field {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BusinessRuleViolation {
    #[error("입찰 금액({amount})은 현재 가격({current_price})보다 높아야 합니다.")]
    BidTooLow {
        amount: Decimal,
        current_price: Decimal,
    },

    #[error("입찰 금액({amount})은 시작 가격({starting_price}) 이상이어야 합니다.")]
    BelowStartingPrice {
        amount: Decimal,
        starting_price: Decimal,
    },

    #[error("이미 사용 중인 사용자 이름입니다: {0}")]
    UsernameTaken(String),

    #[error("이미 존재하는 카테고리입니다: {0}")]
    CategoryExists(String),
}

impl BusinessRuleViolation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BidTooLow { .. } => "LOW_BID",
            Self::BelowStartingPrice { .. } => "BELOW_STARTING_PRICE",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::CategoryExists(_) => "CATEGORY_EXISTS",
        }
    }
}

impl From<BusinessRuleViolation> for MarketError {
    fn from(rule: BusinessRuleViolation) -> Self {
        MarketError::Validation(ValidationError::BusinessRule(rule))
    }
}
// endregion: --- Validation Error

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_and_business_rule_are_distinguishable() {
        let field: MarketError = ValidationError::field("price", "숫자 형식이 아닙니다").into();
        let rule: MarketError = BusinessRuleViolation::BidTooLow {
            amount: Decimal::new(1000, 2),
            current_price: Decimal::new(1000, 2),
        }
        .into();

        assert_eq!(field.code(), "INVALID_FIELD");
        assert_eq!(rule.code(), "LOW_BID");
        assert_eq!(field.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rule.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(
            rule,
            MarketError::Validation(ValidationError::BusinessRule(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            MarketError::not_found("listing", 7).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MarketError::Permission("owner only".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            MarketError::InvalidState("closed".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            MarketError::Unauthenticated.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            MarketError::Store(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
// endregion: --- Tests
