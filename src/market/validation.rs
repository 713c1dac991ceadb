//! 입력 검증
//!
//! 외부 입력(JSON 본문)을 검증된 값으로 변환한다. 필드 형식 오류는
//! `ValidationError::Field`로, 도메인 규칙 위반은 각 커맨드에서 따로 보고한다.

use crate::error::ValidationError;
use email_address::EmailAddress;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use url::Url;

// region:    --- Limits
pub const TITLE_MAX_CHARS: usize = 128;
pub const USERNAME_MAX_CHARS: usize = 150;
pub const CATEGORY_NAME_MAX_CHARS: usize = 64;
/// NUMERIC(12, 2)
pub const PRICE_MAX_DIGITS: u32 = 12;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// 최소 금액 0.01
pub fn min_price() -> Decimal {
    Decimal::new(1, PRICE_DECIMAL_PLACES)
}
// endregion: --- Limits

// region:    --- Amount
/// 금액 입력. JSON 문자열("12.50")과 숫자(12.5) 모두 받는다.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl AmountInput {
    fn to_text(&self) -> String {
        match self {
            AmountInput::Text(s) => s.trim().to_string(),
            AmountInput::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for AmountInput {
    fn from(s: &str) -> Self {
        AmountInput::Text(s.to_string())
    }
}

/// 금액 파싱 및 검증 (0.01 이상, 소수점 2자리 이하, 전체 12자리 이하)
pub fn parse_amount(field: &'static str, input: &AmountInput) -> Result<Decimal, ValidationError> {
    let raw = input.to_text();
    if raw.is_empty() {
        return Err(ValidationError::field(field, "값이 비어 있습니다"));
    }
    if raw.contains(['e', 'E']) {
        return Err(ValidationError::field(
            field,
            "지수 표기는 허용되지 않습니다",
        ));
    }

    if !is_plain_decimal(&raw) {
        return Err(ValidationError::field(
            field,
            format!("숫자 형식이 아닙니다: '{}'", raw),
        ));
    }

    let mut amount = Decimal::from_str(&raw)
        .map_err(|_| ValidationError::field(field, format!("숫자 형식이 아닙니다: '{}'", raw)))?;

    if amount.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(ValidationError::field(
            field,
            format!("소수점 이하 {}자리까지만 허용됩니다", PRICE_DECIMAL_PLACES),
        ));
    }
    if amount < min_price() {
        return Err(ValidationError::field(
            field,
            format!("{} 이상이어야 합니다", min_price()),
        ));
    }

    amount.rescale(PRICE_DECIMAL_PLACES);
    if amount.mantissa().unsigned_abs() >= 10u128.pow(PRICE_MAX_DIGITS) {
        return Err(ValidationError::field(
            field,
            format!("전체 {}자리를 넘을 수 없습니다", PRICE_MAX_DIGITS),
        ));
    }

    Ok(amount)
}

/// 부호, 자릿수 구분자 없이 숫자와 소수점 하나만 허용 ("12", "12.5", ".5", "5.")
fn is_plain_decimal(raw: &str) -> bool {
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    digits(int_part) && digits(frac_part) && !(int_part.is_empty() && frac_part.is_empty())
}
// endregion: --- Amount

// region:    --- Helpers
fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::field(field, "값이 비어 있습니다"));
    }
    Ok(value.to_string())
}

fn bounded_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let value = required_text(field, value)?;
    let len = value.chars().count();
    if len > max_chars {
        return Err(ValidationError::field(
            field,
            format!("최대 {}자까지 허용됩니다 (현재 {}자)", max_chars, len),
        ));
    }
    Ok(value)
}

fn optional_image_url(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let url = Url::parse(value)
        .map_err(|e| ValidationError::field("image", format!("URL 형식이 아닙니다: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url.to_string())),
        scheme => Err(ValidationError::field(
            "image",
            format!("지원하지 않는 URL 스킴입니다: {}", scheme),
        )),
    }
}
// endregion: --- Helpers

// region:    --- Forms
/// 상품 등록 요청
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListingForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<i64>,
    pub price: AmountInput,
    #[serde(default)]
    pub image: Option<String>,
}

/// 검증된 상품 등록 값 (카테고리 존재 여부는 커맨드에서 확인)
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub starting_price: Decimal,
    pub image: Option<String>,
}

impl CreateListingForm {
    pub fn validate(&self) -> Result<NewListing, ValidationError> {
        Ok(NewListing {
            title: bounded_text("title", &self.title, TITLE_MAX_CHARS)?,
            description: required_text("description", &self.description)?,
            category_id: self.category,
            starting_price: parse_amount("price", &self.price)?,
            image: optional_image_url(self.image.as_deref())?,
        })
    }
}

/// 입찰 요청
#[derive(Debug, Clone, Deserialize)]
pub struct BidForm {
    pub amount: AmountInput,
}

impl BidForm {
    pub fn validate(&self) -> Result<Decimal, ValidationError> {
        parse_amount("amount", &self.amount)
    }
}

/// 댓글 요청
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        required_text("text", &self.text)
    }
}

/// 사용자 등록 요청 (비밀번호는 외부 인증 시스템 소관)
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let username = bounded_text("username", &self.username, USERNAME_MAX_CHARS)?;
        if let Some(c) = username
            .chars()
            .find(|c| !(c.is_alphanumeric() || "@.+-_".contains(*c)))
        {
            return Err(ValidationError::field(
                "username",
                format!("허용되지 않는 문자입니다: '{}'", c),
            ));
        }

        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if !email.is_empty() && !EmailAddress::is_valid(email) {
            return Err(ValidationError::field(
                "email",
                format!("이메일 형식이 아닙니다: '{}'", email),
            ));
        }

        Ok(NewUser {
            username,
            email: email.to_string(),
        })
    }
}

/// 카테고리 등록 요청
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        bounded_text("name", &self.name, CATEGORY_NAME_MAX_CHARS)
    }
}
// endregion: --- Forms

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ValidationError) -> &'static str {
        match err {
            ValidationError::Field { field, .. } => field,
            other => panic!("expected field error, got {:?}", other),
        }
    }

    fn listing_form(price: &str) -> CreateListingForm {
        CreateListingForm {
            title: "Vintage camera".to_string(),
            description: "Works fine".to_string(),
            category: None,
            price: price.into(),
            image: None,
        }
    }

    #[test]
    fn test_parse_amount_accepts_two_decimal_places() {
        let amount = parse_amount("amount", &"12.5".into()).unwrap();
        assert_eq!(amount, Decimal::new(1250, 2));
        assert_eq!(amount.to_string(), "12.50");

        let amount = parse_amount("amount", &" 0.01 ".into()).unwrap();
        assert_eq!(amount, min_price());
    }

    #[test]
    fn test_parse_amount_accepts_json_numbers() {
        let input: AmountInput = serde_json::from_str("15").unwrap();
        assert_eq!(parse_amount("amount", &input).unwrap(), Decimal::new(1500, 2));

        let input: AmountInput = serde_json::from_str("12.5").unwrap();
        assert_eq!(parse_amount("amount", &input).unwrap(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        for raw in [
            "", "abc", "0", "0.00", "-5", "1.005", "1e3", "10000000000.00", "1_000", "1_0.5_0",
            "+5", ".", "1.2.3", "1,000", "1 000",
        ] {
            let err = parse_amount("amount", &raw.into()).unwrap_err();
            assert_eq!(field_of(err), "amount", "input {:?}", raw);
        }
    }

    #[test]
    fn test_parse_amount_trailing_zeros_are_not_extra_precision() {
        let amount = parse_amount("amount", &"7.500".into()).unwrap();
        assert_eq!(amount, Decimal::new(750, 2));
    }

    #[test]
    fn test_parse_amount_upper_bound() {
        assert!(parse_amount("price", &"9999999999.99".into()).is_ok());
    }

    #[test]
    fn test_listing_form_valid() {
        let mut form = listing_form("10.00");
        form.image = Some("https://example.com/cam.png".to_string());
        form.category = Some(3);

        let listing = form.validate().unwrap();
        assert_eq!(listing.title, "Vintage camera");
        assert_eq!(listing.starting_price, Decimal::new(1000, 2));
        assert_eq!(listing.category_id, Some(3));
        assert_eq!(listing.image.as_deref(), Some("https://example.com/cam.png"));
    }

    #[test]
    fn test_listing_form_blank_image_is_none() {
        let mut form = listing_form("10.00");
        form.image = Some("   ".to_string());
        assert_eq!(form.validate().unwrap().image, None);
    }

    #[test]
    fn test_listing_form_reports_failing_field() {
        let mut form = listing_form("10.00");
        form.title = "  ".to_string();
        assert_eq!(field_of(form.validate().unwrap_err()), "title");

        let mut form = listing_form("10.00");
        form.title = "x".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(field_of(form.validate().unwrap_err()), "title");

        let mut form = listing_form("10.00");
        form.description = String::new();
        assert_eq!(field_of(form.validate().unwrap_err()), "description");

        let form = listing_form("0.001");
        assert_eq!(field_of(form.validate().unwrap_err()), "price");

        let mut form = listing_form("10.00");
        form.image = Some("not a url".to_string());
        assert_eq!(field_of(form.validate().unwrap_err()), "image");

        let mut form = listing_form("10.00");
        form.image = Some("ftp://example.com/cam.png".to_string());
        assert_eq!(field_of(form.validate().unwrap_err()), "image");
    }

    #[test]
    fn test_comment_form() {
        let form = CommentForm {
            text: "  still available?  ".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "still available?");

        let form = CommentForm {
            text: "\n\t".to_string(),
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "text");
    }

    #[test]
    fn test_register_form() {
        let form = RegisterForm {
            username: "alice.b+1".to_string(),
            email: Some("alice@example.com".to_string()),
        };
        let user = form.validate().unwrap();
        assert_eq!(user.username, "alice.b+1");
        assert_eq!(user.email, "alice@example.com");

        let form = RegisterForm {
            username: "bob".to_string(),
            email: None,
        };
        assert_eq!(form.validate().unwrap().email, "");

        let form = RegisterForm {
            username: "bob smith".to_string(),
            email: None,
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "username");

        let form = RegisterForm {
            username: "bob".to_string(),
            email: Some("nope".to_string()),
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "email");
    }

    #[test]
    fn test_category_form() {
        let form = CategoryForm {
            name: " Books ".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "Books");

        let form = CategoryForm {
            name: "x".repeat(CATEGORY_NAME_MAX_CHARS + 1),
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "name");
    }
}
// endregion: --- Tests
