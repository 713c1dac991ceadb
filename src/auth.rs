//! 요청 주체(Actor) 추출
//! 인증은 외부 인증 계층이 처리하고, 인증된 사용자 id를 `x-user-id` 헤더로 전달한다.

// region:    --- Imports
use crate::error::MarketError;
use crate::market::model::User;
use crate::router::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

// endregion: --- Imports

pub const USER_ID_HEADER: &str = "x-user-id";

/// 인증된 요청 주체
#[derive(Debug, Clone)]
pub struct Actor(pub User);

impl Actor {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = MarketError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or(MarketError::Unauthenticated)?;

        match state.store.find_user(user_id).await? {
            Some(user) => Ok(Actor(user)),
            None => {
                debug!("{:<12} --> 알 수 없는 사용자: {}", "Auth", user_id);
                Err(MarketError::Unauthenticated)
            }
        }
    }
}
