// region:    --- Imports
use crate::auth::Actor;
use crate::bidding::commands::{handle_place_bid, PlaceBidCommand};
use crate::error::{MarketError, ValidationError};
use crate::lifecycle::{handle_close_listing, CloseListingCommand};
use crate::market::commands;
use crate::market::validation::{
    BidForm, CategoryForm, CommentForm, CreateListingForm, RegisterForm,
};
use crate::query;
use crate::router::AppState;
use crate::watchlist;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

// endregion: --- Imports

type HandlerResult = Result<axum::response::Response, MarketError>;

/// 선택적 요청 주체: 미인증은 익명 조회, 저장소 오류는 그대로 전파
fn viewer_id(actor: Result<Actor, MarketError>) -> Result<Option<i64>, MarketError> {
    match actor {
        Ok(actor) => Ok(Some(actor.id())),
        Err(MarketError::Unauthenticated) => Ok(None),
        Err(e) => Err(e),
    }
}

/// JSON 본문 파싱 실패도 필드 검증 오류로 보고
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MarketError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ValidationError::field("body", rejection.body_text()).into())
}

// region:    --- Command Handlers

/// 사용자 등록
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterForm>, JsonRejection>,
) -> HandlerResult {
    let user = body(payload)?.validate()?;
    let user = commands::handle_register_user(user, state.store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// 상품 등록 화면 정보 (선택 가능한 카테고리)
pub async fn handle_create_form(State(state): State<AppState>, actor: Actor) -> HandlerResult {
    info!("{:<12} --> 상품 등록 화면 user: {}", "HandlerQuery", actor.id());
    let categories = query::handlers::get_categories(state.store.as_ref()).await?;
    Ok(Json(json!({ "categories": categories })).into_response())
}

/// 상품 등록
pub async fn handle_create_listing(
    State(state): State<AppState>,
    actor: Actor,
    payload: Result<Json<CreateListingForm>, JsonRejection>,
) -> HandlerResult {
    let listing = body(payload)?.validate()?;
    let listing =
        commands::handle_create_listing(actor.id(), listing, state.store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(listing)).into_response())
}

/// 경매 종료
pub async fn handle_close(
    State(state): State<AppState>,
    actor: Actor,
    Path(listing_id): Path<i64>,
) -> HandlerResult {
    let cmd = CloseListingCommand {
        listing_id,
        requester_id: actor.id(),
    };
    let listing = handle_close_listing(cmd, state.store.as_ref()).await?;
    Ok(Json(listing).into_response())
}

/// 입찰
pub async fn handle_bid(
    State(state): State<AppState>,
    actor: Actor,
    Path(listing_id): Path<i64>,
    payload: Result<Json<BidForm>, JsonRejection>,
) -> HandlerResult {
    let amount = body(payload)?.validate()?;
    let cmd = PlaceBidCommand {
        listing_id,
        bidder_id: actor.id(),
        amount,
    };
    let receipt = handle_place_bid(cmd, state.store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(receipt)).into_response())
}

/// 댓글 작성
pub async fn handle_comment(
    State(state): State<AppState>,
    actor: Actor,
    Path(listing_id): Path<i64>,
    payload: Result<Json<CommentForm>, JsonRejection>,
) -> HandlerResult {
    let text = body(payload)?.validate()?;
    let comment =
        commands::handle_add_comment(listing_id, actor.id(), text, state.store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

/// 관심 목록 토글
pub async fn handle_toggle_watch(
    State(state): State<AppState>,
    actor: Actor,
    Path(listing_id): Path<i64>,
) -> HandlerResult {
    let watch_state =
        watchlist::handle_toggle_watch(listing_id, actor.id(), state.store.as_ref()).await?;
    Ok(Json(watch_state).into_response())
}

/// 카테고리 등록
pub async fn handle_create_category(
    State(state): State<AppState>,
    actor: Actor,
    payload: Result<Json<CategoryForm>, JsonRejection>,
) -> HandlerResult {
    let name = body(payload)?.validate()?;
    info!(
        "{:<12} --> 카테고리 등록 요청 user: {}",
        "Command",
        actor.id()
    );
    let category = commands::handle_create_category(name, state.store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(category)).into_response())
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중인 상품 목록
pub async fn handle_index(State(state): State<AppState>) -> HandlerResult {
    info!("{:<12} --> 진행 중인 상품 목록", "HandlerQuery");
    let listings = query::handlers::get_active_listings(state.store.as_ref()).await?;
    Ok(Json(listings).into_response())
}

/// 상품 상세
pub async fn handle_get_listing(
    State(state): State<AppState>,
    actor: Result<Actor, MarketError>,
    Path(listing_id): Path<i64>,
) -> HandlerResult {
    info!("{:<12} --> 상품 상세 id: {}", "HandlerQuery", listing_id);
    let viewer_id = viewer_id(actor)?;
    let detail =
        query::handlers::get_listing_detail(state.store.as_ref(), listing_id, viewer_id).await?;
    Ok(Json(detail).into_response())
}

/// 관심 목록
pub async fn handle_get_watchlist(State(state): State<AppState>, actor: Actor) -> HandlerResult {
    info!("{:<12} --> 관심 목록 user: {}", "HandlerQuery", actor.id());
    let listings = query::handlers::get_watchlist(state.store.as_ref(), actor.id()).await?;
    Ok(Json(listings).into_response())
}

/// 카테고리 목록
pub async fn handle_get_categories(State(state): State<AppState>) -> HandlerResult {
    info!("{:<12} --> 카테고리 목록", "HandlerQuery");
    let categories = query::handlers::get_categories(state.store.as_ref()).await?;
    Ok(Json(categories).into_response())
}

/// 카테고리별 상품
pub async fn handle_get_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult {
    info!("{:<12} --> 카테고리별 상품: {}", "HandlerQuery", name);
    let result = query::handlers::get_category_listings(state.store.as_ref(), &name).await?;
    Ok(Json(result).into_response())
}

// endregion: --- Query Handlers

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::model::User;
    use chrono::Utc;

    #[test]
    fn test_viewer_id_anonymous_when_unauthenticated() {
        assert_eq!(viewer_id(Err(MarketError::Unauthenticated)).unwrap(), None);

        let user = User {
            id: 7,
            username: "viewer".to_string(),
            email: String::new(),
            date_joined: Utc::now(),
        };
        assert_eq!(viewer_id(Ok(Actor(user))).unwrap(), Some(7));
    }

    #[test]
    fn test_viewer_id_propagates_store_failure() {
        let err = viewer_id(Err(MarketError::Store(sqlx::Error::PoolTimedOut))).unwrap_err();
        assert!(matches!(err, MarketError::Store(_)));
    }
}
// endregion: --- Tests
