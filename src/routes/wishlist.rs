use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::FeedEvent,
    routes::AppState,
    services::wishlist,
};

#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub event_id: String,
}

pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<FeedEvent>>> {
    state.user(user_id).await?;
    Ok(Json(wishlist::list_events(state.store.as_ref(), user_id).await?))
}

/// Handler for saving an event, fetching it upstream when not yet stored
pub async fn add(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<WishlistRequest>,
) -> AppResult<(StatusCode, Json<FeedEvent>)> {
    let event_id = request.event_id.trim();
    if event_id.is_empty() {
        return Err(AppError::InvalidInput("event_id is required".to_string()));
    }
    state.user(user_id).await?;

    let event = wishlist::add_event(
        state.ticketing.as_ref(),
        state.store.as_ref(),
        user_id,
        event_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, String)>,
) -> AppResult<StatusCode> {
    state.user(user_id).await?;
    wishlist::remove_event(state.store.as_ref(), user_id, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
