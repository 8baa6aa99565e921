use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::FeedEvent,
    routes::AppState,
    services::recommendations::{self, FeedSettings},
};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Overrides the configured feed size
    pub limit: Option<usize>,
}

/// Handler for the top-artist feed: pages of up to two events
pub async fn top_artists(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<Vec<FeedEvent>>>> {
    let user = state.user(user_id).await?;
    let settings = FeedSettings {
        limit: query.limit.unwrap_or(state.feed.limit),
        ..state.feed
    };

    let pages = recommendations::top_artist_feed(
        state.ticketing.as_ref(),
        state.geocoder.as_ref(),
        state.store.as_ref(),
        &user,
        settings,
    )
    .await?;

    Ok(Json(pages))
}
