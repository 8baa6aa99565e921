use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::FeedEvent,
    routes::AppState,
    services::{discovery, geo},
};

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    /// When given, events are searched near this user's postal code
    pub user_id: Option<i64>,
}

/// Handler for popular music events
pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> AppResult<Json<Vec<FeedEvent>>> {
    let geohash = match query.user_id {
        Some(user_id) => {
            let user = state.user(user_id).await?;
            geo::locate(state.geocoder.as_ref(), &user.country_code, &user.postal_code).await
        }
        None => None,
    };

    let events = discovery::popular_events(state.ticketing.as_ref(), geohash.as_deref()).await;
    Ok(Json(events))
}
