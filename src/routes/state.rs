use std::sync::Arc;

use crate::{
    config::Config,
    db::Store,
    error::{AppError, AppResult},
    models::User,
    services::{
        providers::{Geocoder, ListeningProvider, TicketingProvider},
        recommendations::FeedSettings,
    },
};

/// Shared application state
///
/// Every collaborator is a trait object so the router can be assembled over
/// PostgreSQL and the live APIs, or over the in-memory store and test doubles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub ticketing: Arc<dyn TicketingProvider>,
    pub listening: Arc<dyn ListeningProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub feed: FeedSettings,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        ticketing: Arc<dyn TicketingProvider>,
        listening: Arc<dyn ListeningProvider>,
        geocoder: Arc<dyn Geocoder>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            ticketing,
            listening,
            geocoder,
            feed: FeedSettings {
                limit: config.feed_limit,
                max_artists: config.max_feed_artists,
            },
        }
    }

    /// Loads the acting user or fails with `NotFound`
    pub async fn user(&self, user_id: i64) -> AppResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))
    }
}
