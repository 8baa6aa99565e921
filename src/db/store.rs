use crate::{
    error::AppResult,
    models::{Artist, Event, NewArtist, NewUser, User},
};

/// Persistence port for the recommendation pipeline
///
/// Artists and events are keyed by their natural keys (streaming profile id and
/// provider event id) and are never duplicated. Association rows carry no
/// identity of their own and are replaced or linked wholesale.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> AppResult<User>;

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>>;

    /// Inserts the artist unless one with the same profile id exists; returns the stored row
    async fn upsert_artist(&self, artist: &NewArtist) -> AppResult<Artist>;

    /// Replaces all of a user's artist associations, preserving the given order.
    ///
    /// The user's linked events belong to the old artist set and are cleared in
    /// the same unit of work, so the next feed request ingests for the new set.
    async fn replace_user_artists(&self, user_id: i64, artist_ids: &[i64]) -> AppResult<()>;

    /// The user's artists in association order
    async fn user_artists(&self, user_id: i64) -> AppResult<Vec<Artist>>;

    async fn event_exists(&self, event_id: &str) -> AppResult<bool>;

    /// Inserts the event if its id is new; returns whether a row was written
    async fn insert_event(&self, event: &Event) -> AppResult<bool>;

    async fn get_event(&self, event_id: &str) -> AppResult<Option<Event>>;

    /// Up to `limit` events headlined by `artist_name`, oldest first, undated last
    async fn events_for_artist(&self, artist_name: &str, limit: usize) -> AppResult<Vec<Event>>;

    /// Associates stored events with a user; existing links are kept
    async fn link_user_events(&self, user_id: i64, event_ids: &[String]) -> AppResult<()>;

    /// Up to `limit` of the user's events, oldest first, undated last
    async fn user_events(&self, user_id: i64, limit: usize) -> AppResult<Vec<Event>>;

    async fn add_to_wishlist(&self, user_id: i64, event_id: &str) -> AppResult<()>;

    /// Returns whether an entry was removed
    async fn remove_from_wishlist(&self, user_id: i64, event_id: &str) -> AppResult<bool>;

    /// Wishlisted events in the order they were added
    async fn wishlist(&self, user_id: i64) -> AppResult<Vec<Event>>;
}
