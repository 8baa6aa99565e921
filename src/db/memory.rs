use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{sort_events_by_date, Artist, Event, NewArtist, NewUser, User},
};

/// In-memory store for development and tests
///
/// Mirrors the PostgreSQL store's contract, including its ordering rules and
/// natural-key uniqueness.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_user_id: i64,
    next_artist_id: i64,
    users: Vec<User>,
    artists: Vec<Artist>,
    events: Vec<Event>,
    user_artists: HashMap<i64, Vec<i64>>,
    user_events: HashMap<i64, Vec<String>>,
    wishlist: HashMap<i64, Vec<String>>,
}

impl Inner {
    fn event(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.event_id == event_id)
    }

    fn events_by_id(&self, ids: &[String]) -> Vec<Event> {
        ids.iter().filter_map(|id| self.event(id)).cloned().collect()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events
    pub async fn event_count(&self) -> usize {
        self.inner.read().await.events.len()
    }

    /// Every stored event in insertion order
    pub async fn all_events(&self) -> Vec<Event> {
        self.inner.read().await.events.clone()
    }
}

#[async_trait::async_trait]
impl Store for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::InvalidInput(format!(
                "Username {} already in use",
                user.username
            )));
        }

        inner.next_user_id += 1;
        let created = User {
            id: inner.next_user_id,
            username: user.username.clone(),
            country_code: user.country_code.clone(),
            postal_code: user.postal_code.clone(),
            created_at: Utc::now(),
        };
        inner.users.push(created.clone());

        Ok(created)
    }

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn upsert_artist(&self, artist: &NewArtist) -> AppResult<Artist> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .artists
            .iter()
            .find(|a| a.external_profile_id == artist.external_profile_id)
        {
            return Ok(existing.clone());
        }

        inner.next_artist_id += 1;
        let stored = Artist {
            id: inner.next_artist_id,
            name: artist.name.clone(),
            external_profile_id: artist.external_profile_id.clone(),
            external_profile_url: artist.external_profile_url.clone(),
            image_url: artist.image_url.clone(),
            attraction_id: artist.attraction_id.clone(),
        };
        inner.artists.push(stored.clone());

        Ok(stored)
    }

    async fn replace_user_artists(&self, user_id: i64, artist_ids: &[i64]) -> AppResult<()> {
        let mut inner = self.inner.write().await;

        let mut ids: Vec<i64> = Vec::with_capacity(artist_ids.len());
        for id in artist_ids {
            if !inner.artists.iter().any(|a| a.id == *id) {
                return Err(AppError::NotFound(format!("Artist {}", id)));
            }
            if !ids.contains(id) {
                ids.push(*id);
            }
        }

        inner.user_artists.insert(user_id, ids);
        inner.user_events.remove(&user_id);
        Ok(())
    }

    async fn user_artists(&self, user_id: i64) -> AppResult<Vec<Artist>> {
        let inner = self.inner.read().await;
        let ids = inner.user_artists.get(&user_id).cloned().unwrap_or_default();

        Ok(ids
            .iter()
            .filter_map(|id| inner.artists.iter().find(|a| a.id == *id))
            .cloned()
            .collect())
    }

    async fn event_exists(&self, event_id: &str) -> AppResult<bool> {
        Ok(self.inner.read().await.event(event_id).is_some())
    }

    async fn insert_event(&self, event: &Event) -> AppResult<bool> {
        let mut inner = self.inner.write().await;

        if inner.event(&event.event_id).is_some() {
            return Ok(false);
        }

        inner.events.push(event.clone());
        Ok(true)
    }

    async fn get_event(&self, event_id: &str) -> AppResult<Option<Event>> {
        Ok(self.inner.read().await.event(event_id).cloned())
    }

    async fn events_for_artist(&self, artist_name: &str, limit: usize) -> AppResult<Vec<Event>> {
        let inner = self.inner.read().await;

        let mut events: Vec<Event> = inner
            .events
            .iter()
            .filter(|e| e.artist_name == artist_name)
            .cloned()
            .collect();
        sort_events_by_date(&mut events);
        events.truncate(limit);

        Ok(events)
    }

    async fn link_user_events(&self, user_id: i64, event_ids: &[String]) -> AppResult<()> {
        let mut inner = self.inner.write().await;

        if let Some(missing) = event_ids.iter().find(|id| inner.event(id).is_none()) {
            return Err(AppError::NotFound(format!("Event {}", missing)));
        }

        let linked = inner.user_events.entry(user_id).or_default();
        for id in event_ids {
            if !linked.contains(id) {
                linked.push(id.clone());
            }
        }

        Ok(())
    }

    async fn user_events(&self, user_id: i64, limit: usize) -> AppResult<Vec<Event>> {
        let inner = self.inner.read().await;
        let ids = inner.user_events.get(&user_id).cloned().unwrap_or_default();

        let mut events = inner.events_by_id(&ids);
        sort_events_by_date(&mut events);
        events.truncate(limit);

        Ok(events)
    }

    async fn add_to_wishlist(&self, user_id: i64, event_id: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;

        if inner.event(event_id).is_none() {
            return Err(AppError::NotFound(format!("Event {}", event_id)));
        }

        let entries = inner.wishlist.entry(user_id).or_default();
        if !entries.iter().any(|id| id == event_id) {
            entries.push(event_id.to_string());
        }

        Ok(())
    }

    async fn remove_from_wishlist(&self, user_id: i64, event_id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;

        let Some(entries) = inner.wishlist.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|id| id != event_id);

        Ok(entries.len() < before)
    }

    async fn wishlist(&self, user_id: i64) -> AppResult<Vec<Event>> {
        let inner = self.inner.read().await;
        let ids = inner.wishlist.get(&user_id).cloned().unwrap_or_default();
        Ok(inner.events_by_id(&ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_artist(profile_id: &str, attraction_id: &str) -> NewArtist {
        NewArtist {
            name: format!("Artist {}", profile_id),
            external_profile_id: profile_id.to_string(),
            external_profile_url: format!("https://open.spotify.com/artist/{}", profile_id),
            image_url: "https://i.scdn.co/x".to_string(),
            attraction_id: Some(attraction_id.to_string()),
        }
    }

    fn event(id: &str, artist: &str, date: Option<NaiveDate>) -> Event {
        Event {
            event_id: id.to_string(),
            name: format!("{} live", artist),
            artist_name: artist.to_string(),
            url: format!("https://tickets.example/{}", id),
            image_url: "https://img/x.jpg".to_string(),
            date,
            location: "TBA".to_string(),
        }
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 6, d)
    }

    #[tokio::test]
    async fn test_upsert_artist_is_keyed_by_profile_id() {
        let store = InMemoryStore::new();

        let first = store.upsert_artist(&new_artist("p1", "K1")).await.unwrap();
        let again = store.upsert_artist(&new_artist("p1", "K1")).await.unwrap();
        let other = store.upsert_artist(&new_artist("p2", "K2")).await.unwrap();

        assert_eq!(first.id, again.id);
        assert_ne!(first.id, other.id);
    }

    #[tokio::test]
    async fn test_replace_user_artists_is_full_replace() {
        let store = InMemoryStore::new();
        let a = store.upsert_artist(&new_artist("a", "Ka")).await.unwrap();
        let b = store.upsert_artist(&new_artist("b", "Kb")).await.unwrap();
        let c = store.upsert_artist(&new_artist("c", "Kc")).await.unwrap();

        store.replace_user_artists(1, &[a.id, b.id]).await.unwrap();
        store.replace_user_artists(1, &[c.id, a.id]).await.unwrap();

        let names: Vec<String> = store
            .user_artists(1)
            .await
            .unwrap()
            .into_iter()
            .map(|artist| artist.external_profile_id)
            .collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_replace_user_artists_clears_linked_events() {
        let store = InMemoryStore::new();
        let a = store.upsert_artist(&new_artist("a", "Ka")).await.unwrap();
        let b = store.upsert_artist(&new_artist("b", "Kb")).await.unwrap();
        store.insert_event(&event("e1", "Artist a", day(1))).await.unwrap();

        store.replace_user_artists(1, &[a.id]).await.unwrap();
        store.link_user_events(1, &["e1".to_string()]).await.unwrap();
        store.link_user_events(2, &["e1".to_string()]).await.unwrap();
        store.replace_user_artists(1, &[b.id]).await.unwrap();

        assert!(store.user_events(1, 16).await.unwrap().is_empty());
        assert_eq!(store.user_events(2, 16).await.unwrap().len(), 1);
        assert!(store.event_exists("e1").await.unwrap());
    }

    #[tokio::test]
    async fn test_ties_ordered_by_event_id() {
        let store = InMemoryStore::new();
        store.insert_event(&event("tba-b", "Muse", None)).await.unwrap();
        store.insert_event(&event("same-b", "Muse", day(4))).await.unwrap();
        store.insert_event(&event("tba-a", "Muse", None)).await.unwrap();
        store.insert_event(&event("same-a", "Muse", day(4))).await.unwrap();

        let ids: Vec<String> = store
            .events_for_artist("Muse", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_id)
            .collect();
        assert_eq!(ids, vec!["same-a", "same-b", "tba-a", "tba-b"]);
    }

    #[tokio::test]
    async fn test_insert_event_never_duplicates() {
        let store = InMemoryStore::new();

        assert!(store.insert_event(&event("e1", "Muse", day(1))).await.unwrap());
        assert!(!store.insert_event(&event("e1", "Muse", day(2))).await.unwrap());

        assert_eq!(store.event_count().await, 1);
        assert_eq!(store.get_event("e1").await.unwrap().unwrap().date, day(1));
    }

    #[tokio::test]
    async fn test_events_for_artist_ordered_and_limited() {
        let store = InMemoryStore::new();
        store.insert_event(&event("tba", "Muse", None)).await.unwrap();
        store.insert_event(&event("late", "Muse", day(20))).await.unwrap();
        store.insert_event(&event("other", "Blur", day(1))).await.unwrap();
        store.insert_event(&event("early", "Muse", day(5))).await.unwrap();

        let ids: Vec<String> = store
            .events_for_artist("Muse", 2)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_id)
            .collect();
        assert_eq!(ids, vec!["early", "late"]);

        let all = store.events_for_artist("Muse", 10).await.unwrap();
        assert_eq!(all.last().unwrap().event_id, "tba");
    }

    #[tokio::test]
    async fn test_user_events_link_and_order() {
        let store = InMemoryStore::new();
        store.insert_event(&event("b", "Muse", day(9))).await.unwrap();
        store.insert_event(&event("a", "Muse", day(3))).await.unwrap();

        store
            .link_user_events(7, &["b".to_string(), "a".to_string()])
            .await
            .unwrap();
        store.link_user_events(7, &["a".to_string()]).await.unwrap();

        let events = store.user_events(7, 16).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, "a");
    }

    #[tokio::test]
    async fn test_link_unknown_event_is_not_found() {
        let store = InMemoryStore::new();
        let result = store.link_user_events(7, &["ghost".to_string()]).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_wishlist_add_remove() {
        let store = InMemoryStore::new();
        store.insert_event(&event("e1", "Muse", day(1))).await.unwrap();

        store.add_to_wishlist(3, "e1").await.unwrap();
        store.add_to_wishlist(3, "e1").await.unwrap();
        assert_eq!(store.wishlist(3).await.unwrap().len(), 1);

        assert!(store.remove_from_wishlist(3, "e1").await.unwrap());
        assert!(!store.remove_from_wishlist(3, "e1").await.unwrap());
        assert!(store.wishlist(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryStore::new();
        let user = NewUser {
            username: "sam".to_string(),
            country_code: "us".to_string(),
            postal_code: "90001".to_string(),
        };

        tokio_test::assert_ok!(store.create_user(&user).await);
        tokio_test::assert_err!(store.create_user(&user).await);
    }
}
