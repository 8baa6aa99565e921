use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{Event, FeedEvent},
    services::{normalizer::normalize_event, providers::TicketingProvider},
};

/// Saves an event to the user's wishlist.
///
/// Events not yet stored are fetched from the ticketing provider and stored
/// first; an id the provider does not know is `NotFound`.
pub async fn add_event(
    provider: &dyn TicketingProvider,
    store: &dyn Store,
    user_id: i64,
    event_id: &str,
) -> AppResult<FeedEvent> {
    let event = match store.get_event(event_id).await? {
        Some(event) => event,
        None => fetch_and_store(provider, store, event_id).await?,
    };

    store.add_to_wishlist(user_id, &event.event_id).await?;
    tracing::debug!(user_id, event_id = %event.event_id, "Event wishlisted");

    Ok(FeedEvent::from(&event))
}

async fn fetch_and_store(
    provider: &dyn TicketingProvider,
    store: &dyn Store,
    event_id: &str,
) -> AppResult<Event> {
    let raw = provider
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {}", event_id)))?;

    let event = normalize_event(&raw);
    store.insert_event(&event).await?;
    Ok(event)
}

pub async fn remove_event(store: &dyn Store, user_id: i64, event_id: &str) -> AppResult<()> {
    if store.remove_from_wishlist(user_id, event_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "Event {} is not on the wishlist",
            event_id
        )))
    }
}

/// The user's wishlist in the order events were saved
pub async fn list_events(store: &dyn Store, user_id: i64) -> AppResult<Vec<FeedEvent>> {
    let events = store.wishlist(user_id).await?;
    Ok(events.iter().map(FeedEvent::from).collect())
}
