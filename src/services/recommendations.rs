use crate::{
    db::Store,
    error::AppResult,
    models::{Artist, Event, FeedEvent, TopTrack, User},
    services::{
        composer::compose_feed,
        geo,
        identity::resolve_artists,
        ingestion::{ingest_events, EVENTS_PER_ARTIST},
        providers::{Geocoder, ListeningProvider, TicketingProvider},
    },
};

/// Result of linking a user's streaming account artists
#[derive(Debug, Clone, serde::Serialize)]
pub struct LinkedArtists {
    /// Stored artists now associated with the user, in streaming rank order
    pub artists: Vec<Artist>,
    pub top_tracks: Vec<TopTrack>,
    /// Top artists with no ticketing counterpart
    pub unresolved: usize,
}

/// Limits applied when building a top-artist feed
#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    /// Maximum number of events in the feed
    pub limit: usize,
    /// Maximum number of artist groups read from the store
    pub max_artists: usize,
}

/// Replaces the user's artists with their resolvable streaming top artists.
///
/// Artists without a ticketing attraction id are dropped. The association
/// rows are replaced wholesale, never merged.
pub async fn link_top_artists(
    listening: &dyn ListeningProvider,
    ticketing: &dyn TicketingProvider,
    store: &dyn Store,
    user: &User,
    access_token: &str,
) -> AppResult<LinkedArtists> {
    let top_artists = listening.top_artists(access_token).await?;

    let top_tracks = match listening.top_tracks(access_token).await {
        Ok(tracks) => tracks,
        Err(e) => {
            tracing::warn!(error = %e, user_id = user.id, "Top tracks unavailable");
            Vec::new()
        }
    };

    let report = resolve_artists(ticketing, &top_artists).await;

    let mut artists = Vec::with_capacity(report.resolved_count());
    for new_artist in report.resolved() {
        artists.push(store.upsert_artist(new_artist).await?);
    }

    let artist_ids: Vec<i64> = artists.iter().map(|artist| artist.id).collect();
    store.replace_user_artists(user.id, &artist_ids).await?;

    tracing::info!(
        user_id = user.id,
        linked = artists.len(),
        unresolved = report.unresolved_count(),
        "Top artists linked"
    );

    Ok(LinkedArtists {
        artists,
        top_tracks,
        unresolved: report.unresolved_count(),
    })
}

/// Reads up to two events per artist, skipping artists with none
pub async fn condense_artist_events(
    store: &dyn Store,
    artists: &[Artist],
    max_groups: usize,
) -> AppResult<Vec<Vec<Event>>> {
    let mut groups = Vec::new();

    for artist in artists {
        if groups.len() >= max_groups {
            break;
        }

        let events = store
            .events_for_artist(&artist.name, EVENTS_PER_ARTIST)
            .await?;
        if !events.is_empty() {
            groups.push(events);
        }
    }

    Ok(groups)
}

/// Builds the paged feed of events for the user's top artists.
///
/// The first request for a user ingests events near their postal code and links
/// them to the user; later requests read what is stored. Upstream failures only
/// shrink the feed.
pub async fn top_artist_feed(
    ticketing: &dyn TicketingProvider,
    geocoder: &dyn Geocoder,
    store: &dyn Store,
    user: &User,
    settings: FeedSettings,
) -> AppResult<Vec<Vec<FeedEvent>>> {
    let artists = store.user_artists(user.id).await?;
    if artists.is_empty() {
        tracing::debug!(user_id = user.id, "No linked artists, empty feed");
        return Ok(Vec::new());
    }

    let has_events = !store.user_events(user.id, 1).await?.is_empty();

    let groups = if has_events {
        condense_artist_events(store, &artists, settings.max_artists).await?
    } else {
        let geohash = geo::locate(geocoder, &user.country_code, &user.postal_code).await;
        ingest_events(ticketing, store, &artists, geohash.as_deref()).await?;

        let groups = condense_artist_events(store, &artists, settings.max_artists).await?;
        let event_ids: Vec<String> = groups
            .iter()
            .flatten()
            .map(|event| event.event_id.clone())
            .collect();
        store.link_user_events(user.id, &event_ids).await?;
        groups
    };

    let pages = compose_feed(&groups, settings.limit);

    tracing::info!(
        user_id = user.id,
        groups = groups.len(),
        pages = pages.len(),
        "Top artist feed composed"
    );

    Ok(pages)
}
