//! Per-artist event ingestion.
//!
//! For each artist with an attraction id, the first events the provider returns
//! (nearest first with a geohash, most relevant first without) are normalized and
//! stored. A failed fetch costs only that artist its events for this pass.

use std::collections::HashSet;

use crate::{
    db::Store,
    error::AppResult,
    models::{ticketmaster::RawEvent, Artist},
    services::{
        normalizer::normalize_event,
        providers::{EventQuery, TicketingProvider},
    },
};

/// Events kept per artist in one pass
pub const EVENTS_PER_ARTIST: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoAttractionId,
}

/// What one artist contributed to an ingestion pass
#[derive(Debug, Clone, PartialEq)]
pub enum ArtistIngestion {
    /// `kept` events now exist in the store, `inserted` of them written by this pass
    Ingested {
        artist: String,
        kept: usize,
        inserted: usize,
    },
    Skipped {
        artist: String,
        reason: SkipReason,
    },
    /// The upstream fetch failed; the artist contributes no events this pass
    Failed { artist: String, error: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    pub outcomes: Vec<ArtistIngestion>,
}

impl IngestionReport {
    pub fn events_inserted(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                ArtistIngestion::Ingested { inserted, .. } => *inserted,
                _ => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ArtistIngestion::Failed { .. }))
            .count()
    }
}

/// Ensures up to [`EVENTS_PER_ARTIST`] upcoming events per artist exist in the store.
///
/// Provider failures are recorded per artist and never abort the pass. Store
/// failures do propagate.
pub async fn ingest_events(
    provider: &dyn TicketingProvider,
    store: &dyn Store,
    artists: &[Artist],
    geohash: Option<&str>,
) -> AppResult<IngestionReport> {
    let mut report = IngestionReport::default();

    for artist in artists {
        let Some(attraction_id) = artist
            .attraction_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        else {
            tracing::debug!(artist = %artist.name, "Artist has no attraction id, skipping");
            report.outcomes.push(ArtistIngestion::Skipped {
                artist: artist.name.clone(),
                reason: SkipReason::NoAttractionId,
            });
            continue;
        };

        let query = EventQuery::by_attraction(attraction_id, geohash.map(str::to_string));

        let raw_events = match provider.search_events(&query).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(
                    artist = %artist.name,
                    attraction_id = %attraction_id,
                    error = %e,
                    provider = provider.name(),
                    "Event fetch failed, artist contributes no events"
                );
                report.outcomes.push(ArtistIngestion::Failed {
                    artist: artist.name.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let (kept, inserted) = store_leading_events(store, &raw_events).await?;

        tracing::debug!(
            artist = %artist.name,
            fetched = raw_events.len(),
            kept,
            inserted,
            "Artist events ingested"
        );

        report.outcomes.push(ArtistIngestion::Ingested {
            artist: artist.name.clone(),
            kept,
            inserted,
        });
    }

    tracing::info!(
        artists = artists.len(),
        inserted = report.events_inserted(),
        failures = report.failures(),
        "Event ingestion completed"
    );

    Ok(report)
}

/// Walks one artist's `raw_events` in provider order and stores the first unseen ones.
///
/// Events already in the store count toward the cap, so repeating a pass
/// against the same upstream answer keeps the same events. An event billed for
/// several artists counts for each of them.
async fn store_leading_events(
    store: &dyn Store,
    raw_events: &[RawEvent],
) -> AppResult<(usize, usize)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = 0;
    let mut inserted = 0;

    for raw in raw_events {
        if kept >= EVENTS_PER_ARTIST {
            break;
        }

        if raw.id.trim().is_empty() || !seen.insert(raw.id.clone()) {
            continue;
        }

        let event = normalize_event(raw);
        if !store.event_exists(&event.event_id).await? && store.insert_event(&event).await? {
            inserted += 1;
        }
        kept += 1;
    }

    Ok((kept, inserted))
}
