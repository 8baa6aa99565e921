//! Popular music events near a user, at most one per performer.

use std::collections::HashSet;

use crate::{
    models::FeedEvent,
    services::{
        normalizer::{headline_artist, normalize_event},
        providers::{EventQuery, TicketingProvider},
    },
};

/// Events returned by one discovery request
pub const DISCOVERY_SIZE: usize = 20;

/// Upper bound on upstream pages read per request
pub const MAX_DISCOVERY_PAGES: u32 = 5;

/// Collects popular music events, skipping repeat performers.
///
/// Pages are read in order until enough events are found, a page comes back
/// empty, or [`MAX_DISCOVERY_PAGES`] is reached. A failed page ends the walk
/// and whatever was collected so far is returned.
pub async fn popular_events(
    provider: &dyn TicketingProvider,
    geohash: Option<&str>,
) -> Vec<FeedEvent> {
    let mut events: Vec<FeedEvent> = Vec::new();
    let mut performers: HashSet<String> = HashSet::new();

    for page in 0..MAX_DISCOVERY_PAGES {
        if events.len() >= DISCOVERY_SIZE {
            break;
        }

        let query = EventQuery::Music {
            geohash: geohash.map(str::to_string),
            page,
        };

        let raw_events = match provider.search_events(&query).await {
            Ok(raw_events) => raw_events,
            Err(e) => {
                tracing::warn!(
                    page,
                    error = %e,
                    provider = provider.name(),
                    "Discovery page failed, returning partial results"
                );
                break;
            }
        };

        if raw_events.is_empty() {
            break;
        }

        for raw in &raw_events {
            if events.len() >= DISCOVERY_SIZE {
                break;
            }
            if raw.id.trim().is_empty() || !performers.insert(headline_artist(raw)) {
                continue;
            }
            events.push(FeedEvent::from(&normalize_event(raw)));
        }
    }

    tracing::debug!(count = events.len(), located = geohash.is_some(), "Popular events collected");

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ticketmaster::{RawAttraction, RawEvent, RawEventEmbedded};
    use crate::services::providers::MockTicketingProvider;

    fn raw(id: &str, artist: &str) -> RawEvent {
        RawEvent {
            id: id.to_string(),
            name: Some(format!("{} tour", artist)),
            embedded: Some(RawEventEmbedded {
                attractions: vec![RawAttraction {
                    name: Some(artist.to_string()),
                    ..Default::default()
                }],
                venues: Vec::new(),
            }),
            ..Default::default()
        }
    }

    fn page_of(query: &EventQuery) -> u32 {
        match query {
            EventQuery::Music { page, .. } => *page,
            EventQuery::ByAttraction { .. } => panic!("unexpected attraction query"),
        }
    }

    #[tokio::test]
    async fn test_one_event_per_performer() {
        let mut provider = MockTicketingProvider::new();
        provider.expect_search_events().returning(|query| match page_of(query) {
            0 => Ok(vec![raw("e1", "Muse"), raw("e2", "Muse"), raw("e3", "Blur")]),
            _ => Ok(Vec::new()),
        });

        let events = popular_events(&provider, None).await;

        let ids: Vec<&str> = events.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3"]);
    }

    #[tokio::test]
    async fn test_stops_at_discovery_size() {
        let mut provider = MockTicketingProvider::new();
        provider
            .expect_search_events()
            .times(2)
            .returning(|query| {
                let page = page_of(query);
                Ok((0..15)
                    .map(|i| raw(&format!("p{}-{}", page, i), &format!("Artist {}-{}", page, i)))
                    .collect())
            });

        let events = popular_events(&provider, Some("9q5ctr186")).await;
        assert_eq!(events.len(), DISCOVERY_SIZE);
        assert_eq!(events.last().unwrap().event_id, "p1-4");
    }

    #[tokio::test]
    async fn test_page_limit_bounds_repetitive_upstream() {
        let mut provider = MockTicketingProvider::new();
        provider
            .expect_search_events()
            .times(MAX_DISCOVERY_PAGES as usize)
            .returning(|_| Ok(vec![raw("same", "Muse")]));

        let events = popular_events(&provider, None).await;
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_returns_partial_results() {
        let mut provider = MockTicketingProvider::new();
        provider.expect_search_events().returning(|query| match page_of(query) {
            0 => Ok(vec![raw("e1", "Muse")]),
            _ => Err(AppError::ExternalApi("429".to_string())),
        });
        provider.expect_name().return_const("mock");

        let events = popular_events(&provider, None).await;
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_geohash_is_forwarded() {
        let mut provider = MockTicketingProvider::new();
        provider
            .expect_search_events()
            .withf(|query: &EventQuery| {
                *query
                    == EventQuery::Music {
                        geohash: Some("u4pruydqq".to_string()),
                        page: 0,
                    }
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));

        assert!(popular_events(&provider, Some("u4pruydqq")).await.is_empty());
    }
}
