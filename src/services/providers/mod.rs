/// Outbound collaborators of the recommendation pipeline
///
/// Each upstream system sits behind a trait so the pipeline can be driven by the
/// real HTTP clients in production and by mocks or stubs in tests.
use crate::{
    error::AppResult,
    models::{
        ticketmaster::{AttractionCandidate, RawEvent},
        Coordinates, TopArtist, TopTrack,
    },
};

pub mod spotify;
pub mod ticketmaster;
pub mod zippopotam;

pub use spotify::SpotifyProvider;
pub use ticketmaster::TicketmasterProvider;
pub use zippopotam::ZippopotamGeocoder;

/// What an event search is filtered by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventQuery {
    /// Events for one performer, nearest first when a geohash is given
    ByAttraction {
        attraction_id: String,
        geohash: Option<String>,
    },
    /// One page of music events, optionally near a geohash
    Music { geohash: Option<String>, page: u32 },
}

impl EventQuery {
    pub fn by_attraction(attraction_id: impl Into<String>, geohash: Option<String>) -> Self {
        EventQuery::ByAttraction {
            attraction_id: attraction_id.into(),
            geohash,
        }
    }

    /// Sort order the provider should apply
    pub fn sort(&self) -> &'static str {
        match self {
            EventQuery::ByAttraction {
                geohash: Some(_), ..
            } => "distance,date,asc",
            _ => "relevance,desc",
        }
    }
}

/// Ticketing provider: performer search and event search
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TicketingProvider: Send + Sync {
    /// Keyword search over performers, in provider result order
    async fn search_attractions(&self, keyword: &str) -> AppResult<Vec<AttractionCandidate>>;

    /// Event search, in provider result order
    async fn search_events(&self, query: &EventQuery) -> AppResult<Vec<RawEvent>>;

    /// Single event lookup by provider id
    async fn get_event(&self, event_id: &str) -> AppResult<Option<RawEvent>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Streaming service: the listener's ranked top items
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListeningProvider: Send + Sync {
    async fn top_artists(&self, access_token: &str) -> AppResult<Vec<TopArtist>>;

    async fn top_tracks(&self, access_token: &str) -> AppResult<Vec<TopTrack>>;

    fn name(&self) -> &'static str;
}

/// Postal code geocoding service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns `None` when the postal code is unknown for the country
    async fn resolve(
        &self,
        country_code: &str,
        postal_code: &str,
    ) -> AppResult<Option<Coordinates>>;

    fn name(&self) -> &'static str;
}
