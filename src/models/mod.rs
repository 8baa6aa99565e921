use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub mod spotify;
pub mod ticketmaster;

/// Image used whenever an upstream record carries no usable image
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTwoFiJiFNFd9HI4Ez177ayXT1aDEejtgyMJA&s";

/// Display value for an unknown date or location
pub const TBA: &str = "TBA";

/// Latitude/longitude pair returned by the geocoder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A registered user; only the fields the pipeline needs are modelled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub country_code: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub country_code: String,
    pub postal_code: String,
}

/// An artist known to both the streaming service and the ticketing provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub external_profile_id: String,
    pub external_profile_url: String,
    pub image_url: String,
    /// Ticketing provider attraction id; unique once resolved
    pub attraction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArtist {
    pub name: String,
    pub external_profile_id: String,
    pub external_profile_url: String,
    pub image_url: String,
    pub attraction_id: Option<String>,
}

/// Ranked artist summary from the streaming service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopArtist {
    pub name: String,
    pub external_id: String,
    pub external_url: Option<String>,
    pub image_url: String,
}

/// Ranked track summary from the streaming service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopTrack {
    pub album_name: String,
    pub album_artist_name: Option<String>,
    pub image_url: String,
}

/// Canonical, provider-agnostic event record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Event {
    /// Provider-assigned id, the natural key
    pub event_id: String,
    pub name: String,
    pub artist_name: String,
    pub url: String,
    pub image_url: String,
    /// `None` when the provider has not announced a start time
    pub date: Option<NaiveDate>,
    pub location: String,
}

impl Event {
    /// Human readable date, e.g. "August 9, 2025", or "TBA" without a date
    pub fn formatted_date(&self) -> String {
        match self.date {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => TBA.to_string(),
        }
    }
}

/// Orders dated events ascending and places undated events after all dated ones.
///
/// Undated events are never compared by value; two of them are `Equal`.
pub fn compare_event_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts events oldest-first with undated events last, ties broken by event id
pub fn sort_events_by_date(events: &mut [Event]) {
    events.sort_by(|a, b| {
        compare_event_dates(a.date, b.date).then_with(|| a.event_id.cmp(&b.event_id))
    });
}

/// Event as presented to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedEvent {
    pub event_id: String,
    pub name: String,
    pub artist: String,
    pub url: String,
    pub image: String,
    pub date: String,
    pub location: String,
}

impl From<&Event> for FeedEvent {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.event_id.clone(),
            name: event.name.clone(),
            artist: event.artist_name.clone(),
            url: event.url.clone(),
            image: event.image_url.clone(),
            date: event.formatted_date(),
            location: event.location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, date: Option<NaiveDate>) -> Event {
        Event {
            event_id: id.to_string(),
            name: format!("Show {}", id),
            artist_name: "Artist".to_string(),
            url: format!("https://tickets.example/{}", id),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            date,
            location: TBA.to_string(),
        }
    }

    #[test]
    fn test_formatted_date() {
        let e = event("1", NaiveDate::from_ymd_opt(2025, 8, 9));
        assert_eq!(e.formatted_date(), "August 9, 2025");
    }

    #[test]
    fn test_formatted_date_tba() {
        let e = event("1", None);
        assert_eq!(e.formatted_date(), "TBA");
    }

    #[test]
    fn test_sort_places_undated_last() {
        let mut events = vec![
            event("tba-1", None),
            event("late", NaiveDate::from_ymd_opt(2025, 12, 1)),
            event("tba-0", None),
            event("early", NaiveDate::from_ymd_opt(2025, 3, 1)),
        ];
        sort_events_by_date(&mut events);

        let ids: Vec<&str> = events.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "tba-0", "tba-1"]);
    }

    #[test]
    fn test_feed_event_from_event() {
        let e = event("abc", None);
        let feed = FeedEvent::from(&e);
        assert_eq!(feed.event_id, "abc");
        assert_eq!(feed.artist, "Artist");
        assert_eq!(feed.date, "TBA");
    }
}
