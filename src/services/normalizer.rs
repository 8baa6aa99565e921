//! Maps raw ticketing payloads onto the canonical [`Event`].
//!
//! Everything here is a pure function of its input: no I/O, no clock, no logging.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{
    ticketmaster::{RawEvent, RawVenue},
    Event, PLACEHOLDER_IMAGE_URL, TBA,
};

/// Picks the URL of the widest image.
///
/// Missing widths count as zero. On equal widths the earliest image wins, and an
/// empty input yields [`PLACEHOLDER_IMAGE_URL`].
pub fn select_image_url<'a, I>(images: I) -> String
where
    I: IntoIterator<Item = (Option<u32>, &'a str)>,
{
    let mut best: Option<(u32, &str)> = None;

    for (width, url) in images {
        let width = width.unwrap_or(0);
        match best {
            Some((max_width, _)) if width <= max_width => {}
            _ => best = Some((width, url)),
        }
    }

    best.map(|(_, url)| url.to_string())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string())
}

/// Builds the display location from a venue's city and state names
pub fn compose_location(city: Option<&str>, state: Option<&str>) -> String {
    let city = city.map(str::trim).filter(|c| !c.is_empty());
    let state = state.map(str::trim).filter(|s| !s.is_empty());

    match (city, state) {
        (Some(city), Some(state)) => format!("{}, {}", city, state),
        (Some(city), None) => city.to_string(),
        (None, Some(state)) => state.to_string(),
        (None, None) => TBA.to_string(),
    }
}

/// Parses the calendar date out of an upstream start timestamp.
///
/// `"2025-08-10T02:00:00Z"` becomes 2025-08-10. Absent or unparseable input is
/// `None`; there is no fallback to the current date.
pub fn parse_start_date(date_time: Option<&str>) -> Option<NaiveDate> {
    let raw = date_time?.trim();
    let stripped = raw.strip_suffix('Z').unwrap_or(raw);

    NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .ok()
        .or_else(|| {
            stripped
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        })
}

/// Name of the first embedded performer, or the event's own name
pub fn headline_artist(raw: &RawEvent) -> String {
    raw.embedded
        .as_ref()
        .and_then(|embedded| embedded.attractions.first())
        .and_then(|attraction| attraction.name.clone())
        .unwrap_or_else(|| raw.name.clone().unwrap_or_default())
}

fn first_venue(raw: &RawEvent) -> Option<&RawVenue> {
    raw.embedded
        .as_ref()
        .and_then(|embedded| embedded.venues.first())
}

/// Converts one raw upstream event into the canonical shape
pub fn normalize_event(raw: &RawEvent) -> Event {
    let image_url = select_image_url(
        raw.images
            .iter()
            .filter_map(|image| image.url.as_deref().map(|url| (image.width, url))),
    );

    let date_time = raw
        .dates
        .as_ref()
        .and_then(|dates| dates.start.as_ref())
        .and_then(|start| start.date_time.as_deref());

    let venue = first_venue(raw);
    let city = venue
        .and_then(|v| v.city.as_ref())
        .and_then(|c| c.name.as_deref());
    let state = venue
        .and_then(|v| v.state.as_ref())
        .and_then(|s| s.name.as_deref());

    Event {
        event_id: raw.id.clone(),
        name: raw.name.clone().unwrap_or_default(),
        artist_name: headline_artist(raw),
        url: raw.url.clone().unwrap_or_default(),
        image_url,
        date: parse_start_date(date_time),
        location: compose_location(city, state),
    }
}
