//! Raw Ticketmaster Discovery API payloads.
//!
//! Every field the API may omit is optional so a sparse record still
//! deserializes; the normalizer decides what a missing field means.

use serde::{Deserialize, Serialize};

/// Response of `/events.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSearchResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

impl EventSearchResponse {
    pub fn into_events(self) -> Vec<RawEvent> {
        self.embedded.map(|e| e.events).unwrap_or_default()
    }
}

/// Response of `/attractions.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttractionSearchResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<EmbeddedAttractions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedAttractions {
    #[serde(default)]
    pub attractions: Vec<RawAttraction>,
}

impl AttractionSearchResponse {
    pub fn into_candidates(self) -> Vec<AttractionCandidate> {
        self.embedded
            .map(|e| e.attractions)
            .unwrap_or_default()
            .into_iter()
            .filter_map(AttractionCandidate::from_raw)
            .collect()
    }
}

/// One upstream event record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawEvent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dates: Option<RawDates>,
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<RawEventEmbedded>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawDates {
    #[serde(default)]
    pub start: Option<RawStart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawStart {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub local_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawEventEmbedded {
    #[serde(default)]
    pub attractions: Vec<RawAttraction>,
    #[serde(default)]
    pub venues: Vec<RawVenue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawAttraction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_links: Option<ExternalLinks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalLinks {
    #[serde(default)]
    pub spotify: Vec<ExternalLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalLink {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawVenue {
    #[serde(default)]
    pub city: Option<NamedPlace>,
    #[serde(default)]
    pub state: Option<NamedPlace>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NamedPlace {
    #[serde(default)]
    pub name: Option<String>,
}

/// A keyword search hit reduced to what identity matching needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttractionCandidate {
    pub id: String,
    /// First streaming profile link listed for the attraction
    pub profile_url: Option<String>,
}

impl AttractionCandidate {
    fn from_raw(raw: RawAttraction) -> Option<Self> {
        let id = raw.id?;
        let profile_url = raw
            .external_links
            .and_then(|links| links.spotify.into_iter().next())
            .and_then(|link| link.url);
        Some(Self { id, profile_url })
    }
}
