/// Ticketmaster Discovery API provider
///
/// API Flow:
/// 1. Attraction search: /attractions.json?keyword= → performers with external links
/// 2. Event search: /events.json?attractionId= (or classificationName=music) → raw events
/// 3. Event details: /events/{id}.json → one raw event, 404 when unknown
use crate::{
    error::{AppError, AppResult},
    models::ticketmaster::{
        AttractionCandidate, AttractionSearchResponse, EventSearchResponse, RawEvent,
    },
    services::providers::{EventQuery, TicketingProvider},
};
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::de::DeserializeOwned;

/// Search radius applied to music discovery near a geohash
const DISCOVERY_RADIUS_MILES: &str = "50";

#[derive(Clone)]
pub struct TicketmasterProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TicketmasterProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// Query string for an event search, API key excluded
    fn event_params(query: &EventQuery) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        match query {
            EventQuery::ByAttraction {
                attraction_id,
                geohash,
            } => {
                params.push(("attractionId", attraction_id.clone()));
                if let Some(geohash) = geohash {
                    params.push(("geoPoint", geohash.clone()));
                }
            }
            EventQuery::Music { geohash, page } => {
                params.push(("classificationName", "music".to_string()));
                if let Some(geohash) = geohash {
                    params.push(("geoPoint", geohash.clone()));
                    params.push(("radius", DISCOVERY_RADIUS_MILES.to_string()));
                    params.push(("unit", "miles".to_string()));
                }
                params.push(("page", page.to_string()));
            }
        }

        params.push(("sort", query.sort().to_string()));
        params
    }

    /// Appends `segments` to the base URL, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid Ticketmaster URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Ticketmaster URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Issues a GET and decodes the body, `None` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&'static str, String)],
    ) -> AppResult<Option<T>> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();

        let response = self
            .http_client
            .get(url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Ticketmaster API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let parsed = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize Ticketmaster response"
            );
            AppError::ExternalApi(format!("Failed to parse Ticketmaster response: {}", e))
        })?;

        Ok(Some(parsed))
    }
}

#[async_trait::async_trait]
impl TicketingProvider for TicketmasterProvider {
    async fn search_attractions(&self, keyword: &str) -> AppResult<Vec<AttractionCandidate>> {
        if keyword.trim().is_empty() {
            return Ok(Vec::new());
        }

        let params = [("keyword", keyword.to_string())];
        let candidates = self
            .get_json::<AttractionSearchResponse>(&["attractions.json"], &params)
            .await?
            .map(AttractionSearchResponse::into_candidates)
            .unwrap_or_default();

        tracing::debug!(
            keyword = %keyword,
            results = candidates.len(),
            provider = self.name(),
            "Attraction search completed"
        );

        Ok(candidates)
    }

    async fn search_events(&self, query: &EventQuery) -> AppResult<Vec<RawEvent>> {
        let params = Self::event_params(query);
        let events = self
            .get_json::<EventSearchResponse>(&["events.json"], &params)
            .await?
            .map(EventSearchResponse::into_events)
            .unwrap_or_default();

        tracing::debug!(
            query = ?query,
            results = events.len(),
            provider = self.name(),
            "Event search completed"
        );

        Ok(events)
    }

    async fn get_event(&self, event_id: &str) -> AppResult<Option<RawEvent>> {
        if event_id.trim().is_empty() {
            return Ok(None);
        }

        let file = format!("{}.json", event_id);
        self.get_json::<RawEvent>(&["events", file.as_str()], &[]).await
    }

    fn name(&self) -> &'static str {
        "ticketmaster"
    }
}
