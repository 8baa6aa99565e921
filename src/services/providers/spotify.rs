/// Spotify Web API provider for a listener's top items
///
/// The caller supplies an already-issued user access token; token exchange and
/// refresh happen outside this crate.
use crate::{
    error::{AppError, AppResult},
    models::{
        spotify::{SpotifyArtist, SpotifyImage, SpotifyTrack, TopArtistsResponse, TopTracksResponse},
        TopArtist, TopTrack,
    },
    services::{normalizer::select_image_url, providers::ListeningProvider},
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const TOP_ARTISTS_LIMIT: &str = "10";
const TOP_TRACKS_LIMIT: &str = "3";
const TIME_RANGE: &str = "long_term";

#[derive(Clone)]
pub struct SpotifyProvider {
    http_client: HttpClient,
    api_url: String,
}

fn widest_image(images: &[SpotifyImage]) -> String {
    select_image_url(images.iter().map(|image| (image.width, image.url.as_str())))
}

impl From<SpotifyArtist> for TopArtist {
    fn from(artist: SpotifyArtist) -> Self {
        TopArtist {
            image_url: widest_image(&artist.images),
            name: artist.name,
            external_id: artist.id,
            external_url: artist.external_urls.spotify,
        }
    }
}

impl From<SpotifyTrack> for TopTrack {
    fn from(track: SpotifyTrack) -> Self {
        TopTrack {
            image_url: widest_image(&track.album.images),
            album_artist_name: track.album.artists.into_iter().next().map(|a| a.name),
            album_name: track.album.name,
        }
    }
}

impl SpotifyProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    async fn get_top<T: DeserializeOwned>(
        &self,
        kind: &str,
        limit: &str,
        access_token: &str,
    ) -> AppResult<T> {
        if access_token.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Spotify access token cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/me/top/{}", self.api_url, kind);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("limit", limit), ("time_range", TIME_RANGE)])
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::InvalidInput(
                "Spotify rejected the access token".to_string(),
            ));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, kind = %kind, "Failed to deserialize Spotify response");
            AppError::ExternalApi(format!("Failed to parse Spotify response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl ListeningProvider for SpotifyProvider {
    async fn top_artists(&self, access_token: &str) -> AppResult<Vec<TopArtist>> {
        let response: TopArtistsResponse = self
            .get_top("artists", TOP_ARTISTS_LIMIT, access_token)
            .await?;

        let artists: Vec<TopArtist> = response.items.into_iter().map(TopArtist::from).collect();

        tracing::info!(
            artists = artists.len(),
            provider = self.name(),
            "Top artists fetched"
        );

        Ok(artists)
    }

    async fn top_tracks(&self, access_token: &str) -> AppResult<Vec<TopTrack>> {
        let response: TopTracksResponse = self
            .get_top("tracks", TOP_TRACKS_LIMIT, access_token)
            .await?;

        Ok(response.items.into_iter().map(TopTrack::from).collect())
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
