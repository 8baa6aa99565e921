//! Raw Spotify Web API payloads for the `/me/top/*` endpoints.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TopArtistsResponse {
    #[serde(default)]
    pub items: Vec<SpotifyArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub album: SpotifyAlbum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyAlbumArtist>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbumArtist {
    pub name: String,
}
