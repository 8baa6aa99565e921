/// Zippopotam.us postal code geocoder
///
/// `GET {base}/{country}/{postal code}` answers with the places sharing that
/// code; the first place's coordinates are used. Unknown codes are a 404.
use crate::{
    error::{AppError, AppResult},
    models::Coordinates,
    services::providers::Geocoder,
};
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PostalLookup {
    #[serde(default)]
    places: Vec<PostalPlace>,
}

#[derive(Debug, Deserialize)]
struct PostalPlace {
    latitude: String,
    longitude: String,
}

impl PostalLookup {
    fn coordinates(&self) -> Option<Coordinates> {
        let place = self.places.first()?;
        let latitude = place.latitude.trim().parse::<f64>().ok()?;
        let longitude = place.longitude.trim().parse::<f64>().ok()?;
        Some(Coordinates {
            latitude,
            longitude,
        })
    }
}

#[derive(Clone)]
pub struct ZippopotamGeocoder {
    http_client: HttpClient,
    api_url: String,
}

impl ZippopotamGeocoder {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    fn lookup_url(&self, country_code: &str, postal_code: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid geocoder URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Geocoder URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&country_code.trim().to_lowercase())
            .push(postal_code.trim());

        Ok(url)
    }
}

#[async_trait::async_trait]
impl Geocoder for ZippopotamGeocoder {
    async fn resolve(
        &self,
        country_code: &str,
        postal_code: &str,
    ) -> AppResult<Option<Coordinates>> {
        if country_code.trim().is_empty() || postal_code.trim().is_empty() {
            return Ok(None);
        }

        let url = self.lookup_url(country_code, postal_code)?;
        let response = self.http_client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(
                country = %country_code,
                postal_code = %postal_code,
                "Postal code not resolvable"
            );
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Geocoder returned status {}: {}",
                status, body
            )));
        }

        let lookup: PostalLookup = response.json().await?;
        Ok(lookup.coordinates())
    }

    fn name(&self) -> &'static str {
        "zippopotam"
    }
}
