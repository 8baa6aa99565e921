use crate::{models::Coordinates, services::providers::Geocoder};

/// Geohash length used as the event proximity filter
pub const GEOHASH_PRECISION: usize = 9;

/// Encodes coordinates as a fixed-precision geohash.
///
/// No coordinates means no location constraint, and so does a pair outside the
/// valid latitude/longitude range.
pub fn geohash_for(coords: Option<Coordinates>) -> Option<String> {
    let coords = coords?;

    match geohash::encode(
        geohash::Coord {
            x: coords.longitude,
            y: coords.latitude,
        },
        GEOHASH_PRECISION,
    ) {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::warn!(
                latitude = coords.latitude,
                longitude = coords.longitude,
                error = %e,
                "Coordinates could not be geohashed"
            );
            None
        }
    }
}

/// Resolves a postal code to a geohash for event searches.
///
/// Unknown postal codes and geocoder failures both degrade to `None`.
pub async fn locate(geocoder: &dyn Geocoder, country_code: &str, postal_code: &str) -> Option<String> {
    let coords = match geocoder.resolve(country_code, postal_code).await {
        Ok(coords) => coords,
        Err(e) => {
            tracing::warn!(
                error = %e,
                geocoder = geocoder.name(),
                country = %country_code,
                "Geocoding failed, continuing without location"
            );
            None
        }
    };

    if coords.is_none() {
        tracing::info!(
            country = %country_code,
            postal_code = %postal_code,
            "No coordinates for postal code"
        );
    }

    geohash_for(coords)
}
