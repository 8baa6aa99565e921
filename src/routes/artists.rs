use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
    services::recommendations::{self, LinkedArtists},
};

/// Extracts the streaming access token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing bearer access token".to_string()))
}

/// Handler for linking a user's streaming top artists
pub async fn link(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<LinkedArtists>> {
    let token = bearer_token(&headers)?;
    let user = state.user(user_id).await?;

    let linked = recommendations::link_top_artists(
        state.listening.as_ref(),
        state.ticketing.as_ref(),
        state.store.as_ref(),
        &user,
        token,
    )
    .await?;

    Ok(Json(linked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer BQD-token"));
        assert_eq!(bearer_token(&headers).unwrap(), "BQD-token");
    }
}
