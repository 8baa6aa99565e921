use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{NewUser, User},
    routes::AppState,
};

fn validate(user: &NewUser) -> AppResult<()> {
    let fields = [
        ("username", &user.username),
        ("country_code", &user.country_code),
        ("postal_code", &user.postal_code),
    ];

    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(AppError::InvalidInput(format!("{} is required", field))),
        None => Ok(()),
    }
}

/// Handler for creating a user profile
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    validate(&request)?;

    let user = state.store.create_user(&request).await?;
    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(state.user(user_id).await?))
}
