use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod artists;
pub mod discover;
pub mod feed;
pub mod state;
pub mod users;
pub mod wishlist;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create))
        .route("/users/:user_id", get(users::show))
        .route("/users/:user_id/artists", post(artists::link))
        .route("/users/:user_id/feed", get(feed::top_artists))
        .route(
            "/users/:user_id/wishlist",
            get(wishlist::list).post(wishlist::add),
        )
        .route("/users/:user_id/wishlist/:event_id", delete(wishlist::remove))
        .route("/events/popular", get(discover::popular))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
