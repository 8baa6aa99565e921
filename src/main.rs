use std::sync::Arc;

use encore_api::{
    config::Config,
    db::{create_pool, run_migrations, PgStore},
    routes::{create_router, AppState},
    services::providers::{SpotifyProvider, TicketmasterProvider, ZippopotamGeocoder},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(TicketmasterProvider::new(
            config.ticketmaster_api_key.clone(),
            config.ticketmaster_api_url.clone(),
        )),
        Arc::new(SpotifyProvider::new(config.spotify_api_url.clone())),
        Arc::new(ZippopotamGeocoder::new(config.geocoder_url.clone())),
        &config,
    );

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
