use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{Artist, Event, NewArtist, NewUser, User},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the schema in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const EVENT_COLUMNS: &str = "e.event_id, e.name, e.artist_name, e.url, e.image_url, e.date, e.location";

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// PostgreSQL implementation of [`Store`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, country_code, postal_code)
            VALUES ($1, $2, $3)
            RETURNING id, username, country_code, postal_code, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.country_code)
        .bind(&user.postal_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::InvalidInput(format!(
                        "Username {} already in use",
                        user.username
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(created)
    }

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, country_code, postal_code, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upsert_artist(&self, artist: &NewArtist) -> AppResult<Artist> {
        sqlx::query(
            r#"
            INSERT INTO artists (name, external_profile_id, external_profile_url, image_url, attraction_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (external_profile_id) DO NOTHING
            "#,
        )
        .bind(&artist.name)
        .bind(&artist.external_profile_id)
        .bind(&artist.external_profile_url)
        .bind(&artist.image_url)
        .bind(&artist.attraction_id)
        .execute(&self.pool)
        .await?;

        let stored = sqlx::query_as::<_, Artist>(
            r#"
            SELECT id, name, external_profile_id, external_profile_url, image_url, attraction_id
            FROM artists
            WHERE external_profile_id = $1
            "#,
        )
        .bind(&artist.external_profile_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn replace_user_artists(&self, user_id: i64, artist_ids: &[i64]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM users_artists WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users_events WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for (position, artist_id) in artist_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO users_artists (user_id, artist_id, position)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, artist_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(artist_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(user_id, artists = artist_ids.len(), "User artists replaced");
        Ok(())
    }

    async fn user_artists(&self, user_id: i64) -> AppResult<Vec<Artist>> {
        let artists = sqlx::query_as::<_, Artist>(
            r#"
            SELECT a.id, a.name, a.external_profile_id, a.external_profile_url, a.image_url, a.attraction_id
            FROM artists a
            JOIN users_artists ua ON ua.artist_id = a.id
            WHERE ua.user_id = $1
            ORDER BY ua.position ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(artists)
    }

    async fn event_exists(&self, event_id: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE event_id = $1)")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn insert_event(&self, event: &Event) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (event_id, name, artist_name, url, image_url, date, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(&event.event_id)
        .bind(&event.name)
        .bind(&event.artist_name)
        .bind(&event.url)
        .bind(&event.image_url)
        .bind(event.date)
        .bind(&event.location)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_event(&self, event_id: &str) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events e WHERE e.event_id = $1",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn events_for_artist(&self, artist_name: &str, limit: usize) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {}
            FROM events e
            WHERE e.artist_name = $1
            ORDER BY e.date ASC NULLS LAST, e.event_id ASC
            LIMIT $2
            "#,
            EVENT_COLUMNS
        ))
        .bind(artist_name)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn link_user_events(&self, user_id: i64, event_ids: &[String]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for event_id in event_ids {
            sqlx::query(
                r#"
                INSERT INTO users_events (user_id, event_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, event_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn user_events(&self, user_id: i64, limit: usize) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {}
            FROM events e
            JOIN users_events ue ON ue.event_id = e.event_id
            WHERE ue.user_id = $1
            ORDER BY e.date ASC NULLS LAST, e.event_id ASC
            LIMIT $2
            "#,
            EVENT_COLUMNS
        ))
        .bind(user_id)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn add_to_wishlist(&self, user_id: i64, event_id: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO wishlist (user_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, event_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_from_wishlist(&self, user_id: i64, event_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM wishlist WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn wishlist(&self, user_id: i64) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {}
            FROM events e
            JOIN wishlist w ON w.event_id = e.event_id
            WHERE w.user_id = $1
            ORDER BY w.created_at ASC
            "#,
            EVENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
