//! Song persistence
//!
//! `SongStore` is the seam handlers talk to. `PgSongStore` is the
//! PostgreSQL implementation backed by an explicitly constructed pool.

use crate::config::DatabaseConfig;
use crate::pagination::Pagination;
use crate::songs::filter::SongFilter;
use crate::songs::models::{NewSong, Song, SongId};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

const SELECT_SONGS: &str = "SELECT id, music_group, song, release_date, text, link FROM songs";

/// Storage operations over the song catalog
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Fetch one page of songs matching `filter`, ordered by id
    async fn list(&self, filter: &SongFilter, page: Pagination) -> Result<Vec<Song>, sqlx::Error>;

    /// Fetch a song by id
    async fn get(&self, id: SongId) -> Result<Option<Song>, sqlx::Error>;

    /// Insert a new song and return it with its assigned id
    async fn insert(&self, song: &NewSong) -> Result<Song, sqlx::Error>;

    /// Overwrite every column of an existing song
    async fn update(&self, song: &Song) -> Result<Song, sqlx::Error>;

    /// Delete a song, returning whether a row was removed
    async fn delete(&self, id: SongId) -> Result<bool, sqlx::Error>;
}

/// PostgreSQL song store
pub struct PgSongStore {
    pool: PgPool,
}

impl PgSongStore {
    /// Connect to the database described by `config`
    ///
    /// # Returns
    /// * `Ok(PgSongStore)` if the pool was established
    /// * `Err(sqlx::Error)` if the connection failed
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }

    /// Apply the schema bootstrap script
    ///
    /// All statements run in a single transaction.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_songs.sql");
        let mut tx = self.pool.begin().await?;
        for statement in split_statements(migration_sql) {
            debug!(statement = %statement, "Executing migration statement");
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

/// Strip `--` comments and split a SQL script into statements
fn split_statements(script: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in script.lines() {
        let code = match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let code = code.trim();
        if !code.is_empty() {
            cleaned.push_str(code);
            cleaned.push(' ');
        }
    }

    cleaned
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl SongStore for PgSongStore {
    async fn list(&self, filter: &SongFilter, page: Pagination) -> Result<Vec<Song>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_SONGS);
        filter.push_where(&mut builder);
        builder.push(" ORDER BY id LIMIT ");
        builder.push_bind(i64::from(page.limit));
        builder.push(" OFFSET ");
        // Offsets past i64::MAX cannot match any row.
        builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        builder.build_query_as::<Song>().fetch_all(&self.pool).await
    }

    async fn get(&self, id: SongId) -> Result<Option<Song>, sqlx::Error> {
        sqlx::query_as::<_, Song>(&format!("{} WHERE id = $1", SELECT_SONGS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert(&self, song: &NewSong) -> Result<Song, sqlx::Error> {
        let song = sqlx::query_as::<_, Song>(
            "INSERT INTO songs (music_group, song, release_date, text, link) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, music_group, song, release_date, text, link",
        )
        .bind(&song.group)
        .bind(&song.title)
        .bind(&song.release_date)
        .bind(&song.text)
        .bind(&song.link)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted song: {}", song.id);
        Ok(song)
    }

    async fn update(&self, song: &Song) -> Result<Song, sqlx::Error> {
        let song = sqlx::query_as::<_, Song>(
            "UPDATE songs SET music_group = $1, song = $2, release_date = $3, text = $4, link = $5 \
             WHERE id = $6 \
             RETURNING id, music_group, song, release_date, text, link",
        )
        .bind(&song.group)
        .bind(&song.title)
        .bind(&song.release_date)
        .bind(&song.text)
        .bind(&song.link)
        .bind(song.id)
        .fetch_one(&self.pool)
        .await?;

        debug!("Updated song: {}", song.id);
        Ok(song)
    }

    async fn delete(&self, id: SongId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("Deleted song: {}", id);
        Ok(result.rows_affected() > 0)
    }
}
