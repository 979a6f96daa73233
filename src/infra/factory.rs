use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_movie_repo::PostgresMovieRepo,
    postgres_showtime_repo::PostgresShowtimeRepo, postgres_theater_repo::PostgresTheaterRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_movie_repo::SqliteMovieRepo,
    sqlite_showtime_repo::SqliteShowtimeRepo, sqlite_theater_repo::SqliteTheaterRepo,
};

pub fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, sqlx::Error> {
    let database_url = &config.database_url;

    if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse::<PgConnectOptions>()?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        Ok(AppState {
            config: config.clone(),
            theater_repo: Arc::new(PostgresTheaterRepo::new(pool.clone())),
            movie_repo: Arc::new(PostgresMovieRepo::new(pool.clone())),
            showtime_repo: Arc::new(PostgresShowtimeRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool)),
        })
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let pool = connect_sqlite(database_url).await?;
        run_sqlite_migrations(&pool).await?;

        Ok(sqlite_state(config, pool))
    }
}

/// Opens a SQLite pool tuned for concurrent writers: WAL journal, a busy
/// timeout so lock waits queue up, and foreign keys on.
pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
}

pub fn sqlite_state(config: &Config, pool: SqlitePool) -> AppState {
    AppState {
        config: config.clone(),
        theater_repo: Arc::new(SqliteTheaterRepo::new(pool.clone())),
        movie_repo: Arc::new(SqliteMovieRepo::new(pool.clone())),
        showtime_repo: Arc::new(SqliteShowtimeRepo::new(pool.clone())),
        booking_repo: Arc::new(SqliteBookingRepo::new(pool)),
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(sqlx::Error::from)
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(sqlx::Error::from)
}
