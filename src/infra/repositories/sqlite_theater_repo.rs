use crate::domain::{
    models::{seat::{Seat, SeatSpec}, theater::{NewScreen, Screen, ScreenRef, Theater}},
    ports::TheaterRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;

pub struct SqliteTheaterRepo {
    pool: SqlitePool,
}

impl SqliteTheaterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TheaterRepository for SqliteTheaterRepo {
    async fn create(&self, name: &str, location: &str) -> Result<Theater, AppError> {
        sqlx::query_as::<_, Theater>(
            "INSERT INTO theaters (name, location, created_at) VALUES (?, ?, ?) RETURNING *"
        )
            .bind(name)
            .bind(location)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Theater>, AppError> {
        sqlx::query_as::<_, Theater>("SELECT * FROM theaters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Theater>, AppError> {
        sqlx::query_as::<_, Theater>("SELECT * FROM theaters ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_screen(&self, screen: &NewScreen, seats: &[SeatSpec]) -> Result<Screen, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Screen>(
            r#"INSERT INTO screens (theater_id, screen_number, row_count, sections, capacity, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(screen.theater_id)
            .bind(screen.screen_number)
            .bind(screen.row_count)
            .bind(Json(&screen.sections))
            .bind(screen.capacity())
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for seat in seats {
            sqlx::query("INSERT INTO seats (screen_id, code, row_label, seat_number) VALUES (?, ?, ?, ?)")
                .bind(created.id)
                .bind(&seat.code)
                .bind(&seat.row_label)
                .bind(seat.seat_number)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_screen(&self, screen_id: i64) -> Result<Option<Screen>, AppError> {
        sqlx::query_as::<_, Screen>("SELECT * FROM screens WHERE id = ?")
            .bind(screen_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_screen_ref(&self, theater_id: i64, screen_number: i32) -> Result<Option<ScreenRef>, AppError> {
        sqlx::query_as::<_, ScreenRef>(
            r#"SELECT s.id AS screen_id, s.screen_number, t.id AS theater_id, t.name AS theater_name
               FROM screens s JOIN theaters t ON t.id = s.theater_id
               WHERE s.theater_id = ? AND s.screen_number = ?"#
        )
            .bind(theater_id)
            .bind(screen_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_screens(&self, theater_id: i64) -> Result<Vec<Screen>, AppError> {
        sqlx::query_as::<_, Screen>("SELECT * FROM screens WHERE theater_id = ? ORDER BY screen_number ASC")
            .bind(theater_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_seats(&self, screen_id: i64) -> Result<Vec<Seat>, AppError> {
        sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE screen_id = ? ORDER BY id ASC")
            .bind(screen_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
