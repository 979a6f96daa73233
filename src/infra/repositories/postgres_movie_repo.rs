use crate::domain::{models::movie::Movie, ports::MovieRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresMovieRepo {
    pool: PgPool,
}

impl PostgresMovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepo {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError> {
        sqlx::query_as::<_, Movie>(
            r#"INSERT INTO movies (id, title, duration_min, release_date, showing_days, base_price, published, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#
        )
            .bind(&movie.id)
            .bind(&movie.title)
            .bind(movie.duration_min)
            .bind(movie.release_date)
            .bind(movie.showing_days)
            .bind(movie.base_price)
            .bind(movie.published)
            .bind(movie.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError> {
        sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Movie>, AppError> {
        sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY release_date ASC, title ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_published(&self, id: &str, published: bool) -> Result<Movie, AppError> {
        sqlx::query_as::<_, Movie>("UPDATE movies SET published = $1 WHERE id = $2 RETURNING *")
            .bind(published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Movie not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let locked = sqlx::query("SELECT id FROM movies WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if locked.is_none() {
            return Err(AppError::NotFound("Movie not found".into()));
        }

        let booked = sqlx::query(
            "SELECT COUNT(*) AS count FROM bookings b JOIN showtimes s ON s.id = b.showtime_id WHERE s.movie_id = $1"
        )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get::<i64, _>("count");
        if booked > 0 {
            return Err(AppError::Conflict("Movie has bookings and cannot be deleted".into()));
        }

        sqlx::query("DELETE FROM movies WHERE id = $1").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
