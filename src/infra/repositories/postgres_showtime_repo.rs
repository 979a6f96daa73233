use crate::domain::{
    models::{movie::Movie, showtime::{SchedulePlan, ScheduleOutcome, Showtime, ShowtimeOccupancy, ShowtimeSlot}},
    ports::ShowtimeRepository,
    services::scheduling::{diff_schedule, find_conflict, ScheduleConflict},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::{hash_map::Entry, BTreeSet, HashMap};

const OTHER_SLOTS_ON_SCREEN: &str = r#"
    SELECT m.title AS movie_title, t.name AS theater_name, sc.screen_number,
           s.screen_id, s.show_date, s.start_time, s.end_time
    FROM showtimes s
    JOIN movies m ON m.id = s.movie_id
    JOIN screens sc ON sc.id = s.screen_id
    JOIN theaters t ON t.id = sc.theater_id
    WHERE s.screen_id = $1 AND s.show_date = $2 AND s.movie_id <> $3
    ORDER BY s.start_time ASC"#;

pub struct PostgresShowtimeRepo {
    pool: PgPool,
}

impl PostgresShowtimeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShowtimeRepository for PostgresShowtimeRepo {
    async fn replace_for_movie(&self, plan: &SchedulePlan) -> Result<ScheduleOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let movie = sqlx::query_as::<_, Movie>(
            "UPDATE movies SET duration_min = $1, release_date = $2, showing_days = $3 WHERE id = $4 RETURNING *"
        )
            .bind(plan.duration_min)
            .bind(plan.release_date)
            .bind(plan.showing_days)
            .bind(&plan.movie_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Movie not found".into()))?;

        // Screens are locked in id order so two schedulers targeting the same
        // screen run one after the other without deadlocking.
        let screen_ids: Vec<i64> = plan
            .candidates
            .iter()
            .map(|c| c.screen.screen_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !screen_ids.is_empty() {
            sqlx::query("SELECT id FROM screens WHERE id = ANY($1) ORDER BY id FOR UPDATE")
                .bind(&screen_ids)
                .fetch_all(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        let existing = sqlx::query_as::<_, Showtime>("SELECT * FROM showtimes WHERE movie_id = $1 FOR UPDATE")
            .bind(&plan.movie_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        let diff = diff_schedule(&existing, &plan.candidates);

        for showtime in &diff.stale {
            let booked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE showtime_id = $1")
                .bind(&showtime.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if booked > 0 {
                return Err(AppError::Conflict(format!(
                    "Showtime on {} at {} already has bookings and cannot be removed",
                    showtime.show_date,
                    showtime.start_time.format("%H:%M")
                )));
            }
        }

        let mut occupied: HashMap<(i64, NaiveDate), Vec<ShowtimeSlot>> = HashMap::new();
        for candidate in &plan.candidates {
            let slots = match occupied.entry((candidate.screen.screen_id, candidate.show_date)) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let rows = sqlx::query_as::<_, ShowtimeSlot>(OTHER_SLOTS_ON_SCREEN)
                        .bind(candidate.screen.screen_id)
                        .bind(candidate.show_date)
                        .bind(&plan.movie_id)
                        .fetch_all(&mut *tx)
                        .await
                        .map_err(AppError::Database)?;
                    entry.insert(rows)
                }
            };
            if let Some(hit) = find_conflict(candidate, slots) {
                return Err(AppError::ScheduleConflict(ScheduleConflict::from_slot(hit)));
            }
            slots.push(candidate.as_slot(&movie.title));
        }

        for showtime in &diff.stale {
            sqlx::query("DELETE FROM showtimes WHERE id = $1").bind(&showtime.id).execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        for candidate in &diff.fresh {
            let showtime = Showtime::from_candidate(&plan.movie_id, candidate);
            sqlx::query(
                r#"INSERT INTO showtimes (id, movie_id, screen_id, show_date, start_time, end_time, revision, created_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#
            )
                .bind(&showtime.id)
                .bind(&showtime.movie_id)
                .bind(showtime.screen_id)
                .bind(showtime.show_date)
                .bind(showtime.start_time)
                .bind(showtime.end_time)
                .bind(showtime.revision)
                .bind(showtime.created_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(ScheduleOutcome {
            created: diff.fresh.len(),
            kept: diff.kept.len(),
            removed: diff.stale.len(),
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Showtime>, AppError> {
        sqlx::query_as::<_, Showtime>("SELECT * FROM showtimes WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_movie(&self, movie_id: &str) -> Result<Vec<Showtime>, AppError> {
        sqlx::query_as::<_, Showtime>(
            "SELECT * FROM showtimes WHERE movie_id = $1 ORDER BY show_date ASC, start_time ASC, screen_id ASC"
        )
            .bind(movie_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_occupancy(&self, movie_id: &str, screen_id: i64, date: NaiveDate) -> Result<Vec<ShowtimeOccupancy>, AppError> {
        sqlx::query_as::<_, ShowtimeOccupancy>(
            r#"SELECT s.id, s.start_time, sc.capacity,
                      (SELECT COUNT(*) FROM tickets t WHERE t.showtime_id = s.id AND t.status = 'confirmed') AS sold
               FROM showtimes s
               JOIN screens sc ON sc.id = s.screen_id
               WHERE s.movie_id = $1 AND s.screen_id = $2 AND s.show_date = $3
               ORDER BY s.start_time ASC"#
        )
            .bind(movie_id)
            .bind(screen_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
