use crate::domain::{
    models::booking::{total_amount, Booking, BookingRequest, PaymentStatus, Ticket},
    ports::BookingRepository,
};
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_with_tickets(&self, request: &BookingRequest) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The row lock on the showtime serializes bookings for the same show.
        let target = sqlx::query("UPDATE showtimes SET revision = revision + 1 WHERE id = $1 RETURNING screen_id, movie_id")
            .bind(&request.showtime_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Showtime not found".into()))?;
        let screen_id: i64 = target.get("screen_id");
        let movie_id: String = target.get("movie_id");

        let base_price: i64 = sqlx::query_scalar("SELECT base_price FROM movies WHERE id = $1")
            .bind(&movie_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let mut seat_ids = Vec::with_capacity(request.seat_codes.len());
        for code in &request.seat_codes {
            let seat_id: i64 = sqlx::query_scalar("SELECT id FROM seats WHERE screen_id = $1 AND code = $2")
                .bind(screen_id)
                .bind(code)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::Validation(format!("Seat '{}' does not exist on this screen", code)))?;
            seat_ids.push(seat_id);
        }

        for (code, seat_id) in request.seat_codes.iter().zip(&seat_ids) {
            let held = sqlx::query("SELECT 1 FROM tickets WHERE showtime_id = $1 AND seat_id = $2 AND status = 'confirmed' LIMIT 1")
                .bind(&request.showtime_id)
                .bind(seat_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if held.is_some() {
                return Err(AppError::seat_taken(code));
            }
        }

        let booking = Booking::new(request, total_amount(base_price, seat_ids.len())?);
        let created = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (id, booking_code, customer_id, showtime_id, booking_date, payment_method, status, total_amount)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#
        )
            .bind(&booking.id)
            .bind(&booking.booking_code)
            .bind(&booking.customer_id)
            .bind(&booking.showtime_id)
            .bind(booking.booking_date)
            .bind(&booking.payment_method)
            .bind(&booking.status)
            .bind(booking.total_amount)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for (code, seat_id) in request.seat_codes.iter().zip(&seat_ids) {
            let ticket = Ticket::new(&created, *seat_id, base_price);
            sqlx::query("INSERT INTO tickets (id, booking_id, showtime_id, seat_id, price, status) VALUES ($1, $2, $3, $4, $5, $6)")
                .bind(&ticket.id)
                .bind(&ticket.booking_id)
                .bind(&ticket.showtime_id)
                .bind(ticket.seat_id)
                .bind(ticket.price)
                .bind(&ticket.status)
                .execute(&mut *tx)
                .await
                .map_err(|e| if is_unique_violation(&e) { AppError::seat_taken(code) } else { AppError::Database(e) })?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE customer_id = $1 ORDER BY booking_date DESC").bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn seat_codes(&self, booking_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar(
            "SELECT se.code FROM tickets t JOIN seats se ON se.id = t.seat_id WHERE t.booking_id = $1 ORDER BY se.id ASC"
        )
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $1 WHERE id = $2 AND status <> 'cancelled' RETURNING *"
        )
            .bind(PaymentStatus::Cancelled.as_str())
            .bind(&booking.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        let Some(cancelled) = updated else {
            // Already cancelled, or gone.
            let current = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
                .bind(&booking.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .ok_or(AppError::NotFound("Booking not found".into()))?;
            tx.commit().await.map_err(AppError::Database)?;
            return Ok(current);
        };
        sqlx::query("UPDATE tickets SET status = $1 WHERE booking_id = $2")
            .bind(PaymentStatus::Cancelled.as_str())
            .bind(&booking.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn unavailable_seats(&self, showtime_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar(
            r#"SELECT se.code FROM tickets t
               JOIN seats se ON se.id = t.seat_id
               WHERE t.showtime_id = $1 AND t.status = 'confirmed'
               ORDER BY se.id ASC"#
        )
            .bind(showtime_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
