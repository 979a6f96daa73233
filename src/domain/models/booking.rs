use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};
use std::fmt;
use std::str::FromStr;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Confirmed,
    Cancelled,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Pending => "pending",
        }
    }

    /// Absent or unrecognised statuses fall back to `confirmed`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(PaymentStatus::Confirmed)
    }
}

impl FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(PaymentStatus::Confirmed),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            "pending" => Ok(PaymentStatus::Pending),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub booking_code: String,
    pub customer_id: String,
    pub showtime_id: String,
    pub booking_date: DateTime<Utc>,
    pub payment_method: String,
    pub status: String,
    pub total_amount: i64,
}

impl Booking {
    pub fn new(request: &BookingRequest, total_amount: i64) -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            booking_code: code.to_ascii_uppercase(),
            customer_id: request.customer_id.clone(),
            showtime_id: request.showtime_id.clone(),
            booking_date: Utc::now(),
            payment_method: request.payment_method.clone(),
            status: request.status.as_str().to_string(),
            total_amount,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == PaymentStatus::Cancelled.as_str()
    }
}

/// Validated input for the booking transaction.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer_id: String,
    pub showtime_id: String,
    pub seat_codes: Vec<String>,
    pub payment_method: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub booking_id: String,
    pub showtime_id: String,
    pub seat_id: i64,
    pub price: i64,
    pub status: String,
}

impl Ticket {
    pub fn new(booking: &Booking, seat_id: i64, price: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: booking.id.clone(),
            showtime_id: booking.showtime_id.clone(),
            seat_id,
            price,
            status: booking.status.clone(),
        }
    }
}

pub fn total_amount(base_price: i64, seat_count: usize) -> Result<i64, AppError> {
    i64::try_from(seat_count)
        .ok()
        .and_then(|count| base_price.checked_mul(count))
        .ok_or_else(|| AppError::Validation("Booking total exceeds the supported amount".into()))
}
