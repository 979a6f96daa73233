use cinema_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::connect_sqlite,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_movie_repo::SqliteMovieRepo,
        sqlite_showtime_repo::SqliteShowtimeRepo,
        sqlite_theater_repo::SqliteTheaterRepo,
    },
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const OPERATOR_KEY: &str = "test-operator-key";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    // Extractor rejections come back as plain text.
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let pool = connect_sqlite(&db_url)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            timezone: chrono_tz::UTC,
            operator_api_key: OPERATOR_KEY.to_string(),
        };

        let state = Arc::new(AppState {
            config,
            theater_repo: Arc::new(SqliteTheaterRepo::new(pool.clone())),
            movie_repo: Arc::new(SqliteMovieRepo::new(pool.clone())),
            showtime_repo: Arc::new(SqliteShowtimeRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>, operator: bool) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if operator {
            builder = builder.header("X-Operator-Key", OPERATOR_KEY);
        }
        let request = match body {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None, false).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body), false).await
    }

    pub async fn admin_post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body), true).await
    }

    pub async fn create_theater(&self, name: &str) -> i64 {
        let (status, body) = self.admin_post("/api/v1/admin/theaters", json!({ "name": name, "location": "Main St" })).await;
        assert_eq!(status, StatusCode::OK, "theater creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_screen(&self, theater_id: i64, screen_number: i32, rows: i32, sections: &[i32]) -> i64 {
        let (status, body) = self.admin_post(
            &format!("/api/v1/admin/theaters/{}/screens", theater_id),
            json!({ "screenNumber": screen_number, "rows": rows, "sections": sections }),
        ).await;
        assert_eq!(status, StatusCode::OK, "screen creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_movie(&self, title: &str, duration: i32, release_date: &str, showing_days: i32, base_price: i64) -> String {
        let (status, body) = self.admin_post("/api/v1/admin/movies", json!({
            "title": title,
            "durationMinutes": duration,
            "releaseDate": release_date,
            "showingDays": showing_days,
            "basePrice": base_price
        })).await;
        assert_eq!(status, StatusCode::OK, "movie creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn schedule(
        &self,
        movie_id: &str,
        duration: i32,
        theater_ids: &[i64],
        screen_numbers: &[i32],
        times: &[&str],
        release_date: &str,
        showing_days: i32,
    ) -> (StatusCode, Value) {
        self.admin_post("/api/v1/admin/schedules", json!({
            "movieId": movie_id,
            "durationMinutes": duration,
            "theaterIds": theater_ids,
            "screenNumbers": screen_numbers,
            "times": times,
            "releaseDate": release_date,
            "showingDays": showing_days
        })).await
    }

    pub async fn showtimes_of(&self, movie_id: &str) -> Vec<Value> {
        let (status, body) = self.send("GET", &format!("/api/v1/admin/movies/{}/showtimes", movie_id), None, true).await;
        assert_eq!(status, StatusCode::OK, "showtime listing failed: {}", body);
        body["showtimes"].as_array().unwrap().clone()
    }

    pub async fn book(&self, showtime_id: &str, seats: &[&str], status: Option<&str>) -> (StatusCode, Value) {
        let mut payload = json!({
            "customerId": "cust-1",
            "showtimeId": showtime_id,
            "seatNumbers": seats,
            "paymentMethod": "card"
        });
        if let Some(s) = status {
            payload["paymentStatus"] = json!(s);
        }
        self.post("/api/v1/bookings", payload).await
    }

    pub async fn unavailable(&self, showtime_id: &str) -> Vec<String> {
        let (status, body) = self.get(&format!("/api/v1/showtimes/{}/availability", showtime_id)).await;
        assert_eq!(status, StatusCode::OK, "availability failed: {}", body);
        body["unavailableSeats"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    /// One theater with screen 1 (3 rows × [4, 8, 4]) and a movie scheduled
    /// once at `starts_at`. Returns the movie and showtime ids.
    pub async fn seed_single_showtime(&self, starts_at: DateTime<Utc>, base_price: i64) -> (String, String) {
        let theater_id = self.create_theater("Downtown").await;
        self.create_screen(theater_id, 1, 3, &[4, 8, 4]).await;

        let date = starts_at.format("%Y-%m-%d").to_string();
        let time = starts_at.format("%H:%M").to_string();
        let movie_id = self.create_movie("Feature", 100, &date, 1, base_price).await;

        let (status, body) = self.schedule(&movie_id, 100, &[theater_id], &[1], &[&time], &date, 1).await;
        assert_eq!(status, StatusCode::OK, "schedule failed: {}", body);

        let showtimes = self.showtimes_of(&movie_id).await;
        let showtime_id = showtimes[0]["id"].as_str().unwrap().to_string();
        (movie_id, showtime_id)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
