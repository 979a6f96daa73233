mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use cinema_booking::{
    domain::models::movie::{Movie, NewMovieParams},
    error::is_unique_violation,
};
use common::TestApp;
use serde_json::json;
use sqlx::Row;
use uuid::Uuid;

#[tokio::test]
async fn test_total_is_base_price_times_seats() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;

    let (status, body) = app.book(&showtime, &["A1", "A2", "A3"], None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["totalAmount"], 750);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["seats"], json!(["A1", "A2", "A3"]));
    assert_eq!(body["bookingCode"].as_str().unwrap().len(), 8);

    let booking_id = body["bookingId"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/api/v1/bookings/{}", booking_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["booking"]["totalAmount"], 750);
    assert_eq!(fetched["booking"]["seats"], json!(["A1", "A2", "A3"]));
}

#[tokio::test]
async fn test_booked_seats_show_as_unavailable() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;
    assert!(app.unavailable(&showtime).await.is_empty());

    app.book(&showtime, &["B5", "A1"], None).await;
    assert_eq!(app.unavailable(&showtime).await, vec!["A1", "B5"]);

    let (status, map) = app.get(&format!("/api/v1/showtimes/{}/seats", showtime)).await;
    assert_eq!(status, StatusCode::OK);
    let first_row = &map["rows"][0];
    assert_eq!(first_row["row"], "A");
    assert_eq!(first_row["sections"][0][0]["code"], "A1");
    assert_eq!(first_row["sections"][0][0]["available"], false);
    assert_eq!(first_row["sections"][0][1]["available"], true);
}

#[tokio::test]
async fn test_second_booking_of_same_seat_conflicts() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;

    let (status, _) = app.book(&showtime, &["A1"], None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.book(&showtime, &["A2", "A1"], None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("A1"));

    // The losing request must not leave A2 behind.
    assert_eq!(app.unavailable(&showtime).await, vec!["A1"]);
}

#[tokio::test]
async fn test_unknown_seat_code_is_rejected() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;

    let (status, body) = app.book(&showtime, &["A1", "Z99"], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Z99"));
    assert!(app.unavailable(&showtime).await.is_empty());
}

#[tokio::test]
async fn test_empty_seat_list_is_rejected() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;

    let (status, body) = app.book(&showtime, &[], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_showtime_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app.book("does-not-exist", &["A1"], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/v1/showtimes/does-not-exist/availability").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_seat_codes_count_once() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 300).await;

    let (status, body) = app.book(&showtime, &["a1", "A1 "], None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["totalAmount"], 300);
    assert_eq!(body["seats"], json!(["A1"]));
}

#[tokio::test]
async fn test_pending_booking_does_not_hold_seat() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;

    let (status, body) = app.book(&showtime, &["A1"], Some("pending")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert!(app.unavailable(&showtime).await.is_empty());

    let (status, body) = app.book(&showtime, &["A1"], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");
}

#[tokio::test]
async fn test_unrecognised_payment_status_defaults_to_confirmed() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;

    let (status, body) = app.book(&showtime, &["C3"], Some("paid-maybe")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(app.unavailable(&showtime).await, vec!["C3"]);
}

#[tokio::test]
async fn test_started_showtime_cannot_be_booked() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() - Duration::hours(1), 250).await;

    let (status, body) = app.book(&showtime, &["A1"], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("started"));
}

#[tokio::test]
async fn test_customer_booking_history() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;
    app.book(&showtime, &["A1"], None).await;
    app.book(&showtime, &["A2", "A3"], None).await;

    let (status, body) = app.get("/api/v1/customers/cust-1/bookings").await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    let total: i64 = bookings.iter().map(|b| b["totalAmount"].as_i64().unwrap()).sum();
    assert_eq!(total, 750);

    let (_, body) = app.get("/api/v1/customers/nobody/bookings").await;
    assert!(body["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_showtime_listing_reports_sold_out() {
    let app = TestApp::new().await;
    let theater = app.create_theater("Downtown").await;
    app.create_screen(theater, 1, 1, &[2]).await;
    let date = (Utc::now() + Duration::days(2)).format("%Y-%m-%d").to_string();
    let movie = app.create_movie("Heat", 90, &date, 1, 250).await;
    app.schedule(&movie, 90, &[theater], &[1], &["10:00", "20:00"], &date, 1).await;

    let uri = format!("/api/v1/movies/{}/showtimes?theaterId={}&screenNumber=1&date={}", movie, theater, date);
    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    let times = body["times"].as_array().unwrap();
    assert_eq!(times.len(), 2);
    assert_eq!(times[0]["time"], "10:00");
    assert_eq!(times[0]["available"], true);

    let morning = times[0]["id"].as_str().unwrap().to_string();
    let (status, _) = app.book(&morning, &["A1", "A2"], None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&uri).await;
    assert_eq!(body["times"][0]["available"], false);
    assert_eq!(body["times"][1]["available"], true);
}

#[tokio::test]
async fn test_base_price_above_ceiling_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app.admin_post("/api/v1/admin/movies", json!({
        "title": "Gold Reel",
        "durationMinutes": 100,
        "releaseDate": "2030-05-01",
        "showingDays": 3,
        "basePrice": i64::MAX / 2 + 1
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_total_overflow_is_rejected_without_booking() {
    let app = TestApp::new().await;
    let theater = app.create_theater("Downtown").await;
    app.create_screen(theater, 1, 2, &[5]).await;

    let starts_at = Utc::now() + Duration::days(3);
    let date = starts_at.date_naive();
    // Stored directly so the price ceiling on the admin endpoint is bypassed.
    let movie = app.state.movie_repo.create(&Movie::new(NewMovieParams {
        title: "Gold Reel".into(),
        duration_min: 100,
        release_date: date,
        showing_days: 1,
        base_price: i64::MAX / 2 + 1,
        published: true,
    })).await.unwrap();
    let date = date.format("%Y-%m-%d").to_string();
    let (status, _) = app.schedule(&movie.id, 100, &[theater], &[1], &["10:00"], &date, 1).await;
    assert_eq!(status, StatusCode::OK);
    let showtime = app.showtimes_of(&movie.id).await[0]["id"].as_str().unwrap().to_string();

    let (status, body) = app.book(&showtime, &["A1", "A2"], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert!(app.unavailable(&showtime).await.is_empty());
}

#[tokio::test]
async fn test_store_rejects_second_confirmed_ticket_for_seat() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(3), 250).await;
    let (status, booked) = app.book(&showtime, &["A1"], None).await;
    assert_eq!(status, StatusCode::OK);
    let booking_id = booked["bookingId"].as_str().unwrap();

    let row = sqlx::query("SELECT seat_id FROM tickets WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let seat_id: i64 = row.get("seat_id");

    let insert = |status: &'static str| {
        sqlx::query("INSERT INTO tickets (id, booking_id, showtime_id, seat_id, price, status) VALUES (?, ?, ?, ?, 250, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(booking_id.to_string())
            .bind(showtime.clone())
            .bind(seat_id)
            .bind(status)
    };

    let err = insert("confirmed").execute(&app.pool).await.unwrap_err();
    assert!(is_unique_violation(&err), "unexpected error: {:?}", err);
    assert_eq!(err.as_database_error().unwrap().code().unwrap(), "2067");

    insert("cancelled").execute(&app.pool).await.unwrap();
    insert("pending").execute(&app.pool).await.unwrap();
    assert_eq!(app.unavailable(&showtime).await, vec!["A1"]);
}
