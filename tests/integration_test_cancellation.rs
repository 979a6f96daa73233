mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_cancel_well_ahead_frees_the_seat() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::hours(30), 250).await;

    let (_, booked) = app.book(&showtime, &["A1"], None).await;
    let booking_id = booked["bookingId"].as_str().unwrap();
    assert_eq!(app.unavailable(&showtime).await, vec!["A1"]);

    let (status, body) = app.post(&format!("/api/v1/bookings/{}/cancel", booking_id), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["booking"]["status"], "cancelled");
    assert!(app.unavailable(&showtime).await.is_empty());

    // The freed seat can be sold again.
    let (status, _) = app.book(&showtime, &["A1"], None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cancel_inside_cutoff_is_refused() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::hours(10), 250).await;

    let (_, booked) = app.book(&showtime, &["A1"], None).await;
    let booking_id = booked["bookingId"].as_str().unwrap();

    let (status, body) = app.post(&format!("/api/v1/bookings/{}/cancel", booking_id), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Cannot cancel within 24 hours");

    let (_, fetched) = app.get(&format!("/api/v1/bookings/{}", booking_id)).await;
    assert_eq!(fetched["booking"]["status"], "confirmed");
    assert_eq!(app.unavailable(&showtime).await, vec!["A1"]);
}

#[tokio::test]
async fn test_cancel_twice_is_idempotent() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(4), 250).await;
    let (_, booked) = app.book(&showtime, &["B2"], None).await;
    let uri = format!("/api/v1/bookings/{}/cancel", booked["bookingId"].as_str().unwrap());

    let (status, _) = app.post(&uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.post(&uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "cancelled");
    assert_eq!(body["booking"]["seats"], json!(["B2"]));
}

#[tokio::test]
async fn test_repeated_cancel_in_store_keeps_booking() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::days(4), 250).await;
    let (_, booked) = app.book(&showtime, &["C3"], None).await;
    let booking_id = booked["bookingId"].as_str().unwrap();

    let booking = app.state.booking_repo.find_by_id(booking_id).await.unwrap().unwrap();
    let first = app.state.booking_repo.cancel(&booking).await.unwrap();
    assert_eq!(first.status, "cancelled");

    // A stale copy still reading "confirmed" must not redo the transition.
    let second = app.state.booking_repo.cancel(&booking).await.unwrap();
    assert_eq!(second.status, "cancelled");
    assert_eq!(second.id, first.id);
    assert!(app.unavailable(&showtime).await.is_empty());
}

#[tokio::test]
async fn test_pending_booking_follows_cutoff() {
    let app = TestApp::new().await;
    let (_, showtime) = app.seed_single_showtime(Utc::now() + Duration::hours(5), 250).await;
    let (_, booked) = app.book(&showtime, &["A1"], Some("pending")).await;

    let (status, _) = app.post(&format!("/api/v1/bookings/{}/cancel", booked["bookingId"].as_str().unwrap()), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cancel_unknown_booking_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app.post("/api/v1/bookings/missing/cancel", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
