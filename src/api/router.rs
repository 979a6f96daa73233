use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, theater, movie, schedule, showtime, booking};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Catalogue
        .route("/api/v1/movies", get(movie::list_movies))
        .route("/api/v1/movies/{movie_id}", get(movie::get_movie))
        .route("/api/v1/movies/{movie_id}/showtimes", get(showtime::list_movie_showtimes))
        .route("/api/v1/theaters", get(theater::list_theaters))
        .route("/api/v1/screens/{screen_id}/layout", get(theater::screen_layout))

        // Seats
        .route("/api/v1/showtimes/{showtime_id}/availability", get(showtime::get_availability))
        .route("/api/v1/showtimes/{showtime_id}/seats", get(showtime::get_seat_map))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))
        .route("/api/v1/customers/{customer_id}/bookings", get(booking::list_customer_bookings))

        // Operator
        .route("/api/v1/admin/theaters", post(theater::create_theater))
        .route("/api/v1/admin/theaters/{theater_id}/screens", post(theater::create_screen))
        .route("/api/v1/admin/movies", post(movie::create_movie))
        .route("/api/v1/admin/movies/{movie_id}", delete(movie::delete_movie))
        .route("/api/v1/admin/movies/{movie_id}/published", put(movie::set_published))
        .route("/api/v1/admin/movies/{movie_id}/showtimes", get(showtime::list_admin_showtimes))
        .route("/api/v1/admin/schedules", post(schedule::create_schedule))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
