use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const SEAT_RACE_CONTENDERS: usize = 200;

struct Target {
    name: &'static str,
    url: String,
}

struct Seeded {
    movie_id: String,
    showtime_id: String,
    screen_id: i64,
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("BENCH_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let operator_key = std::env::var("OPERATOR_API_KEY").unwrap_or_else(|_| "dev-operator-key".to_string());

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let seeded = seed(&client, &base_url, &operator_key).await;
    println!("{}", "✅ Data created successfully.".green());
    println!("   Movie ID:    {}", seeded.movie_id);
    println!("   Showtime ID: {}", seeded.showtime_id);

    seat_race(&client, &base_url, &seeded.showtime_id).await;

    let targets = vec![
        Target {
            name: "Health Check",
            url: format!("{}/health", base_url),
        },
        Target {
            name: "Bookable Movies (Listing)",
            url: format!("{}/api/v1/movies", base_url),
        },
        Target {
            name: "Seat Availability (Hot Path)",
            url: format!("{}/api/v1/showtimes/{}/availability", base_url, seeded.showtime_id),
        },
        Target {
            name: "Screen Layout",
            url: format!("{}/api/v1/screens/{}/layout", base_url, seeded.screen_id),
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

async fn admin_post(client: &Client, url: String, operator_key: &str, body: Value) -> Value {
    let res = client.post(&url)
        .header("X-Operator-Key", operator_key)
        .json(&body)
        .send()
        .await
        .expect("Failed to send setup request");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Setup request to {} failed. Status: {}. Body: {}", url, status, txt);
    }
    res.json().await.expect("Failed to parse setup response")
}

async fn seed(client: &Client, base_url: &str, operator_key: &str) -> Seeded {
    let theater = admin_post(client, format!("{}/api/v1/admin/theaters", base_url), operator_key, json!({
        "name": format!("Bench {}", Uuid::new_v4()),
        "location": "Load Lab"
    })).await;
    let theater_id = theater["id"].as_i64().expect("No theater id");

    let screen = admin_post(client, format!("{}/api/v1/admin/theaters/{}/screens", base_url, theater_id), operator_key, json!({
        "screenNumber": 1,
        "rows": 12,
        "sections": [4, 12, 4]
    })).await;
    let screen_id = screen["id"].as_i64().expect("No screen id");

    let release = (Utc::now() + ChronoDuration::days(2)).format("%Y-%m-%d").to_string();
    let movie = admin_post(client, format!("{}/api/v1/admin/movies", base_url), operator_key, json!({
        "title": "Benchmark Feature",
        "durationMinutes": 110,
        "releaseDate": release,
        "showingDays": 7,
        "basePrice": 250
    })).await;
    let movie_id = movie["id"].as_str().expect("No movie id").to_string();

    admin_post(client, format!("{}/api/v1/admin/schedules", base_url), operator_key, json!({
        "movieId": movie_id,
        "durationMinutes": 110,
        "theaterIds": [theater_id],
        "screenNumbers": [1],
        "times": ["10:00", "14:00", "18:00"],
        "releaseDate": release,
        "showingDays": 7
    })).await;

    let res = client.get(format!("{}/api/v1/admin/movies/{}/showtimes", base_url, movie_id))
        .header("X-Operator-Key", operator_key)
        .send()
        .await
        .expect("Failed to list showtimes");
    let body: Value = res.json().await.expect("Failed to parse showtime listing");
    let showtime_id = body["showtimes"][0]["id"].as_str().expect("No showtime generated").to_string();

    Seeded { movie_id, showtime_id, screen_id }
}

/// Fires many simultaneous bookings at one seat; exactly one may win.
async fn seat_race(client: &Client, base_url: &str, showtime_id: &str) {
    println!("\n{}", "=".repeat(60));
    println!("Seat race: {} concurrent bookings for seat {}", SEAT_RACE_CONTENDERS, "A1".cyan().bold());
    println!("{}", "=".repeat(60));

    let mut set = JoinSet::new();
    let start = Instant::now();
    for i in 0..SEAT_RACE_CONTENDERS {
        let client = client.clone();
        let url = format!("{}/api/v1/bookings", base_url);
        let payload = json!({
            "customerId": format!("bench-{}", i),
            "showtimeId": showtime_id,
            "seatNumbers": ["A1"],
            "paymentMethod": "card"
        });
        set.spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(r) => Some(r.status().as_u16()),
                Err(_) => None,
            }
        });
    }

    let (mut won, mut rejected, mut failed) = (0, 0, 0);
    while let Some(res) = set.join_next().await {
        match res.ok().flatten() {
            Some(200) => won += 1,
            Some(409) => rejected += 1,
            _ => failed += 1,
        }
    }

    println!("Elapsed: {:.2}s", start.elapsed().as_secs_f64());
    println!("Won: {}  Rejected: {}  Failed: {}", won, rejected, failed);
    if won == 1 {
        println!("{}", "✅ Seat exclusivity held.".green().bold());
    } else {
        println!("{}", format!("❌ Seat A1 was sold {} times.", won).red().bold());
    }
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = client.get(&url).send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
