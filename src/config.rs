use chrono_tz::Tz;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Zone in which "today" and showtime instants are evaluated.
    pub timezone: Tz,
    pub operator_api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            timezone: env::var("CINEMA_TIMEZONE")
                .unwrap_or_else(|_| "UTC".to_string())
                .parse()
                .expect("CINEMA_TIMEZONE must be an IANA zone name"),
            operator_api_key: env::var("OPERATOR_API_KEY").expect("OPERATOR_API_KEY must be set"),
        }
    }
}
