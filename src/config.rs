use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    /// How long after creation a customer may still cancel, in minutes.
    pub cancel_window_minutes: i64,
    /// Flat fee added to delivery-type orders.
    pub delivery_fee: f64,
    /// Prefix for human-readable order numbers, e.g. `FRY` -> `FRY-0001`.
    pub order_number_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            cancel_window_minutes: parse_or_default("CANCEL_WINDOW_MINUTES", 5)?,
            delivery_fee: parse_or_default("DELIVERY_FEE", 2.5)?,
            order_number_prefix: env::var("ORDER_NUMBER_PREFIX")
                .unwrap_or_else(|_| "FRY".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            log_level: "info".to_string(),
            event_buffer_size: 1024,
            cancel_window_minutes: 5,
            delivery_fee: 2.5,
            order_number_prefix: "FRY".to_string(),
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
