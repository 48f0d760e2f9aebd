use std::env;
use std::time::Duration;

pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";
pub const DEFAULT_SNAPSHOT_FILE: &str = "exchange_rates.json";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fractional digits kept in converted amounts at the output boundary.
pub const DISPLAY_SCALE: u32 = 2;

pub fn rates_url() -> String {
    env::var("FXCONV_RATES_URL").unwrap_or_else(|_| DEFAULT_RATES_URL.to_string())
}

pub fn snapshot_file() -> String {
    env::var("FXCONV_SNAPSHOT_FILE").unwrap_or_else(|_| DEFAULT_SNAPSHOT_FILE.to_string())
}
