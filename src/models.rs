use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// A fetched rate table plus its validity timestamp. Immutable once loaded;
/// staleness is handled by replacing the whole snapshot, never by patching it.
///
/// Field names follow the open.er-api.com v6 payload; unknown fields in the
/// payload are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RateSnapshot {
    /// The reference currency all rates are expressed against.
    #[serde(rename = "base_code")]
    pub base: String,
    /// Units of each currency per one unit of base currency.
    pub rates: HashMap<String, Decimal>,
    /// Unix seconds after which this snapshot is considered stale.
    #[serde(rename = "time_next_update_unix")]
    pub next_refresh_at: i64,
}

impl RateSnapshot {
    pub fn is_stale(&self, now: i64) -> bool {
        now >= self.next_refresh_at
    }
}
