/// Core type definitions for the roulette tracker
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::time::{hhmm_format, truncate_to_minute, DEFAULT_UTC_OFFSET_MINUTES};

/// Roulette outcome color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Red,
    Black,
}

impl Color {
    /// Map the feed's numeric color code. Unknown codes fall back to black.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Color::White,
            1 => Color::Red,
            _ => Color::Black,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Color::White => "white",
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

/// One normalized game result, as stored in history and on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteResult {
    pub id: String,
    /// Roll rendered as zero-padded two-digit text
    pub value: String,
    pub color: Color,
    /// Civil time-of-day, serialized as `HH:MM`
    #[serde(with = "hhmm_format")]
    pub timestamp: NaiveTime,
    /// Civil date, serialized as `YYYY-MM-DD`
    #[serde(rename = "isoDate")]
    pub iso_date: NaiveDate,
}

impl RouletteResult {
    /// Build a result; `timestamp` is truncated to whole minutes
    pub fn new(
        id: String,
        value: String,
        color: Color,
        timestamp: NaiveTime,
        iso_date: NaiveDate,
    ) -> Self {
        RouletteResult {
            id,
            value,
            color,
            timestamp,
            iso_date,
        }
        .at_minute_precision()
    }

    /// Same result with `timestamp` truncated to the `HH:MM` it is stored as
    pub fn at_minute_precision(mut self) -> Self {
        self.timestamp = truncate_to_minute(self.timestamp);
        self
    }
}

/// Raw game record as returned by the feed.
///
/// Fields are kept as loose JSON so that a single malformed record is
/// rejected by the normalizer rather than failing the whole payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub roll: Value,
    #[serde(default)]
    pub color: Value,
    #[serde(default)]
    pub created_at: Value,
}

/// Configuration for the tracker
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    // Feed
    pub feed_url: String,
    pub poll_interval_sec: u64,
    pub request_timeout_sec: u64,

    // History
    pub history_path: String,
    pub retention_days: u32,

    // Civil time
    pub utc_offset_minutes: i32,
    pub iana_zone: Option<String>,

    // Read API
    pub http_port: u16,
    pub results_limit: usize,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            feed_url: "https://blaze.bet.br/api/singleplayer-originals/originals/roulette_games/recent/1"
                .to_string(),
            poll_interval_sec: 15,
            request_timeout_sec: 10,
            history_path: "./historico_completo.json".to_string(),
            retention_days: 4,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            iana_zone: None,
            http_port: 3000,
            results_limit: 500,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
