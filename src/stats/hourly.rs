/// Per-hour color distribution for one civil date
use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Color, RouletteResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCounts {
    pub red: u32,
    pub black: u32,
    pub white: u32,
}

impl ColorCounts {
    fn record(&mut self, color: Color) {
        match color {
            Color::Red => self.red += 1,
            Color::Black => self.black += 1,
            Color::White => self.white += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.red + self.black + self.white
    }
}

/// Hour bucket (`"00"`..`"23"`) -> color counts
pub type HourlyDistribution = BTreeMap<String, ColorCounts>;

/// Count results dated `date` by the hour of their civil timestamp.
/// All 24 buckets are always present.
pub fn hourly_distribution(history: &[RouletteResult], date: NaiveDate) -> HourlyDistribution {
    let mut buckets = [ColorCounts::default(); 24];

    for result in history.iter().filter(|r| r.iso_date == date) {
        buckets[result.timestamp.hour() as usize].record(result.color);
    }

    buckets
        .iter()
        .enumerate()
        .map(|(hour, counts)| (format!("{:02}", hour), *counts))
        .collect()
}
