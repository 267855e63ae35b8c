/// White-result streak statistics
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::CivilZone;
use crate::types::{Color, RouletteResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteStreakStats {
    /// Results since the most recent white (0 if the newest is white)
    pub rounds_since_white: usize,
    /// Whole minutes since the most recent white
    pub minutes_since_white: i64,
    /// Longest run of non-white results anywhere in the history
    pub max_rounds_between_whites: usize,
}

/// Compute streak statistics over a newest-first history.
///
/// Without any white in the history, `minutes_since_white` reports the
/// round count instead.
pub fn white_streak_stats(
    history: &[RouletteResult],
    now: DateTime<Utc>,
    zone: &CivilZone,
) -> WhiteStreakStats {
    if history.is_empty() {
        return WhiteStreakStats::default();
    }

    let last_white = history
        .iter()
        .enumerate()
        .find(|(_, r)| r.color == Color::White);

    let (rounds_since_white, minutes_since_white) = match last_white {
        Some((index, white)) => {
            let seen_at = zone.most_recent_occurrence(white.timestamp, now);
            (index, (now - seen_at).num_minutes())
        }
        None => (history.len(), history.len() as i64),
    };

    WhiteStreakStats {
        rounds_since_white,
        minutes_since_white,
        max_rounds_between_whites: longest_non_white_run(history),
    }
}

/// Longest run of consecutive non-white entries, open ends included
fn longest_non_white_run(history: &[RouletteResult]) -> usize {
    let mut longest = 0;
    let mut current = 0;

    for result in history {
        if result.color == Color::White {
            longest = longest.max(current);
            current = 0;
        } else {
            current += 1;
        }
    }

    longest.max(current)
}
