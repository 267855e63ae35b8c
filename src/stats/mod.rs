pub mod hourly;
pub mod white_streak;

pub use hourly::{hourly_distribution, ColorCounts, HourlyDistribution};
pub use white_streak::{white_streak_stats, WhiteStreakStats};
