/// Civil date/time conversion for the tracker's target zone
use chrono::{
    DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;

use crate::error::{Result, TrackerError};

/// UTC-03:00, the offset the history is bucketed by
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;

/// Zone used to turn absolute instants into civil dates and wall-clock times.
///
/// `Fixed` applies a constant arithmetic offset and never consults
/// transition tables. `Named` follows an IANA zone, including any
/// historical daylight-saving rules it carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CivilZone {
    Fixed(FixedOffset),
    Named(Tz),
}

/// Civil calendar date and time-of-day in a `CivilZone`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDateTime {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl CivilDateTime {
    /// `YYYY-MM-DD`
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM`, 24-hour
    pub fn hhmm(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Drop seconds and sub-seconds; history timestamps are stored as `HH:MM`
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time)
}

impl Default for CivilZone {
    fn default() -> Self {
        CivilZone::Fixed(
            FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or(Utc.fix()),
        )
    }
}

impl CivilZone {
    /// Build a zone from configuration. A named IANA zone takes precedence
    /// over the fixed offset.
    pub fn from_config(utc_offset_minutes: i32, iana_zone: Option<&str>) -> Result<Self> {
        if let Some(name) = iana_zone {
            let tz: Tz = name.parse().map_err(|e| {
                TrackerError::ConfigError(format!("Unknown IANA zone '{}': {}", name, e))
            })?;
            return Ok(CivilZone::Named(tz));
        }

        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            TrackerError::ConfigError(format!(
                "UTC offset out of range: {} minutes",
                utc_offset_minutes
            ))
        })?;
        Ok(CivilZone::Fixed(offset))
    }

    /// Convert an absolute instant to civil date and time-of-day
    pub fn to_civil(&self, instant: DateTime<Utc>) -> CivilDateTime {
        let local = match self {
            CivilZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
            CivilZone::Named(tz) => instant.with_timezone(tz).naive_local(),
        };

        CivilDateTime {
            date: local.date(),
            time: local.time(),
        }
    }

    /// Today's civil date
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.to_civil(now).date
    }

    /// Oldest civil date still inside a retention window of `days` days before today
    pub fn retention_cutoff(&self, now: DateTime<Utc>, days: u32) -> NaiveDate {
        self.today(now)
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Instant at which the wall clock of this zone reads `local`.
    ///
    /// Ambiguous wall-clock times resolve to the earlier instant. Times that
    /// fall inside a forward transition are read with the pre-transition
    /// offset, which lands them past the gap.
    pub fn instant_of(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self {
            CivilZone::Fixed(offset) => resolve_local(offset, local),
            CivilZone::Named(tz) => resolve_local(tz, local),
        }
    }

    /// Most recent instant, at or before `now`, at which the civil clock
    /// showed `time_of_day`
    pub fn most_recent_occurrence(&self, time_of_day: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.today(now);
        let candidate = self.instant_of(today.and_time(time_of_day));
        if candidate <= now {
            return candidate;
        }

        let yesterday = today.pred_opt().unwrap_or(today);
        self.instant_of(yesterday.and_time(time_of_day))
    }
}

fn resolve_local<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> DateTime<Utc> {
    if let Some(dt) = zone.from_local_datetime(&local).earliest() {
        return dt.with_timezone(&Utc);
    }

    let offset_secs = zone
        .from_local_datetime(&(local - Duration::days(1)))
        .earliest()
        .map(|dt| dt.offset().fix().local_minus_utc())
        .unwrap_or(0);
    Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(offset_secs))))
}

/// Serde adapter storing a `NaiveTime` as `HH:MM`
pub mod hhmm_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
