pub mod civil;

pub use civil::{
    hhmm_format, truncate_to_minute, CivilDateTime, CivilZone, DEFAULT_UTC_OFFSET_MINUTES,
};
