/// Raw feed record -> canonical `RouletteResult`
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Result, TrackerError};
use crate::time::CivilZone;
use crate::types::{Color, RawGame, RouletteResult};

/// Normalize one raw record. Fails only when `id`, `roll` or `created_at`
/// is absent or unparseable; an unknown color code maps to black.
pub fn normalize(raw: &RawGame, zone: &CivilZone) -> Result<RouletteResult> {
    let id = parse_id(&raw.id)?;

    let roll = raw.roll.as_i64().ok_or_else(|| {
        TrackerError::InvalidRecord(format!("Record {}: malformed roll {}", id, raw.roll))
    })?;

    let created_at = parse_instant(&raw.created_at).ok_or_else(|| {
        TrackerError::InvalidRecord(format!(
            "Record {}: malformed created_at {}",
            id, raw.created_at
        ))
    })?;

    let color = raw.color.as_i64().map(Color::from_code).unwrap_or(Color::Black);
    let civil = zone.to_civil(created_at);

    Ok(RouletteResult::new(
        id,
        format!("{:02}", roll),
        color,
        civil.time,
        civil.date,
    ))
}

fn parse_id(value: &Value) -> Result<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Value::Null => Err(TrackerError::InvalidRecord("Record without id".to_string())),
        other => Err(TrackerError::InvalidRecord(format!("Malformed id {}", other))),
    }
}

fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
