use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use libsql::Row;

use crate::monitoring::types::Observation;

/// Column list shared by every observation query, in `observation_from_row` order
pub const OBSERVATION_COLUMNS: &str = "url, status, response_time_ms, checked_at";

/// Convert a timestamp to the stored representation (UTC microseconds)
pub fn timestamp_to_i64(time: DateTime<Utc>) -> i64 {
    time.timestamp_micros()
}

/// Convert a stored timestamp back to UTC
pub fn i64_to_timestamp(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| anyhow!("Stored timestamp out of range: {}", micros))
}

/// Decode a row selected with [`OBSERVATION_COLUMNS`]
pub fn observation_from_row(row: &Row) -> Result<Observation> {
    let status: String = row.get(1)?;
    let checked_at: i64 = row.get(3)?;

    Ok(Observation {
        url: row.get(0)?,
        status: status.parse()?,
        response_time_ms: row.get::<Option<f64>>(2)?,
        checked_at: i64_to_timestamp(checked_at)?,
    })
}
