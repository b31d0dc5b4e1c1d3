/// Data-access layer: the four read operations behind the HTTP surface
///
/// Every function takes a read-only connection and returns plain records or
/// aggregates; serialization concerns live in `model` and `endpoint`. Two
/// behaviors here are deliberately preserved from the service this replaces
/// and must not be "corrected":
///
/// - the tobs window is a fixed 365-day offset from the dataset's maximum
///   date, not a calendar-year subtraction (leap years shift the window
///   start by one day);
/// - a `start` filter admits rows from one day *before* the requested start
///   date.
///
/// Existing consumers depend on both boundaries exactly as they are.

use crate::model::{Measurement, Station, TemperatureSummary};
use chrono::{Duration, NaiveDate};
use rusqlite::{params_from_iter, Connection};

/// Length of the "most recent year" tobs window, in days. Fixed offset —
/// see the module docs before touching this.
const RECENT_WINDOW_DAYS: i64 = 365;

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

/// Every measurement row, unfiltered, in storage (rowid) order.
/// No pagination — the precipitation endpoint returns the full table.
pub fn fetch_all_measurements(conn: &Connection) -> Result<Vec<Measurement>, String> {
    let mut stmt = conn
        .prepare("SELECT id, station, date, prcp, tobs FROM measurement")
        .map_err(|e| format!("Failed to prepare measurement query: {}", e))?;

    let rows = stmt
        .query_map([], Measurement::from_row)
        .map_err(|e| format!("Measurement query failed: {}", e))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| format!("Failed to read measurement row: {}", e))
}

/// Maximum date present in the measurement table, or `None` when the table
/// is empty. Anchors the "most recent year" window.
pub fn max_measurement_date(conn: &Connection) -> Result<Option<NaiveDate>, String> {
    conn.query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))
        .map_err(|e| format!("Failed to find latest measurement date: {}", e))
}

/// Measurements from the most recent year of data: every row with
/// `date >= max(date) - 365 days`, boundary included.
///
/// An empty measurement table yields an empty result, not an error.
pub fn fetch_recent_measurements(conn: &Connection) -> Result<Vec<Measurement>, String> {
    let anchor = match max_measurement_date(conn)? {
        Some(date) => date,
        None => return Ok(Vec::new()),
    };

    let window_start = anchor - Duration::days(RECENT_WINDOW_DAYS);

    let mut stmt = conn
        .prepare("SELECT id, station, date, prcp, tobs FROM measurement WHERE date >= ?1")
        .map_err(|e| format!("Failed to prepare tobs query: {}", e))?;

    let rows = stmt
        .query_map([window_start], Measurement::from_row)
        .map_err(|e| format!("Tobs query failed: {}", e))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| format!("Failed to read measurement row: {}", e))
}

/// Min/mean/max temperature over an optional date range, computed in a
/// single aggregate pass.
///
/// Filter semantics (preserved verbatim):
/// - `start` given: rows with `date >= start - 1 day`
/// - `end` given: rows with `date <= end`
/// - neither: the full table
///
/// An empty filtered set (including `start` after `end`) returns a summary
/// with all three aggregates `None`.
pub fn temperature_summary(
    conn: &Connection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<TemperatureSummary, String> {
    let mut sql = String::from("SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement");
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<NaiveDate> = Vec::new();

    if let Some(start) = start {
        // One day before the requested start is included. Load-bearing.
        params.push(start - Duration::days(1));
        clauses.push(format!("date >= ?{}", params.len()));
    }

    if let Some(end) = end {
        params.push(end);
        clauses.push(format!("date <= ?{}", params.len()));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    // Aggregates over an empty set come back as a single all-NULL row,
    // which maps straight onto the Option fields.
    conn.query_row(&sql, params_from_iter(params), |row| {
        Ok(TemperatureSummary {
            min: row.get(0)?,
            mean: row.get(1)?,
            max: row.get(2)?,
        })
    })
    .map_err(|e| format!("Temperature summary query failed: {}", e))
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

/// All rows of the station table, in storage order.
pub fn fetch_stations(conn: &Connection) -> Result<Vec<Station>, String> {
    let mut stmt = conn
        .prepare("SELECT id, station, name, latitude, longitude, elevation FROM station")
        .map_err(|e| format!("Failed to prepare station query: {}", e))?;

    let rows = stmt
        .query_map([], Station::from_row)
        .map_err(|e| format!("Station query failed: {}", e))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| format!("Failed to read station row: {}", e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
