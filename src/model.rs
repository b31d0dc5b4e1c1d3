/// Shared data types for the climate query service
///
/// Two plain record types mirror the two tables of the SQLite dataset
/// (`station`, `measurement`), plus the aggregate envelope returned by the
/// search endpoint. Response projections are pure functions on the records
/// rather than methods buried in the serialization layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the `station` table. Immutable reference data — the service
/// never writes to this table.
#[derive(Debug, Clone, Serialize)]
pub struct Station {
    pub id: i64,
    /// Station code, e.g. "USC00519397". Measurements reference this code;
    /// the link is not enforced at the application layer.
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Station {
    /// Maps a `SELECT id, station, name, latitude, longitude, elevation`
    /// row onto the record.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Station {
            id: row.get(0)?,
            station: row.get(1)?,
            name: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
            elevation: row.get(5)?,
        })
    }
}

/// One row of the `measurement` table: a daily observation at one station.
/// Append-only historical data — the service never writes to this table.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub id: i64,
    /// Station code of the observing station.
    pub station: String,
    /// Calendar date of the observation, no time component.
    pub date: NaiveDate,
    /// Precipitation in inches. Missing for some rows.
    pub prcp: Option<f64>,
    /// Temperature observation in whole degrees Fahrenheit.
    pub tobs: i64,
}

impl Measurement {
    /// Maps a `SELECT id, station, date, prcp, tobs` row onto the record.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Measurement {
            id: row.get(0)?,
            station: row.get(1)?,
            date: row.get(2)?,
            prcp: row.get(3)?,
            tobs: row.get(4)?,
        })
    }

    /// Projection served by `/api/v1.0/precipitation`: a
    /// `[date, station, prcp]` tuple (serde renders tuples as JSON arrays).
    pub fn precipitation_entry(&self) -> (NaiveDate, String, Option<f64>) {
        (self.date, self.station.clone(), self.prcp)
    }

    /// Projection served by `/api/v1.0/tobs`: a `[date, station, tobs]` tuple.
    pub fn tobs_entry(&self) -> (NaiveDate, String, i64) {
        (self.date, self.station.clone(), self.tobs)
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Aggregate envelope returned by `/api/v1.0/search`.
///
/// All three fields are `None` (JSON null) when the filtered set is empty —
/// an empty range is a valid answer, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub min: Option<i64>,
    pub mean: Option<f64>,
    pub max: Option<i64>,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Reduces station records to their codes, dropping repeats while keeping
/// first-seen order. The dataset's station table should already be unique
/// per code, but the endpoint contract promises a distinct list either way.
pub fn distinct_station_codes(stations: &[Station]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    stations
        .iter()
        .filter(|s| seen.insert(s.station.clone()))
        .map(|s| s.station.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
