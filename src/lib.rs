/// climate_service: read-only HTTP query API over a daily climate dataset.
///
/// Serves JSON projections and simple min/mean/max aggregates from a
/// pre-populated SQLite file holding station metadata and daily
/// precipitation/temperature measurements. The service never writes.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── model    — record types (Station, Measurement), response projections,
/// │              TemperatureSummary aggregate envelope
/// ├── db       — read-only SQLite open + validation (CLIMATE_DB env var)
/// ├── queries  — data-access layer: the four read operations
/// └── endpoint — HTTP server loop, routing, query parsing, JSON responses
/// ```

/// Public modules
pub mod db;
pub mod endpoint;
pub mod model;
pub mod queries;
