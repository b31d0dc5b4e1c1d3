/// Dataset open and validation utilities
///
/// Opens the SQLite climate dataset read-only with clear error messages
/// and table validation. The service never writes; SQLite's own locking
/// covers concurrent readers of the file.

use rusqlite::{Connection, OpenFlags};
use std::env;
use std::path::Path;

/// Tables the service queries. Both must exist in the dataset file.
pub const REQUIRED_TABLES: &[&str] = &["station", "measurement"];

/// Dataset configuration validation error
#[derive(Debug)]
pub enum DbConfigError {
    /// CLIMATE_DB environment variable not set
    MissingDatabasePath,
    /// Dataset file does not exist at the configured path
    DatasetNotFound(String),
    /// Opening the SQLite file failed
    OpenFailed(rusqlite::Error),
    /// Required table missing from the dataset
    MissingTable(String),
}

impl std::fmt::Display for DbConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbConfigError::MissingDatabasePath => {
                write!(f, "CLIMATE_DB environment variable not set.\n\n")?;
                write!(f, "  Required Setup:\n")?;
                write!(f, "  1. Copy .env.example to .env: cp .env.example .env\n")?;
                write!(f, "  2. Edit .env and set CLIMATE_DB=Resources/hawaii.sqlite\n")?;
                write!(f, "  3. Restart the service")
            }
            DbConfigError::DatasetNotFound(path) => {
                write!(f, "Dataset file not found: {}\n\n", path)?;
                write!(f, "  Check that CLIMATE_DB points at the pre-populated\n")?;
                write!(f, "  SQLite dataset (the service never creates it)")
            }
            DbConfigError::OpenFailed(e) => {
                write!(f, "Failed to open SQLite dataset.\n\n")?;
                write!(f, "  Error: {}\n\n", e)?;
                write!(f, "  Common causes:\n")?;
                write!(f, "  - File is not a SQLite database\n")?;
                write!(f, "  - File permissions deny read access")
            }
            DbConfigError::MissingTable(table) => {
                write!(f, "Required table '{}' does not exist in the dataset.\n\n", table)?;
                write!(f, "  Expected tables: station, measurement\n")?;
                write!(f, "  Check that CLIMATE_DB points at the climate dataset\n")?;
                write!(f, "  and not some other SQLite file")
            }
        }
    }
}

impl std::error::Error for DbConfigError {}

/// Open the dataset with full validation and helpful error messages.
/// Reads the file path from the CLIMATE_DB environment variable
/// (a `.env` file is honored if present).
pub fn open_with_validation() -> Result<Connection, DbConfigError> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let db_path = env::var("CLIMATE_DB").map_err(|_| DbConfigError::MissingDatabasePath)?;

    open_and_verify(&db_path)
}

/// Open a dataset file read-only and verify the required tables exist.
pub fn open_and_verify(path: &str) -> Result<Connection, DbConfigError> {
    // Read-only open of a missing path fails with an opaque SQLite error,
    // so check the file first for a clearer message.
    if !Path::new(path).is_file() {
        return Err(DbConfigError::DatasetNotFound(path.to_string()));
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(DbConfigError::OpenFailed)?;

    for table in REQUIRED_TABLES {
        verify_table(&conn, table)?;
    }

    Ok(conn)
}

/// Verify a required table exists in the opened dataset.
pub fn verify_table(conn: &Connection, table_name: &str) -> Result<(), DbConfigError> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [table_name],
            |row| row.get(0),
        )
        .map_err(DbConfigError::OpenFailed)?;

    if !exists {
        return Err(DbConfigError::MissingTable(table_name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE station (
                 id INTEGER PRIMARY KEY,
                 station TEXT,
                 name TEXT,
                 latitude REAL,
                 longitude REAL,
                 elevation REAL
             );
             CREATE TABLE measurement (
                 id INTEGER PRIMARY KEY,
                 station TEXT,
                 date TEXT,
                 prcp REAL,
                 tobs INTEGER
             );",
        )
        .expect("Failed to create test schema");
    }

    #[test]
    fn test_verify_table_passes_when_tables_exist() {
        let conn = Connection::open_in_memory().unwrap();
        schema(&conn);
        for table in REQUIRED_TABLES {
            assert!(
                verify_table(&conn, table).is_ok(),
                "table '{}' should verify",
                table
            );
        }
    }

    #[test]
    fn test_verify_table_reports_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let result = verify_table(&conn, "measurement");

        assert!(result.is_err(), "missing table should be detected");
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("measurement"),
            "error message should identify the missing table: {}",
            message
        );
    }

    #[test]
    fn test_open_and_verify_rejects_nonexistent_path() {
        let result = open_and_verify("/nonexistent/hawaii.sqlite");
        assert!(matches!(result, Err(DbConfigError::DatasetNotFound(_))));
    }

    #[test]
    fn test_missing_path_error_mentions_env_var() {
        let message = DbConfigError::MissingDatabasePath.to_string();
        assert!(message.contains("CLIMATE_DB"));
    }
}
