//! SQLite persistence for the four clinical-record tables.

pub mod appointment;
pub mod doctor;
pub mod patient;
pub mod pool;
pub mod prescription;

use carebase_types::error::RepositoryError;
use chrono::NaiveDate;

/// Dates are stored as `%Y-%m-%d` TEXT.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Query(format!("invalid date '{s}': {e}")))
}

/// Map a sqlx error, distinguishing foreign-key violations so a child row
/// loaded without its parent surfaces as a conflict.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.message().contains("FOREIGN KEY") {
            return RepositoryError::Conflict(format!("foreign key violation: {}", db_err.message()));
        }
    }
    RepositoryError::Query(e.to_string())
}
