//! SQLite storage bootstrap.
//!
//! # Responsibility
//! - Open and configure the single shared SQLite connection used by every
//!   entity repository.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Schema DDL is owned by the repositories (`create_table`/`drop_table`),
//!   not by this module; there is no versioned migration registry.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-layer failure, carrying the underlying SQLite error unmodified.
#[derive(Debug)]
pub struct DbError(pub rusqlite::Error);

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self(value)
    }
}
