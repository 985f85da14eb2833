//! SQLite storage handle bootstrap.
//!
//! # Responsibility
//! - Open and configure the SQLite connection the record mapper borrows.
//! - Close it explicitly so close-time failures reach the caller.
//!
//! # Invariants
//! - The mapper never opens or closes connections itself.
//! - Schema lifecycle (`dogs` create/drop) belongs to the mapper, not here.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{close_db, open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
