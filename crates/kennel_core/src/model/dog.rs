//! Dog domain model.
//!
//! # Responsibility
//! - Define the record mapped onto one row of `dogs`.
//! - Convert between records and positional `(id, name, breed)` rows.
//!
//! # Invariants
//! - `id` is assigned by storage on first insert and never reassigned.
//! - `name` and `breed` are accepted as given; absent values are legal.

use serde::{Deserialize, Serialize};

/// Storage-assigned primary key (SQLite rowid).
pub type DogId = i64;

/// Positional row shape in table column order: `(id, name, breed)`.
pub type DogRow = (DogId, Option<String>, Option<String>);

/// One in-memory dog record, corresponding to zero or one table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    /// `None` until the record has been saved.
    pub id: Option<DogId>,
    pub name: Option<String>,
    pub breed: Option<String>,
}

impl Dog {
    /// Creates an unsaved record with both fields set.
    pub fn new(name: impl Into<String>, breed: impl Into<String>) -> Self {
        Self::from_parts(None, Some(name.into()), Some(breed.into()))
    }

    /// Creates a record from raw parts without any validation.
    ///
    /// Used when fields may be absent or the id is already known.
    pub fn from_parts(id: Option<DogId>, name: Option<String>, breed: Option<String>) -> Self {
        Self { id, name, breed }
    }

    /// Maps a positional `(id, name, breed)` row into a stored record.
    pub fn from_row(row: DogRow) -> Self {
        let (id, name, breed) = row;
        Self::from_parts(Some(id), name, breed)
    }

    /// Returns the positional row for a stored record, `None` when unsaved.
    pub fn to_row(&self) -> Option<DogRow> {
        self.id.map(|id| (id, self.name.clone(), self.breed.clone()))
    }

    /// Returns whether this record has been assigned a storage id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl From<DogRow> for Dog {
    fn from(value: DogRow) -> Self {
        Self::from_row(value)
    }
}
