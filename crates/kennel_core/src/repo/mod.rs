//! Record mapper contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for dog records.
//! - Keep SQLite query text out of callers.
//!
//! # Invariants
//! - Lookups report absence as `Ok(None)`, never as an error.
//! - Storage errors surface unchanged inside `RepoError::Db`.

pub mod dog_repo;
