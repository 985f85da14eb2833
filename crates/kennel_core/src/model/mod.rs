//! Entity model for dog records.
//!
//! # Responsibility
//! - Define the in-memory shape mapped onto rows of the `dogs` table.
//!
//! # Invariants
//! - A record without `id` has never been stored.
//! - Records own their fields; no state is shared between instances.

pub mod dog;
