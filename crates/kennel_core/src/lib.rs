//! Core data access for Kennel.
//! Maps dog records onto a single SQLite table.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{close_db, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::dog::{Dog, DogId, DogRow};
pub use repo::dog_repo::{DogRepository, RepoError, RepoResult, SqliteDogRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
