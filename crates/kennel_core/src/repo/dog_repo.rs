//! Dog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map `Dog` records onto rows of the `dogs` table and back.
//! - Own every SQL statement touching `dogs`, including create/drop.
//!
//! # Invariants
//! - Ids come from SQLite (`last_insert_rowid`) and are never written by us.
//! - `save` only inserts records without id; `update` only touches stored ids.
//! - Single-statement writes autocommit; `find_or_create_by` runs inside one
//!   `IMMEDIATE` transaction so the lookup and insert are atomic. When the
//!   caller already holds a transaction it runs under a savepoint instead and
//!   leaves commit to the caller.

use crate::db::DbError;
use crate::model::dog::{Dog, DogId};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DOG_SELECT_SQL: &str = "SELECT id, name, breed FROM dogs";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for dog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// `save` was called on a record that already has an id.
    AlreadyPersisted(DogId),
    /// `update` was called on a record that was never saved.
    NotPersisted,
    /// `update` targeted an id with no row behind it.
    NotFound(DogId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyPersisted(id) => {
                write!(f, "dog already persisted with id {id}; use update instead")
            }
            Self::NotPersisted => write!(f, "dog has no id; save it before updating"),
            Self::NotFound(id) => write!(f, "dog not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::AlreadyPersisted(_) | Self::NotPersisted | Self::NotFound(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record mapper interface for the `dogs` table.
pub trait DogRepository {
    /// Creates the `dogs` table when absent.
    fn ensure_schema(&self) -> RepoResult<()>;
    /// Drops the `dogs` table when present, discarding every row.
    fn drop_schema(&self) -> RepoResult<()>;
    /// Returns whether the `dogs` table currently exists.
    fn schema_exists(&self) -> RepoResult<bool>;
    /// Inserts an unsaved record and writes the assigned id back into it.
    fn save(&self, dog: &mut Dog) -> RepoResult<DogId>;
    /// Constructs and saves a record in one step; absent fields are stored as NULL.
    fn create(&self, name: Option<&str>, breed: Option<&str>) -> RepoResult<Dog>;
    /// Returns every stored record, ordered by id.
    fn get_all(&self) -> RepoResult<Vec<Dog>>;
    /// Returns the number of stored rows.
    fn count(&self) -> RepoResult<u64>;
    /// Returns the lowest-id record with this exact name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Dog>>;
    fn find_by_id(&self, id: DogId) -> RepoResult<Option<Dog>>;
    /// Returns the record matching `(name, breed)`, inserting it when absent.
    fn find_or_create_by(&self, name: Option<&str>, breed: Option<&str>) -> RepoResult<Dog>;
    /// Overwrites name and breed of the stored row at `dog.id`.
    fn update(&self, dog: &Dog) -> RepoResult<()>;
}

/// SQLite-backed dog repository.
///
/// Borrows the connection; opening and closing it is the caller's job.
pub struct SqliteDogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DogRepository for SqliteDogRepository<'_> {
    fn ensure_schema(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS dogs (
                id INTEGER PRIMARY KEY,
                name TEXT,
                breed TEXT
            );",
        )?;
        info!("event=schema_ensure module=repo status=ok table=dogs");
        Ok(())
    }

    fn drop_schema(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS dogs;")?;
        info!("event=schema_drop module=repo status=ok table=dogs");
        Ok(())
    }

    fn schema_exists(&self) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'dogs'
            );",
            [],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn save(&self, dog: &mut Dog) -> RepoResult<DogId> {
        if let Some(id) = dog.id {
            return Err(RepoError::AlreadyPersisted(id));
        }

        let id = insert_dog(self.conn, dog.name.as_deref(), dog.breed.as_deref())?;
        dog.id = Some(id);
        Ok(id)
    }

    fn create(&self, name: Option<&str>, breed: Option<&str>) -> RepoResult<Dog> {
        let mut dog = Dog::from_parts(None, name.map(str::to_owned), breed.map(str::to_owned));
        self.save(&mut dog)?;
        Ok(dog)
    }

    fn get_all(&self) -> RepoResult<Vec<Dog>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOG_SELECT_SQL} ORDER BY id ASC;"))?;
        let dogs = stmt
            .query_map([], parse_dog_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dogs)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dogs;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Dog>> {
        let dog = self
            .conn
            .query_row(
                &format!("{DOG_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"),
                [name],
                parse_dog_row,
            )
            .optional()?;
        Ok(dog)
    }

    fn find_by_id(&self, id: DogId) -> RepoResult<Option<Dog>> {
        let dog = self
            .conn
            .query_row(
                &format!("{DOG_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_dog_row,
            )
            .optional()?;
        Ok(dog)
    }

    fn find_or_create_by(&self, name: Option<&str>, breed: Option<&str>) -> RepoResult<Dog> {
        // Inside a caller's transaction the caller owns isolation and commit;
        // a savepoint only scopes our own lookup and insert.
        if !self.conn.is_autocommit() {
            return find_or_create_in_savepoint(self.conn, name, breed);
        }

        // IMMEDIATE takes the write lock up front, so no other connection can
        // insert the same pair between our lookup and our insert.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let dog = find_or_create_in(&tx, name, breed)?;
        tx.commit()?;
        Ok(dog)
    }

    fn update(&self, dog: &Dog) -> RepoResult<()> {
        let id = dog.id.ok_or(RepoError::NotPersisted)?;

        let changed = self.conn.execute(
            "UPDATE dogs
             SET
                name = ?1,
                breed = ?2
             WHERE id = ?3;",
            params![dog.name.as_deref(), dog.breed.as_deref(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=dog_update module=repo status=ok id={id}");
        Ok(())
    }
}

const FIND_OR_CREATE_SAVEPOINT: &str = "dog_find_or_create";

fn find_or_create_in_savepoint(
    conn: &Connection,
    name: Option<&str>,
    breed: Option<&str>,
) -> RepoResult<Dog> {
    conn.execute_batch(&format!("SAVEPOINT {FIND_OR_CREATE_SAVEPOINT};"))?;
    match find_or_create_in(conn, name, breed) {
        Ok(dog) => {
            conn.execute_batch(&format!("RELEASE {FIND_OR_CREATE_SAVEPOINT};"))?;
            Ok(dog)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.execute_batch(&format!(
                "ROLLBACK TO {FIND_OR_CREATE_SAVEPOINT}; RELEASE {FIND_OR_CREATE_SAVEPOINT};"
            )) {
                warn!(
                    "event=find_or_create module=repo status=error error_code=savepoint_rollback_failed error={}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

fn find_or_create_in(
    conn: &Connection,
    name: Option<&str>,
    breed: Option<&str>,
) -> RepoResult<Dog> {
    let existing = conn
        .query_row(
            &format!(
                "{DOG_SELECT_SQL}
                 WHERE name IS ?1 AND breed IS ?2
                 ORDER BY id ASC
                 LIMIT 1;"
            ),
            params![name, breed],
            parse_dog_row,
        )
        .optional()?;

    match existing {
        Some(dog) => {
            debug!("event=find_or_create module=repo status=found id={:?}", dog.id);
            Ok(dog)
        }
        None => {
            let id = insert_dog(conn, name, breed)?;
            debug!("event=find_or_create module=repo status=created id={id}");
            Ok(Dog::from_parts(
                Some(id),
                name.map(str::to_owned),
                breed.map(str::to_owned),
            ))
        }
    }
}

fn insert_dog(conn: &Connection, name: Option<&str>, breed: Option<&str>) -> RepoResult<DogId> {
    conn.execute(
        "INSERT INTO dogs (name, breed) VALUES (?1, ?2);",
        params![name, breed],
    )?;
    let id = conn.last_insert_rowid();
    debug!("event=dog_save module=repo status=ok id={id}");
    Ok(id)
}

/// Reads columns by position, matching the `(id, name, breed)` select order.
fn parse_dog_row(row: &Row<'_>) -> rusqlite::Result<Dog> {
    Ok(Dog::from_row((row.get(0)?, row.get(1)?, row.get(2)?)))
}
