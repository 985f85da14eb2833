use kennel_core::{close_db, open_db, open_db_in_memory, DogRepository, SqliteDogRepository};

#[test]
fn in_memory_databases_are_independent() {
    let first = open_db_in_memory().unwrap();
    let second = open_db_in_memory().unwrap();

    SqliteDogRepository::new(&first).ensure_schema().unwrap();

    assert!(SqliteDogRepository::new(&first).schema_exists().unwrap());
    assert!(!SqliteDogRepository::new(&second).schema_exists().unwrap());
}

#[test]
fn file_database_keeps_rows_across_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kennel.db");

    let conn = open_db(&path).unwrap();
    let created = {
        let repo = SqliteDogRepository::new(&conn);
        repo.ensure_schema().unwrap();
        repo.create(Some("Princess"), Some("Lab")).unwrap()
    };
    close_db(conn).unwrap();

    let conn = open_db(&path).unwrap();
    let repo = SqliteDogRepository::new(&conn);
    let loaded = repo.find_by_id(created.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn open_db_fails_for_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("kennel.db");

    assert!(open_db(&path).is_err());
}
