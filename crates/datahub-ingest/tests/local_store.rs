//! Filesystem object store tests.

use datahub_ingest::{LocalObjectStore, ObjectStore, StorageError, read_csv_table};
use tempfile::TempDir;

#[test]
fn put_then_get_creates_directories() {
    let dir = TempDir::new().unwrap();
    let store = LocalObjectStore::new(dir.path());
    store
        .put_object(
            "partners",
            "test/degree/enrollments/terms_20200128.csv",
            b"term_id,term_name\nt1,Fall\n",
        )
        .unwrap();

    assert!(
        dir.path()
            .join("partners/test/degree/enrollments/terms_20200128.csv")
            .is_file()
    );
    let bytes = store
        .get_object("partners", "test/degree/enrollments/terms_20200128.csv")
        .unwrap();
    let table = read_csv_table(&bytes).unwrap();
    assert_eq!(table.headers, vec!["term_id", "term_name"]);
    assert_eq!(table.height(), 1);
}

#[test]
fn missing_object_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = LocalObjectStore::new(dir.path());
    let err = store.get_object("partners", "nope.csv").unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
    assert!(store.get_optional("partners", "nope.csv").unwrap().is_none());
}

#[test]
fn list_keys_filters_by_prefix() {
    let dir = TempDir::new().unwrap();
    let store = LocalObjectStore::new(dir.path());
    for key in [
        "test/degree/enrollments/terms_20200128.csv",
        "test/degree/applications/applications_20200128.csv",
        "other/degree/enrollments/terms_20200128.csv",
    ] {
        store.put_object("partners", key, b"a\n1\n").unwrap();
    }

    let keys = store.list_keys("partners", "test/degree/").unwrap();
    assert_eq!(
        keys,
        vec![
            "test/degree/applications/applications_20200128.csv",
            "test/degree/enrollments/terms_20200128.csv",
        ]
    );
    assert!(store.list_keys("empty-bucket", "").unwrap().is_empty());
}

#[test]
fn escaping_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = LocalObjectStore::new(dir.path());
    let err = store.put_object("partners", "../outside.csv", b"x").unwrap_err();
    assert!(matches!(err, StorageError::InvalidKey { .. }));
}
