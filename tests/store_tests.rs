//! Tests for FlatFileStore
//!
//! These tests verify:
//! - Create/read round trips
//! - First-match lookups and duplicate ids
//! - Whole-record update and order-preserving delete
//! - Missing data file handling
//! - Malformed, blank and truncated lines
//! - Temp file cleanup after rewrites

use std::fs;
use std::path::{Path, PathBuf};

use gradebook::config::{MalformedLines, RecordLimits, SyncMode};
use gradebook::storage::FlatFileStore;
use gradebook::Student;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, FlatFileStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = store_at(&temp_dir.path().join("etudiants.txt"), MalformedLines::Preserve);
    (temp_dir, store)
}

fn store_at(path: &Path, malformed: MalformedLines) -> FlatFileStore {
    FlatFileStore::new(path, RecordLimits::default(), SyncMode::Always, malformed)
}

fn student(id: i64, name: &str, scores: &[f64]) -> Student {
    let mut student = Student::new(id, name, RecordLimits::default());
    for &score in scores {
        student.add_score(score);
    }
    student
}

fn contents(store: &FlatFileStore) -> String {
    fs::read_to_string(store.path()).unwrap()
}

fn ids(store: &FlatFileStore) -> Vec<i64> {
    store.list().unwrap().iter().map(Student::id).collect()
}

/// Files in `dir` other than the data file
fn stray_files(dir: &Path, data_file: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path != data_file)
        .collect()
}

fn assert_scores_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.005, "{} != {}", a, e);
    }
}

// =============================================================================
// Create / Read Tests
// =============================================================================

#[test]
fn test_create_writes_one_line() {
    let (_temp, store) = setup_temp_store();

    store.create(&student(1, "Jean", &[12.5, 15.75])).unwrap();

    assert_eq!(contents(&store), "1 Jean 2 12.50 15.75\n");
}

#[test]
fn test_create_appends_in_order() {
    let (_temp, store) = setup_temp_store();

    store.create(&student(1, "Jean", &[12.5, 15.75])).unwrap();
    store.create(&student(2, "Alice", &[10.0, 14.0, 9.75])).unwrap();

    assert_eq!(
        contents(&store),
        "1 Jean 2 12.50 15.75\n2 Alice 3 10.00 14.00 9.75\n"
    );
}

#[test]
fn test_create_then_read_round_trip() {
    let (_temp, store) = setup_temp_store();
    let original = student(42, "Marie", &[11.111, 19.999, 0.0]);

    store.create(&original).unwrap();
    let found = store.read(42).unwrap().unwrap();

    assert_eq!(found.id(), original.id());
    assert_eq!(found.name(), original.name());
    assert_scores_close(found.scores(), original.scores());
}

#[test]
fn test_read_missing_file_is_not_found() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.read(1).unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn test_read_unknown_id_is_not_found() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[])).unwrap();

    assert_eq!(store.read(2).unwrap(), None);
}

#[test]
fn test_read_returns_first_duplicate() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "First", &[1.0])).unwrap();
    store.create(&student(1, "Second", &[2.0])).unwrap();

    let found = store.read(1).unwrap().unwrap();

    assert_eq!(found.name(), "First");
}

#[test]
fn test_read_last_record_without_trailing_newline() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "1 Jean 0\n2 Alice 1 10.00").unwrap();

    let found = store.read(2).unwrap().unwrap();

    assert_eq!(found.scores(), &[10.0]);
    assert_eq!(ids(&store), vec![1, 2]);
}

#[test]
fn test_create_after_missing_final_newline() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "1 Jean 0").unwrap();

    store.create(&student(2, "Alice", &[])).unwrap();

    assert_eq!(contents(&store), "1 Jean 0\n2 Alice 0\n");
}

// =============================================================================
// Scan Edge Case Tests
// =============================================================================

#[test]
fn test_blank_lines_are_skipped() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "\n1 Jean 0\n\n   \n2 Alice 0\n\n\n").unwrap();

    assert_eq!(ids(&store), vec![1, 2]);
}

#[test]
fn test_crlf_line_endings() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "1 Jean 1 12.00\r\n2 Alice 0\r\n").unwrap();

    let found = store.read(1).unwrap().unwrap();

    assert_eq!(found.scores(), &[12.0]);
    assert_eq!(ids(&store), vec![1, 2]);
}

#[test]
fn test_malformed_lines_are_skipped_on_read() {
    let (_temp, store) = setup_temp_store();
    fs::write(
        store.path(),
        "garbage here\n1 Jean 0\n2 Broken x\n3 Alice 1 10.00\n",
    )
    .unwrap();

    assert_eq!(ids(&store), vec![1, 3]);
    assert_eq!(store.read(2).unwrap(), None);
    assert!(store.read(3).unwrap().is_some());
}

#[test]
fn test_invalid_utf8_line_is_skipped() {
    let (_temp, store) = setup_temp_store();
    let mut bytes = b"1 Jean 0\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    bytes.extend_from_slice(b"2 Alice 0\n");
    fs::write(store.path(), bytes).unwrap();

    assert_eq!(ids(&store), vec![1, 2]);
}

#[test]
fn test_truncated_scores_do_not_consume_next_line() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "1 Jean 3 12.00\n2 Alice 1 10.00\n").unwrap();

    let jean = store.read(1).unwrap().unwrap();
    let alice = store.read(2).unwrap().unwrap();

    assert_eq!(jean.scores(), &[12.0]);
    assert_eq!(alice.scores(), &[10.0]);
}

#[test]
fn test_list_missing_file_is_empty() {
    let (_temp, store) = setup_temp_store();

    assert!(store.list().unwrap().is_empty());
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_update_replaces_whole_record() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[12.5, 15.75])).unwrap();
    store.create(&student(2, "Alice", &[10.0])).unwrap();

    let found = store.update(&student(1, "Jeanne", &[20.0])).unwrap();

    assert!(found);
    assert_eq!(contents(&store), "1 Jeanne 1 20.00\n2 Alice 1 10.00\n");
}

#[test]
fn test_update_keeps_position_in_file() {
    let (_temp, store) = setup_temp_store();
    for id in 1..=3 {
        store.create(&student(id, "S", &[])).unwrap();
    }

    store.update(&student(2, "Middle", &[5.0])).unwrap();

    let names: Vec<String> = store
        .list()
        .unwrap()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, vec!["S", "Middle", "S"]);
}

#[test]
fn test_update_replaces_every_duplicate() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "First", &[])).unwrap();
    store.create(&student(2, "Other", &[])).unwrap();
    store.create(&student(1, "Second", &[])).unwrap();

    assert!(store.update(&student(1, "Both", &[])).unwrap());

    assert_eq!(contents(&store), "1 Both 0\n2 Other 0\n1 Both 0\n");
}

#[test]
fn test_update_unknown_id_leaves_records_unchanged() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[12.5, 15.75])).unwrap();
    store.create(&student(2, "Alice", &[10.0, 14.0, 9.75])).unwrap();
    let before = store.list().unwrap();

    let found = store.update(&student(99, "Ghost", &[1.0])).unwrap();

    assert!(!found);
    assert_eq!(store.list().unwrap(), before);
}

#[test]
fn test_update_missing_file_does_not_create_it() {
    let (_temp, store) = setup_temp_store();

    assert!(!store.update(&student(1, "Jean", &[])).unwrap());
    assert!(!store.path().exists());
}

#[test]
fn test_update_normalizes_whitespace() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "1   Jean  1  12.5\n").unwrap();

    store.update(&student(7, "Nobody", &[])).unwrap();

    assert_eq!(contents(&store), "1 Jean 1 12.50\n");
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_removes_only_target() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[12.5])).unwrap();
    store.create(&student(2, "Alice", &[10.0, 14.0])).unwrap();
    store.create(&student(3, "Paul", &[])).unwrap();

    assert!(store.delete(2).unwrap());

    assert_eq!(contents(&store), "1 Jean 1 12.50\n3 Paul 0\n");
}

#[test]
fn test_delete_removes_every_duplicate() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "A", &[])).unwrap();
    store.create(&student(2, "B", &[])).unwrap();
    store.create(&student(1, "C", &[])).unwrap();

    assert!(store.delete(1).unwrap());

    assert_eq!(ids(&store), vec![2]);
}

#[test]
fn test_delete_unknown_id_reports_not_found() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[])).unwrap();

    assert!(!store.delete(5).unwrap());
    assert_eq!(contents(&store), "1 Jean 0\n");
}

#[test]
fn test_delete_last_record_leaves_empty_file() {
    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[])).unwrap();

    assert!(store.delete(1).unwrap());

    assert_eq!(contents(&store), "");
    assert_eq!(store.read(1).unwrap(), None);
}

#[test]
fn test_delete_missing_file_does_not_create_it() {
    let (_temp, store) = setup_temp_store();

    assert!(!store.delete(1).unwrap());
    assert!(!store.path().exists());
}

// =============================================================================
// Rewrite Policy Tests
// =============================================================================

#[test]
fn test_rewrite_preserves_malformed_lines_by_default() {
    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "1 Jean 0\nnot a record\n2 Alice 0\n").unwrap();

    assert!(store.delete(1).unwrap());

    assert_eq!(contents(&store), "not a record\n2 Alice 0\n");
}

#[test]
fn test_rewrite_drops_malformed_lines_when_configured() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_at(&temp_dir.path().join("data.txt"), MalformedLines::Drop);
    fs::write(store.path(), "1 Jean 0\nnot a record\n2 Alice 0\n").unwrap();

    assert!(store.update(&student(2, "Alicia", &[])).unwrap());

    assert_eq!(contents(&store), "1 Jean 0\n2 Alicia 0\n");
}

#[test]
fn test_rewrite_leaves_no_temp_files() {
    let (temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[])).unwrap();
    store.create(&student(2, "Alice", &[])).unwrap();

    store.update(&student(1, "Jeanne", &[])).unwrap();
    store.delete(2).unwrap();
    store.update(&student(9, "Nobody", &[])).unwrap();

    assert!(stray_files(temp.path(), store.path()).is_empty());
}

#[test]
fn test_rewrite_in_nested_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    let store = store_at(&nested.join("records.txt"), MalformedLines::Preserve);

    store.create(&student(1, "Jean", &[])).unwrap();
    assert!(store.delete(1).unwrap());

    assert!(stray_files(&nested, store.path()).is_empty());
}

#[cfg(unix)]
#[test]
fn test_rewrite_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, store) = setup_temp_store();
    store.create(&student(1, "Jean", &[])).unwrap();
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

    store.update(&student(1, "Jeanne", &[])).unwrap();

    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

// =============================================================================
// I/O Failure Tests
// =============================================================================

#[cfg(unix)]
#[test]
fn test_create_appends_to_write_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, store) = setup_temp_store();
    fs::write(store.path(), "1 Jean 0\n").unwrap();
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o222)).unwrap();

    // Permission bits do not restrict a privileged user
    if fs::File::open(store.path()).is_ok() {
        return;
    }

    let result = store.create(&student(2, "Alice", &[]));
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

    result.unwrap();
    assert_eq!(contents(&store), "1 Jean 0\n2 Alice 0\n");
}

#[cfg(unix)]
#[test]
fn test_update_fails_without_touching_original_when_dir_readonly() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("ro");
    fs::create_dir(&dir).unwrap();
    let store = store_at(&dir.join("etudiants.txt"), MalformedLines::Preserve);
    store.create(&student(1, "Jean", &[])).unwrap();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

    // Permission bits do not restrict a privileged user
    let writable_check = dir.join("writable_check");
    if fs::File::create(&writable_check).is_ok() {
        fs::remove_file(&writable_check).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let update = store.update(&student(1, "Jeanne", &[20.0]));
    let delete = store.delete(1);
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(update.is_err());
    assert!(delete.is_err());
    assert_eq!(contents(&store), "1 Jean 0\n");
    assert!(stray_files(&dir, store.path()).is_empty());
}

#[test]
fn test_rewrite_reports_io_failure_when_parent_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let not_a_dir = temp_dir.path().join("plain.txt");
    fs::write(&not_a_dir, "1 Jean 0\n").unwrap();
    let store = store_at(&not_a_dir.join("etudiants.txt"), MalformedLines::Preserve);

    assert!(store.update(&student(1, "Jeanne", &[])).is_err());
    assert!(store.delete(1).is_err());
    assert!(store.create(&student(1, "Jean", &[])).is_err());
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "1 Jean 0\n");
}
