use std::fs;

use stacksmith::canonicalize_or_current;
use tempfile::tempdir;

/// Both `.` and an existing relative path should resolve against the current
/// working directory. Checked in one test so the chdir window stays small.
#[test]
fn canonicalize_or_current_resolves_relative_inputs() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let dot = canonicalize_or_current(".").expect("canonicalize dot");
    assert_eq!(
        dot.canonicalize().expect("canon"),
        tmp.path().canonicalize().expect("canon tmp")
    );

    let nested = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(nested, subdir.canonicalize().expect("canonicalize subdir"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_keeps_missing_paths_absolute() {
    let result = canonicalize_or_current("definitely-not-a-real-dir").expect("canonicalize");
    assert!(result.is_absolute());
    assert!(result.ends_with("definitely-not-a-real-dir"));
}
