use std::fs;

use stacksmith::commands::{build_command, scan_command};
use tempfile::tempdir;

#[test]
fn build_command_errors_when_root_missing() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("no-root");

    let err = build_command(missing.to_str().unwrap(), "dev", "acct", None, false, Vec::new())
        .unwrap_err();
    assert!(err.to_string().contains("Failed to build template"), "unexpected error: {err}");
}

#[test]
fn build_command_errors_when_iam_missing() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir_all(root.join("billing")).expect("create billing");
    fs::write(root.join("billing").join("billingFunction.py"), "pass\n").expect("write source");

    let err = build_command(root.to_str().unwrap(), "dev", "acct", None, false, Vec::new())
        .unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("IAM"), "error should name the missing artifact: {chain}");
    assert!(chain.contains("billing"), "error should name the function: {chain}");
}

#[test]
fn build_command_errors_on_malformed_iam_file() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir_all(root.join("billing")).expect("create billing");
    fs::write(root.join("billing").join("billingFunction.py"), "pass\n").expect("write source");
    fs::write(root.join("billing").join("billingIAM.yaml"), "name: [unclosed\n")
        .expect("write iam");

    let err = build_command(root.to_str().unwrap(), "dev", "acct", None, false, Vec::new())
        .unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("billingIAM.yaml"), "error should name the file: {chain}");
}

#[test]
fn scan_command_errors_when_root_missing() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("no-root");

    let err = scan_command(missing.to_str().unwrap(), false).unwrap_err();
    assert!(err.to_string().contains("Failed to scan"), "unexpected error: {err}");
}

#[test]
fn scan_command_succeeds_on_valid_root() {
    let temp = tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("billing")).expect("create billing");
    scan_command(temp.path().to_str().unwrap(), true).expect("scan");
}
