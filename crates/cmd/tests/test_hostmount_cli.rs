// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fs::create_dir_all;
use std::sync::Arc;
use tempfile::TempDir;

use cmd::commands::{
    call_command, cat_command, grant_command, grants_command, list_command, mkdir_command,
    revoke_command, write_command,
};
use cmd::common::{HostContext, TerminalApprover};
use doctree::Failure;
use doctree::memory::MemoryApprover;

fn grant(home: &TempDir, host: &TempDir) -> String {
    let approver = TerminalApprover::new(Some(host.path().to_path_buf()), true);
    let context = HostContext::new(home.path().to_path_buf(), Arc::new(approver))
        .expect("open context");
    let mut lines = Vec::new();
    grant_command(&context, |line| lines.push(line.to_string())).expect("grant");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("doctree://tree/"), "{}", lines[0]);
    lines.remove(0)
}

fn failure_code(err: &anyhow::Error) -> String {
    err.downcast_ref::<Failure>()
        .map(|failure| failure.code.clone())
        .unwrap_or_else(|| format!("not a failure: {:#}", err))
}

#[test]
fn test_hostmount_cli_end_to_end() {
    let home = TempDir::new().expect("create temp home");
    let host = TempDir::new().expect("create temp host dir");
    create_dir_all(host.path().join("subdir")).expect("create subdir");
    std::fs::write(host.path().join("subdir/nested.txt"), b"Hello from nested file!")
        .expect("write nested");

    let handle = grant(&home, &host);
    let context = HostContext::interactive(home.path().to_path_buf()).expect("open context");

    // doctree grants
    let mut grants = Vec::new();
    grants_command(&context, |line| grants.push(line.to_string())).expect("grants");
    assert_eq!(grants.len(), 1);
    assert!(grants[0].starts_with(&format!("{} rw ", handle)));

    // doctree mkdir <handle> docs/2024
    let mut created = Vec::new();
    mkdir_command(&context, &handle, "docs/2024", |line| created.push(line.to_string()))
        .expect("mkdir");
    assert_eq!(created, vec![format!("{}/docs/2024", handle)]);
    assert!(host.path().join("docs/2024").is_dir());

    // doctree write <handle> docs/2024/a.txt
    let mut written = Vec::new();
    write_command(&context, &handle, "docs/2024/a.txt", b"Hi".to_vec(), |line| {
        written.push(line.to_string())
    })
    .expect("write");
    assert_eq!(written, vec!["wrote 2 bytes to /docs/2024/a.txt"]);

    // doctree ls <handle> and ls --files
    let mut dirs = Vec::new();
    list_command(&context, &handle, "", false, |line| dirs.push(line.to_string())).expect("ls");
    assert_eq!(dirs, vec!["docs", "subdir"]);
    let mut files = Vec::new();
    list_command(&context, &handle, "subdir", true, |line| files.push(line.to_string()))
        .expect("ls --files");
    assert_eq!(files, vec!["nested.txt"]);

    // doctree cat
    let mut content = Vec::new();
    cat_command(&context, &handle, "docs/2024/a.txt", |bytes| {
        content.extend_from_slice(bytes)
    })
    .expect("cat");
    assert_eq!(content, b"Hi");

    let err = cat_command(&context, &handle, "docs/2024/missing.txt", |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "NOT_FOUND");

    let err = write_command(&context, &handle, "docs/missing/a.txt", b"x".to_vec(), |_| {})
        .unwrap_err();
    assert_eq!(failure_code(&err), "PARENT_NOT_FOUND");

    let err = list_command(&context, &handle, "subdir/nested.txt", false, |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "NOT_A_DIRECTORY");
}

#[test]
fn test_call_command() {
    let home = TempDir::new().expect("create temp home");
    let host = TempDir::new().expect("create temp host dir");
    let handle = grant(&home, &host);
    let context = HostContext::interactive(home.path().to_path_buf()).expect("open context");

    let mut replies = Vec::new();
    let args = format!(r#"{{"rootUri": "{}", "path": ["notes.txt"], "data": [72, 105]}}"#, handle);
    call_command(&context, "writeFile", Some(&args), |line| replies.push(line.to_string()))
        .expect("writeFile");
    let args = format!(r#"{{"rootUri": "{}", "path": ["notes.txt"]}}"#, handle);
    call_command(&context, "readFile", Some(&args), |line| replies.push(line.to_string()))
        .expect("readFile");
    let args = format!(r#"{{"rootUri": "{}", "path": ["nothing"]}}"#, handle);
    call_command(&context, "readFile", Some(&args), |line| replies.push(line.to_string()))
        .expect("readFile absent");
    assert_eq!(replies, vec!["null", "[72,105]", "null"]);

    let err = call_command(&context, "listDir", Some("{}"), |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "INVALID_ARGUMENT");
    let err = call_command(&context, "deleteFile", None, |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "NOT_IMPLEMENTED");
    assert!(call_command(&context, "listDir", Some("not json"), |_| {}).is_err());
}

#[test]
fn test_revoked_handle_stops_working() {
    let home = TempDir::new().expect("create temp home");
    let host = TempDir::new().expect("create temp host dir");
    let handle = grant(&home, &host);
    let context = HostContext::interactive(home.path().to_path_buf()).expect("open context");

    let mut lines = Vec::new();
    revoke_command(&context, &handle, |line| lines.push(line.to_string())).expect("revoke");
    assert_eq!(lines, vec![format!("revoked {}", handle)]);

    let err = list_command(&context, &handle, "", false, |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "INVALID_ROOT");

    let err = revoke_command(&context, &handle, |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "INVALID_ROOT");

    let err = revoke_command(&context, "not-a-handle", |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "INVALID_ARGUMENT");
}

#[test]
fn test_declined_grant() {
    let home = TempDir::new().expect("create temp home");
    let approver = MemoryApprover::new();
    approver.decline();
    let context =
        HostContext::new(home.path().to_path_buf(), Arc::new(approver)).expect("open context");

    let mut lines = Vec::new();
    grant_command(&context, |line| lines.push(line.to_string())).expect("grant");
    assert_eq!(lines, vec!["cancelled"]);

    let mut grants = Vec::new();
    grants_command(&context, |line| grants.push(line.to_string())).expect("grants");
    assert!(grants.is_empty());
}

#[test]
fn test_configured_home() {
    let home = TempDir::new().expect("create temp home");
    let host = TempDir::new().expect("create temp host dir");
    std::fs::write(
        home.path().join("doctree.yaml"),
        "worker_threads: 1\ngrant_store: state/grants.json\n",
    )
    .expect("write config");

    let handle = grant(&home, &host);
    assert!(home.path().join("state/grants.json").is_file());

    let context = HostContext::interactive(home.path().to_path_buf()).expect("open context");
    assert_eq!(context.config().worker_threads, 1);
    let mut dirs = Vec::new();
    list_command(&context, &handle, "", false, |line| dirs.push(line.to_string())).expect("ls");
    assert!(dirs.is_empty());
}

#[test]
fn test_grant_of_missing_directory_fails() {
    let home = TempDir::new().expect("create temp home");
    let approver = TerminalApprover::new(Some(home.path().join("absent")), true);
    let context = HostContext::new(home.path().to_path_buf(), Arc::new(approver))
        .expect("open context");
    let err = grant_command(&context, |_| {}).unwrap_err();
    assert_eq!(failure_code(&err), "PICK_FAILED");
}
