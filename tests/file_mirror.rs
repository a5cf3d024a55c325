// tests/file_mirror.rs

use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use syncer::fs::mock::{MockFileSystem, MockOp};
use syncer::mirror::FileMirror;
use syncer::types::CopyStage;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn copies_into_missing_parent_directories() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src/a.txt");
    let dst = dir.path().join("dst/nested/deeper/a.txt");
    fs::create_dir_all(src.parent().unwrap())?;
    fs::write(&src, "hello")?;

    let bytes = FileMirror::new().copy(&src, &dst)?;

    assert_eq!(bytes, 5);
    assert_eq!(fs::read_to_string(&dst)?, "hello");
    Ok(())
}

#[test]
fn existing_destination_is_replaced_not_appended() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("a.txt");
    let dst = dir.path().join("b.txt");
    fs::write(&src, "new")?;
    fs::write(&dst, "old content that is longer")?;

    FileMirror::new().copy(&src, &dst)?;

    assert_eq!(fs::read_to_string(&dst)?, "new");
    Ok(())
}

#[test]
fn copying_twice_is_idempotent() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("a.bin");
    let dst = dir.path().join("out/a.bin");
    let payload: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    fs::write(&src, &payload)?;

    let mirror = FileMirror::new();
    mirror.copy(&src, &dst)?;
    let first = fs::read(&dst)?;
    mirror.copy(&src, &dst)?;
    let second = fs::read(&dst)?;

    assert_eq!(first, payload);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn missing_source_fails_at_open_and_leaves_destination_alone() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("missing.txt");
    let dst = dir.path().join("dst.txt");
    fs::write(&dst, "keep me")?;

    let err = FileMirror::new().copy(&src, &dst).unwrap_err();

    assert_eq!(err.stage, CopyStage::OpenSource);
    assert_eq!(err.source_path, src);
    assert_eq!(err.destination, dst);
    assert_eq!(fs::read_to_string(&dst)?, "keep me");

    let msg = err.to_string();
    assert!(msg.contains("open-source"));
    assert!(msg.contains("missing.txt"));
    assert!(msg.contains("dst.txt"));
    Ok(())
}

#[test]
fn mock_copy_creates_parents_and_content() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/src/a.txt", "hello");

    let mirror = FileMirror::with_fs(fs.clone());
    mirror.copy(Path::new("/src/a.txt"), Path::new("/dst/sub/a.txt"))?;

    assert!(fs.is_dir("/dst/sub"));
    assert_eq!(fs.contents("/dst/sub/a.txt"), Some(b"hello".to_vec()));
    Ok(())
}

/// Each injected failure must surface as the matching stage.
#[test]
fn each_stage_failure_is_reported_with_its_stage() {
    let cases = [
        (MockOp::Open, "/src/a.txt", true, CopyStage::OpenSource),
        (MockOp::Remove, "/dst/a.txt", true, CopyStage::RemoveDest),
        (MockOp::CreateDir, "/dst", false, CopyStage::Mkdir),
        (MockOp::Create, "/dst/a.txt", true, CopyStage::CreateDest),
        (MockOp::Read, "/src/a.txt", true, CopyStage::Copy),
    ];

    for (op, fail_path, dest_exists, expected) in cases {
        let fs = MockFileSystem::new();
        fs.add_file("/src/a.txt", "data");
        if dest_exists {
            fs.add_file("/dst/a.txt", "stale");
        }
        fs.fail_on(op, fail_path);

        let mirror = FileMirror::with_fs(fs.clone());
        let err = mirror
            .copy(Path::new("/src/a.txt"), Path::new("/dst/a.txt"))
            .unwrap_err();

        assert_eq!(err.stage, expected, "injected {op:?} on {fail_path}");
    }
}

#[test]
fn mkdir_is_skipped_when_destination_exists() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/src/a.txt", "fresh");
    fs.add_file("/dst/a.txt", "stale");
    // Would fail if the copy tried to create the parent.
    fs.fail_on(MockOp::CreateDir, "/dst");

    FileMirror::with_fs(fs.clone()).copy(Path::new("/src/a.txt"), Path::new("/dst/a.txt"))?;

    assert_eq!(fs.contents("/dst/a.txt"), Some(b"fresh".to_vec()));
    Ok(())
}

#[test]
fn failed_stream_may_leave_partial_destination() {
    let fs = MockFileSystem::new();
    fs.add_file("/src/a.txt", "data");
    fs.add_file("/dst/a.txt", "stale");
    fs.fail_on(MockOp::Read, "/src/a.txt");

    let err = FileMirror::with_fs(fs.clone())
        .copy(Path::new("/src/a.txt"), Path::new("/dst/a.txt"))
        .unwrap_err();

    assert_eq!(err.stage, CopyStage::Copy);
    // Old content is gone; the new file was created but never filled.
    assert_eq!(fs.contents("/dst/a.txt"), Some(Vec::new()));
}
