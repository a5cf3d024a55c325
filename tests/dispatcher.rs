// tests/dispatcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use syncer::engine::{DispatchReport, MirrorJob, SyncDispatcher};
use syncer::fs::mock::{MockFileSystem, MockOp};
use syncer::mirror::FileMirror;
use syncer_test_utils::fakes::{RecordingErrorSink, RecordingMirror};

fn job(source: &str, destination: &str) -> MirrorJob {
    MirrorJob {
        source: PathBuf::from(source),
        destination: PathBuf::from(destination),
    }
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    let mirror = RecordingMirror::new();
    mirror.fail_for("/src/a.txt");
    let sink = RecordingErrorSink::new();

    let mut dispatcher = SyncDispatcher::new(mirror.clone(), Arc::new(sink.clone()));
    let report = dispatcher.dispatch(vec![
        job("/src/a.txt", "/dst/a.txt"),
        job("/src/b.txt", "/dst/b.txt"),
    ]);

    assert_eq!(
        report,
        DispatchReport {
            attempted: 2,
            succeeded: 1,
            failed: 1
        }
    );
    assert_eq!(
        mirror.attempted_sources(),
        vec![PathBuf::from("/src/a.txt"), PathBuf::from("/src/b.txt")]
    );

    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("/src/a.txt"));
    assert!(messages[0].contains("/dst/a.txt"));
    assert!(messages[0].contains("open-source"));
}

#[test]
fn every_failure_is_reported_separately() {
    let fs = MockFileSystem::new();
    fs.add_file("/src/a.txt", "a");
    fs.add_file("/src/b.txt", "b");
    fs.add_file("/src/c.txt", "c");
    fs.fail_on(MockOp::Open, "/src/a.txt");
    fs.fail_on(MockOp::CreateDir, "/dst/c");

    let sink = RecordingErrorSink::new();
    let mut dispatcher = SyncDispatcher::new(FileMirror::with_fs(fs.clone()), Arc::new(sink.clone()));

    let report = dispatcher.dispatch(vec![
        job("/src/a.txt", "/dst/a.txt"),
        job("/src/b.txt", "/dst/b/b.txt"),
        job("/src/c.txt", "/dst/c/c.txt"),
    ]);

    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed, 2);
    assert_eq!(fs.contents("/dst/b/b.txt"), Some(b"b".to_vec()));

    let messages = sink.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("/src/a.txt") && messages[0].contains("open-source"));
    assert!(messages[1].contains("/src/c.txt") && messages[1].contains("mkdir"));
}

#[test]
fn empty_batch_reports_nothing() {
    let sink = RecordingErrorSink::new();
    let mut dispatcher = SyncDispatcher::new(RecordingMirror::new(), Arc::new(sink.clone()));

    assert_eq!(dispatcher.dispatch(Vec::new()), DispatchReport::default());
    assert!(sink.messages().is_empty());
}
