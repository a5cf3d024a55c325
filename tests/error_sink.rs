// tests/error_sink.rs

use std::sync::Arc;

use syncer::sink::{report_target, ChannelErrorSink, ErrorSink, FanoutErrorSink};
use syncer_test_utils::fakes::RecordingErrorSink;

#[tokio::test]
async fn full_channel_drops_instead_of_blocking() {
    let (sink, drain) = ChannelErrorSink::spawn(1);

    // The drain task cannot run until this task yields, so only the first
    // message fits; the rest must be dropped without blocking.
    for i in 0..10 {
        sink.report(format!("failure {i}"));
    }
    assert_eq!(sink.dropped(), 9);

    drop(sink);
    drain.await.expect("drain task panicked");
}

#[tokio::test]
async fn drain_task_exits_when_sinks_are_dropped() {
    let (sink, drain) = ChannelErrorSink::spawn(8);
    let clone = sink.clone();

    clone.report("from clone".to_string());
    sink.report("from original".to_string());
    assert_eq!(sink.dropped(), 0);

    drop(sink);
    drop(clone);
    drain.await.expect("drain task panicked");
}

#[tokio::test]
async fn drain_task_forwards_in_order() {
    let target = RecordingErrorSink::new();
    let (sink, drain) = ChannelErrorSink::spawn_forwarding(8, Arc::new(target.clone()));

    sink.report("copy a failed".to_string());
    sink.report("copy b failed".to_string());

    drop(sink);
    drain.await.expect("drain task panicked");

    assert_eq!(
        target.messages(),
        vec!["copy a failed".to_string(), "copy b failed".to_string()]
    );
}

#[test]
fn fanout_delivers_to_every_target() {
    let first = RecordingErrorSink::new();
    let second = RecordingErrorSink::new();
    let fanout = FanoutErrorSink::new()
        .with(Arc::new(first.clone()))
        .with(Arc::new(second.clone()));

    fanout.report("watch error: gone".to_string());

    assert_eq!(fanout.len(), 2);
    assert_eq!(first.messages(), vec!["watch error: gone".to_string()]);
    assert_eq!(second.messages(), vec!["watch error: gone".to_string()]);

    // No targets: reports vanish quietly.
    FanoutErrorSink::new().report("nobody listens".to_string());
}

#[test]
fn default_report_target_is_available_everywhere() {
    let target = report_target(false).expect("tracing target");
    target.report("logged via tracing".to_string());
}

#[cfg(unix)]
#[test]
fn syslog_sink_accepts_awkward_messages() {
    use syncer::sink::syslog::{SyslogConfig, SyslogErrorSink, SyslogPriority};

    let sink = SyslogErrorSink::open(SyslogConfig::default());
    assert_eq!(sink.priority(), SyslogPriority::Warning);

    // Format directives and NULs must not reach syslog(3) unescaped.
    sink.report("copy /tmp/100%s -> /backup failed at copy: %n".to_string());
    sink.report("embedded\0nul".to_string());

    let target = report_target(true).expect("syslog target on unix");
    target.report("syncer test entry".to_string());
}
