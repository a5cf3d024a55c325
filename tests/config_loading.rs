// tests/config_loading.rs

use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::{tempdir, NamedTempFile};

use syncer::cli::parse_path_pair;
use syncer::config::{
    load_and_validate, load_with_overrides, parse_duration, ConfigFile, ConfigOverrides,
    PathEntry, MAX_SYNC_INTERVAL,
};
use syncer::errors::SyncerError;
use syncer::types::SyncPolicy;
use syncer_test_utils::builders::RawConfigBuilder;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_file_is_loaded() -> TestResult {
    let file = write_config(
        r#"
[config]
policy = "immediate"
sync_interval = "30s"

[[path]]
from = "/home/me/notes.md"
to = "/mnt/backup/notes.md"

[[path]]
from = "/home/me/todo.txt"
to = "/mnt/backup/todo.txt"
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.policy, SyncPolicy::Immediate);
    assert_eq!(cfg.sync_interval, Duration::from_secs(30));
    assert_eq!(cfg.registry.len(), 2);
    assert_eq!(
        cfg.registry.destination_for(Path::new("/home/me/todo.txt")),
        Some(Path::new("/mnt/backup/todo.txt"))
    );
    Ok(())
}

#[test]
fn defaults_are_debounced_every_ten_minutes() -> TestResult {
    let file = write_config(
        r#"
[[path]]
from = "/a"
to = "/b"
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.policy, SyncPolicy::Debounced);
    assert_eq!(cfg.sync_interval, Duration::from_secs(600));
    assert!(!cfg.syslog);
    Ok(())
}

#[test]
fn relative_paths_resolve_against_config_directory() -> TestResult {
    let dir = tempdir()?;
    let config_path = dir.path().join("syncer.toml");
    fs::write(
        &config_path,
        r#"
[[path]]
from = "notes/a.md"
to = "/backup/a.md"
"#,
    )?;

    let cfg = load_and_validate(&config_path)?;
    let base = std::path::absolute(dir.path())?;
    let expected_source = base.join("notes/a.md");

    assert_eq!(
        cfg.registry.destination_for(&expected_source),
        Some(Path::new("/backup/a.md"))
    );
    Ok(())
}

#[test]
fn config_without_paths_is_rejected() {
    let file = write_config(
        r#"
[config]
policy = "debounced"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SyncerError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn duplicate_source_in_file_is_rejected() {
    let file = write_config(
        r#"
[[path]]
from = "/a"
to = "/b"

[[path]]
from = "/a"
to = "/c"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SyncerError::ConfigError(msg)) => assert!(msg.contains("more than once")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_policy_is_a_toml_error() {
    let file = write_config(
        r#"
[config]
policy = "sometimes"

[[path]]
from = "/a"
to = "/b"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(SyncerError::TomlError(_))
    ));
}

#[test]
fn bad_or_zero_interval_is_rejected() {
    let zero = RawConfigBuilder::new()
        .with_path("/a", "/b")
        .sync_interval("0s")
        .raw();
    assert!(matches!(
        ConfigFile::try_from(zero),
        Err(SyncerError::ConfigError(msg)) if msg.contains("greater than zero")
    ));

    let garbage = RawConfigBuilder::new()
        .with_path("/a", "/b")
        .sync_interval("soon")
        .raw();
    assert!(matches!(
        ConfigFile::try_from(garbage),
        Err(SyncerError::ConfigError(msg)) if msg.contains("sync_interval")
    ));

    // Parses fine but cannot be scheduled.
    let huge = RawConfigBuilder::new()
        .with_path("/a", "/b")
        .sync_interval("18446744073709551615s")
        .raw();
    assert!(matches!(
        ConfigFile::try_from(huge),
        Err(SyncerError::ConfigError(msg)) if msg.contains("maximum")
    ));

    let just_over = RawConfigBuilder::new()
        .with_path("/a", "/b")
        .sync_interval(&format!("{}s", MAX_SYNC_INTERVAL.as_secs() + 1))
        .raw();
    assert!(ConfigFile::try_from(just_over).is_err());

    let at_limit = RawConfigBuilder::new()
        .with_path("/a", "/b")
        .sync_interval(&format!("{}s", MAX_SYNC_INTERVAL.as_secs()))
        .build();
    assert_eq!(at_limit.sync_interval, MAX_SYNC_INTERVAL);
}

#[test]
fn missing_explicit_config_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = load_with_overrides(Some(&missing), ConfigOverrides::default());
    assert!(matches!(result, Err(SyncerError::IoError(_))));
}

#[test]
fn overrides_append_paths_and_replace_policy() -> TestResult {
    let file = write_config(
        r#"
[config]
sync_interval = "5m"

[[path]]
from = "/from/file"
to = "/to/file"
"#,
    );

    let overrides = ConfigOverrides {
        paths: vec![PathEntry::new("/from/cli", "/to/cli")],
        policy: Some(SyncPolicy::Immediate),
        sync_interval: Some("2s".to_string()),
        syslog: false,
    };

    let cfg = load_with_overrides(Some(file.path()), overrides)?;

    assert_eq!(cfg.policy, SyncPolicy::Immediate);
    assert_eq!(cfg.sync_interval, Duration::from_secs(2));
    let sources: Vec<&Path> = cfg.registry.sources().collect();
    assert_eq!(sources, vec![Path::new("/from/file"), Path::new("/from/cli")]);
    Ok(())
}

#[test]
fn override_duplicating_file_source_is_rejected() {
    let file = write_config(
        r#"
[[path]]
from = "/same"
to = "/one"
"#,
    );

    let overrides = ConfigOverrides {
        paths: vec![PathEntry::new("/same", "/two")],
        ..ConfigOverrides::default()
    };

    assert!(matches!(
        load_with_overrides(Some(file.path()), overrides),
        Err(SyncerError::ConfigError(_))
    ));
}

#[test]
fn path_pair_parsing() {
    assert_eq!(
        parse_path_pair("/a/b=/c/d").unwrap(),
        PathEntry::new("/a/b", "/c/d")
    );
    // Only the first '=' separates.
    assert_eq!(
        parse_path_pair("/a=/b=c").unwrap(),
        PathEntry::new("/a", "/b=c")
    );
    assert!(parse_path_pair("/no-separator").is_err());
    assert!(parse_path_pair("=/only-dest").is_err());
}

#[test]
fn duration_parsing() {
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
    assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
    assert_eq!(parse_duration(" 2h ").unwrap(), Duration::from_secs(7200));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("3d").is_err());

    // Unit multiplication must not overflow.
    let err = parse_duration("307445734561825861m").unwrap_err();
    assert!(err.contains("too large"), "{err}");
    assert!(parse_duration("18446744073709551615h").is_err());
}

#[test]
fn syslog_can_be_enabled_from_file_or_flag() -> TestResult {
    let file = write_config(
        r#"
[config]
syslog = true

[[path]]
from = "/a"
to = "/b"
"#,
    );
    assert!(load_and_validate(file.path())?.syslog);

    let plain = write_config(
        r#"
[[path]]
from = "/a"
to = "/b"
"#,
    );
    let overrides = ConfigOverrides {
        syslog: true,
        ..ConfigOverrides::default()
    };
    assert!(load_with_overrides(Some(plain.path()), overrides)?.syslog);

    // The flag only switches it on.
    let cfg = load_with_overrides(Some(file.path()), ConfigOverrides::default())?;
    assert!(cfg.syslog);
    Ok(())
}
