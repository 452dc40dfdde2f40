//! Tests for the logger module

use std::io::Write;
use std::path::PathBuf;

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::*;
use crate::logger::writer::RotatingFileWriter;

fn file_config(path: PathBuf, max_size: u64) -> FileConfig {
    FileConfig {
        enabled: true,
        path,
        append: true,
        format: LogFormat::Json,
        rotation: RotationConfig {
            strategy: RotationStrategy::Size,
            max_size,
            max_files: 3,
            compress: false,
        },
    }
}

#[test]
fn test_writer_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("logs").join("jobkit.log");

    let writer = RotatingFileWriter::new(&file_config(path.clone(), 1024)).unwrap();
    writer.make_writer().write_all(b"hello\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    assert!(!writer.is_in_fallback_mode());
}

#[test]
fn test_writer_appends_to_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobkit.log");
    std::fs::write(&path, "earlier\n").unwrap();

    let writer = RotatingFileWriter::new(&file_config(path.clone(), 1024)).unwrap();
    writer.make_writer().write_all(b"later\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
}

#[test]
fn test_writer_truncates_when_not_appending() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobkit.log");
    std::fs::write(&path, "stale\n").unwrap();

    let mut config = file_config(path.clone(), 1024);
    config.append = false;
    let writer = RotatingFileWriter::new(&config).unwrap();
    writer.make_writer().write_all(b"fresh\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
}

#[test]
fn test_writer_rotates_when_size_reached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobkit.log");

    let writer = RotatingFileWriter::new(&file_config(path.clone(), 10)).unwrap();
    writer.make_writer().write_all(b"0123456789\n").unwrap();
    writer.make_writer().write_all(b"next\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "next\n");

    let rotated: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "jobkit.log")
        .collect();
    assert_eq!(rotated.len(), 1);
    assert_eq!(
        std::fs::read_to_string(rotated[0].path()).unwrap(),
        "0123456789\n"
    );
}

#[cfg(unix)]
#[test]
fn test_writer_falls_back_to_stderr_when_directory_disappears() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let path = log_dir.join("jobkit.log");

    let writer = RotatingFileWriter::new(&file_config(path, 1)).unwrap();
    writer.make_writer().write_all(b"first\n").unwrap();
    assert!(!writer.is_in_fallback_mode());

    std::fs::remove_dir_all(&log_dir).unwrap();
    writer.make_writer().write_all(b"second\n").unwrap();

    assert!(writer.is_in_fallback_mode());
    assert!(!log_dir.exists());
}

#[test]
fn test_default_logger_config_is_valid() {
    let config = LoggerConfig::default();
    assert!(config.validate().is_ok());
    assert!(config.console.enabled);
    assert!(!config.file.enabled);
}

#[test]
fn test_enabled_file_output_requires_path() {
    let config = FileConfig {
        enabled: true,
        path: PathBuf::new(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
