//! Rotating file writer

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;
use crate::logger::rotation::RotationManager;

/// File writer with rotation support.
///
/// After a write or rotation failure the writer switches to stderr for the
/// rest of the process, so logging never fails the program.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
}

struct WriterState {
    file: BufWriter<File>,
    current_size: u64,
    rotation: RotationManager,
    fallback: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = if config.append {
            std::fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file,
                current_size,
                rotation: RotationManager::new(config.rotation.clone()),
                fallback: false,
            })),
            path: config.path.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn is_in_fallback_mode(&self) -> bool {
        self.state.lock().map(|s| s.fallback).unwrap_or(true)
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, WriterState>> {
        self.state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard { writer: self }
    }
}

/// Per-event handle returned by [`RotatingFileWriter::make_writer`]
pub struct RotatingWriterGuard<'a> {
    writer: &'a RotatingFileWriter,
}

impl Write for RotatingWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let path = &self.writer.path;
        let mut state = self.writer.lock()?;

        if state.fallback {
            return io::stderr().write(buf);
        }

        if state.rotation.should_rotate(state.current_size) {
            if let Err(e) = rotate(&mut state, path) {
                return fall_back(&mut state, buf, &e.to_string());
            }
        }

        match state.file.write(buf) {
            Ok(written) => {
                state.current_size += written as u64;
                Ok(written)
            }
            Err(e) if is_disk_space_error(&e) => {
                // One attempt at freeing space before giving up on the file
                let retried = state
                    .rotation
                    .force_cleanup(path)
                    .ok()
                    .and_then(|_| state.file.write(buf).ok());
                match retried {
                    Some(written) => {
                        state.current_size += written as u64;
                        Ok(written)
                    }
                    None => fall_back(&mut state, buf, &e.to_string()),
                }
            }
            Err(e) => fall_back(&mut state, buf, &e.to_string()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.writer.lock()?;
        if state.fallback {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

impl Drop for RotatingWriterGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.writer.state.lock() {
            let _ = state.file.flush();
        }
    }
}

fn rotate(state: &mut WriterState, path: &Path) -> Result<(), LoggerError> {
    state.file.flush()?;
    state.rotation.rotate(path)?;
    state.file = open_log_file(path, false)?;
    state.current_size = 0;
    Ok(())
}

fn fall_back(state: &mut WriterState, buf: &[u8], reason: &str) -> io::Result<usize> {
    state.fallback = true;
    eprintln!("[jobkit] log file unavailable, writing to stderr: {}", reason);
    io::stderr().write(buf)
}

#[cfg(unix)]
fn is_disk_space_error(error: &io::Error) -> bool {
    // ENOSPC, EDQUOT
    matches!(error.raw_os_error(), Some(28) | Some(122)) || error.kind() == io::ErrorKind::StorageFull
}

#[cfg(not(unix))]
fn is_disk_space_error(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::StorageFull
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}
