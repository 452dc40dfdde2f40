//! Rotation of the active log file

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::logger::compression;
use crate::logger::config::{RotationConfig, RotationStrategy, TimeUnit};
use crate::logger::error::LoggerError;

/// Decides when the active file rotates and prunes old rotations
pub struct RotationManager {
    config: RotationConfig,
    next_time_rotation: Option<Timestamp>,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self::starting_at(config, Timestamp::now())
    }

    pub(crate) fn starting_at(config: RotationConfig, now: Timestamp) -> Self {
        let next_time_rotation = time_unit(config.strategy).map(|unit| unit.next_after(now));
        Self {
            config,
            next_time_rotation,
        }
    }

    pub fn should_rotate(&self, current_size: u64) -> bool {
        self.should_rotate_at(current_size, Timestamp::now())
    }

    pub(crate) fn should_rotate_at(&self, current_size: u64, now: Timestamp) -> bool {
        let size_due = current_size >= self.config.max_size;
        let time_due = self.next_time_rotation.is_some_and(|due| now >= due);

        match self.config.strategy {
            RotationStrategy::Size => size_due,
            RotationStrategy::Time(_) => time_due,
            RotationStrategy::Combined => size_due || time_due,
        }
    }

    /// Move the active file aside, compress it if configured and prune old
    /// rotations. The caller reopens the active file afterwards.
    pub fn rotate(&mut self, active: &Path) -> Result<(), LoggerError> {
        let now = Timestamp::now();

        if active.exists() {
            let rotated = rotated_path(active, now);
            fs::rename(active, &rotated)?;

            if self.config.compress {
                compression::compress_file(&rotated)?;
            }
        }

        self.next_time_rotation = time_unit(self.config.strategy).map(|unit| unit.next_after(now));
        self.prune(active, self.config.max_files)
    }

    /// Prune harder than usual to free disk space
    pub fn force_cleanup(&self, active: &Path) -> Result<(), LoggerError> {
        self.prune(active, (self.config.max_files / 2).max(1))
    }

    fn prune(&self, active: &Path, keep: usize) -> Result<(), LoggerError> {
        let mut rotated = rotated_files(active)?;
        if rotated.len() <= keep {
            return Ok(());
        }

        rotated.sort_by_key(|path| fs::metadata(path).and_then(|m| m.modified()).ok());
        let excess = rotated.len() - keep;
        for oldest in rotated.into_iter().take(excess) {
            fs::remove_file(&oldest)?;
        }
        Ok(())
    }
}

fn time_unit(strategy: RotationStrategy) -> Option<TimeUnit> {
    match strategy {
        RotationStrategy::Size => None,
        RotationStrategy::Time(unit) => Some(unit),
        RotationStrategy::Combined => Some(TimeUnit::Daily),
    }
}

/// `jobkit.log` becomes `jobkit.20250101_120000.log`, with a counter
/// appended when a rotation already happened within the same second
fn rotated_path(active: &Path, now: Timestamp) -> PathBuf {
    let stamp = now.to_zoned(TimeZone::UTC).strftime("%Y%m%d_%H%M%S").to_string();
    let stem = active.file_stem().unwrap_or_default().to_string_lossy();
    let ext = active.extension().map(|e| e.to_string_lossy());

    let name_for = |suffix: String| match &ext {
        Some(ext) => format!("{}.{}{}.{}", stem, stamp, suffix, ext),
        None => format!("{}.{}{}", stem, stamp, suffix),
    };

    let mut candidate = active.with_file_name(name_for(String::new()));
    let mut counter = 1;
    while candidate.exists() || candidate.with_file_name(gz_name(&candidate)).exists() {
        candidate = active.with_file_name(name_for(format!("-{}", counter)));
        counter += 1;
    }
    candidate
}

fn gz_name(path: &Path) -> String {
    format!("{}.gz", path.file_name().unwrap_or_default().to_string_lossy())
}

fn rotated_files(active: &Path) -> Result<Vec<PathBuf>, LoggerError> {
    let parent = match active.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        "{}.",
        active.file_stem().unwrap_or_default().to_string_lossy()
    );
    let active_name = active.file_name().unwrap_or_default();

    let files = fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name() != active_name)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
        .map(|entry| entry.path())
        .collect();
    Ok(files)
}
