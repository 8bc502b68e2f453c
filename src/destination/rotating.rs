use super::{lock, Destination};
use crate::error::{LogRouteError, Result};
use crate::format::format_record;
use crate::record::LogRecord;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Default rotation interval (7 days)
const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const DAY_SUFFIX: &str = "%Y-%m-%d";
const SECOND_SUFFIX: &str = "%Y-%m-%d_%H-%M-%S";

/// When and how a file destination rotates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Time between rotations
    pub interval: Duration,
    /// Number of rotated files to keep; 0 keeps all of them
    pub backup_count: usize,
    /// Format rotation suffixes in UTC instead of local time
    pub utc: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_ROTATION_INTERVAL,
            backup_count: 0,
            utc: false,
        }
    }
}

impl RotationPolicy {
    /// Policy rotating every `days` days, keeping all backups
    ///
    /// Saturates on overflow; such a policy is rejected when a destination is
    /// opened with it. Use [`RotationPolicy::checked_every_days`] to catch this early.
    pub fn every_days(days: u64) -> Self {
        Self {
            interval: Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)),
            ..Self::default()
        }
    }

    /// Like [`RotationPolicy::every_days`], but `None` when the interval
    /// cannot be added to the current time
    pub fn checked_every_days(days: u64) -> Option<Self> {
        let seconds = days.checked_mul(SECONDS_PER_DAY)?;
        let interval = Duration::from_secs(seconds);
        let delta = TimeDelta::from_std(interval).ok()?;
        Local::now().checked_add_signed(delta)?;
        Some(Self {
            interval,
            ..Self::default()
        })
    }

    pub fn with_backup_count(mut self, backup_count: usize) -> Self {
        self.backup_count = backup_count;
        self
    }

    pub fn with_utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// strftime pattern appended to rotated file names
    fn suffix_format(&self) -> &'static str {
        if self.interval.as_secs() >= SECONDS_PER_DAY {
            DAY_SUFFIX
        } else {
            SECOND_SUFFIX
        }
    }

    fn suffix_for(&self, at: DateTime<Local>) -> String {
        if self.utc {
            at.with_timezone(&Utc).format(self.suffix_format()).to_string()
        } else {
            at.format(self.suffix_format()).to_string()
        }
    }

    fn is_rotation_suffix(&self, suffix: &str) -> bool {
        match self.suffix_format() {
            DAY_SUFFIX => NaiveDate::parse_from_str(suffix, DAY_SUFFIX).is_ok(),
            format => NaiveDateTime::parse_from_str(suffix, format).is_ok(),
        }
    }
}

struct RotatingState {
    file: File,
    /// Records created at or after this instant trigger a rollover first
    rollover_at: DateTime<Local>,
}

/// File destination that rotates on a fixed time interval
///
/// The active file keeps its configured name; on rollover it is renamed to
/// `<name>.<suffix>` where the suffix is the start of the interval that just
/// ended, and a fresh file is opened in its place.
pub struct TimedRotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    interval: TimeDelta,
    state: Mutex<RotatingState>,
}

impl TimedRotatingFile {
    /// Open (creating if absent) the log file at `path`
    ///
    /// # Arguments
    /// * `path` - Path of the active log file; its parent directory is created if missing
    /// * `policy` - Rotation interval and retention
    ///
    /// # Returns
    /// * `Ok(TimedRotatingFile)` - File is open for appending
    /// * `Err(LogRouteError)` - Directory or file could not be created
    pub fn new<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let interval = TimeDelta::from_std(policy.interval)
            .ok()
            .filter(|interval| *interval > TimeDelta::zero())
            .ok_or_else(|| {
                LogRouteError::Rotation(format!(
                    "Invalid rotation interval: {:?}",
                    policy.interval
                ))
            })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| LogRouteError::DestinationOpen {
                path: path.clone(),
                source,
            })?;
        }

        let file = open_append(&path)?;

        // An existing file continues the interval it was last written in
        let base: DateTime<Local> = file
            .metadata()
            .and_then(|m| m.modified())
            .map(DateTime::from)
            .unwrap_or_else(|_| Local::now());

        let rollover_at = base.checked_add_signed(interval).ok_or_else(|| {
            LogRouteError::Rotation(format!(
                "Rotation interval out of range: {:?}",
                policy.interval
            ))
        })?;

        tracing::debug!(
            "Opened rotating log file {} (interval {:?})",
            path.display(),
            policy.interval
        );

        Ok(Self {
            path,
            policy,
            interval,
            state: Mutex::new(RotatingState {
                file,
                rollover_at,
            }),
        })
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Instant at which the next record triggers a rollover
    pub fn next_rollover(&self) -> DateTime<Local> {
        lock(&self.state).rollover_at
    }

    fn rollover(&self, state: &mut RotatingState, now: DateTime<Local>) -> Result<()> {
        let next_rollover = now.checked_add_signed(self.interval).ok_or_else(|| {
            LogRouteError::Rotation(format!("Next rollover after {} is out of range", now))
        })?;
        state.file.flush()?;

        let interval_start = state.rollover_at - self.interval;
        let rotated_path = self.rotated_path(&self.policy.suffix_for(interval_start));

        if rotated_path.exists() {
            std::fs::remove_file(&rotated_path).map_err(|e| {
                LogRouteError::Rotation(format!(
                    "Failed to remove {}: {}",
                    rotated_path.display(),
                    e
                ))
            })?;
        }

        std::fs::rename(&self.path, &rotated_path).map_err(|e| {
            LogRouteError::Rotation(format!(
                "Failed to rename {} to {}: {}",
                self.path.display(),
                rotated_path.display(),
                e
            ))
        })?;

        state.file = open_append(&self.path)?;
        state.rollover_at = next_rollover;

        if self.policy.backup_count > 0 {
            self.remove_old_backups()?;
        }

        tracing::debug!(
            "Rotated {} to {}",
            self.path.display(),
            rotated_path.display()
        );

        Ok(())
    }

    fn rotated_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Rotated files belonging to this destination, oldest first
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = match self.path.file_name().and_then(|n| n.to_str()) {
            Some(name) => format!("{}.", name),
            None => return Ok(Vec::new()),
        };

        let mut backups: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_prefix(prefix.as_str()))
                    .map(|suffix| self.policy.is_rotation_suffix(suffix))
                    .unwrap_or(false)
            })
            .collect();

        // Suffixes sort chronologically
        backups.sort();
        Ok(backups)
    }

    fn remove_old_backups(&self) -> Result<()> {
        let backups = self.backups()?;
        if backups.len() <= self.policy.backup_count {
            return Ok(());
        }

        let excess = backups.len() - self.policy.backup_count;
        for old in &backups[..excess] {
            std::fs::remove_file(old).map_err(|e| {
                LogRouteError::Rotation(format!("Failed to remove {}: {}", old.display(), e))
            })?;
        }
        Ok(())
    }
}

impl Destination for TimedRotatingFile {
    fn emit(&self, record: &LogRecord) -> Result<()> {
        let mut state = lock(&self.state);

        if record.created >= state.rollover_at {
            self.rollover(&mut state, record.created)?;
        }

        let mut line = format_record(record);
        line.push('\n');

        state
            .file
            .write_all(line.as_bytes())
            .and_then(|_| state.file.flush())
            .map_err(|source| LogRouteError::DestinationWrite {
                path: self.path.clone(),
                source,
            })
    }

    fn flush(&self) -> Result<()> {
        lock(&self.state)
            .file
            .flush()
            .map_err(|source| LogRouteError::DestinationWrite {
                path: self.path.clone(),
                source,
            })
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogRouteError::DestinationOpen {
            path: path.to_path_buf(),
            source,
        })
}
