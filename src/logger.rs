// Logger handles and the registry that owns them

use crate::destination::{lock, Destination};
use crate::error::Result;
use crate::filter::Filter;
use crate::level::Level;
use crate::record::{CallSite, LogRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Name under which the root logger is registered
pub const ROOT_LOGGER_NAME: &str = "root";

/// Level the root logger starts with
pub const DEFAULT_ROOT_LEVEL: Level = Level::Warning;

/// Value of the global disable threshold meaning "nothing disabled"
const NOTHING_DISABLED: u8 = 0;

/// Mutable per-logger settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Minimum severity; `None` inherits from the nearest ancestor that has one
    pub level: Option<Level>,
    /// Forward passed records to ancestor loggers
    pub propagate: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: None,
            propagate: true,
        }
    }
}

/// A named logger
///
/// Obtained from a [`Registry`]; the same name always yields the same handle.
pub struct Logger {
    name: String,
    config: RwLock<LoggerConfig>,
    filters: RwLock<Vec<Arc<dyn Filter>>>,
    destinations: RwLock<Vec<Arc<dyn Destination>>>,
    parent: RwLock<Option<Arc<Logger>>>,
    /// Shared with the owning registry
    disabled_at: Arc<AtomicU8>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Logger {
    fn new(name: &str, config: LoggerConfig, parent: Option<Arc<Logger>>, disabled_at: Arc<AtomicU8>) -> Self {
        Self {
            name: name.to_string(),
            config: RwLock::new(config),
            filters: RwLock::new(Vec::new()),
            destinations: RwLock::new(Vec::new()),
            parent: RwLock::new(parent),
            disabled_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current settings
    pub fn config(&self) -> LoggerConfig {
        *read(&self.config)
    }

    /// Level set directly on this logger, if any
    pub fn level(&self) -> Option<Level> {
        read(&self.config).level
    }

    pub fn set_level(&self, level: Level) {
        write(&self.config).level = Some(level);
    }

    /// Fall back to inheriting the level from ancestors
    pub fn clear_level(&self) {
        write(&self.config).level = None;
    }

    /// Level actually applied: this logger's own, else the nearest ancestor's
    pub fn effective_level(&self) -> Level {
        if let Some(level) = self.level() {
            return level;
        }
        let mut next = self.parent();
        while let Some(ancestor) = next {
            if let Some(level) = ancestor.level() {
                return level;
            }
            next = ancestor.parent();
        }
        DEFAULT_ROOT_LEVEL
    }

    pub fn propagate(&self) -> bool {
        read(&self.config).propagate
    }

    pub fn set_propagate(&self, propagate: bool) {
        write(&self.config).propagate = propagate;
    }

    /// Nearest existing ancestor; `None` only for the root logger
    pub fn parent(&self) -> Option<Arc<Logger>> {
        read(&self.parent).clone()
    }

    pub fn add_filter<F: Filter + 'static>(&self, filter: F) {
        write(&self.filters).push(Arc::new(filter));
    }

    pub fn clear_filters(&self) {
        write(&self.filters).clear();
    }

    /// Attach a destination
    ///
    /// Attaching the same destination twice makes every record be written twice.
    pub fn add_destination(&self, destination: Arc<dyn Destination>) {
        write(&self.destinations).push(destination);
    }

    pub fn destination_count(&self) -> usize {
        read(&self.destinations).len()
    }

    pub fn clear_destinations(&self) {
        write(&self.destinations).clear();
    }

    /// Whether a record at `level` would pass this logger's own threshold
    pub fn is_enabled_for(&self, level: Level) -> bool {
        !self.globally_disabled(level) && level >= self.effective_level()
    }

    /// Build a record for this logger and dispatch it
    ///
    /// Usually called through the `debug!` .. `critical!` macros, which fill in
    /// the call site.
    pub fn log(&self, level: Level, site: CallSite, message: impl Into<String>) -> Result<()> {
        if self.globally_disabled(level) {
            return Ok(());
        }
        self.emit_record(&LogRecord::new(&self.name, level, site, message))
    }

    /// Dispatch an already-built record
    ///
    /// The record goes through this logger's threshold, filters and
    /// destinations. If it passes and propagation is on, each ancestor in turn
    /// applies its own threshold, filters and destinations. Forwarding stops
    /// after an ancestor that does not propagate.
    pub fn emit_record(&self, record: &LogRecord) -> Result<()> {
        if self.globally_disabled(record.level) {
            return Ok(());
        }
        if !self.handle(record)? || !self.propagate() {
            return Ok(());
        }

        let mut next = self.parent();
        while let Some(ancestor) = next {
            ancestor.handle(record)?;
            if !ancestor.propagate() {
                break;
            }
            next = ancestor.parent();
        }
        Ok(())
    }

    /// Apply threshold and filters, then write to every destination.
    /// Returns whether the record passed.
    fn handle(&self, record: &LogRecord) -> Result<bool> {
        if record.level < self.effective_level() {
            return Ok(false);
        }
        let filters = read(&self.filters).clone();
        if !filters.iter().all(|filter| filter.allows(record)) {
            return Ok(false);
        }

        let destinations = read(&self.destinations).clone();
        for destination in &destinations {
            destination.emit(record)?;
        }
        Ok(true)
    }

    /// Flush every attached destination
    pub fn flush(&self) -> Result<()> {
        let destinations = read(&self.destinations).clone();
        for destination in &destinations {
            destination.flush()?;
        }
        Ok(())
    }

    fn globally_disabled(&self, level: Level) -> bool {
        level.value() <= self.disabled_at.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("config", &self.config())
            .field("destinations", &self.destination_count())
            .finish()
    }
}

/// Process-wide store of named loggers, owned by the application
///
/// Pass it by reference to everything that needs a logger. Loggers are linked
/// to their nearest existing ancestor; creating an intermediate logger later
/// re-links the descendants that were created before it.
pub struct Registry {
    root: Arc<Logger>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    disabled_at: Arc<AtomicU8>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry holding only the root logger (level WARNING, no destinations)
    pub fn new() -> Self {
        let disabled_at = Arc::new(AtomicU8::new(NOTHING_DISABLED));
        let root = Arc::new(Logger::new(
            ROOT_LOGGER_NAME,
            LoggerConfig {
                level: Some(DEFAULT_ROOT_LEVEL),
                propagate: false,
            },
            None,
            disabled_at.clone(),
        ));

        Self {
            root,
            loggers: Mutex::new(HashMap::new()),
            disabled_at,
        }
    }

    pub fn root(&self) -> Arc<Logger> {
        self.root.clone()
    }

    /// Get the logger called `name`, creating it on first request
    ///
    /// An empty name or `"root"` returns the root logger.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        if name.is_empty() || name == ROOT_LOGGER_NAME {
            return self.root();
        }

        let mut loggers = lock(&self.loggers);
        if let Some(existing) = loggers.get(name) {
            return existing.clone();
        }

        let parent = ancestors(name)
            .find_map(|ancestor| loggers.get(ancestor).cloned())
            .unwrap_or_else(|| self.root());

        let logger = Arc::new(Logger::new(
            name,
            LoggerConfig::default(),
            Some(parent),
            self.disabled_at.clone(),
        ));

        // Re-link descendants currently pointing above the new logger
        let child_prefix = format!("{}.", name);
        for child in loggers.values() {
            if !child.name.starts_with(&child_prefix) {
                continue;
            }
            let mut child_parent = write(&child.parent);
            let points_above = child_parent
                .as_ref()
                .map(|p| !p.name.starts_with(&child_prefix))
                .unwrap_or(true);
            if points_above {
                *child_parent = Some(logger.clone());
            }
        }

        loggers.insert(name.to_string(), logger.clone());
        tracing::debug!("Created logger {}", name);
        logger
    }

    /// Whether a logger with this name has been created
    pub fn contains(&self, name: &str) -> bool {
        name == ROOT_LOGGER_NAME || lock(&self.loggers).contains_key(name)
    }

    /// Names of all created loggers (root excluded), sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.loggers).keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop every record at or below `level` on all loggers
    pub fn disable(&self, level: Level) {
        self.disabled_at.store(level.value(), Ordering::Relaxed);
    }

    /// Undo [`Registry::disable`]
    pub fn enable(&self) {
        self.disabled_at.store(NOTHING_DISABLED, Ordering::Relaxed);
    }

    /// Current global disable threshold, if any
    pub fn disabled_level(&self) -> Option<Level> {
        Level::from_value(self.disabled_at.load(Ordering::Relaxed))
    }

    /// Flush every destination of every logger, root included
    pub fn flush_all(&self) -> Result<()> {
        self.root.flush()?;
        let loggers: Vec<Arc<Logger>> = lock(&self.loggers).values().cloned().collect();
        for logger in loggers {
            logger.flush()?;
        }
        Ok(())
    }
}

/// Proper dotted ancestors of `name`, nearest first: `a.b.c` yields `a.b`, `a`
pub(crate) fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    name.rmatch_indices('.').map(move |(index, _)| &name[..index])
}
