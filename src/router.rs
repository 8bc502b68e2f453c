// Router - maps dotted logger names to log files

use crate::destination::{lock, RotationPolicy, TimedRotatingFile};
use crate::error::{LogRouteError, Result};
use crate::level::Level;
use crate::logger::{Logger, Registry};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key every route table must contain
pub const DEFAULT_ROUTE: &str = "default";

/// Mapping from dotted logger-name prefixes to log file paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: HashMap<String, PathBuf>,
}

impl RouteTable {
    /// Build a route table
    ///
    /// # Returns
    /// * `Ok(RouteTable)` - The table contains a `"default"` route
    /// * `Err(LogRouteError::MissingDefaultRoute)` - It does not
    pub fn new<I, K, P>(routes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        let mut table = HashMap::new();
        for (key, path) in routes {
            let key = key.into();
            if key.is_empty() || key.split('.').any(str::is_empty) {
                return Err(LogRouteError::InvalidRouteKey(key));
            }
            table.insert(key, path.into());
        }

        if !table.contains_key(DEFAULT_ROUTE) {
            return Err(LogRouteError::MissingDefaultRoute);
        }

        Ok(Self { routes: table })
    }

    /// Key of the most specific route covering `logger_name`
    ///
    /// Tries the full name, then drops one trailing dotted segment at a time.
    /// Falls back to `"default"`; never fails.
    ///
    /// A lone first segment is tested as well, so a single-segment key such as
    /// `"app"` matches `app` and `app.*`.
    pub fn resolve_key<'a>(&'a self, logger_name: &str) -> &'a str {
        let mut candidate = logger_name;
        loop {
            if let Some((key, _)) = self.routes.get_key_value(candidate) {
                return key;
            }
            match candidate.rfind('.') {
                Some(index) => candidate = &candidate[..index],
                None => return DEFAULT_ROUTE,
            }
        }
    }

    /// File path for `logger_name`
    pub fn resolve(&self, logger_name: &str) -> &Path {
        self.get(self.resolve_key(logger_name))
            .unwrap_or_else(|| self.default_path())
    }

    pub fn default_path(&self) -> &Path {
        // Present by construction
        &self.routes[DEFAULT_ROUTE]
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.routes.get(key).map(PathBuf::as_path)
    }

    /// Routes sorted by key
    pub fn entries(&self) -> Vec<(&str, &Path)> {
        let mut entries: Vec<(&str, &Path)> = self
            .routes
            .iter()
            .map(|(key, path)| (key.as_str(), path.as_path()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Configures loggers to write into the file their name routes to
///
/// Loggers routed to the same path share one destination, so rotation and
/// writes for that file go through a single handle.
pub struct LogRouter {
    routes: RouteTable,
    rotation: RotationPolicy,
    /// Open destinations keyed by routed path
    destinations: Mutex<HashMap<PathBuf, Arc<TimedRotatingFile>>>,
}

impl fmt::Debug for LogRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRouter")
            .field("routes", &self.routes)
            .field("rotation", &self.rotation)
            .field("open_files", &lock(&self.destinations).len())
            .finish()
    }
}

impl LogRouter {
    pub fn new(routes: RouteTable, rotation: RotationPolicy) -> Self {
        Self {
            routes,
            rotation,
            destinations: Mutex::new(HashMap::new()),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn rotation(&self) -> &RotationPolicy {
        &self.rotation
    }

    /// File path `logger_name` routes to
    pub fn resolve(&self, logger_name: &str) -> &Path {
        self.routes.resolve(logger_name)
    }

    /// Get a logger writing to its routed file
    ///
    /// Turns propagation off, sets `level` and attaches the rotating file
    /// destination for the routed path, opening it on first use. Call at most
    /// once per name: a second call attaches the destination again and every
    /// record is then written twice.
    ///
    /// # Returns
    /// * `Ok(Arc<Logger>)` - Configured logger
    /// * `Err(LogRouteError)` - The routed file could not be opened
    pub fn get_logger(&self, registry: &Registry, name: &str, level: Level) -> Result<Arc<Logger>> {
        let path = self.resolve(name);
        let destination = self.destination_for(path)?;

        let logger = registry.get_logger(name);
        logger.set_propagate(false);
        logger.set_level(level);
        logger.add_destination(destination);

        tracing::debug!("Routed logger {} to {} at {}", name, path.display(), level);
        Ok(logger)
    }

    /// Shared destination for `path`, opened on first request
    fn destination_for(&self, path: &Path) -> Result<Arc<TimedRotatingFile>> {
        let mut destinations = lock(&self.destinations);
        if let Some(existing) = destinations.get(path) {
            return Ok(existing.clone());
        }

        let destination = Arc::new(TimedRotatingFile::new(path, self.rotation)?);
        destinations.insert(path.to_path_buf(), destination.clone());
        Ok(destination)
    }

    /// Number of distinct log files opened so far
    pub fn open_file_count(&self) -> usize {
        lock(&self.destinations).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> RouteTable {
        RouteTable::new([
            ("default", "/var/log/default.log"),
            ("test.other", "/var/log/other.log"),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_key() {
        let table = sample_table();
        assert_eq!(table.resolve("test.other"), Path::new("/var/log/other.log"));
        assert_eq!(table.resolve("default"), Path::new("/var/log/default.log"));
    }

    #[test]
    fn test_longest_ancestor_wins() {
        let table = sample_table();
        assert_eq!(table.resolve("test.other.extra"), Path::new("/var/log/other.log"));
        assert_eq!(table.resolve_key("test.other.extra.deep"), "test.other");
    }

    #[test]
    fn test_fallback_to_default() {
        let table = sample_table();
        assert_eq!(table.resolve("test"), Path::new("/var/log/default.log"));
        assert_eq!(table.resolve("test.otherwise"), Path::new("/var/log/default.log"));
        assert_eq!(table.resolve(""), Path::new("/var/log/default.log"));

        let only_default = RouteTable::new([("default", "/var/log/default.log")]).unwrap();
        assert_eq!(only_default.resolve("a.b.c"), Path::new("/var/log/default.log"));
    }

    #[test]
    fn test_single_segment_key() {
        let table = RouteTable::new([
            ("default", "/var/log/default.log"),
            ("app", "/var/log/app.log"),
            ("app.net.client", "/var/log/client.log"),
        ])
        .unwrap();
        assert_eq!(table.resolve("app"), Path::new("/var/log/app.log"));
        assert_eq!(table.resolve("app.net"), Path::new("/var/log/app.log"));
        assert_eq!(table.resolve("app.net.client.tls"), Path::new("/var/log/client.log"));
    }

    #[test]
    fn test_missing_default() {
        let result = RouteTable::new([("test.other", "/var/log/other.log")]);
        assert!(matches!(result, Err(LogRouteError::MissingDefaultRoute)));
    }

    #[test]
    fn test_invalid_key() {
        let result = RouteTable::new([("default", "/a.log"), ("bad..key", "/b.log")]);
        assert!(matches!(result, Err(LogRouteError::InvalidRouteKey(_))));
    }

    #[test]
    fn test_entries_sorted() {
        let table = sample_table();
        let keys: Vec<&str> = table.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["default", "test.other"]);
        assert_eq!(table.len(), 2);
    }
}
