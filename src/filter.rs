// Record filters attached to loggers

use crate::record::LogRecord;

/// Predicate deciding whether a record continues to a logger's destinations
pub trait Filter: Send + Sync {
    /// Return `false` to drop the record
    fn allows(&self, record: &LogRecord) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&LogRecord) -> bool + Send + Sync,
{
    fn allows(&self, record: &LogRecord) -> bool {
        self(record)
    }
}

/// Drops records emitted from one specific function; all others pass unchanged
#[derive(Debug, Clone)]
pub struct FuncNameFilter {
    function: String,
}

impl FuncNameFilter {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }
}

impl Filter for FuncNameFilter {
    fn allows(&self, record: &LogRecord) -> bool {
        record.function != self.function
    }
}

/// Admits only records from the named logger or its descendants
///
/// `NameFilter::new("app.net")` passes `app.net` and `app.net.client` but not
/// `app.network`. An empty name admits everything.
#[derive(Debug, Clone)]
pub struct NameFilter {
    name: String,
}

impl NameFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Filter for NameFilter {
    fn allows(&self, record: &LogRecord) -> bool {
        if self.name.is_empty() || record.logger == self.name {
            return true;
        }
        record
            .logger
            .strip_prefix(self.name.as_str())
            .map(|rest| rest.starts_with('.'))
            .unwrap_or(false)
    }
}
