// Log records and call-site capture

use crate::level::Level;
use chrono::{DateTime, Local};
use std::path::Path;

/// Source location a record was emitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Call site for records that do not originate from Rust source (e.g. the CLI `emit` command)
    pub const fn unknown() -> Self {
        Self::new("(unknown file)", 0, "(unknown function)")
    }
}

/// A single log message together with everything the line format needs
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Time the record was created; also drives time-based rotation
    pub created: DateTime<Local>,
    pub level: Level,
    /// Source path as given by `file!()`
    pub file: String,
    pub line: u32,
    /// Name of the function the record was emitted from
    pub function: String,
    pub pid: u32,
    /// Dotted name of the originating logger
    pub logger: String,
    pub message: String,
}

impl LogRecord {
    /// Create a record stamped with the current time and process id
    pub fn new(logger: &str, level: Level, site: CallSite, message: impl Into<String>) -> Self {
        Self {
            created: Local::now(),
            level,
            file: site.file.to_string(),
            line: site.line,
            function: site.function.to_string(),
            pid: std::process::id(),
            logger: logger.to_string(),
            message: message.into(),
        }
    }

    /// Override the creation timestamp
    pub fn with_created(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }

    /// File name component of the source path
    pub fn filename(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

/// Reduce a `type_name` of a nested marker fn to the enclosing function's bare name
#[doc(hidden)]
pub fn short_function_name(type_name: &'static str) -> &'static str {
    let mut name = type_name.strip_suffix("::__here").unwrap_or(type_name);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name.rsplit("::").next().unwrap_or(name)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::record::short_function_name(__type_name_of(__here))
    }};
}

/// Capture the current file, line and function as a [`CallSite`]
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::record::CallSite::new(::std::file!(), ::std::line!(), $crate::__function_name!())
    };
}

/// Log a formatted message on a [`Logger`](crate::Logger) at the given level
///
/// Expands to `Logger::log(..)`, so it evaluates to a `Result<()>`.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, $crate::call_site!(), ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}
