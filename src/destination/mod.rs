// Destinations - where a logger's records end up

mod rotating;

pub use rotating::{RotationPolicy, TimedRotatingFile};

use crate::error::Result;
use crate::format::format_record;
use crate::record::LogRecord;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

/// A sink attached to a logger
///
/// Implementations serialize their own writes; a destination may be shared
/// between several loggers through an `Arc`.
pub trait Destination: Send + Sync {
    /// Write one record
    fn emit(&self, record: &LogRecord) -> Result<()>;

    /// Flush buffered output, if any
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Lock a mutex, recovering the data if a previous writer panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Writes formatted lines to any `Write` implementation (stderr, a socket, a Vec)
pub struct StreamDestination<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> StreamDestination<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the destination and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StreamDestination<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> Destination for StreamDestination<W> {
    fn emit(&self, record: &LogRecord) -> Result<()> {
        let mut writer = lock(&self.writer);
        writeln!(writer, "{}", format_record(record))?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        lock(&self.writer).flush()?;
        Ok(())
    }
}

/// Keeps formatted lines in memory; handy for inspection and tests
#[derive(Default)]
pub struct MemoryDestination {
    lines: Mutex<Vec<String>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.lines).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any emitted line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.lines).iter().any(|line| line.contains(needle))
    }
}

impl Destination for MemoryDestination {
    fn emit(&self, record: &LogRecord) -> Result<()> {
        lock(&self.lines).push(format_record(record));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::record::CallSite;

    fn record(message: &str) -> LogRecord {
        LogRecord::new("app", Level::Warning, CallSite::new("main.rs", 7, "main"), message)
    }

    #[test]
    fn test_memory_destination() {
        let destination = MemoryDestination::new();
        assert!(destination.is_empty());

        destination.emit(&record("first")).unwrap();
        destination.emit(&record("second")).unwrap();

        assert_eq!(destination.len(), 2);
        assert!(destination.contains("===> second"));
        assert!(destination.lines()[0].contains("[WARNING] main.rs line=7"));
    }

    #[test]
    fn test_stream_destination() {
        let destination = StreamDestination::new(Vec::new());
        destination.emit(&record("to the stream")).unwrap();

        let output = String::from_utf8(destination.into_inner()).unwrap();
        assert!(output.ends_with("app ===> to the stream\n"));
        assert_eq!(output.lines().count(), 1);
    }
}
