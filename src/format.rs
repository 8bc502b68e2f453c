use crate::record::LogRecord;

/// Timestamp layout used in every log line
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a record as a single log line (without trailing newline)
///
/// Format: `YYYY-MM-DD HH:MM:SS [LEVEL] file.rs line=N pid=P logger.name ===> message`
pub fn format_record(record: &LogRecord) -> String {
    format!(
        "{} [{}] {} line={} pid={} {} ===> {}",
        record.created.format(DATE_FORMAT),
        record.level,
        record.filename(),
        record.line,
        record.pid,
        record.logger,
        record.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::record::CallSite;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_format_record() {
        let created = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let mut record = LogRecord::new(
            "app.network.client",
            Level::Error,
            CallSite::new("src/bin/app.rs", 42, "main"),
            "error to connect to 10.0.0.175:8080",
        )
        .with_created(created);
        record.pid = 4242;

        assert_eq!(
            format_record(&record),
            "2024-03-05 14:07:09 [ERROR] app.rs line=42 pid=4242 app.network.client ===> error to connect to 10.0.0.175:8080"
        );
    }
}
