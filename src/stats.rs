use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::app_dirs::AppDirs;

/// Summary of one finished session, appended to `log.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub finished_at: DateTime<Local>,
    pub length_secs: u64,
    pub elapsed_secs: u64,
    pub words: usize,
}

/// Append a record to the session log, emitting the header when the
/// file is created. Best effort; callers ignore failures.
pub fn append_record<P: AsRef<Path>>(path: P, record: &SessionRecord) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let needs_header = !path.exists();

    let mut log_file = OpenOptions::new().append(true).create(true).open(path)?;

    if needs_header {
        writeln!(log_file, "date,length_secs,elapsed_secs,words")?;
    }

    writeln!(
        log_file,
        "{},{},{},{}",
        record.finished_at.format("%c"),
        record.length_secs,
        record.elapsed_secs,
        record.words,
    )?;

    Ok(())
}

pub fn append_to_default_log(record: &SessionRecord) -> io::Result<()> {
    append_record(AppDirs::session_log_path(), record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record(words: usize) -> SessionRecord {
        SessionRecord {
            finished_at: Local.with_ymd_and_hms(2026, 2, 1, 18, 30, 0).unwrap(),
            length_secs: 900,
            elapsed_secs: 900,
            words,
        }
    }

    #[test]
    fn first_append_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        append_record(&path, &record(321)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("date,length_secs,elapsed_secs,words"));
        assert!(lines.next().unwrap().ends_with(",900,900,321"));
    }

    #[test]
    fn later_appends_skip_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        append_record(&path, &record(100)).unwrap();
        append_record(&path, &record(200)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert_eq!(contents.matches("date,").count(), 1);
    }

    #[test]
    fn missing_parent_directory_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("log.csv");
        append_record(&path, &record(1)).unwrap();
        assert!(path.exists());
    }
}
