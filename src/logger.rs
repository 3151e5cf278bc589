//! Best-effort error log on disk.
//!
//! Appends timestamped entries to a dated file under a configured
//! directory. The log is a diagnostic side channel only: a failure to
//! write falls back to stderr and never reaches the caller.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use time::OffsetDateTime;
use time::macros::format_description;

/// Append-only error log rooted at a directory. Cheap to clone and pass
/// by reference into each pipeline stage.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    dir: PathBuf,
}

impl ErrorLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Record a skipped-but-survivable condition (e.g. a short frame).
    pub fn warn(&self, message: impl AsRef<str>) {
        self.append("WARN", message.as_ref());
    }

    /// Record a failure.
    pub fn error(&self, message: impl AsRef<str>) {
        self.append("ERROR", message.as_ref());
    }

    fn append(&self, level: &str, message: &str) {
        let now = local_now();
        let date_fmt = format_description!("[year]-[month]-[day]");
        let stamp_fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let date = now
            .format(date_fmt)
            .unwrap_or_else(|_| "unknown-date".into());
        let stamp = now
            .format(stamp_fmt)
            .unwrap_or_else(|_| "unknown-time".into());
        let entry = format!("{stamp} - {level}: {message}\n");
        if let Err(e) = self.write_entry(&date, &entry) {
            eprintln!("error log write failed: {e}");
            eprintln!("{level}: {message}");
        }
    }

    fn write_entry(&self, date: &str, entry: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("log-{date}.txt"));
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.as_bytes())
    }
}

/// Current local time, falling back to UTC when the local offset cannot
/// be determined.
pub(crate) fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
