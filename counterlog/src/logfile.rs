//! The CSV log sink: sequential file naming, header, and UTC-midnight rollover.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};

/// The header line written once at the top of every new log file.
pub const LOG_HEADER: &str = "Time, CounterData";

/// Name of the log subdirectory under the working directory.
const LOG_DIR: &str = "logs";

/// Find the lowest-numbered unused log file name in the given directory.
///
/// File names have the form `counterLog.<NNN>.csv` with `NNN` zero-padded to three digits,
/// starting at 001. The returned path does not exist at the time of the scan.
///
/// # Arguments
/// * `log_dir` - The directory to scan.
pub fn next_log_path(log_dir: &Path) -> PathBuf {
    let mut ind: usize = 1;
    loop {
        let candidate = log_dir.join(format!("counterLog.{ind:03}.csv"));
        if !candidate.exists() {
            return candidate;
        }
        ind += 1;
    }
}

/// An append-only CSV log for measurement records.
///
/// The file identity is chosen once at creation and fixed for the run. Each record is written as
/// `<UTC timestamp>,<reading>` and flushed immediately. At the first write after UTC midnight the
/// current file is renamed with the ended day's date as a suffix and a fresh file is started at
/// the original path; rotated files are kept without limit. The header is written exactly once
/// per run, before any record.
pub struct LogSink {
    file: File,
    path: PathBuf,
    current_day: NaiveDate,
}

impl LogSink {
    /// Create a new log sink under `<base_dir>/logs`.
    ///
    /// The `logs` directory is created if absent. The file is created at the first unused
    /// sequential name (see [`next_log_path`]) and the header line is written to it.
    ///
    /// # Arguments
    /// * `base_dir` - The working directory to place the `logs` directory in.
    pub fn create(base_dir: &Path) -> Result<Self, io::Error> {
        let log_dir = base_dir.join(LOG_DIR);
        fs::create_dir_all(&log_dir)?;

        let path = next_log_path(&log_dir);
        let mut file = File::create(&path)?;
        writeln!(file, "{LOG_HEADER}")?;
        file.flush()?;

        Ok(LogSink {
            file,
            path,
            current_day: Utc::now().date_naive(),
        })
    }

    /// The path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one measurement record, timestamped with the current UTC time.
    ///
    /// # Arguments
    /// * `reading` - The raw reading text as received from the instrument.
    pub fn append(&mut self, reading: &str) -> Result<(), io::Error> {
        self.append_at(Utc::now(), reading)
    }

    /// Append one measurement record with an explicit timestamp.
    ///
    /// Rollover is evaluated against the given time, which makes the midnight behavior
    /// deterministic to test.
    pub(crate) fn append_at(
        &mut self,
        now: DateTime<Utc>,
        reading: &str,
    ) -> Result<(), io::Error> {
        self.roll_if_needed(now)?;
        writeln!(self.file, "{},{}", format_timestamp(now), reading)?;
        self.file.flush()
    }

    /// Roll the log over if the UTC day has changed since the last write.
    fn roll_if_needed(&mut self, now: DateTime<Utc>) -> Result<(), io::Error> {
        let day = now.date_naive();
        if day == self.current_day {
            return Ok(());
        }

        self.file.flush()?;
        let rotated = rotated_path(&self.path, self.current_day);
        fs::rename(&self.path, &rotated)?;
        log::info!("Rolled log over, previous day kept as {}", rotated.display());

        self.file = File::create(&self.path)?;
        self.current_day = day;
        Ok(())
    }
}

/// The name a log file is rotated to: the active name with the ended day appended.
fn rotated_path(path: &Path, day: NaiveDate) -> PathBuf {
    let mut rotated = path.as_os_str().to_os_string();
    rotated.push(format!(".{}", day.format("%Y-%m-%d")));
    PathBuf::from(rotated)
}

/// Render a timestamp the way it appears in the log, microsecond resolution UTC.
fn format_timestamp(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use rstest::*;
    use tempfile::tempdir;

    fn day(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[rstest]
    fn next_log_path_starts_at_one() {
        let dir = tempdir().unwrap();
        assert_eq!(
            next_log_path(dir.path()),
            dir.path().join("counterLog.001.csv")
        );
    }

    #[rstest]
    fn next_log_path_skips_existing() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("counterLog.001.csv")).unwrap();
        File::create(dir.path().join("counterLog.002.csv")).unwrap();
        assert_eq!(
            next_log_path(dir.path()),
            dir.path().join("counterLog.003.csv")
        );
    }

    /// Gaps are filled lowest-first.
    #[rstest]
    fn next_log_path_fills_gap() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("counterLog.001.csv")).unwrap();
        File::create(dir.path().join("counterLog.003.csv")).unwrap();
        assert_eq!(
            next_log_path(dir.path()),
            dir.path().join("counterLog.002.csv")
        );
    }

    /// Creating the sink makes the `logs` directory and writes exactly the header line.
    #[rstest]
    fn create_writes_header() {
        let dir = tempdir().unwrap();
        let sink = LogSink::create(dir.path()).unwrap();
        assert_eq!(sink.path(), dir.path().join("logs/counterLog.001.csv"));

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "Time, CounterData\n");
    }

    /// A second sink in the same directory gets the next sequential number.
    #[rstest]
    fn create_twice_numbers_sequentially() {
        let dir = tempdir().unwrap();
        let first = LogSink::create(dir.path()).unwrap();
        let second = LogSink::create(dir.path()).unwrap();
        assert_eq!(first.path(), dir.path().join("logs/counterLog.001.csv"));
        assert_eq!(second.path(), dir.path().join("logs/counterLog.002.csv"));
    }

    /// Appended records follow the header as `<timestamp>,<reading>` lines.
    #[rstest]
    fn append_record_format() {
        let dir = tempdir().unwrap();
        let mut sink = LogSink::create(dir.path()).unwrap();
        sink.append("+1.234500E+01").unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Time, CounterData");

        let (ts, reading) = lines[1].split_once(',').unwrap();
        assert_eq!(reading, "+1.234500E+01");
        // Timestamp must parse back in the logged format.
        chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f").unwrap();
    }

    /// The first write after UTC midnight renames the file with the ended day's date and starts a
    /// fresh, headerless file at the original path.
    #[rstest]
    fn rollover_at_utc_midnight() {
        let dir = tempdir().unwrap();
        let mut sink = LogSink::create(dir.path()).unwrap();
        sink.current_day = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        sink.append_at(day(2026, 8, 27, 23), "+1.0E+00").unwrap();
        sink.append_at(day(2026, 8, 28, 0), "+2.0E+00").unwrap();

        let rotated = dir
            .path()
            .join("logs/counterLog.001.csv.2026-08-27");
        let rotated_content = fs::read_to_string(&rotated).unwrap();
        assert!(rotated_content.starts_with("Time, CounterData\n"));
        assert!(rotated_content.contains(",+1.0E+00\n"));

        let fresh_content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = fresh_content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(",+2.0E+00"));
    }

    /// Writes within the same UTC day never rotate.
    #[rstest]
    fn no_rollover_within_day() {
        let dir = tempdir().unwrap();
        let mut sink = LogSink::create(dir.path()).unwrap();
        sink.current_day = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        sink.append_at(day(2026, 8, 27, 1), "+1.0E+00").unwrap();
        sink.append_at(day(2026, 8, 27, 23), "+2.0E+00").unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
