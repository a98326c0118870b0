//! File logging for the CLI
//!
//! The subscriber writes to `{data_dir}/salesperf.log`, which is trimmed to
//! its most recent entries before each run once it grows too large.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing::level_filters::ParseLevelFilterError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "salesperf.log";

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Trim the log to its last `keep` bytes once it grows past `max`.
/// Returns whether the file was rotated.
fn rotate_log(log_path: &Path, max: u64, keep: u64) -> io::Result<bool> {
    if !log_path.exists() {
        return Ok(false);
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= max {
        return Ok(false);
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(keep)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Start on a line boundary
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(&buffer[skip..])?;

    Ok(true)
}

/// Filter directives for `level`: our own crates at `level`, the engine at
/// `warn` unless `level` is more verbose than that
fn filter_directives(level: &str) -> Result<String, ParseLevelFilterError> {
    let app = level.trim().parse::<LevelFilter>()?;
    let engine = app.max(LevelFilter::WARN);
    Ok(format!("salesperf={app},salesperf_core={engine}"))
}

/// Rotate and open `{data_dir}/salesperf.log` for appending.
///
/// A failed rotation is not fatal; the error is handed back so it can be
/// logged once the subscriber is up.
fn open_log_file(data_dir: &Path) -> io::Result<(PathBuf, File, Option<io::Error>)> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE_NAME);
    let rotation_error = rotate_log(&log_path, MAX_LOG_SIZE, KEEP_SIZE).err();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    Ok((log_path, file, rotation_error))
}

/// Send `tracing` output for this run to the data directory's log file.
///
/// `RUST_LOG` takes precedence over `level`. Stdout stays reserved for the
/// rendered report.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    let directives =
        filter_directives(level).wrap_err_with(|| format!("Invalid log level '{level}'"))?;
    let (log_path, file, rotation_error) = open_log_file(data_dir)
        .wrap_err_with(|| format!("Failed to open log file in {}", data_dir.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    if let Some(e) = rotation_error {
        tracing::warn!(error = %e, "log rotation failed, appending to the full file");
    }
    tracing::debug!(log_path = %log_path.display(), "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "line 1\nline 2\n").unwrap();

        assert!(!rotate_log(&path, 1024, 16).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "line 1\nline 2\n");
    }

    #[test]
    fn test_rotation_keeps_whole_recent_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let content: String = (0..50).map(|i| format!("entry {i:03}\n")).collect();
        fs::write(&path, &content).unwrap();

        assert!(rotate_log(&path, 100, 30).unwrap());

        let rotated = fs::read_to_string(&path).unwrap();
        let body = rotated
            .strip_prefix(std::str::from_utf8(ROTATION_MARKER).unwrap())
            .unwrap();
        assert!(body.ends_with("entry 049\n"));
        assert!(body.lines().all(|line| line.starts_with("entry ")));
        assert!(body.len() <= 30);
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(
            filter_directives("info").unwrap(),
            "salesperf=info,salesperf_core=warn"
        );
        assert_eq!(
            filter_directives(" DEBUG ").unwrap(),
            "salesperf=debug,salesperf_core=debug"
        );
        assert_eq!(
            filter_directives("error").unwrap(),
            "salesperf=error,salesperf_core=warn"
        );
        assert!(filter_directives("chatty").is_err());
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("nested").join(".salesperf");

        let (path, _file, rotation_error) = open_log_file(&data_dir).unwrap();
        assert_eq!(path, data_dir.join(LOG_FILE_NAME));
        assert!(path.exists());
        assert!(rotation_error.is_none());
    }

    #[test]
    fn test_missing_log_is_not_an_error() {
        let dir = tempdir().unwrap();
        assert!(!rotate_log(&dir.path().join("absent.log"), 10, 5).unwrap());
    }
}
