//! Size-rotated debug log under the OS temp dir.
//!
//! Logging is off until [`init_logging`] enables it, so library users who
//! never opt in pay nothing. Capture warnings are mirrored to stderr because
//! they signal data quality problems the user should see immediately.

use std::{
    env, fs,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_STATE: OnceLock<Mutex<Option<LogWriter>>> = OnceLock::new();

/// Path to the temp log file rotated between runs.
pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("voicepilot.log")
}

struct LogWriter {
    path: PathBuf,
    file: fs::File,
    max_bytes: u64,
    bytes_written: u64,
}

impl LogWriter {
    fn new(path: PathBuf, max_bytes: u64) -> Option<Self> {
        let mut bytes_written = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if bytes_written > max_bytes {
            let _ = fs::remove_file(&path);
            bytes_written = 0;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        Some(Self {
            path,
            file,
            max_bytes,
            bytes_written,
        })
    }

    fn rotate_if_needed(&mut self, next_len: usize) {
        if self.bytes_written.saturating_add(next_len as u64) <= self.max_bytes {
            return;
        }
        if let Ok(file) = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
        {
            self.file = file;
            self.bytes_written = 0;
        }
    }

    fn write_line(&mut self, line: &str) {
        self.rotate_if_needed(line.len());
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.bytes_written = self.bytes_written.saturating_add(line.len() as u64);
        }
    }
}

/// Turn file logging on or off for this process.
pub fn init_logging(enabled: bool) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
}

fn write_log_line(level: &str, msg: &str) {
    let state = LOG_STATE.get_or_init(|| Mutex::new(LogWriter::new(log_file_path(), LOG_MAX_BYTES)));
    let Ok(mut guard) = state.lock() else {
        return;
    };
    let Some(writer) = guard.as_mut() else {
        return;
    };
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    writer.write_line(&format!("{ts}|{level}|{msg}\n"));
}

/// Append a debug line to the log file when logging is enabled.
pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    write_log_line("debug", msg);
}

/// Record a capture warning. Warnings always reach stderr; the file copy
/// follows the same enable gate as debug lines.
pub fn log_warn(msg: &str) {
    eprintln!("warning: {msg}");
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    write_log_line("warn", msg);
}
