//! Structured JSONL logging plus human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (~/.window-registry/logs/window-registry.jsonl) - structured for tooling
//! - **Pretty to stderr** - human-readable for developers
//!
//! # Usage
//!
//! ```rust,ignore
//! use window_registry::logging;
//!
//! // Initialize logging - MUST keep guard alive for duration of program
//! let _guard = logging::init();
//!
//! // Use tracing macros directly
//! tracing::info!(event_type = "window_lifecycle", window_type = "about", "Window shown");
//! ```
//!
//! # JSONL Output Format
//!
//! Each line is a valid JSON object:
//! ```json
//! {"timestamp":"2026-10-19T10:30:45.123Z","level":"INFO","target":"window_registry::windows::registry","fields":{"event_type":"window_lifecycle","window_type":"about","action":"ready","message":"Window about ready"}}
//! ```

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// =============================================================================
// In-memory log buffer for diagnostics display
// =============================================================================

static LOG_BUFFER: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();
const MAX_LOG_LINES: usize = 50;

const LOG_FILE_NAME: &str = "window-registry.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn buffer() -> &'static Mutex<VecDeque<String>> {
    LOG_BUFFER.get_or_init(|| Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)))
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
/// If the log file cannot be opened, only the stderr layer is installed.
pub fn init() -> LoggingGuard {
    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_dir.join(LOG_FILE_NAME);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    let (json_layer, file_guard) = match file {
        Ok(file) => {
            // Non-blocking writer keeps the event thread free of file I/O
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file);

            let json_layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);
            (Some(json_layer), Some(guard))
        }
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            (None, None)
        }
    };

    // A missing file layer is a no-op layer
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init();

    tracing::info!(
        event_type = "app_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Window registry logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Get the log directory path (~/.window-registry/logs/)
fn get_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".window-registry").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("window-registry-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

/// Category-tagged log line. Also lands in the in-memory buffer.
///
/// Prefer tracing macros directly when structured fields matter.
pub fn log(category: &str, message: &str) {
    add_to_buffer(category, message);
    tracing::info!(category = category, "{}", message);
}

fn add_to_buffer(category: &str, message: &str) {
    let mut buf = buffer().lock();
    if buf.len() >= MAX_LOG_LINES {
        buf.pop_front();
    }
    buf.push_back(format!("[{}] {}", category, message));
}

/// Get recent log lines, oldest first
pub fn get_recent_logs() -> Vec<String> {
    buffer().lock().iter().cloned().collect()
}

/// Get the last N log lines, newest first
pub fn get_last_logs(n: usize) -> Vec<String> {
    buffer().lock().iter().rev().take(n).cloned().collect()
}

// =============================================================================
// STRUCTURED LOGGING HELPERS
// =============================================================================

/// Log a window lifecycle transition with structured fields
pub fn log_window_event(window_type: &str, key: u64, action: &str) {
    add_to_buffer("WINDOW", &window_event_line(window_type, key, action));

    tracing::info!(
        event_type = "window_lifecycle",
        window_type = window_type,
        key = key,
        action = action,
        "Window {} {}", window_type, action
    );
}

fn window_event_line(window_type: &str, key: u64, action: &str) -> String {
    format!("{} {} (key={})", action, window_type, key)
}

/// Log an error with structured fields and context
pub fn log_error(category: &str, error: &str, context: Option<&str>) {
    let msg = match context {
        Some(ctx) => format!("{}: {} (context: {})", category, error, ctx),
        None => format!("{}: {}", category, error),
    };
    add_to_buffer("ERROR", &msg);

    tracing::error!(
        event_type = "error",
        category = category,
        error_message = error,
        context = context,
        "{}", msg
    );
}
