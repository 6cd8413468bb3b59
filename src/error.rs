use thiserror::Error;
use tracing::{error, warn};

use crate::toolkit::NativeWindowId;
use crate::windows::WindowKey;

/// Failures reported by a native window toolkit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolkitError {
    #[error("Native window construction failed: {0}")]
    Construction(String),

    #[error("Unknown native window: {0:?}")]
    UnknownWindow(NativeWindowId),
}

/// Domain-specific errors for the window registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Toolkit(#[from] ToolkitError),

    #[error("Window registry not initialized. Call init() first.")]
    NotInitialized,

    #[error("No window registered for key {0:?}")]
    UnknownWindow(WindowKey),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the caller doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use window_registry::error::ResultExt;
///
/// // Pre-warming the pool is an optimization; carry on without it
/// registry.create_popup(WindowType::Generic, WindowOptions::default()).log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

/// Panic in debug mode, log error in release mode.
///
/// Use for registry states that can only be reached through a bug:
/// crash during development, degrade gracefully in production.
///
/// ```ignore
/// debug_panic!("Window {:?} reported ready after close", key);
/// ```
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            tracing::error!("IMPOSSIBLE STATE: {}", format_args!($($fmt_arg)*));
        }
    };
}
