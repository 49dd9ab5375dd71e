use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging for the host application.
///
/// Detection diagnostics (rejected hosts, failed IDN conversions) are emitted
/// as `WARN` events through [`crate::diagnostics::TracingSink`], so they only
/// show up once a subscriber is installed.
///
/// - Filtering comes from `RUST_LOG` (defaults to "info").
/// - JSON output with flattened events when stdout is not a terminal.
pub fn init_logging() {
    init_logging_with(default_log_mode());
}

/// Installs the global subscriber in the given mode. Panics if one is
/// already installed.
///
/// ```no_run
/// use baseurl_core::logging::{LogMode, init_logging_with};
///
/// init_logging_with(LogMode::Raw);
/// ```
pub fn init_logging_with(mode: LogMode) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match mode {
        LogMode::Raw => fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .init(),
        LogMode::Pretty => fmt().with_env_filter(filter).pretty().init(),
    }
}

pub fn default_log_mode() -> LogMode {
    if io::stdout().is_terminal() {
        LogMode::Pretty
    } else {
        LogMode::Raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Raw,
    Pretty,
}
