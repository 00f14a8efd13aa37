#![deny(missing_docs)]
//! Shared logging utilities for the grabber workspace.
//!
//! The `grabber_*` macros forward to the `log` facade; `initialize` wires
//! simplelog to a file, the terminal, or both.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./grabber.log";

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! grabber_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! grabber_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! grabber_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! grabber_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to a log file only.
    File(PathBuf),
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both a log file and the terminal.
    Both(PathBuf),
}

impl Default for LogDestination {
    fn default() -> Self {
        LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
    }
}

impl LogDestination {
    /// Log file path, if this destination writes one.
    pub fn file(&self) -> Option<&Path> {
        match self {
            LogDestination::File(path) | LogDestination::Both(path) => Some(path),
            LogDestination::Terminal => None,
        }
    }

    /// Whether records are echoed to stderr.
    pub fn echoes_to_terminal(&self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both(_))
    }
}

/// Install the global logger for `destination` at `level`.
///
/// A log file that cannot be created is reported on stderr and left out. Returns
/// `false` when nothing could be installed.
pub fn initialize(destination: &LogDestination, level: LevelFilter) -> bool {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.echoes_to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if let Some(path) = destination.file() {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Warning: log file {:?} unavailable: {}", path, err),
        }
    }

    !loggers.is_empty() && CombinedLogger::init(loggers).is_ok()
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_destination_is_the_working_directory_log_file() {
        assert_eq!(
            LogDestination::default(),
            LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
        );
    }

    #[test]
    fn destinations_expose_their_sinks() {
        let path = PathBuf::from("run.log");
        assert_eq!(LogDestination::File(path.clone()).file(), Some(path.as_path()));
        assert!(!LogDestination::File(path.clone()).echoes_to_terminal());
        assert_eq!(LogDestination::Terminal.file(), None);
        assert!(LogDestination::Both(path).echoes_to_terminal());
    }

    #[test]
    fn unwritable_log_file_installs_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing").join("grabber.log");
        assert!(!initialize(&LogDestination::File(path), LevelFilter::Info));
    }
}
