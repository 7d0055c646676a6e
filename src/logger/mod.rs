//! Structured logging with per-module debug gating
//!
//! Provides a tagged, leveled logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via `--debug-<module>` flags
//! - Colored console output
//!
//! ## Usage
//!
//! ```rust
//! use yieldbot::logger::{self, LogTag};
//!
//! logger::info(LogTag::Engine, "Engine initialized");
//! logger::debug(LogTag::Executor, "guard acquired"); // only with --debug-executor
//! ```
//!
//! Call `logger::init()` once at startup, after command-line arguments have
//! been registered with the `arguments` module.

mod format;
mod levels;
mod tags;

pub use levels::LogLevel;
pub use tags::LogTag;

use crate::arguments;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub debug_all: bool,
    pub debug_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_all: false,
            debug_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Initialize the logger from command-line arguments.
///
/// Scans for `--debug-<module>`, `--debug-all`, `--verbose` and `--quiet`.
pub fn init() {
    let mut config = LoggerConfig::default();

    if arguments::is_quiet_enabled() {
        config.min_level = LogLevel::Warning;
    }
    if arguments::is_verbose_enabled() {
        config.min_level = LogLevel::Verbose;
    }
    config.debug_all = arguments::is_debug_all_enabled();
    config.debug_tags = arguments::get_debug_keys();

    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = match LOGGER_CONFIG.read() {
        Ok(c) => c.clone(),
        Err(_) => return true,
    };

    // Errors always log
    if level == LogLevel::Error {
        return true;
    }

    // Debug requires the matching --debug-<module> flag (or --debug-all)
    if level == LogLevel::Debug {
        return config.debug_all || config.debug_tags.contains(tag.to_debug_key());
    }

    level <= config.min_level
}

fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if should_log(&tag, level) {
        format::format_and_log(tag, level, message);
    }
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (gated by --debug-<module>)
pub fn debug(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (gated by --verbose)
pub fn verbose(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Verbose, message);
}
