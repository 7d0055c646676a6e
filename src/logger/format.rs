//! Log formatting and console output with ANSI colors
//!
//! Handles colorized output with aligned tag and level columns, and
//! broken-pipe safety for piped invocations.

use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::Colorize;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 9;
const LEVEL_WIDTH: usize = 7;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let time = Local::now().format("%H:%M:%S").to_string();

    let tag_str = format!("{:<width$}", tag.as_str(), width = TAG_WIDTH)
        .color(tag.color())
        .to_string();
    let level_str = format_level(level);

    let line = format!("{} [{}] [{}] {}", time.dimmed(), tag_str, level_str, message);
    print_stdout_safe(&line);
}

fn format_level(level: LogLevel) -> String {
    let padded = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => padded.red().bold().to_string(),
        LogLevel::Warning => padded.yellow().to_string(),
        LogLevel::Info => padded.green().to_string(),
        LogLevel::Debug => padded.cyan().to_string(),
        LogLevel::Verbose => padded.dimmed().to_string(),
    }
}

/// Print a line, swallowing broken-pipe errors (e.g. `yieldbot | head`)
fn print_stdout_safe(line: &str) {
    let mut out = stdout();
    if let Err(e) = writeln!(out, "{}", line) {
        if e.kind() != ErrorKind::BrokenPipe {
            eprintln!("{}", line);
        }
    }
}
