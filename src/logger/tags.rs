use colored::Color;

/// Log tags identify the subsystem a message originates from.
///
/// Each tag maps to a `--debug-<key>` command-line flag for per-module
/// debug output control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Engine,
    Ledger,
    Strategy,
    Executor,
    Emergency,
    Chain,
    Runner,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Engine => "ENGINE",
            LogTag::Ledger => "LEDGER",
            LogTag::Strategy => "STRATEGY",
            LogTag::Executor => "EXECUTOR",
            LogTag::Emergency => "EMERGENCY",
            LogTag::Chain => "CHAIN",
            LogTag::Runner => "RUNNER",
        }
    }

    /// Key used for `--debug-<key>` argument matching
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Engine => "engine",
            LogTag::Ledger => "ledger",
            LogTag::Strategy => "strategy",
            LogTag::Executor => "executor",
            LogTag::Emergency => "emergency",
            LogTag::Chain => "chain",
            LogTag::Runner => "runner",
        }
    }

    /// Console color for the tag column
    pub fn color(&self) -> Color {
        match self {
            LogTag::System => Color::White,
            LogTag::Config => Color::Cyan,
            LogTag::Engine => Color::Green,
            LogTag::Ledger => Color::Blue,
            LogTag::Strategy => Color::Magenta,
            LogTag::Executor => Color::Yellow,
            LogTag::Emergency => Color::Red,
            LogTag::Chain => Color::BrightBlue,
            LogTag::Runner => Color::BrightGreen,
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
