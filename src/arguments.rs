//! Command-line argument handling
//!
//! Arguments are captured once at startup and scanned on demand by the rest
//! of the crate (logger debug gates, runner flags). Keeping the raw argv
//! around makes `--debug-<module>` style flags cheap to add without touching
//! a parser definition.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

static CMD_ARGS: Lazy<RwLock<Vec<String>>> =
    Lazy::new(|| RwLock::new(std::env::args().collect()));

/// Register the process argv. Call once from main before logger::init().
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut current) = CMD_ARGS.write() {
        *current = args;
    }
}

pub fn get_cmd_args() -> Vec<String> {
    CMD_ARGS.read().map(|a| a.clone()).unwrap_or_default()
}

/// Check whether an exact flag is present
pub fn has_arg(flag: &str) -> bool {
    get_cmd_args().iter().any(|a| a == flag)
}

/// Get the value following a flag (`--config path.toml`)
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

pub fn is_quiet_enabled() -> bool {
    has_arg("--quiet")
}

pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose")
}

pub fn is_debug_all_enabled() -> bool {
    has_arg("--debug-all")
}

/// Collect all `--debug-<module>` keys present on the command line
pub fn get_debug_keys() -> HashSet<String> {
    get_cmd_args()
        .iter()
        .filter_map(|a| a.strip_prefix("--debug-"))
        .filter(|k| *k != "all")
        .map(|k| k.to_string())
        .collect()
}

/// Dry-run mode: generate and log strategies without executing them
pub fn is_dry_run_enabled() -> bool {
    has_arg("--dry-run")
}

/// One-shot emergency drain mode (optionally scoped with --network)
pub fn is_emergency_exit_enabled() -> bool {
    has_arg("--emergency-exit")
}

pub fn get_network_filter() -> Option<String> {
    get_arg_value("--network")
}

pub fn get_config_path() -> String {
    get_arg_value("--config").unwrap_or_else(|| "yieldbot.toml".to_string())
}

/// Optimization interval override in seconds
pub fn get_interval_override() -> Option<u64> {
    get_arg_value("--interval").and_then(|v| v.parse().ok())
}

pub fn print_help() {
    println!("yieldbot - autonomous yield portfolio rebalancing engine");
    println!();
    println!("USAGE:");
    println!("  yieldbot [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --config <path>       Config file path (default: yieldbot.toml)");
    println!("  --interval <secs>     Override optimization interval");
    println!("  --dry-run             Generate strategies without executing");
    println!("  --emergency-exit      Drain all positions and exit");
    println!("  --network <name>      Scope --emergency-exit to one network");
    println!("  --debug-<module>      Enable debug logs for a module");
    println!("  --debug-all           Enable debug logs for all modules");
    println!("  --verbose             Enable verbose logs");
    println!("  --quiet               Only show warnings and errors");
    println!("  --help                Show this help");
}
