//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and the shared `Session` (database, workspace, clock, config)
//! - `workspace` - Workspace listing and balances
//! - `costs` - Recurring and one-off cost management
//! - `overview` - Balance timeline and surplus statistics
//! - `forecast` - Wealth forecast
//! - `profile` - Wealth profile editing
//! - `spend` - Safe-to-spend ledger

pub mod core;
pub mod costs;
pub mod forecast;
pub mod overview;
pub mod profile;
pub mod spend;
pub mod workspace;

// Re-export command functions for main.rs
pub use self::core::*;
pub use costs::*;
pub use forecast::*;
pub use overview::*;
pub use profile::*;
pub use spend::*;
pub use workspace::*;

use anyhow::Result;
use serde::Serialize;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format minor currency units, e.g. -123456 -> "-1234.56"
pub fn format_money(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
