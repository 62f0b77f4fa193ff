//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_config)
//! - `profile` - Declared balance and salary
//! - `ledger` - Manual records and the cash-flow listing
//! - `import` - CSV import
//! - `analysis` - Forecasts, risk, expenses, insights, data sufficiency
//! - `status` - Database status

pub mod analysis;
pub mod core;
pub mod import;
pub mod ledger;
pub mod profile;
pub mod status;

// Re-export command functions for main.rs
pub use analysis::*;
pub use core::*;
pub use import::*;
pub use ledger::*;
pub use profile::*;
pub use status::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
