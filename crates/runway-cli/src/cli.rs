//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runway_core::{Cycle, YearMonth};

/// Runway - See how far your money goes
#[derive(Parser)]
#[command(name = "runway")]
#[command(about = "Recurring-cost calendar and financial projections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "runway.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set RUNWAY_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Treat this month (YYYY-MM) as the current month
    #[arg(long, global = true)]
    pub month: Option<YearMonth>,

    /// Workspace ID (defaults to the first workspace)
    #[arg(short, long, global = true)]
    pub workspace: Option<i64>,

    /// Engine config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and default workspace
    Init,

    /// Manage workspaces
    Workspace {
        #[command(subcommand)]
        action: Option<WorkspaceAction>,
    },

    /// Manage recurring costs
    Costs {
        #[command(subcommand)]
        action: Option<CostsAction>,
    },

    /// Manage one-off costs on the timeline
    OneOff {
        #[command(subcommand)]
        action: Option<OneOffAction>,
    },

    /// Show the rolling balance timeline
    Overview {
        /// Itemize the month at this offset from the current month
        #[arg(short, long)]
        detail: Option<u32>,
    },

    /// Show trailing surplus statistics
    Surplus,

    /// Show the multi-year wealth forecast
    Forecast,

    /// Show or edit the wealth forecast profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Safe-to-spend ledger for the current month
    Spend {
        #[command(subcommand)]
        action: Option<SpendAction>,
    },
}

#[derive(Subcommand)]
pub enum WorkspaceAction {
    /// List workspaces
    List,
    /// Create a workspace
    Add {
        /// Workspace name
        name: String,
    },
    /// Set the workspace balances (minor units, e.g. cents)
    SetBalance {
        /// Starting balance of the timeline
        #[arg(long, allow_hyphen_values = true)]
        current: Option<i64>,
        /// Checking account balance for safe-to-spend
        #[arg(long, allow_hyphen_values = true)]
        checking: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum CostsAction {
    /// List recurring costs grouped by cycle
    List,
    /// Add a recurring cost
    Add {
        /// Cost name
        name: String,
        /// Signed amount in minor units (negative = expense)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
        /// Billing cycle: monthly, quarterly, half-yearly, yearly
        #[arg(short, long, default_value = "monthly")]
        cycle: Cycle,
        /// First due month of the year (1-12, limited by cycle)
        #[arg(short = 'm', long, default_value = "1")]
        due_month: u32,
        /// First month the cost applies (YYYY-MM)
        #[arg(long)]
        from: Option<YearMonth>,
        /// Last month the cost applies (YYYY-MM)
        #[arg(long)]
        to: Option<YearMonth>,
        /// Mark as a saving contribution or extraction
        #[arg(long)]
        saving: bool,
    },
    /// Delete a recurring cost
    Delete {
        /// Cost ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum OneOffAction {
    /// List one-off costs
    List,
    /// Add a one-off cost
    Add {
        /// Cost name
        name: String,
        /// Signed amount in minor units (negative = expense)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
        /// Month the cost is due (YYYY-MM)
        #[arg(long)]
        due: YearMonth,
        /// Mark as a saving contribution or extraction
        #[arg(long)]
        saving: bool,
    },
    /// Delete a one-off cost
    Delete {
        /// Cost ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile (defaults if none is saved)
    Show,
    /// Update profile fields; omitted fields keep their current value
    Set {
        /// Current tracked wealth
        #[arg(long)]
        wealth: Option<f64>,
        /// Forecast length in years (1-100)
        #[arg(long)]
        years: Option<u32>,
        /// Worst-case annual rate in percent
        #[arg(long, allow_hyphen_values = true)]
        worst: Option<f64>,
        /// Average-case annual rate in percent
        #[arg(long, allow_hyphen_values = true)]
        average: Option<f64>,
        /// Best-case annual rate in percent
        #[arg(long, allow_hyphen_values = true)]
        best: Option<f64>,
    },
}

#[derive(Subcommand)]
pub enum SpendAction {
    /// Show the ledger for the current month
    Show,
    /// Set the checking account balance (minor units)
    Balance {
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
    /// Include a recurring cost in this month's ledger
    Include { id: i64 },
    /// Exclude a recurring cost from this month's ledger
    Exclude { id: i64 },
    /// Mark an included recurring cost as paid
    Paid { id: i64 },
    /// Mark an included recurring cost as pending again
    Pending { id: i64 },
    /// Add a pending one-off cost to this month
    Add {
        /// Cost name
        name: String,
        /// Signed amount in minor units (negative = expense)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
    /// Remove a pending one-off cost
    Remove { id: i64 },
    /// Mark a pending one-off cost as paid
    PaidOneOff { id: i64 },
    /// Mark a one-off cost as pending again
    PendingOneOff { id: i64 },
}
