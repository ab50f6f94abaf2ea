//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `Session` - Everything a command needs to run against one workspace
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use runway_core::{Clock, Database, EngineConfig, FixedClock, SystemClock, YearMonth};
use tracing::debug;

use crate::cli::Cli;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", db_path.display()))?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Database, workspace, clock and engine config for one invocation
pub struct Session {
    pub db: Database,
    pub workspace_id: i64,
    pub clock: Box<dyn Clock>,
    pub config: EngineConfig,
    pub json: bool,
}

impl Session {
    pub fn open(cli: &Cli) -> Result<Self> {
        let db = open_db(&cli.db, cli.no_encrypt)?;

        let config = match &cli.config {
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        }
        .context("Failed to load engine config")?;

        let workspace_id = match cli.workspace {
            Some(id) => {
                db.get_workspace(id)
                    .with_context(|| format!("Unknown workspace {}", id))?;
                id
            }
            None => db
                .ensure_default_workspace()
                .context("Failed to resolve default workspace")?,
        };

        Ok(Self::new(db, workspace_id, cli.month, config, cli.json))
    }

    pub fn new(
        db: Database,
        workspace_id: i64,
        month: Option<YearMonth>,
        config: EngineConfig,
        json: bool,
    ) -> Self {
        let clock: Box<dyn Clock> = match month {
            Some(month) => {
                debug!("Clock pinned to {}", month);
                Box::new(FixedClock::new(month))
            }
            None => Box::new(SystemClock),
        };

        Self {
            db,
            workspace_id,
            clock,
            config,
            json,
        }
    }

    pub fn current_month(&self) -> YearMonth {
        self.clock.current_month()
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    let workspace_id = db
        .ensure_default_workspace()
        .context("Failed to create default workspace")?;
    println!("   Default workspace: #{}", workspace_id);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Set balances: runway workspace set-balance --current 500000 --checking 250000");
    println!("  2. Add costs: runway costs add Rent -120000");
    println!("  3. See the timeline: runway overview");

    Ok(())
}
