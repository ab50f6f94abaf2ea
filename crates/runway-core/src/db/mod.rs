//! SQLite store with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `workspaces` - Workspaces and their balances
//! - `costs` - Recurring and one-off costs
//! - `profiles` - Wealth forecast profiles
//! - `spend` - Safe-to-spend inclusions and pending one-off costs

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{info, warn};

use crate::calendar::YearMonth;
use crate::costs::{OneOffCost, PaymentInclusion, PendingOneOff, RecurringCost};
use crate::error::{Error, Result};
use crate::profile::WealthProfile;
use crate::store::{FinanceStore, Workspace};

mod costs;
mod profiles;
mod spend;
mod workspaces;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "RUNWAY_DB_KEY";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this invalidates every existing encrypted database
    const APP_SALT: &[u8; 16] = b"runway-salt-v1-x";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Decode a stored timestamp, mapping bad data to an integrity fault.
///
/// Accepts RFC 3339 and the "YYYY-MM-DD HH:MM:SS" form of `CURRENT_TIMESTAMP`.
pub(crate) fn decode_datetime(raw: &str, context: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .map_err(|e| {
            warn!("{}: unreadable timestamp {:?}", context, raw);
            Error::Integrity(format!("{}: bad timestamp {:?}: {}", context, raw, e))
        })
}

/// Decode a stored month column, mapping bad data to an integrity fault
pub(crate) fn decode_month(raw: &str, context: &str) -> Result<YearMonth> {
    match YearMonth::from_db_str(raw) {
        Ok(Some(ym)) => Ok(ym),
        Ok(None) => Err(Error::Integrity(format!("{}: missing month", context))),
        Err(e) => Err(Error::Integrity(format!("{}: {}", context, e))),
    }
}

/// Decode an optional stored month column (NULL and "" are both "no bound")
pub(crate) fn decode_optional_month(raw: Option<&str>, context: &str) -> Result<Option<YearMonth>> {
    match raw {
        None => Ok(None),
        Some(raw) => YearMonth::from_db_str(raw)
            .map_err(|e| Error::Integrity(format!("{}: {}", context, e))),
    }
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool with encryption
    ///
    /// Requires `RUNWAY_DB_KEY` environment variable to be set.
    /// Returns an error if it is not; use `new_unencrypted()` for local testing.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV).ok() {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases.",
                DB_KEY_ENV
            ))),
        }
    }

    /// Create a new unencrypted database connection pool
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Create a new database with an explicit encryption key
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let key_pragma = match passphrase {
            Some(pass) => format!("PRAGMA key = 'x\"{}\"';", derive_key(pass)?),
            None => String::new(),
        };

        // Every pooled connection needs the key and foreign key enforcement
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            if !key_pragma.is_empty() {
                conn.execute_batch(&key_pragma)?;
            }
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because every pooled
    /// connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "runway_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().to_string();

        let _ = std::fs::remove_file(&path);

        Self::new_unencrypted(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS workspaces (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                current_amount INTEGER NOT NULL DEFAULT 0,
                checking_balance INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Months are stored as "YYYY MM"; NULL bounds are open
            CREATE TABLE IF NOT EXISTS recurring_costs (
                id INTEGER PRIMARY KEY,
                workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL,
                valid_from TEXT,
                valid_to TEXT,
                cycle TEXT NOT NULL,
                due_month INTEGER NOT NULL,
                is_saving INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_recurring_costs_workspace ON recurring_costs(workspace_id);

            CREATE TABLE IF NOT EXISTS one_off_costs (
                id INTEGER PRIMARY KEY,
                workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL,
                due TEXT NOT NULL,
                is_saving INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_one_off_costs_workspace ON one_off_costs(workspace_id);

            CREATE TABLE IF NOT EXISTS wealth_profiles (
                workspace_id INTEGER PRIMARY KEY REFERENCES workspaces(id) ON DELETE CASCADE,
                current_wealth REAL NOT NULL,
                forecast_duration_years INTEGER NOT NULL,
                rate_worst_case REAL NOT NULL,
                rate_average_case REAL NOT NULL,
                rate_best_case REAL NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- A row means the cost is included in safe-to-spend for that month
            CREATE TABLE IF NOT EXISTS payment_inclusions (
                id INTEGER PRIMARY KEY,
                workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
                fixed_cost_id INTEGER NOT NULL REFERENCES recurring_costs(id) ON DELETE CASCADE,
                month TEXT NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 0,
                paid_at TEXT,
                UNIQUE (workspace_id, fixed_cost_id, month)
            );

            CREATE INDEX IF NOT EXISTS idx_payment_inclusions_month ON payment_inclusions(workspace_id, month);

            CREATE TABLE IF NOT EXISTS pending_one_offs (
                id INTEGER PRIMARY KEY,
                workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL,
                month TEXT NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_pending_one_offs_month ON pending_one_offs(workspace_id, month);
            "#,
        )?;

        info!("Database schema ready at {}", self.db_path);
        Ok(())
    }
}

impl FinanceStore for Database {
    fn get_workspace(&self, workspace_id: i64) -> Result<Workspace> {
        Database::get_workspace(self, workspace_id)
    }

    fn update_checking_balance(&self, workspace_id: i64, amount: i64) -> Result<()> {
        Database::update_checking_balance(self, workspace_id, amount)
    }

    fn update_current_amount(&self, workspace_id: i64, amount: i64) -> Result<()> {
        Database::update_current_amount(self, workspace_id, amount)
    }

    fn load_recurring_costs(&self, workspace_id: i64) -> Result<Vec<RecurringCost>> {
        Database::load_recurring_costs(self, workspace_id)
    }

    fn load_one_off_costs(&self, workspace_id: i64) -> Result<Vec<OneOffCost>> {
        Database::load_one_off_costs(self, workspace_id)
    }

    fn get_wealth_profile(&self, workspace_id: i64) -> Result<WealthProfile> {
        Database::get_wealth_profile(self, workspace_id)
    }

    fn upsert_wealth_profile(&self, workspace_id: i64, profile: &WealthProfile) -> Result<()> {
        Database::upsert_wealth_profile(self, workspace_id, profile)
    }

    fn list_inclusions(&self, workspace_id: i64, month: YearMonth) -> Result<Vec<PaymentInclusion>> {
        Database::list_inclusions(self, workspace_id, month)
    }

    fn count_inclusions(&self, workspace_id: i64, month: YearMonth) -> Result<u64> {
        Database::count_inclusions(self, workspace_id, month)
    }

    fn get_inclusion(
        &self,
        workspace_id: i64,
        fixed_cost_id: i64,
        month: YearMonth,
    ) -> Result<PaymentInclusion> {
        Database::get_inclusion(self, workspace_id, fixed_cost_id, month)
    }

    fn create_inclusion(&self, inclusion: &PaymentInclusion) -> Result<bool> {
        Database::create_inclusion(self, inclusion)
    }

    fn update_inclusion(&self, inclusion: &PaymentInclusion) -> Result<()> {
        Database::update_inclusion(self, inclusion)
    }

    fn delete_inclusion(
        &self,
        workspace_id: i64,
        fixed_cost_id: i64,
        month: YearMonth,
    ) -> Result<()> {
        Database::delete_inclusion(self, workspace_id, fixed_cost_id, month)
    }

    fn list_pending_one_offs(
        &self,
        workspace_id: i64,
        month: YearMonth,
    ) -> Result<Vec<PendingOneOff>> {
        Database::list_pending_one_offs(self, workspace_id, month)
    }

    fn get_pending_one_off(&self, workspace_id: i64, id: i64) -> Result<PendingOneOff> {
        Database::get_pending_one_off(self, workspace_id, id)
    }

    fn create_pending_one_off(
        &self,
        workspace_id: i64,
        name: &str,
        amount: i64,
        month: YearMonth,
    ) -> Result<i64> {
        Database::create_pending_one_off(self, workspace_id, name, amount, month)
    }

    fn update_pending_one_off(&self, cost: &PendingOneOff) -> Result<()> {
        Database::update_pending_one_off(self, cost)
    }

    fn delete_pending_one_off(&self, workspace_id: i64, id: i64) -> Result<()> {
        Database::delete_pending_one_off(self, workspace_id, id)
    }
}
