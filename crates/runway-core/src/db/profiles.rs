//! Wealth profile operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::profile::WealthProfile;

impl Database {
    pub fn get_wealth_profile(&self, workspace_id: i64) -> Result<WealthProfile> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT current_wealth, forecast_duration_years, rate_worst_case, rate_average_case, rate_best_case
             FROM wealth_profiles WHERE workspace_id = ?",
            params![workspace_id],
            |row| {
                Ok(WealthProfile {
                    current_wealth: row.get(0)?,
                    forecast_duration_years: row.get(1)?,
                    rate_worst_case: row.get(2)?,
                    rate_average_case: row.get(3)?,
                    rate_best_case: row.get(4)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| {
            Error::NotFound(format!("Wealth profile for workspace {} not found", workspace_id))
        })
    }

    /// Insert or replace the profile; validation is the caller's job
    pub fn upsert_wealth_profile(&self, workspace_id: i64, profile: &WealthProfile) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO wealth_profiles
                (workspace_id, current_wealth, forecast_duration_years, rate_worst_case, rate_average_case, rate_best_case)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(workspace_id) DO UPDATE SET
                current_wealth = excluded.current_wealth,
                forecast_duration_years = excluded.forecast_duration_years,
                rate_worst_case = excluded.rate_worst_case,
                rate_average_case = excluded.rate_average_case,
                rate_best_case = excluded.rate_best_case,
                updated_at = CURRENT_TIMESTAMP",
            params![
                workspace_id,
                profile.current_wealth,
                profile.forecast_duration_years,
                profile.rate_worst_case,
                profile.rate_average_case,
                profile.rate_best_case,
            ],
        )?;
        Ok(())
    }
}
