//! Recurring and one-off cost operations

use rusqlite::params;
use tracing::warn;

use super::{decode_month, decode_optional_month, Database};
use crate::costs::{NewOneOffCost, NewRecurringCost, OneOffCost, RecurringCost, Schedule};
use crate::error::{Error, Result};

/// Recurring cost row before cycle and month validation
struct RecurringRow {
    id: i64,
    workspace_id: i64,
    name: String,
    amount: i64,
    valid_from: Option<String>,
    valid_to: Option<String>,
    cycle: String,
    due_month: i64,
    is_saving: bool,
}

impl RecurringRow {
    fn into_cost(self) -> Result<RecurringCost> {
        let context = format!("recurring cost {}", self.id);
        let cycle = self
            .cycle
            .parse()
            .map_err(|e: String| Error::Integrity(format!("{}: {}", context, e)))?;
        let due_month = u32::try_from(self.due_month).map_err(|_| {
            Error::Integrity(format!("{}: illegal due month {}", context, self.due_month))
        })?;
        let schedule = Schedule::new(cycle, due_month)
            .map_err(|e| Error::Integrity(format!("{}: {}", context, e)))?;

        Ok(RecurringCost {
            id: self.id,
            workspace_id: self.workspace_id,
            name: self.name,
            amount: self.amount,
            from: decode_optional_month(self.valid_from.as_deref(), &context)?,
            to: decode_optional_month(self.valid_to.as_deref(), &context)?,
            schedule,
            is_saving: self.is_saving,
        })
    }
}

impl Database {
    /// Insert a validated recurring cost
    pub fn create_recurring_cost(&self, workspace_id: i64, cost: &NewRecurringCost) -> Result<i64> {
        cost.validate()?;
        self.get_workspace(workspace_id)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO recurring_costs
                (workspace_id, name, amount, valid_from, valid_to, cycle, due_month, is_saving)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                workspace_id,
                cost.name.trim(),
                cost.amount,
                cost.from.map(|ym| ym.to_db_string()),
                cost.to.map(|ym| ym.to_db_string()),
                cost.schedule.cycle().as_str(),
                cost.schedule.due_month(),
                cost.is_saving,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Load every recurring cost of a workspace.
    ///
    /// A row with an unknown cycle, an illegal seed month or a malformed
    /// window bound fails the whole load with `Error::Integrity`.
    pub fn load_recurring_costs(&self, workspace_id: i64) -> Result<Vec<RecurringCost>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, workspace_id, name, amount, valid_from, valid_to, cycle, due_month, is_saving
             FROM recurring_costs WHERE workspace_id = ? ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![workspace_id], |row| {
                Ok(RecurringRow {
                    id: row.get(0)?,
                    workspace_id: row.get(1)?,
                    name: row.get(2)?,
                    amount: row.get(3)?,
                    valid_from: row.get(4)?,
                    valid_to: row.get(5)?,
                    cycle: row.get(6)?,
                    due_month: row.get(7)?,
                    is_saving: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_cost().inspect_err(|e| {
                    warn!(workspace_id, id, "Rejecting stored recurring cost: {}", e);
                })
            })
            .collect()
    }

    pub fn delete_recurring_cost(&self, workspace_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM recurring_costs WHERE id = ? AND workspace_id = ?",
            params![id, workspace_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Recurring cost {} not found", id)));
        }
        Ok(())
    }

    /// Insert a validated one-off cost
    pub fn create_one_off_cost(&self, workspace_id: i64, cost: &NewOneOffCost) -> Result<i64> {
        cost.validate()?;
        self.get_workspace(workspace_id)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO one_off_costs (workspace_id, name, amount, due, is_saving)
             VALUES (?, ?, ?, ?, ?)",
            params![
                workspace_id,
                cost.name.trim(),
                cost.amount,
                cost.due.to_db_string(),
                cost.is_saving,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn load_one_off_costs(&self, workspace_id: i64) -> Result<Vec<OneOffCost>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, workspace_id, name, amount, due, is_saving
             FROM one_off_costs WHERE workspace_id = ? ORDER BY due, id",
        )?;

        let rows = stmt
            .query_map(params![workspace_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, bool>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, workspace_id, name, amount, due, is_saving)| {
                Ok(OneOffCost {
                    id,
                    workspace_id,
                    name,
                    amount,
                    due: decode_month(&due, &format!("one-off cost {}", id))?,
                    is_saving,
                })
            })
            .collect()
    }

    pub fn delete_one_off_cost(&self, workspace_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM one_off_costs WHERE id = ? AND workspace_id = ?",
            params![id, workspace_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("One-off cost {} not found", id)));
        }
        Ok(())
    }
}
