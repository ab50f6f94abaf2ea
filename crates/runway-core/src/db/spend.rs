//! Safe-to-spend ledger operations: payment inclusions and pending one-offs

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{decode_datetime, decode_month, Database};
use crate::calendar::YearMonth;
use crate::costs::{PaymentInclusion, PendingOneOff};
use crate::error::{Error, Result};

fn decode_paid_at(raw: Option<String>, fixed_cost_id: i64, month: YearMonth) -> Result<Option<DateTime<Utc>>> {
    raw.map(|raw| {
        decode_datetime(
            &raw,
            &format!("inclusion of fixed cost {} in {}", fixed_cost_id, month),
        )
    })
    .transpose()
}

fn inclusion_not_found(fixed_cost_id: i64, month: YearMonth) -> Error {
    Error::NotFound(format!(
        "Fixed cost {} is not included for {}",
        fixed_cost_id, month
    ))
}

impl Database {
    // ========== Payment Inclusions ==========

    pub fn list_inclusions(&self, workspace_id: i64, month: YearMonth) -> Result<Vec<PaymentInclusion>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT fixed_cost_id, is_paid, paid_at FROM payment_inclusions
             WHERE workspace_id = ? AND month = ? ORDER BY fixed_cost_id",
        )?;

        let rows = stmt
            .query_map(params![workspace_id, month.to_db_string()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(fixed_cost_id, is_paid, paid_at)| {
                Ok(PaymentInclusion {
                    workspace_id,
                    fixed_cost_id,
                    month,
                    is_paid,
                    paid_at: decode_paid_at(paid_at, fixed_cost_id, month)?,
                })
            })
            .collect()
    }

    pub fn count_inclusions(&self, workspace_id: i64, month: YearMonth) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM payment_inclusions WHERE workspace_id = ? AND month = ?",
            params![workspace_id, month.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    pub fn get_inclusion(
        &self,
        workspace_id: i64,
        fixed_cost_id: i64,
        month: YearMonth,
    ) -> Result<PaymentInclusion> {
        let conn = self.conn()?;
        let (is_paid, paid_at) = conn
            .query_row(
                "SELECT is_paid, paid_at FROM payment_inclusions
                 WHERE workspace_id = ? AND fixed_cost_id = ? AND month = ?",
                params![workspace_id, fixed_cost_id, month.to_db_string()],
                |row| Ok((row.get::<_, bool>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?
            .ok_or_else(|| inclusion_not_found(fixed_cost_id, month))?;

        Ok(PaymentInclusion {
            workspace_id,
            fixed_cost_id,
            month,
            is_paid,
            paid_at: decode_paid_at(paid_at, fixed_cost_id, month)?,
        })
    }

    /// Insert unless the (workspace, cost, month) key exists; true if inserted
    pub fn create_inclusion(&self, inclusion: &PaymentInclusion) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO payment_inclusions (workspace_id, fixed_cost_id, month, is_paid, paid_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                inclusion.workspace_id,
                inclusion.fixed_cost_id,
                inclusion.month.to_db_string(),
                inclusion.is_paid,
                inclusion.paid_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(inserted > 0)
    }

    pub fn update_inclusion(&self, inclusion: &PaymentInclusion) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE payment_inclusions SET is_paid = ?, paid_at = ?
             WHERE workspace_id = ? AND fixed_cost_id = ? AND month = ?",
            params![
                inclusion.is_paid,
                inclusion.paid_at.map(|t| t.to_rfc3339()),
                inclusion.workspace_id,
                inclusion.fixed_cost_id,
                inclusion.month.to_db_string(),
            ],
        )?;
        if updated == 0 {
            return Err(inclusion_not_found(inclusion.fixed_cost_id, inclusion.month));
        }
        Ok(())
    }

    pub fn delete_inclusion(&self, workspace_id: i64, fixed_cost_id: i64, month: YearMonth) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM payment_inclusions WHERE workspace_id = ? AND fixed_cost_id = ? AND month = ?",
            params![workspace_id, fixed_cost_id, month.to_db_string()],
        )?;
        if deleted == 0 {
            return Err(inclusion_not_found(fixed_cost_id, month));
        }
        Ok(())
    }

    // ========== Pending One-Off Costs ==========

    pub fn list_pending_one_offs(&self, workspace_id: i64, month: YearMonth) -> Result<Vec<PendingOneOff>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, amount, is_paid, created_at FROM pending_one_offs
             WHERE workspace_id = ? AND month = ? ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![workspace_id, month.to_db_string()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, name, amount, is_paid, created_at)| {
                Ok(PendingOneOff {
                    id,
                    workspace_id,
                    name,
                    amount,
                    month,
                    is_paid,
                    created_at: decode_datetime(&created_at, &format!("pending one-off {}", id))?,
                })
            })
            .collect()
    }

    /// Fetch a pending one-off owned by the workspace
    pub fn get_pending_one_off(&self, workspace_id: i64, id: i64) -> Result<PendingOneOff> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT name, amount, month, is_paid, created_at FROM pending_one_offs
                 WHERE id = ? AND workspace_id = ?",
                params![id, workspace_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, bool>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((name, amount, month, is_paid, created_at)) = row else {
            return Err(Error::NotFound(format!("One-time cost {} not found", id)));
        };

        let context = format!("pending one-off {}", id);
        Ok(PendingOneOff {
            id,
            workspace_id,
            name,
            amount,
            month: decode_month(&month, &context)?,
            is_paid,
            created_at: decode_datetime(&created_at, &context)?,
        })
    }

    pub fn create_pending_one_off(
        &self,
        workspace_id: i64,
        name: &str,
        amount: i64,
        month: YearMonth,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO pending_one_offs (workspace_id, name, amount, month) VALUES (?, ?, ?, ?)",
            params![workspace_id, name, amount, month.to_db_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_pending_one_off(&self, cost: &PendingOneOff) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE pending_one_offs SET name = ?, amount = ?, is_paid = ?
             WHERE id = ? AND workspace_id = ?",
            params![cost.name, cost.amount, cost.is_paid, cost.id, cost.workspace_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("One-time cost {} not found", cost.id)));
        }
        Ok(())
    }

    pub fn delete_pending_one_off(&self, workspace_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM pending_one_offs WHERE id = ? AND workspace_id = ?",
            params![id, workspace_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("One-time cost {} not found", id)));
        }
        Ok(())
    }
}
