//! Workspace operations

use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::costs::validate_name;
use crate::error::{Error, Result};
use crate::store::Workspace;

fn workspace_from_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: row.get(0)?,
        name: row.get(1)?,
        current_amount: row.get(2)?,
        checking_balance: row.get(3)?,
    })
}

impl Database {
    /// Create a workspace with zero balances
    pub fn create_workspace(&self, name: &str) -> Result<i64> {
        validate_name(name)?;
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM workspaces WHERE name = ?",
                params![name.trim()],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(Error::Conflict(format!("Workspace '{}' already exists", name)));
        }

        conn.execute(
            "INSERT INTO workspaces (name) VALUES (?)",
            params![name.trim()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Return the first workspace, creating "Default" if there is none
    pub fn ensure_default_workspace(&self) -> Result<i64> {
        let conn = self.conn()?;
        let first: Option<i64> = conn
            .query_row("SELECT id FROM workspaces ORDER BY id LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match first {
            Some(id) => Ok(id),
            None => {
                conn.execute("INSERT INTO workspaces (name) VALUES ('Default')", [])?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    pub fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, current_amount, checking_balance FROM workspaces ORDER BY id",
        )?;

        let workspaces = stmt
            .query_map([], workspace_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(workspaces)
    }

    pub fn get_workspace(&self, workspace_id: i64) -> Result<Workspace> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, current_amount, checking_balance FROM workspaces WHERE id = ?",
            params![workspace_id],
            workspace_from_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Workspace {} not found", workspace_id)))
    }

    pub fn update_checking_balance(&self, workspace_id: i64, amount: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE workspaces SET checking_balance = ? WHERE id = ?",
            params![amount, workspace_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Workspace {} not found", workspace_id)));
        }
        Ok(())
    }

    pub fn update_current_amount(&self, workspace_id: i64, amount: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE workspaces SET current_amount = ? WHERE id = ?",
            params![amount, workspace_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Workspace {} not found", workspace_id)));
        }
        Ok(())
    }
}
