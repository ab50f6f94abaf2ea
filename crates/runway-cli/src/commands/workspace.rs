//! Workspace command implementations

use anyhow::{bail, Result};

use super::{format_money, print_json, truncate, Session};

pub fn cmd_workspace_list(session: &Session) -> Result<()> {
    let workspaces = session.db.list_workspaces()?;

    if session.json {
        return print_json(&workspaces);
    }

    println!();
    println!("🗂  Workspaces");
    println!("   ─────────────────────────────────────────────────────");

    for ws in workspaces {
        let marker = if ws.id == session.workspace_id { "▶" } else { " " };
        println!(
            "   {} #{:<3} {:20} │ timeline {:>12} │ checking {:>12}",
            marker,
            ws.id,
            truncate(&ws.name, 20),
            format_money(ws.current_amount),
            format_money(ws.checking_balance)
        );
    }

    Ok(())
}

pub fn cmd_workspace_add(session: &Session, name: &str) -> Result<()> {
    let id = session.db.create_workspace(name)?;
    println!("✅ Workspace '{}' created (ID: {})", name.trim(), id);
    println!("   Use it with: runway --workspace {} overview", id);
    Ok(())
}

pub fn cmd_workspace_set_balance(
    session: &Session,
    current: Option<i64>,
    checking: Option<i64>,
) -> Result<()> {
    if current.is_none() && checking.is_none() {
        bail!("Nothing to update: pass --current and/or --checking");
    }

    if let Some(amount) = current {
        session.db.update_current_amount(session.workspace_id, amount)?;
        println!("✅ Timeline starting balance set to {}", format_money(amount));
    }
    if let Some(amount) = checking {
        session.db.update_checking_balance(session.workspace_id, amount)?;
        println!("✅ Checking balance set to {}", format_money(amount));
    }

    Ok(())
}
