//! Safe-to-spend command implementations
//!
//! Every mutating command prints the refreshed ledger afterwards.

use anyhow::Result;
use runway_core::{Database, SpendLedger};

use super::{format_money, print_json, truncate, Session};

fn ledger(session: &Session) -> SpendLedger<'_, Database> {
    SpendLedger::new(&session.db, session.clock.as_ref())
}

pub fn cmd_spend_show(session: &Session) -> Result<()> {
    let snapshot = ledger(session).snapshot(session.workspace_id)?;

    if session.json {
        return print_json(&snapshot);
    }

    println!();
    println!("💳 Safe to Spend – {}", snapshot.current_month);
    println!("   ─────────────────────────────────────────────");
    println!("   Checking balance: {:>12}", format_money(snapshot.checking_balance));
    println!("   Pending:          {:>12}", format_money(snapshot.pending_total));
    println!("   Safe to spend:    {:>12}", format_money(snapshot.safe_to_spend));

    if !snapshot.included_fixed_costs.is_empty() {
        println!();
        println!("   Included recurring costs");
        for cost in &snapshot.included_fixed_costs {
            println!(
                "   {} #{:<4} {:20} │ {:>10}",
                if cost.is_paid { "✅" } else { "⏳" },
                cost.id,
                truncate(&cost.name, 20),
                format_money(cost.amount)
            );
        }
    }

    if !snapshot.excluded_fixed_costs.is_empty() {
        println!();
        println!("   Excluded recurring costs");
        for cost in &snapshot.excluded_fixed_costs {
            println!(
                "   🚫 #{:<4} {:20} │ {:>10}",
                cost.id,
                truncate(&cost.name, 20),
                format_money(cost.amount)
            );
        }
    }

    if !snapshot.one_time_costs.is_empty() {
        println!();
        println!("   One-time costs");
        for cost in &snapshot.one_time_costs {
            println!(
                "   {} #{:<4} {:20} │ {:>10}",
                if cost.is_paid { "✅" } else { "⏳" },
                cost.id,
                truncate(&cost.name, 20),
                format_money(cost.amount)
            );
        }
    }

    Ok(())
}

pub fn cmd_spend_balance(session: &Session, amount: i64) -> Result<()> {
    ledger(session).update_balance(session.workspace_id, amount)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_include(session: &Session, id: i64) -> Result<()> {
    let ledger = ledger(session);
    ledger.ensure_initialized(session.workspace_id, ledger.current_month())?;
    ledger.include(session.workspace_id, id)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_exclude(session: &Session, id: i64) -> Result<()> {
    let ledger = ledger(session);
    ledger.ensure_initialized(session.workspace_id, ledger.current_month())?;
    ledger.exclude(session.workspace_id, id)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_paid(session: &Session, id: i64) -> Result<()> {
    let ledger = ledger(session);
    ledger.ensure_initialized(session.workspace_id, ledger.current_month())?;
    ledger.mark_paid(session.workspace_id, id)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_pending(session: &Session, id: i64) -> Result<()> {
    let ledger = ledger(session);
    ledger.ensure_initialized(session.workspace_id, ledger.current_month())?;
    ledger.mark_pending(session.workspace_id, id)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_add(session: &Session, name: &str, amount: i64) -> Result<()> {
    ledger(session).add_one_off(session.workspace_id, name, amount)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_remove(session: &Session, id: i64) -> Result<()> {
    ledger(session).delete_one_off(session.workspace_id, id)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_one_off_paid(session: &Session, id: i64) -> Result<()> {
    ledger(session).mark_one_off_paid(session.workspace_id, id)?;
    cmd_spend_show(session)
}

pub fn cmd_spend_one_off_pending(session: &Session, id: i64) -> Result<()> {
    ledger(session).mark_one_off_pending(session.workspace_id, id)?;
    cmd_spend_show(session)
}
