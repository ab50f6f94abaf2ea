//! Recurring and one-off cost command implementations

use anyhow::{Context, Result};
use runway_core::{
    CostCatalog, Cycle, NewOneOffCost, NewRecurringCost, RecurringCost, Schedule, YearMonth,
};

use super::{format_money, print_json, truncate, Session};

/// Parsed arguments of `costs add`
pub struct RecurringCostArgs {
    pub name: String,
    pub amount: i64,
    pub cycle: Cycle,
    pub due_month: u32,
    pub from: Option<YearMonth>,
    pub to: Option<YearMonth>,
    pub saving: bool,
}

fn describe_window(cost: &RecurringCost) -> String {
    match (cost.from, cost.to) {
        (None, None) => "always".to_string(),
        (Some(from), None) => format!("from {}", from),
        (None, Some(to)) => format!("until {}", to),
        (Some(from), Some(to)) => format!("{} → {}", from, to),
    }
}

fn print_group(title: &str, costs: &[RecurringCost]) {
    if costs.is_empty() {
        return;
    }

    println!();
    println!("   {}", title);
    for cost in costs {
        let months = cost
            .due_months()
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "   #{:<4} {:20} │ {:>10} │ months {:<9} │ {}{}",
            cost.id,
            truncate(&cost.name, 20),
            format_money(cost.amount),
            if cost.cycle() == Cycle::Monthly { "all" } else { months.as_str() },
            describe_window(cost),
            if cost.is_saving { " 💰" } else { "" }
        );
    }
}

pub fn cmd_costs_list(session: &Session) -> Result<()> {
    let costs = session.db.load_recurring_costs(session.workspace_id)?;
    let catalog = CostCatalog::build(&costs, session.current_month());

    if session.json {
        return print_json(&catalog);
    }

    if catalog.is_empty() {
        println!("No recurring costs yet. Add one with:");
        println!("  runway costs add Rent -120000");
        return Ok(());
    }

    println!();
    println!("📋 Recurring Costs");
    println!("   ─────────────────────────────────────────────────────────────");
    print_group("Monthly", &catalog.monthly);
    print_group("Quarterly", &catalog.quarterly);
    print_group("Half-yearly", &catalog.half_yearly);
    print_group("Yearly", &catalog.yearly);
    println!();
    println!(
        "   Active in {}: {}",
        session.current_month(),
        format_money(catalog.current_balance)
    );

    Ok(())
}

pub fn cmd_costs_add(session: &Session, args: RecurringCostArgs) -> Result<()> {
    let schedule =
        Schedule::new(args.cycle, args.due_month).context("Invalid billing schedule")?;
    let new = NewRecurringCost {
        name: args.name,
        amount: args.amount,
        from: args.from,
        to: args.to,
        schedule,
        is_saving: args.saving,
    };

    let id = session.db.create_recurring_cost(session.workspace_id, &new)?;
    println!(
        "✅ Added {} cost '{}' of {} (ID: {})",
        schedule.cycle(),
        new.name.trim(),
        format_money(new.amount),
        id
    );
    Ok(())
}

pub fn cmd_costs_delete(session: &Session, id: i64) -> Result<()> {
    session.db.delete_recurring_cost(session.workspace_id, id)?;
    println!("🗑  Recurring cost {} deleted", id);
    Ok(())
}

pub fn cmd_one_off_list(session: &Session) -> Result<()> {
    let costs = session.db.load_one_off_costs(session.workspace_id)?;

    if session.json {
        return print_json(&costs);
    }

    if costs.is_empty() {
        println!("No one-off costs yet. Add one with:");
        println!("  runway one-off add Holiday -250000 --due 2025-08");
        return Ok(());
    }

    println!();
    println!("📌 One-off Costs");
    println!("   ─────────────────────────────────────────────────");
    for cost in costs {
        println!(
            "   #{:<4} {} │ {:20} │ {:>10}{}",
            cost.id,
            cost.due,
            truncate(&cost.name, 20),
            format_money(cost.amount),
            if cost.is_saving { " 💰" } else { "" }
        );
    }

    Ok(())
}

pub fn cmd_one_off_add(
    session: &Session,
    name: &str,
    amount: i64,
    due: YearMonth,
    saving: bool,
) -> Result<()> {
    let new = NewOneOffCost {
        name: name.to_string(),
        amount,
        due,
        is_saving: saving,
    };

    let id = session.db.create_one_off_cost(session.workspace_id, &new)?;
    println!(
        "✅ Added one-off cost '{}' of {} due {} (ID: {})",
        name.trim(),
        format_money(amount),
        due,
        id
    );
    Ok(())
}

pub fn cmd_one_off_delete(session: &Session, id: i64) -> Result<()> {
    session.db.delete_one_off_cost(session.workspace_id, id)?;
    println!("🗑  One-off cost {} deleted", id);
    Ok(())
}
