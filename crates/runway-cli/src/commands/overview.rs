//! Timeline and surplus command implementations

use anyhow::Result;
use runway_core::{calculate_surplus_statistics, TimelineProjector};

use super::{format_money, print_json, truncate, Session};

pub fn cmd_overview(session: &Session) -> Result<()> {
    let workspace = session.db.get_workspace(session.workspace_id)?;
    let recurring = session.db.load_recurring_costs(session.workspace_id)?;
    let one_off = session.db.load_one_off_costs(session.workspace_id)?;

    let projector = TimelineProjector::new(&recurring, &one_off);
    let overview = projector.overview(
        session.current_month(),
        workspace.current_amount,
        session.config.overview_horizon,
    );

    if session.json {
        return print_json(&overview);
    }

    println!();
    println!(
        "📈 Balance Timeline (starting at {})",
        format_money(overview.current_amount)
    );
    println!("   ─────────────────────────────────────────────────────");
    println!(
        "   {:>3}  {:7} │ {:>12} │ {:>10} │ {:>10}",
        "#", "Month", "Balance", "Recurring", "One-off"
    );

    for (i, entry) in overview.entries.iter().enumerate() {
        let warn = if entry.current_amount < 0 { " ⚠️" } else { "" };
        println!(
            "   {:>3}  {} │ {:>12} │ {:>10} │ {:>10}{}",
            i,
            entry.year_month,
            format_money(entry.current_amount),
            format_money(entry.sum_fixed_costs),
            format_money(entry.sum_special_costs),
            warn
        );
    }

    println!();
    println!("   Details for a month: runway overview --detail <#>");
    Ok(())
}

pub fn cmd_overview_detail(session: &Session, offset: u32) -> Result<()> {
    let recurring = session.db.load_recurring_costs(session.workspace_id)?;
    let one_off = session.db.load_one_off_costs(session.workspace_id)?;

    let start = session.current_month();
    let horizon = session.config.overview_horizon;
    let detail = TimelineProjector::new(&recurring, &one_off).detail(start, offset, horizon);

    if session.json {
        return print_json(&detail);
    }

    let month = if offset <= horizon {
        i32::try_from(offset)
            .ok()
            .and_then(|n| start.checked_add_months(n))
    } else {
        None
    };
    let Some(month) = month else {
        println!("Offset {} is beyond the {}-month timeline.", offset, horizon);
        return Ok(());
    };

    println!();
    println!("🔎 Movements in {}", month);
    println!("   ─────────────────────────────────────────────");

    if detail.is_empty() {
        println!("   Nothing due.");
        return Ok(());
    }

    for cost in &detail.fixed_costs {
        println!(
            "   #{:<4} {:20} │ {:>10} │ {}",
            cost.id,
            truncate(&cost.name, 20),
            format_money(cost.amount),
            cost.display_type
        );
    }
    for cost in &detail.special_costs {
        println!(
            "   #{:<4} {:20} │ {:>10} │ one-off",
            cost.id,
            truncate(&cost.name, 20),
            format_money(cost.amount)
        );
    }

    Ok(())
}

pub fn cmd_surplus(session: &Session) -> Result<()> {
    let recurring = session.db.load_recurring_costs(session.workspace_id)?;
    let stats = calculate_surplus_statistics(
        &recurring,
        session.current_month(),
        session.config.surplus_window_months,
    );

    if session.json {
        return print_json(&stats);
    }

    // Surplus works on fractional monthly equivalents of minor units
    let money = |minor: f64| format_money(minor.round() as i64);

    println!();
    println!("💶 Monthly Surplus");
    println!("   ─────────────────────────────");
    println!("   Income:   {:>12}", money(stats.monthly_income));
    println!("   Expenses: {:>12}", money(stats.monthly_expenses));
    println!("   Surplus:  {:>12}", money(stats.current_surplus));
    println!();
    for point in &stats.history {
        println!("   {} │ {:>12}", point.month, money(point.surplus));
    }

    Ok(())
}
