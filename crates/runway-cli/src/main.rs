//! Runway CLI - Recurring-cost calendar and financial projections
//!
//! Usage:
//!   runway init                       Initialize database
//!   runway costs add Rent -120000     Add a monthly expense
//!   runway overview                   Show the rolling balance timeline
//!   runway forecast                   Show the wealth forecast
//!   runway spend                      Show safe-to-spend for this month

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Commands::Init = cli.command {
        return commands::cmd_init(&cli.db, cli.no_encrypt);
    }

    let session = Session::open(&cli)?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Workspace { action } => match action {
            None | Some(WorkspaceAction::List) => commands::cmd_workspace_list(&session),
            Some(WorkspaceAction::Add { name }) => commands::cmd_workspace_add(&session, &name),
            Some(WorkspaceAction::SetBalance { current, checking }) => {
                commands::cmd_workspace_set_balance(&session, current, checking)
            }
        },
        Commands::Costs { action } => match action {
            None | Some(CostsAction::List) => commands::cmd_costs_list(&session),
            Some(CostsAction::Add {
                name,
                amount,
                cycle,
                due_month,
                from,
                to,
                saving,
            }) => commands::cmd_costs_add(
                &session,
                commands::RecurringCostArgs {
                    name,
                    amount,
                    cycle,
                    due_month,
                    from,
                    to,
                    saving,
                },
            ),
            Some(CostsAction::Delete { id }) => commands::cmd_costs_delete(&session, id),
        },
        Commands::OneOff { action } => match action {
            None | Some(OneOffAction::List) => commands::cmd_one_off_list(&session),
            Some(OneOffAction::Add {
                name,
                amount,
                due,
                saving,
            }) => commands::cmd_one_off_add(&session, &name, amount, due, saving),
            Some(OneOffAction::Delete { id }) => commands::cmd_one_off_delete(&session, id),
        },
        Commands::Overview { detail } => match detail {
            None => commands::cmd_overview(&session),
            Some(offset) => commands::cmd_overview_detail(&session, offset),
        },
        Commands::Surplus => commands::cmd_surplus(&session),
        Commands::Forecast => commands::cmd_forecast(&session),
        Commands::Profile { action } => match action {
            None | Some(ProfileAction::Show) => commands::cmd_profile_show(&session),
            Some(ProfileAction::Set {
                wealth,
                years,
                worst,
                average,
                best,
            }) => commands::cmd_profile_set(
                &session,
                commands::ProfileArgs {
                    wealth,
                    years,
                    worst,
                    average,
                    best,
                },
            ),
        },
        Commands::Spend { action } => match action {
            None | Some(SpendAction::Show) => commands::cmd_spend_show(&session),
            Some(SpendAction::Balance { amount }) => commands::cmd_spend_balance(&session, amount),
            Some(SpendAction::Include { id }) => commands::cmd_spend_include(&session, id),
            Some(SpendAction::Exclude { id }) => commands::cmd_spend_exclude(&session, id),
            Some(SpendAction::Paid { id }) => commands::cmd_spend_paid(&session, id),
            Some(SpendAction::Pending { id }) => commands::cmd_spend_pending(&session, id),
            Some(SpendAction::Add { name, amount }) => {
                commands::cmd_spend_add(&session, &name, amount)
            }
            Some(SpendAction::Remove { id }) => commands::cmd_spend_remove(&session, id),
            Some(SpendAction::PaidOneOff { id }) => {
                commands::cmd_spend_one_off_paid(&session, id)
            }
            Some(SpendAction::PendingOneOff { id }) => {
                commands::cmd_spend_one_off_pending(&session, id)
            }
        },
    }
}
