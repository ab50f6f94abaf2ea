//! Wealth profile command implementations

use anyhow::{Context, Result};
use runway_core::{ProfileService, WealthProfile};

use super::{print_json, Session};

/// Parsed arguments of `profile set`
pub struct ProfileArgs {
    pub wealth: Option<f64>,
    pub years: Option<u32>,
    pub worst: Option<f64>,
    pub average: Option<f64>,
    pub best: Option<f64>,
}

fn print_profile(profile: &WealthProfile) {
    println!("   Current wealth: {:.2}", profile.current_wealth);
    println!("   Duration:       {} years", profile.forecast_duration_years);
    println!(
        "   Rates:          {}% / {}% / {}% (worst / average / best)",
        profile.rate_worst_case, profile.rate_average_case, profile.rate_best_case
    );
}

pub fn cmd_profile_show(session: &Session) -> Result<()> {
    let profile = ProfileService::new(&session.db).get_profile(session.workspace_id)?;

    if session.json {
        return print_json(&profile);
    }

    println!();
    println!("👤 Wealth Profile");
    println!("   ─────────────────────────────");
    print_profile(&profile);
    Ok(())
}

pub fn cmd_profile_set(session: &Session, args: ProfileArgs) -> Result<()> {
    let service = ProfileService::new(&session.db);
    let mut profile = service.get_profile(session.workspace_id)?;

    if let Some(wealth) = args.wealth {
        profile.current_wealth = wealth;
    }
    if let Some(years) = args.years {
        profile.forecast_duration_years = years;
    }
    if let Some(worst) = args.worst {
        profile.rate_worst_case = worst;
    }
    if let Some(average) = args.average {
        profile.rate_average_case = average;
    }
    if let Some(best) = args.best {
        profile.rate_best_case = best;
    }

    service
        .update_profile(session.workspace_id, &profile)
        .context("Profile not saved")?;

    println!("✅ Wealth profile saved");
    print_profile(&profile);
    Ok(())
}
