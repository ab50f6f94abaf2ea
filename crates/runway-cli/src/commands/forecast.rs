//! Wealth forecast command implementation

use anyhow::Result;
use runway_core::forecast::ForecastSimulator;

use super::{print_json, Session};

pub fn cmd_forecast(session: &Session) -> Result<()> {
    let simulator = ForecastSimulator::new(&session.db, session.clock.as_ref(), &session.config);

    let forecast = match simulator.calculate_forecast(session.workspace_id) {
        Ok(forecast) => forecast,
        Err(e) if e.is_not_found() => {
            println!("No wealth profile saved yet. Create one with:");
            println!("  runway profile set --wealth 10000 --years 10");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if session.json {
        return print_json(&forecast);
    }

    println!();
    println!(
        "🔮 Wealth Forecast ({} years, start {:.2}, saving {:.2}/month)",
        forecast.duration_years, forecast.start_capital, forecast.monthly_saving
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:4} │ {:>14} │ {:>14} │ {:>14} │ {:>14}",
        "Year", "Invested", "Worst", "Average", "Best"
    );

    for point in &forecast.points {
        println!(
            "   {:4} │ {:>14.2} │ {:>14.2} │ {:>14.2} │ {:>14.2}",
            point.year, point.invested, point.worst, point.average, point.best
        );
    }

    Ok(())
}
