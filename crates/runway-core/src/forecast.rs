//! Wealth forecast simulator
//!
//! Projects tracked wealth over several years under three annual rates of
//! return. Only saving-flagged costs move wealth: contributions (negative
//! amounts) add to it and extractions (positive amounts) take from it.
//!
//! Simulation runs month by month starting at the current month. Unbounded
//! saving costs fold into one constant monthly saving; bounded ones are
//! checked against their window each simulated month. Values are rounded to
//! cents only when a yearly point is emitted.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::calendar::{Clock, YearMonth};
use crate::config::EngineConfig;
use crate::costs::{OneOffCost, RecurringCost};
use crate::error::Result;
use crate::profile::WealthProfile;
use crate::store::FinanceStore;

/// Wealth at the end of one simulated year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub year: i32,
    /// Capital plus contributions, without growth
    pub invested: f64,
    pub worst: f64,
    pub average: f64,
    pub best: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub points: Vec<ForecastPoint>,
    pub start_capital: f64,
    /// Constant component from unbounded saving costs only
    pub monthly_saving: f64,
    pub duration_years: u32,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn monthly_factor(annual_rate_percent: f64) -> f64 {
    1.0 + annual_rate_percent / 12.0 / 100.0
}

/// Run the simulation from `start` with already loaded inputs
pub fn simulate(
    profile: &WealthProfile,
    recurring: &[RecurringCost],
    one_off: &[OneOffCost],
    start: YearMonth,
    default_years: u32,
) -> ForecastResponse {
    let duration_years = if profile.forecast_duration_years > 0 {
        profile.forecast_duration_years
    } else {
        default_years
    };

    let mut monthly_saving = 0.0;
    let mut bounded: Vec<&RecurringCost> = Vec::new();
    for cost in recurring.iter().filter(|c| c.intent().affects_wealth()) {
        if cost.is_unbounded() {
            monthly_saving += cost.intent().wealth_delta(cost.amount);
        } else {
            bounded.push(cost);
        }
    }

    let mut special_delta: HashMap<YearMonth, f64> = HashMap::new();
    for cost in one_off.iter().filter(|c| c.intent().affects_wealth()) {
        *special_delta.entry(cost.due).or_insert(0.0) += cost.intent().wealth_delta(cost.amount);
    }

    debug!(
        monthly_saving,
        bounded = bounded.len(),
        special_months = special_delta.len(),
        duration_years,
        "Simulating wealth forecast"
    );

    let worst_factor = monthly_factor(profile.rate_worst_case);
    let average_factor = monthly_factor(profile.rate_average_case);
    let best_factor = monthly_factor(profile.rate_best_case);

    let start_capital = profile.current_wealth;
    let mut invested = start_capital;
    let mut worst = start_capital;
    let mut average = start_capital;
    let mut best = start_capital;

    let mut points = Vec::with_capacity(duration_years as usize);
    let mut month = start;

    for year in 1..=duration_years {
        for _ in 0..12 {
            let mut delta = monthly_saving;
            delta += special_delta.get(&month).copied().unwrap_or(0.0);
            delta += bounded
                .iter()
                .filter(|cost| cost.is_active(month))
                .map(|cost| cost.intent().wealth_delta(cost.amount))
                .sum::<f64>();

            invested += delta;
            worst = (worst + delta) * worst_factor;
            average = (average + delta) * average_factor;
            best = (best + delta) * best_factor;

            month = month.next();
        }

        points.push(ForecastPoint {
            year: start.year() + year as i32,
            invested: round_cents(invested),
            worst: round_cents(worst),
            average: round_cents(average),
            best: round_cents(best),
        });
    }

    ForecastResponse {
        points,
        start_capital,
        monthly_saving,
        duration_years,
    }
}

/// Loads a workspace's profile and costs, then simulates from the clock's month
pub struct ForecastSimulator<'a, S: FinanceStore + ?Sized> {
    store: &'a S,
    clock: &'a dyn Clock,
    config: &'a EngineConfig,
}

impl<'a, S: FinanceStore + ?Sized> ForecastSimulator<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock, config: &'a EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Fails with `NotFound` when the workspace has no stored profile
    pub fn calculate_forecast(&self, workspace_id: i64) -> Result<ForecastResponse> {
        let profile = self.store.get_wealth_profile(workspace_id)?;
        let recurring = self.store.load_recurring_costs(workspace_id)?;
        let one_off = self.store.load_one_off_costs(workspace_id)?;

        Ok(simulate(
            &profile,
            &recurring,
            &one_off,
            self.clock.current_month(),
            self.config.default_forecast_years,
        ))
    }
}
