//! Trailing surplus statistics
//!
//! Surplus works on monthly equivalents, so a yearly cost weighs in at a
//! twelfth of its amount every month rather than in full on its due month.

use serde::Serialize;

use crate::calendar::YearMonth;
use crate::costs::RecurringCost;

/// One month of the trailing history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusPoint {
    /// Display form, "YYYY-MM"
    pub month: String,
    pub surplus: f64,
    pub projected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusStatistics {
    pub current_surplus: f64,
    pub monthly_income: f64,
    /// Positive magnitude of the month's expenses
    pub monthly_expenses: f64,
    /// Oldest first, ending at the current month
    pub history: Vec<SurplusPoint>,
}

/// Income and expense (negative) totals for one month
fn breakdown(costs: &[RecurringCost], month: YearMonth) -> (f64, f64) {
    costs
        .iter()
        .filter(|cost| cost.is_active(month))
        .map(RecurringCost::monthly_equivalent)
        .fold((0.0, 0.0), |(income, expense), amount| {
            if amount >= 0.0 {
                (income + amount, expense)
            } else {
                (income, expense + amount)
            }
        })
}

/// Build `window` trailing points ending at `current`
pub fn calculate_surplus_statistics(
    costs: &[RecurringCost],
    current: YearMonth,
    window: u32,
) -> SurplusStatistics {
    let mut history: Vec<SurplusPoint> = (0..window.max(1))
        .map_while(|back| {
            i32::try_from(back)
                .ok()
                .and_then(|back| current.checked_add_months(-back))
        })
        .map(|month| {
            let (income, expense) = breakdown(costs, month);
            SurplusPoint {
                month: month.to_string(),
                surplus: income + expense,
                projected: false,
            }
        })
        .collect();
    history.reverse();

    let (monthly_income, expense) = breakdown(costs, current);

    SurplusStatistics {
        current_surplus: monthly_income + expense,
        monthly_income,
        monthly_expenses: -expense,
        history,
    }
}
