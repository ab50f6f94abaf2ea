//! Recurring and one-off cost model
//!
//! A recurring cost is billed on a fixed set of calendar months derived from
//! its [`Cycle`] and a seed month. The set is never stored on its own, so its
//! size is always one of 1, 2, 4 or 12.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{is_relevant, YearMonth};
use crate::error::{Error, Result};

/// Billing cycle of a recurring cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cycle {
    Yearly,
    HalfYearly,
    Quarterly,
    Monthly,
}

impl Cycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::HalfYearly => "half-yearly",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
        }
    }

    /// Number of due months per year
    pub fn occurrences(&self) -> u32 {
        match self {
            Self::Yearly => 1,
            Self::HalfYearly => 2,
            Self::Quarterly => 4,
            Self::Monthly => 12,
        }
    }

    /// Highest legal seed month for this cycle
    fn max_seed(&self) -> u32 {
        match self {
            Self::Yearly => 12,
            Self::HalfYearly => 6,
            Self::Quarterly => 3,
            Self::Monthly => 12,
        }
    }

    pub fn all() -> &'static [Cycle] {
        &[Self::Monthly, Self::Quarterly, Self::HalfYearly, Self::Yearly]
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Cycle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yearly" | "annual" => Ok(Self::Yearly),
            "half-yearly" | "halfyearly" | "half_yearly" => Ok(Self::HalfYearly),
            "quarterly" => Ok(Self::Quarterly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown billing cycle: {}", s)),
        }
    }
}

/// A validated billing schedule: cycle plus the first due month of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ScheduleParts")]
pub struct Schedule {
    cycle: Cycle,
    due_month: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleParts {
    cycle: Cycle,
    due_month: u32,
}

impl TryFrom<ScheduleParts> for Schedule {
    type Error = Error;

    fn try_from(parts: ScheduleParts) -> Result<Self> {
        Schedule::new(parts.cycle, parts.due_month)
    }
}

impl Schedule {
    /// Validate the seed month against the cycle's legal range.
    ///
    /// Monthly costs ignore the seed and are normalized to 1.
    pub fn new(cycle: Cycle, due_month: u32) -> Result<Self> {
        if cycle == Cycle::Monthly {
            return Ok(Self {
                cycle,
                due_month: 1,
            });
        }

        if !(1..=cycle.max_seed()).contains(&due_month) {
            return Err(Error::Validation(format!(
                "dueMonth for {} must be between 1 and {}, got {}",
                cycle,
                cycle.max_seed(),
                due_month
            )));
        }

        Ok(Self { cycle, due_month })
    }

    pub fn monthly() -> Self {
        Self {
            cycle: Cycle::Monthly,
            due_month: 1,
        }
    }

    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn due_month(&self) -> u32 {
        self.due_month
    }

    /// Expand into the calendar months the cost is billed in (ascending)
    pub fn due_months(&self) -> Vec<u32> {
        let step = 12 / self.cycle.occurrences();
        (0..self.cycle.occurrences())
            .map(|i| self.due_month + i * step)
            .collect()
    }

    pub fn is_due_in(&self, month: u32) -> bool {
        month >= self.due_month && (month - self.due_month) % (12 / self.cycle.occurrences()) == 0
    }
}

/// What a cost means for cash and wealth, derived once from (sign, saving flag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostIntent {
    /// Cash leaves, wealth untouched
    Expense,
    /// Cash arrives, wealth untouched
    Income,
    /// Cash leaves into tracked wealth
    SavingContribution,
    /// Cash arrives out of tracked wealth
    WealthExtraction,
}

impl CostIntent {
    pub fn classify(amount: i64, is_saving: bool) -> Self {
        match (amount < 0, is_saving) {
            (true, false) => Self::Expense,
            (false, false) => Self::Income,
            (true, true) => Self::SavingContribution,
            (false, true) => Self::WealthExtraction,
        }
    }

    pub fn affects_wealth(&self) -> bool {
        matches!(self, Self::SavingContribution | Self::WealthExtraction)
    }

    /// Change in tracked wealth per occurrence of `amount`
    pub fn wealth_delta(&self, amount: i64) -> f64 {
        if self.affects_wealth() {
            -(amount as f64)
        } else {
            0.0
        }
    }
}

/// A cost billed on a recurring schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringCost {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    /// Signed minor currency units: positive = income, negative = expense
    pub amount: i64,
    pub from: Option<YearMonth>,
    pub to: Option<YearMonth>,
    pub schedule: Schedule,
    pub is_saving: bool,
}

impl RecurringCost {
    pub fn cycle(&self) -> Cycle {
        self.schedule.cycle()
    }

    pub fn due_months(&self) -> Vec<u32> {
        self.schedule.due_months()
    }

    pub fn intent(&self) -> CostIntent {
        CostIntent::classify(self.amount, self.is_saving)
    }

    /// Inside the validity window
    pub fn is_active(&self, month: YearMonth) -> bool {
        is_relevant(month, self.from, self.to)
    }

    /// Inside the validity window and billed this calendar month
    pub fn is_due(&self, month: YearMonth) -> bool {
        self.is_active(month) && self.schedule.is_due_in(month.month())
    }

    /// Both window bounds open
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Annual total spread evenly over twelve months
    pub fn monthly_equivalent(&self) -> f64 {
        (self.amount * self.cycle().occurrences() as i64) as f64 / 12.0
    }
}

/// A single money movement in one month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOffCost {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub amount: i64,
    pub due: YearMonth,
    pub is_saving: bool,
}

impl OneOffCost {
    pub fn intent(&self) -> CostIntent {
        CostIntent::classify(self.amount, self.is_saving)
    }
}

/// Input for creating a recurring cost
#[derive(Debug, Clone)]
pub struct NewRecurringCost {
    pub name: String,
    pub amount: i64,
    pub from: Option<YearMonth>,
    pub to: Option<YearMonth>,
    pub schedule: Schedule,
    pub is_saving: bool,
}

impl NewRecurringCost {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(Error::Validation(format!(
                    "Validity window starts after it ends ({} > {})",
                    from, to
                )));
            }
        }
        Ok(())
    }
}

/// Input for creating a one-off cost
#[derive(Debug, Clone)]
pub struct NewOneOffCost {
    pub name: String,
    pub amount: i64,
    pub due: YearMonth,
    pub is_saving: bool,
}

impl NewOneOffCost {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Names are 1-100 characters after trimming
pub fn validate_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len == 0 || len > 100 {
        return Err(Error::Validation(format!(
            "Name must be between 1 and 100 characters, got {}",
            len
        )));
    }
    Ok(())
}

/// Per-month inclusion of a recurring cost in the safe-to-spend ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInclusion {
    pub workspace_id: i64,
    pub fixed_cost_id: i64,
    pub month: YearMonth,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

/// An ad hoc pending movement scoped to one ledger month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOneOff {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub amount: i64,
    pub month: YearMonth,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(amount: i64, schedule: Schedule) -> RecurringCost {
        RecurringCost {
            id: 1,
            workspace_id: 1,
            name: "Test".to_string(),
            amount,
            from: None,
            to: None,
            schedule,
            is_saving: false,
        }
    }

    #[test]
    fn test_schedule_expansion() {
        assert_eq!(Schedule::new(Cycle::Yearly, 5).unwrap().due_months(), vec![5]);
        assert_eq!(
            Schedule::new(Cycle::HalfYearly, 3).unwrap().due_months(),
            vec![3, 9]
        );
        assert_eq!(
            Schedule::new(Cycle::Quarterly, 2).unwrap().due_months(),
            vec![2, 5, 8, 11]
        );
        assert_eq!(
            Schedule::new(Cycle::Monthly, 7).unwrap().due_months(),
            (1..=12).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_schedule_seed_validation() {
        assert!(Schedule::new(Cycle::Yearly, 12).is_ok());
        assert!(Schedule::new(Cycle::Yearly, 13).is_err());
        assert!(Schedule::new(Cycle::Yearly, 0).is_err());
        assert!(Schedule::new(Cycle::HalfYearly, 6).is_ok());
        assert!(Schedule::new(Cycle::HalfYearly, 7).is_err());
        assert!(Schedule::new(Cycle::Quarterly, 3).is_ok());
        assert!(matches!(
            Schedule::new(Cycle::Quarterly, 4),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_due_month_count_matches_cycle_label() {
        for cycle in Cycle::all() {
            let schedule = Schedule::new(*cycle, 1).unwrap();
            let count = schedule.due_months().len();
            let expected = match count {
                1 => "yearly",
                2 => "half-yearly",
                4 => "quarterly",
                12 => "monthly",
                other => panic!("illegal due-month count {}", other),
            };
            assert_eq!(cycle.as_str(), expected);
        }
    }

    #[test]
    fn test_is_due_in_agrees_with_expansion() {
        for cycle in Cycle::all() {
            for seed in 1..=12 {
                let Ok(schedule) = Schedule::new(*cycle, seed) else {
                    continue;
                };
                let months = schedule.due_months();
                for month in 1..=12 {
                    assert_eq!(schedule.is_due_in(month), months.contains(&month));
                }
            }
        }
    }

    #[test]
    fn test_monthly_equivalent() {
        assert_eq!(cost(-1200, Schedule::monthly()).monthly_equivalent(), -1200.0);
        assert_eq!(
            cost(-1200, Schedule::new(Cycle::Yearly, 1).unwrap()).monthly_equivalent(),
            -100.0
        );
        assert_eq!(
            cost(300, Schedule::new(Cycle::Quarterly, 1).unwrap()).monthly_equivalent(),
            100.0
        );
    }

    #[test]
    fn test_intent_classification() {
        assert_eq!(CostIntent::classify(-500, false), CostIntent::Expense);
        assert_eq!(CostIntent::classify(500, false), CostIntent::Income);
        assert_eq!(CostIntent::classify(-500, true), CostIntent::SavingContribution);
        assert_eq!(CostIntent::classify(500, true), CostIntent::WealthExtraction);

        assert_eq!(CostIntent::SavingContribution.wealth_delta(-500), 500.0);
        assert_eq!(CostIntent::WealthExtraction.wealth_delta(500), -500.0);
        assert_eq!(CostIntent::Expense.wealth_delta(-500), 0.0);
    }

    #[test]
    fn test_is_due_respects_window() {
        let mut c = cost(-100, Schedule::new(Cycle::Quarterly, 1).unwrap());
        c.from = Some(YearMonth::new(2023, 4).unwrap());

        assert!(!c.is_due(YearMonth::new(2023, 1).unwrap()));
        assert!(c.is_due(YearMonth::new(2023, 4).unwrap()));
        assert!(!c.is_due(YearMonth::new(2023, 5).unwrap()));
    }

    #[test]
    fn test_cycle_from_str() {
        assert_eq!("half-yearly".parse::<Cycle>().unwrap(), Cycle::HalfYearly);
        assert_eq!("Monthly".parse::<Cycle>().unwrap(), Cycle::Monthly);
        assert!("weekly".parse::<Cycle>().is_err());
    }

    #[test]
    fn test_new_recurring_cost_rejects_inverted_window() {
        let new = NewRecurringCost {
            name: "Rent".to_string(),
            amount: -1000,
            from: Some(YearMonth::new(2024, 6).unwrap()),
            to: Some(YearMonth::new(2024, 1).unwrap()),
            schedule: Schedule::monthly(),
            is_saving: false,
        };
        assert!(new.validate().is_err());
    }
}
