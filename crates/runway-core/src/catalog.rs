//! Recurring costs grouped by billing cycle

use serde::Serialize;

use crate::calendar::YearMonth;
use crate::costs::{Cycle, RecurringCost};

/// All recurring costs of a workspace, one list per cycle
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCatalog {
    pub monthly: Vec<RecurringCost>,
    pub quarterly: Vec<RecurringCost>,
    pub half_yearly: Vec<RecurringCost>,
    pub yearly: Vec<RecurringCost>,
    /// Sum of the raw amounts of every cost active in the current month
    pub current_balance: i64,
}

impl CostCatalog {
    pub fn build(costs: &[RecurringCost], current: YearMonth) -> Self {
        let mut catalog = Self::default();

        for cost in costs {
            if cost.is_active(current) {
                catalog.current_balance += cost.amount;
            }

            let bucket = match cost.cycle() {
                Cycle::Monthly => &mut catalog.monthly,
                Cycle::Quarterly => &mut catalog.quarterly,
                Cycle::HalfYearly => &mut catalog.half_yearly,
                Cycle::Yearly => &mut catalog.yearly,
            };
            bucket.push(cost.clone());
        }

        catalog
    }

    pub fn len(&self) -> usize {
        self.monthly.len() + self.quarterly.len() + self.half_yearly.len() + self.yearly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::Schedule;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn cost(id: i64, amount: i64, schedule: Schedule, to: Option<YearMonth>) -> RecurringCost {
        RecurringCost {
            id,
            workspace_id: 1,
            name: format!("Cost {}", id),
            amount,
            from: None,
            to,
            schedule,
            is_saving: false,
        }
    }

    #[test]
    fn test_groups_by_cycle() {
        let costs = vec![
            cost(1, -800, Schedule::monthly(), None),
            cost(2, -300, Schedule::new(Cycle::Quarterly, 2).unwrap(), None),
            cost(3, -120, Schedule::new(Cycle::Yearly, 11).unwrap(), None),
            cost(4, 2500, Schedule::monthly(), None),
        ];

        let catalog = CostCatalog::build(&costs, ym(2024, 3));
        assert_eq!(catalog.monthly.len(), 2);
        assert_eq!(catalog.quarterly.len(), 1);
        assert!(catalog.half_yearly.is_empty());
        assert_eq!(catalog.yearly.len(), 1);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_current_balance_skips_expired_costs() {
        let costs = vec![
            cost(1, -800, Schedule::monthly(), None),
            cost(2, -500, Schedule::monthly(), Some(ym(2023, 12))),
            cost(3, 2500, Schedule::monthly(), None),
        ];

        let catalog = CostCatalog::build(&costs, ym(2024, 3));
        assert_eq!(catalog.current_balance, 1700);
        // Expired costs are still listed
        assert_eq!(catalog.monthly.len(), 3);
    }
}
