//! Rolling balance timeline
//!
//! Starting from a balance and a month, each step adds the per-occurrence
//! amount of every recurring cost due that month plus every one-off cost keyed
//! to it. One-off costs take part regardless of their saving flag.

use std::collections::HashMap;

use serde::Serialize;

use crate::calendar::YearMonth;
use crate::costs::{Cycle, OneOffCost, RecurringCost};

/// One step of the rolling balance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewEntry {
    pub year_month: YearMonth,
    /// Balance after this month's movements
    pub current_amount: i64,
    pub sum_fixed_costs: i64,
    pub sum_special_costs: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Starting balance
    pub current_amount: i64,
    pub entries: Vec<OverviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailFixedCost {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub display_type: Cycle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSpecialCost {
    pub id: i64,
    pub name: String,
    pub amount: i64,
}

/// Itemized movements of a single timeline month
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewDetail {
    pub fixed_costs: Vec<DetailFixedCost>,
    pub special_costs: Vec<DetailSpecialCost>,
}

impl OverviewDetail {
    pub fn is_empty(&self) -> bool {
        self.fixed_costs.is_empty() && self.special_costs.is_empty()
    }
}

/// Cost lookups built once per projection
pub struct TimelineProjector<'a> {
    by_due_month: HashMap<u32, Vec<&'a RecurringCost>>,
    by_year_month: HashMap<YearMonth, Vec<&'a OneOffCost>>,
}

impl<'a> TimelineProjector<'a> {
    pub fn new(recurring: &'a [RecurringCost], one_off: &'a [OneOffCost]) -> Self {
        let mut by_due_month: HashMap<u32, Vec<&'a RecurringCost>> = HashMap::new();
        for cost in recurring {
            for month in cost.due_months() {
                by_due_month.entry(month).or_default().push(cost);
            }
        }

        let mut by_year_month: HashMap<YearMonth, Vec<&'a OneOffCost>> = HashMap::new();
        for cost in one_off {
            by_year_month.entry(cost.due).or_default().push(cost);
        }

        Self {
            by_due_month,
            by_year_month,
        }
    }

    fn recurring_due(&self, ym: YearMonth) -> impl Iterator<Item = &'a RecurringCost> + '_ {
        self.by_due_month
            .get(&ym.month())
            .into_iter()
            .flatten()
            .copied()
            .filter(move |cost| cost.is_active(ym))
    }

    fn one_off_due(&self, ym: YearMonth) -> impl Iterator<Item = &'a OneOffCost> + '_ {
        self.by_year_month.get(&ym).into_iter().flatten().copied()
    }

    /// Roll `balance` forward for `horizon` months starting at `start`
    pub fn overview(&self, start: YearMonth, balance: i64, horizon: u32) -> Overview {
        let mut running = balance;
        let mut entries = Vec::new();

        for i in 0..horizon {
            let Some(ym) = month_at(start, i) else {
                break;
            };
            let sum_fixed_costs: i64 = self.recurring_due(ym).map(|c| c.amount).sum();
            let sum_special_costs: i64 = self.one_off_due(ym).map(|c| c.amount).sum();

            running += sum_fixed_costs + sum_special_costs;
            entries.push(OverviewEntry {
                year_month: ym,
                current_amount: running,
                sum_fixed_costs,
                sum_special_costs,
            });
        }

        Overview {
            current_amount: balance,
            entries,
        }
    }

    /// Itemize month `start + offset`; empty past the horizon
    pub fn detail(&self, start: YearMonth, offset: u32, horizon: u32) -> OverviewDetail {
        if offset > horizon {
            return OverviewDetail::default();
        }
        let Some(ym) = month_at(start, offset) else {
            return OverviewDetail::default();
        };
        let fixed_costs = self
            .recurring_due(ym)
            .map(|c| DetailFixedCost {
                id: c.id,
                name: c.name.clone(),
                amount: c.amount,
                display_type: c.cycle(),
            })
            .collect();
        let special_costs = self
            .one_off_due(ym)
            .map(|c| DetailSpecialCost {
                id: c.id,
                name: c.name.clone(),
                amount: c.amount,
            })
            .collect();

        OverviewDetail {
            fixed_costs,
            special_costs,
        }
    }
}

/// Month `offset` months after `start`, if it is representable
fn month_at(start: YearMonth, offset: u32) -> Option<YearMonth> {
    i32::try_from(offset)
        .ok()
        .and_then(|n| start.checked_add_months(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::Schedule;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn recurring(id: i64, amount: i64, schedule: Schedule) -> RecurringCost {
        RecurringCost {
            id,
            workspace_id: 1,
            name: format!("Recurring {}", id),
            amount,
            from: None,
            to: None,
            schedule,
            is_saving: false,
        }
    }

    fn one_off(id: i64, amount: i64, due: YearMonth, is_saving: bool) -> OneOffCost {
        OneOffCost {
            id,
            workspace_id: 1,
            name: format!("One-off {}", id),
            amount,
            due,
            is_saving,
        }
    }

    #[test]
    fn test_single_monthly_income_accumulates() {
        let costs = vec![recurring(1, 250, Schedule::monthly())];
        let projector = TimelineProjector::new(&costs, &[]);

        let overview = projector.overview(ym(2024, 1), 1000, 30);
        assert_eq!(overview.current_amount, 1000);
        assert_eq!(overview.entries.len(), 30);
        for (i, entry) in overview.entries.iter().enumerate() {
            assert_eq!(entry.current_amount, 1000 + 250 * (i as i64 + 1));
        }
        assert_eq!(overview.entries[29].year_month, ym(2026, 6));
    }

    #[test]
    fn test_quarterly_cost_hits_only_due_months() {
        let costs = vec![recurring(1, -300, Schedule::new(Cycle::Quarterly, 2).unwrap())];
        let projector = TimelineProjector::new(&costs, &[]);

        let overview = projector.overview(ym(2024, 1), 0, 6);
        let sums: Vec<i64> = overview.entries.iter().map(|e| e.sum_fixed_costs).collect();
        assert_eq!(sums, vec![0, -300, 0, 0, -300, 0]);
        assert_eq!(overview.entries[5].current_amount, -600);
    }

    #[test]
    fn test_one_off_included_regardless_of_saving_flag() {
        let one_offs = vec![
            one_off(1, -400, ym(2024, 2), false),
            one_off(2, -600, ym(2024, 2), true),
        ];
        let projector = TimelineProjector::new(&[], &one_offs);

        let overview = projector.overview(ym(2024, 1), 5000, 3);
        assert_eq!(overview.entries[0].sum_special_costs, 0);
        assert_eq!(overview.entries[1].sum_special_costs, -1000);
        assert_eq!(overview.entries[2].current_amount, 4000);
    }

    #[test]
    fn test_window_limits_contribution() {
        let mut cost = recurring(1, -100, Schedule::monthly());
        cost.from = Some(ym(2024, 3));
        cost.to = Some(ym(2024, 4));
        let costs = vec![cost];
        let projector = TimelineProjector::new(&costs, &[]);

        let overview = projector.overview(ym(2024, 1), 0, 6);
        let sums: Vec<i64> = overview.entries.iter().map(|e| e.sum_fixed_costs).collect();
        assert_eq!(sums, vec![0, 0, -100, -100, 0, 0]);
    }

    #[test]
    fn test_detail_itemizes_month() {
        let costs = vec![
            recurring(1, -1200, Schedule::monthly()),
            recurring(2, -90, Schedule::new(Cycle::Yearly, 3).unwrap()),
        ];
        let one_offs = vec![one_off(7, -250, ym(2024, 3), false)];
        let projector = TimelineProjector::new(&costs, &one_offs);

        let detail = projector.detail(ym(2024, 1), 2, 30);
        assert_eq!(detail.fixed_costs.len(), 2);
        let yearly = detail.fixed_costs.iter().find(|c| c.id == 2).unwrap();
        assert_eq!(yearly.display_type, Cycle::Yearly);
        assert_eq!(yearly.amount, -90);
        assert_eq!(
            detail.special_costs,
            vec![DetailSpecialCost {
                id: 7,
                name: "One-off 7".to_string(),
                amount: -250,
            }]
        );

        let other = projector.detail(ym(2024, 1), 1, 30);
        assert_eq!(other.fixed_costs.len(), 1);
        assert!(other.special_costs.is_empty());
    }

    #[test]
    fn test_detail_beyond_horizon_is_empty() {
        let costs = vec![recurring(1, -1200, Schedule::monthly())];
        let projector = TimelineProjector::new(&costs, &[]);

        assert!(projector.detail(ym(2024, 1), 31, 30).is_empty());
        assert!(!projector.detail(ym(2024, 1), 30, 30).is_empty());
    }

    #[test]
    fn test_offsets_past_the_calendar_end_are_empty() {
        let costs = vec![recurring(1, -1200, Schedule::monthly())];
        let projector = TimelineProjector::new(&costs, &[]);

        assert!(projector.detail(ym(2024, 1), u32::MAX, u32::MAX).is_empty());
        assert!(projector
            .detail(ym(2024, 1), 2_147_483_647, u32::MAX)
            .is_empty());

        let overview = projector.overview(ym(9999, 10), 0, 30);
        assert_eq!(overview.entries.len(), 3);
        assert_eq!(overview.entries[2].year_month, ym(9999, 12));
    }

    #[test]
    fn test_detail_serializes_cycle_label() {
        let costs = vec![recurring(1, -50, Schedule::new(Cycle::HalfYearly, 1).unwrap())];
        let projector = TimelineProjector::new(&costs, &[]);

        let json = serde_json::to_value(projector.detail(ym(2024, 1), 0, 30)).unwrap();
        assert_eq!(json["fixedCosts"][0]["displayType"], "half-yearly");
    }
}
