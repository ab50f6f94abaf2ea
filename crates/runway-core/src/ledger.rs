//! Safe-to-spend ledger
//!
//! Tracks, for the clock's current month only, which recurring costs are
//! still expected to hit the checking account and which ad hoc one-off
//! movements are pending. A recurring cost is included when an inclusion
//! record exists for (workspace, cost, month); paid inclusions no longer
//! count against the balance.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::calendar::{Clock, YearMonth};
use crate::costs::{validate_name, Cycle, PaymentInclusion, PendingOneOff, RecurringCost};
use crate::error::{Error, Result};
use crate::store::FinanceStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedFixedCost {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub cycle: Cycle,
    pub is_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedFixedCost {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub cycle: Cycle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeCost {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub is_paid: bool,
}

/// Full ledger state for one month
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveToSpendResponse {
    pub safe_to_spend: i64,
    pub checking_balance: i64,
    pub current_month: YearMonth,
    pub included_fixed_costs: Vec<IncludedFixedCost>,
    pub excluded_fixed_costs: Vec<ExcludedFixedCost>,
    pub one_time_costs: Vec<OneTimeCost>,
    pub pending_total: i64,
}

pub struct SpendLedger<'a, S: FinanceStore + ?Sized> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: FinanceStore + ?Sized> SpendLedger<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    pub fn current_month(&self) -> YearMonth {
        self.clock.current_month()
    }

    /// Seed inclusions for `month` once.
    ///
    /// Copies last month's selection (all unpaid) when there is one,
    /// otherwise includes every recurring cost due in `month`.
    pub fn ensure_initialized(&self, workspace_id: i64, month: YearMonth) -> Result<()> {
        if self.store.count_inclusions(workspace_id, month)? > 0 {
            return Ok(());
        }

        let previous = match month.checked_add_months(-1) {
            Some(previous) => self.store.list_inclusions(workspace_id, previous)?,
            None => Vec::new(),
        };
        let cost_ids: Vec<i64> = if !previous.is_empty() {
            debug!(workspace_id, %month, count = previous.len(), "Copying previous month selection");
            previous.iter().map(|inc| inc.fixed_cost_id).collect()
        } else {
            self.store
                .load_recurring_costs(workspace_id)?
                .iter()
                .filter(|cost| cost.is_due(month))
                .map(|cost| cost.id)
                .collect()
        };

        let mut created = 0;
        for fixed_cost_id in cost_ids {
            let inserted = self.store.create_inclusion(&PaymentInclusion {
                workspace_id,
                fixed_cost_id,
                month,
                is_paid: false,
                paid_at: None,
            })?;
            if inserted {
                created += 1;
            }
        }

        info!(workspace_id, %month, created, "Initialized safe-to-spend month");
        Ok(())
    }

    /// Sum of unpaid included recurring costs and unpaid one-offs (signed)
    pub fn pending_total(&self, workspace_id: i64, month: YearMonth) -> Result<i64> {
        let amounts: HashMap<i64, i64> = self
            .store
            .load_recurring_costs(workspace_id)?
            .into_iter()
            .map(|cost| (cost.id, cost.amount))
            .collect();

        let fixed: i64 = self
            .store
            .list_inclusions(workspace_id, month)?
            .iter()
            .filter(|inc| !inc.is_paid)
            .filter_map(|inc| amounts.get(&inc.fixed_cost_id))
            .sum();

        let one_off: i64 = self
            .store
            .list_pending_one_offs(workspace_id, month)?
            .iter()
            .filter(|cost| !cost.is_paid)
            .map(|cost| cost.amount)
            .sum();

        Ok(fixed + one_off)
    }

    /// Checking balance after every pending movement clears
    pub fn safe_to_spend(&self, workspace_id: i64, month: YearMonth) -> Result<i64> {
        let workspace = self.store.get_workspace(workspace_id)?;
        Ok(workspace.checking_balance + self.pending_total(workspace_id, month)?)
    }

    pub fn update_balance(&self, workspace_id: i64, amount: i64) -> Result<()> {
        self.store.update_checking_balance(workspace_id, amount)?;
        info!(workspace_id, amount, "Checking balance updated");
        Ok(())
    }

    pub fn include(&self, workspace_id: i64, fixed_cost_id: i64) -> Result<()> {
        let month = self.current_month();
        self.ensure_cost_exists(workspace_id, fixed_cost_id)?;

        let inserted = self.store.create_inclusion(&PaymentInclusion {
            workspace_id,
            fixed_cost_id,
            month,
            is_paid: false,
            paid_at: None,
        })?;
        if !inserted {
            return Err(Error::Conflict(format!(
                "Fixed cost {} already included for {}",
                fixed_cost_id, month
            )));
        }

        info!(workspace_id, fixed_cost_id, %month, "Fixed cost included");
        Ok(())
    }

    pub fn exclude(&self, workspace_id: i64, fixed_cost_id: i64) -> Result<()> {
        let month = self.current_month();
        self.store.delete_inclusion(workspace_id, fixed_cost_id, month)?;
        info!(workspace_id, fixed_cost_id, %month, "Fixed cost excluded");
        Ok(())
    }

    pub fn mark_paid(&self, workspace_id: i64, fixed_cost_id: i64) -> Result<()> {
        self.set_inclusion_paid(workspace_id, fixed_cost_id, true)
    }

    pub fn mark_pending(&self, workspace_id: i64, fixed_cost_id: i64) -> Result<()> {
        self.set_inclusion_paid(workspace_id, fixed_cost_id, false)
    }

    fn set_inclusion_paid(&self, workspace_id: i64, fixed_cost_id: i64, paid: bool) -> Result<()> {
        let month = self.current_month();
        let mut inclusion = self.store.get_inclusion(workspace_id, fixed_cost_id, month)?;

        inclusion.is_paid = paid;
        inclusion.paid_at = paid.then(|| self.clock.now());
        self.store.update_inclusion(&inclusion)?;

        info!(workspace_id, fixed_cost_id, %month, paid, "Fixed cost payment status changed");
        Ok(())
    }

    /// Add a pending one-off movement to the current month
    pub fn add_one_off(&self, workspace_id: i64, name: &str, amount: i64) -> Result<i64> {
        validate_name(name)?;
        let month = self.current_month();
        let id = self
            .store
            .create_pending_one_off(workspace_id, name.trim(), amount, month)?;
        info!(workspace_id, id, amount, %month, "One-time cost added");
        Ok(id)
    }

    pub fn delete_one_off(&self, workspace_id: i64, id: i64) -> Result<()> {
        self.store.delete_pending_one_off(workspace_id, id)?;
        info!(workspace_id, id, "One-time cost deleted");
        Ok(())
    }

    pub fn mark_one_off_paid(&self, workspace_id: i64, id: i64) -> Result<()> {
        self.set_one_off_paid(workspace_id, id, true)
    }

    pub fn mark_one_off_pending(&self, workspace_id: i64, id: i64) -> Result<()> {
        self.set_one_off_paid(workspace_id, id, false)
    }

    fn set_one_off_paid(&self, workspace_id: i64, id: i64, paid: bool) -> Result<()> {
        let mut cost: PendingOneOff = self.store.get_pending_one_off(workspace_id, id)?;
        cost.is_paid = paid;
        self.store.update_pending_one_off(&cost)?;
        info!(workspace_id, id, paid, "One-time cost payment status changed");
        Ok(())
    }

    /// Initialize the current month if needed and return its full state
    pub fn snapshot(&self, workspace_id: i64) -> Result<SaveToSpendResponse> {
        let month = self.current_month();
        self.ensure_initialized(workspace_id, month)?;

        let workspace = self.store.get_workspace(workspace_id)?;
        let paid_by_cost: HashMap<i64, bool> = self
            .store
            .list_inclusions(workspace_id, month)?
            .into_iter()
            .map(|inc| (inc.fixed_cost_id, inc.is_paid))
            .collect();

        let mut included_fixed_costs = Vec::new();
        let mut excluded_fixed_costs = Vec::new();
        for cost in self.store.load_recurring_costs(workspace_id)? {
            if !cost.is_due(month) {
                continue;
            }
            match paid_by_cost.get(&cost.id) {
                Some(&is_paid) => included_fixed_costs.push(IncludedFixedCost {
                    id: cost.id,
                    cycle: cost.cycle(),
                    name: cost.name,
                    amount: cost.amount,
                    is_paid,
                }),
                None => excluded_fixed_costs.push(ExcludedFixedCost {
                    id: cost.id,
                    cycle: cost.cycle(),
                    name: cost.name,
                    amount: cost.amount,
                }),
            }
        }

        let one_time_costs = self
            .store
            .list_pending_one_offs(workspace_id, month)?
            .into_iter()
            .map(|cost| OneTimeCost {
                id: cost.id,
                name: cost.name,
                amount: cost.amount,
                is_paid: cost.is_paid,
            })
            .collect();

        let pending_total = self.pending_total(workspace_id, month)?;

        Ok(SaveToSpendResponse {
            safe_to_spend: workspace.checking_balance + pending_total,
            checking_balance: workspace.checking_balance,
            current_month: month,
            included_fixed_costs,
            excluded_fixed_costs,
            one_time_costs,
            pending_total,
        })
    }

    fn ensure_cost_exists(&self, workspace_id: i64, fixed_cost_id: i64) -> Result<()> {
        let costs: Vec<RecurringCost> = self.store.load_recurring_costs(workspace_id)?;
        if costs.iter().any(|cost| cost.id == fixed_cost_id) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("Fixed cost {} not found", fixed_cost_id)))
        }
    }
}
