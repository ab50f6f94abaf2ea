//! Store collaborator
//!
//! The engine never touches persistence directly. Everything it reads, and the
//! few ledger records it writes, go through [`FinanceStore`]. Calls are
//! blocking and either succeed or error; consistency under concurrent callers
//! is the implementation's concern.

use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;
use crate::costs::{OneOffCost, PaymentInclusion, PendingOneOff, RecurringCost};
use crate::error::Result;
use crate::profile::WealthProfile;

/// A budgeting workspace and its two tracked balances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    /// Starting balance of the rolling timeline (minor units)
    pub current_amount: i64,
    /// Checking account balance used by the safe-to-spend ledger (minor units)
    pub checking_balance: i64,
}

/// Data access needed by the projection engine and the safe-to-spend ledger
pub trait FinanceStore {
    /// Fails with `NotFound` for an unknown workspace
    fn get_workspace(&self, workspace_id: i64) -> Result<Workspace>;
    fn update_checking_balance(&self, workspace_id: i64, amount: i64) -> Result<()>;
    fn update_current_amount(&self, workspace_id: i64, amount: i64) -> Result<()>;

    fn load_recurring_costs(&self, workspace_id: i64) -> Result<Vec<RecurringCost>>;
    fn load_one_off_costs(&self, workspace_id: i64) -> Result<Vec<OneOffCost>>;

    /// Fails with `NotFound` when no profile was ever saved
    fn get_wealth_profile(&self, workspace_id: i64) -> Result<WealthProfile>;
    fn upsert_wealth_profile(&self, workspace_id: i64, profile: &WealthProfile) -> Result<()>;

    fn list_inclusions(&self, workspace_id: i64, month: YearMonth) -> Result<Vec<PaymentInclusion>>;
    fn count_inclusions(&self, workspace_id: i64, month: YearMonth) -> Result<u64>;
    /// Fails with `NotFound` when the cost is not included for `month`
    fn get_inclusion(
        &self,
        workspace_id: i64,
        fixed_cost_id: i64,
        month: YearMonth,
    ) -> Result<PaymentInclusion>;
    /// Returns false (and writes nothing) if the inclusion already exists
    fn create_inclusion(&self, inclusion: &PaymentInclusion) -> Result<bool>;
    /// Fails with `NotFound` when there is no matching record
    fn update_inclusion(&self, inclusion: &PaymentInclusion) -> Result<()>;
    /// Fails with `NotFound` when there is no matching record
    fn delete_inclusion(&self, workspace_id: i64, fixed_cost_id: i64, month: YearMonth)
        -> Result<()>;

    fn list_pending_one_offs(&self, workspace_id: i64, month: YearMonth)
        -> Result<Vec<PendingOneOff>>;
    /// Fails with `NotFound` for an unknown id or a foreign workspace
    fn get_pending_one_off(&self, workspace_id: i64, id: i64) -> Result<PendingOneOff>;
    fn create_pending_one_off(
        &self,
        workspace_id: i64,
        name: &str,
        amount: i64,
        month: YearMonth,
    ) -> Result<i64>;
    fn update_pending_one_off(&self, cost: &PendingOneOff) -> Result<()>;
    fn delete_pending_one_off(&self, workspace_id: i64, id: i64) -> Result<()>;
}
