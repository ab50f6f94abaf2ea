//! Runway Core Library
//!
//! Recurring-cost calendar and financial projection engine:
//! - Calendar arithmetic on whole months, with an injectable clock
//! - Recurring and one-off cost model (billing cycles, saving semantics)
//! - Rolling balance timeline with per-month detail
//! - Trailing surplus statistics
//! - Multi-year three-scenario wealth forecast
//! - Safe-to-spend ledger for the current month
//! - SQLite store with connection pooling and optional encryption

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod costs;
pub mod db;
pub mod error;
pub mod forecast;
pub mod ledger;
pub mod profile;
pub mod store;
pub mod surplus;
pub mod timeline;

pub use calendar::{is_relevant, Clock, FixedClock, SystemClock, YearMonth};
pub use catalog::CostCatalog;
pub use config::EngineConfig;
pub use costs::{
    CostIntent, Cycle, NewOneOffCost, NewRecurringCost, OneOffCost, PaymentInclusion,
    PendingOneOff, RecurringCost, Schedule,
};
pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{ForecastPoint, ForecastResponse, ForecastSimulator};
pub use ledger::{SaveToSpendResponse, SpendLedger};
pub use profile::{ProfileService, WealthProfile};
pub use store::{FinanceStore, Workspace};
pub use surplus::{calculate_surplus_statistics, SurplusPoint, SurplusStatistics};
pub use timeline::{Overview, OverviewDetail, OverviewEntry, TimelineProjector};
