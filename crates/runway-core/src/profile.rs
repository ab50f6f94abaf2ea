//! Wealth profile: the parameters of the wealth forecast
//!
//! The forecast simulator refuses to run without a stored profile. Defaults
//! are synthesized here, for display and editing, and only when the store
//! reports `NotFound`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::store::FinanceStore;

/// Lowest and highest annual rate percentage accepted
pub const RATE_RANGE: (f64, f64) = (-20.0, 100.0);

/// Longest forecast accepted, in years
pub const MAX_DURATION_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthProfile {
    pub current_wealth: f64,
    pub forecast_duration_years: u32,
    pub rate_worst_case: f64,
    pub rate_average_case: f64,
    pub rate_best_case: f64,
}

impl Default for WealthProfile {
    fn default() -> Self {
        Self {
            current_wealth: 0.0,
            forecast_duration_years: 10,
            rate_worst_case: 3.0,
            rate_average_case: 5.0,
            rate_best_case: 7.0,
        }
    }
}

impl WealthProfile {
    /// Check ranges and scenario ordering. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if !self.current_wealth.is_finite() || self.current_wealth < 0.0 {
            return Err(Error::Validation(
                "current wealth must be non-negative".to_string(),
            ));
        }
        if !(1..=MAX_DURATION_YEARS).contains(&self.forecast_duration_years) {
            return Err(Error::Validation(format!(
                "duration must be between 1 and {} years",
                MAX_DURATION_YEARS
            )));
        }

        let rates = [
            self.rate_worst_case,
            self.rate_average_case,
            self.rate_best_case,
        ];
        if !rates.iter().all(|r| is_valid_rate(*r)) {
            return Err(Error::Validation(format!(
                "rates must be between {} and {}",
                RATE_RANGE.0, RATE_RANGE.1
            )));
        }
        if self.rate_worst_case > self.rate_average_case
            || self.rate_average_case > self.rate_best_case
        {
            return Err(Error::Validation(
                "rates consistency error: worst <= average <= best".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_valid_rate(rate: f64) -> bool {
    rate >= RATE_RANGE.0 && rate <= RATE_RANGE.1
}

/// Reads and writes wealth profiles through the store
pub struct ProfileService<'a, S: FinanceStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: FinanceStore + ?Sized> ProfileService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The stored profile, or defaults when none exists yet
    pub fn get_profile(&self, workspace_id: i64) -> Result<WealthProfile> {
        match self.store.get_wealth_profile(workspace_id) {
            Ok(profile) => Ok(profile),
            Err(e) if e.is_not_found() => Ok(WealthProfile::default()),
            Err(e) => Err(e),
        }
    }

    pub fn update_profile(&self, workspace_id: i64, profile: &WealthProfile) -> Result<()> {
        profile.validate()?;
        self.store.upsert_wealth_profile(workspace_id, profile)?;
        info!(workspace_id, "Wealth profile updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> WealthProfile {
        WealthProfile {
            current_wealth: 10_000.0,
            forecast_duration_years: 5,
            rate_worst_case: 0.0,
            rate_average_case: 5.0,
            rate_best_case: 10.0,
        }
    }

    #[test]
    fn test_valid_profile() {
        assert!(valid().validate().is_ok());
        assert!(WealthProfile::default().validate().is_ok());
    }

    #[test]
    fn test_negative_wealth_rejected() {
        let profile = WealthProfile {
            current_wealth: -1.0,
            ..valid()
        };
        assert!(matches!(profile.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_duration_bounds() {
        for years in [0, 101] {
            let profile = WealthProfile {
                forecast_duration_years: years,
                ..valid()
            };
            assert!(profile.validate().is_err(), "{} years should fail", years);
        }
        for years in [1, 100] {
            let profile = WealthProfile {
                forecast_duration_years: years,
                ..valid()
            };
            assert!(profile.validate().is_ok(), "{} years should pass", years);
        }
    }

    #[test]
    fn test_rate_bounds() {
        let too_low = WealthProfile {
            rate_worst_case: -20.5,
            ..valid()
        };
        assert!(too_low.validate().is_err());

        let too_high = WealthProfile {
            rate_best_case: 100.5,
            ..valid()
        };
        assert!(too_high.validate().is_err());

        let edges = WealthProfile {
            rate_worst_case: -20.0,
            rate_average_case: 0.0,
            rate_best_case: 100.0,
            ..valid()
        };
        assert!(edges.validate().is_ok());
    }

    #[test]
    fn test_rate_ordering() {
        let inverted = WealthProfile {
            rate_worst_case: 6.0,
            rate_average_case: 5.0,
            ..valid()
        };
        let err = inverted.validate().unwrap_err();
        assert!(err.to_string().contains("worst <= average <= best"));

        let all_equal = WealthProfile {
            rate_worst_case: 4.0,
            rate_average_case: 4.0,
            rate_best_case: 4.0,
            ..valid()
        };
        assert!(all_equal.validate().is_ok());
    }
}
