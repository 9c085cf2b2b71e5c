//! # Run parameters
//!
//! [`CheckParams`] controls which campaigns are tested and how densely the ephemeris is
//! sampled. Use [`CheckParams::default`] or the validating builder:
//!
//! ```rust
//! use k2ephem::check_params::CheckParams;
//!
//! let params = CheckParams::builder()
//!     .first_campaign(5)
//!     .last_campaign(8)
//!     .step_size_days(0.5)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.first_campaign, 5);
//! ```
use crate::{
    constants::{CampaignNumber, DEFAULT_STEP_SIZE_DAYS, FIRST_CAMPAIGN, LAST_CAMPAIGN},
    k2ephem_errors::K2EphemError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckParams {
    pub first_campaign: CampaignNumber,
    pub last_campaign: CampaignNumber,
    /// Ephemeris cadence in days; sub-day values are sent to Horizons in hours.
    pub step_size_days: f64,
}

impl CheckParams {
    pub fn builder() -> CheckParamsBuilder {
        CheckParamsBuilder::new()
    }
}

impl Default for CheckParams {
    fn default() -> Self {
        CheckParams {
            first_campaign: FIRST_CAMPAIGN,
            last_campaign: LAST_CAMPAIGN,
            step_size_days: DEFAULT_STEP_SIZE_DAYS,
        }
    }
}

/// Builder for [`CheckParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct CheckParamsBuilder {
    params: CheckParams,
}

impl CheckParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: CheckParams::default(),
        }
    }

    pub fn first_campaign(mut self, v: CampaignNumber) -> Self {
        self.params.first_campaign = v;
        self
    }
    pub fn last_campaign(mut self, v: CampaignNumber) -> Self {
        self.params.last_campaign = v;
        self
    }
    pub fn step_size_days(mut self, v: f64) -> Self {
        self.params.step_size_days = v;
        self
    }

    /// Check the parameters and produce a [`CheckParams`].
    ///
    /// Fails when the campaign range is reversed or the step size is not a positive,
    /// finite number of days.
    pub fn build(self) -> Result<CheckParams, K2EphemError> {
        let p = self.params;
        if p.first_campaign > p.last_campaign {
            return Err(K2EphemError::InvalidCampaignRange {
                first: p.first_campaign,
                last: p.last_campaign,
            });
        }
        if !p.step_size_days.is_finite() || p.step_size_days <= 0.0 {
            return Err(K2EphemError::InvalidParameter(
                "step_size_days must be > 0".into(),
            ));
        }
        Ok(p)
    }
}

#[cfg(test)]
mod check_params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = CheckParams::builder().build().unwrap();
        assert_eq!(params, CheckParams::default());
        assert_eq!(params.first_campaign, FIRST_CAMPAIGN);
        assert_eq!(params.last_campaign, LAST_CAMPAIGN);
    }

    #[test]
    fn test_reversed_range() {
        let err = CheckParams::builder()
            .first_campaign(9)
            .last_campaign(3)
            .build()
            .unwrap_err();
        assert_eq!(err, K2EphemError::InvalidCampaignRange { first: 9, last: 3 });
    }

    #[test]
    fn test_bad_step() {
        for step in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            assert!(CheckParams::builder().step_size_days(step).build().is_err());
        }
        let params = CheckParams::builder()
            .first_campaign(7)
            .last_campaign(7)
            .step_size_days(0.25)
            .build()
            .unwrap();
        assert_eq!(params.step_size_days, 0.25);
    }
}
