//! # JPL/Horizons observer-table queries
//!
//! Builds the batch query asking Horizons for the astrometric position, rates and visual
//! magnitude of a target as seen from the Kepler spacecraft, over the time span of a
//! range of K2 campaigns, and returns the raw answer.
//!
//! The response is not parsed here; see [`crate::ephemeris::EphemerisTable::from_horizons`].
use std::fmt;

use hifitime::Epoch;
use itertools::Itertools;
use log::info;

use crate::{
    constants::{CampaignNumber, HORIZONS_QUANTITIES, HOURS_PER_DAY, KEPLER_CENTER},
    env_state::HorizonsEnv,
    footprint::FootprintModel,
    k2ephem_errors::K2EphemError,
    time::format_calendar_date,
};

/// Sampling cadence of the ephemeris.
///
/// Horizons only takes whole numbers of a unit, so cadences below one day
/// are expressed in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSize {
    Days(u32),
    Hours(u32),
}

impl StepSize {
    /// Convert a cadence in (possibly fractional) days.
    pub fn from_days(step_size_days: f64) -> Result<Self, K2EphemError> {
        if !step_size_days.is_finite() || step_size_days <= 0.0 {
            return Err(K2EphemError::InvalidParameter(format!(
                "step size must be a positive number of days, got {step_size_days}"
            )));
        }
        if step_size_days < 1.0 {
            let hours = (step_size_days * HOURS_PER_DAY).round().max(1.0);
            Ok(StepSize::Hours(hours as u32))
        } else {
            Ok(StepSize::Days(step_size_days.round() as u32))
        }
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSize::Days(n) => write!(f, "{n} d"),
            StepSize::Hours(n) => write!(f, "{n} h"),
        }
    }
}

/// One observer-table request.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonsQuery {
    pub target: String,
    pub start: Epoch,
    pub stop: Epoch,
    pub step: StepSize,
}

/// Percent-encode the characters Horizons chokes on in a query value.
fn escape_value(value: &str) -> String {
    value.replace(' ', "%20")
}

impl HorizonsQuery {
    /// Full request URL on the given batch endpoint.
    ///
    /// Every value is quoted with `%27` as the batch interface expects.
    pub fn to_url(&self, base_url: &str) -> String {
        let start = format_calendar_date(&self.start);
        let stop = format_calendar_date(&self.stop);
        let step = self.step.to_string();
        let params = [
            ("COMMAND", self.target.as_str()),
            ("MAKE_EPHEM", "YES"),
            ("CENTER", KEPLER_CENTER),
            ("TABLE_TYPE", "OBSERVER"),
            ("START_TIME", start.as_str()),
            ("STOP_TIME", stop.as_str()),
            ("STEP_SIZE", step.as_str()),
            ("ANG_FORMAT", "DEG"),
            ("QUANTITIES", HORIZONS_QUANTITIES),
            ("CSV_FORMAT", "YES"),
        ];
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}=%27{}%27", escape_value(value)))
            .join("&");
        format!("{base_url}?batch=1&{query}")
    }
}

/// Request the Horizons ephemeris of `target` over campaigns `first..=last`.
///
/// Arguments
/// ---------
/// * `env`: HTTP environment
/// * `model`: source of the campaign windows
/// * `target`: name or designation known to Horizons
/// * `first`, `last`: campaign range, the query spans from the start of `first` to the end of `last`
/// * `step_size_days`: cadence, sub-day cadences are sent in hours
///
/// Return
/// ------
/// * The raw Horizons response, unparsed
pub fn fetch_ephemeris<M: FootprintModel>(
    env: &HorizonsEnv,
    model: &M,
    target: &str,
    first: CampaignNumber,
    last: CampaignNumber,
    step_size_days: f64,
) -> Result<String, K2EphemError> {
    if first > last {
        return Err(K2EphemError::InvalidCampaignRange { first, last });
    }
    let query = HorizonsQuery {
        target: target.to_string(),
        start: model.window_of(first)?.start,
        stop: model.window_of(last)?.stop,
        step: StepSize::from_days(step_size_days)?,
    };
    info!("Obtaining ephemeris for {target} from JPL/Horizons...");
    env.get_from_url(&query.to_url(&env.base_url))
}
