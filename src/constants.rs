//! # Constants and type definitions for k2ephem
//!
//! This module centralizes the **conversion factors**, **Horizons query constants** and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, days ↔ hours)
//! - JPL/Horizons endpoint and the fixed query parameters
//! - Ephemeris block sentinels
//! - Defaults for the campaign range and the sampling cadence

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of hours in a day
pub const HOURS_PER_DAY: f64 = 24.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Angular rate in arcseconds per hour
pub type ArcsecPerHour = f64;

/// K2 campaign number (C0, C1, ...)
pub type CampaignNumber = u32;

// -------------------------------------------------------------------------------------------------
// JPL/Horizons
// -------------------------------------------------------------------------------------------------

/// Batch endpoint of JPL/Horizons
pub const HORIZONS_URL: &str = "https://ssd.jpl.nasa.gov/horizons_batch.cgi";

/// Observer location: the Kepler spacecraft (NAIF id -227)
pub const KEPLER_CENTER: &str = "500@-227";

/// Observer table quantities: astrometric RA/Dec, rates, visual magnitude
pub const HORIZONS_QUANTITIES: &str = "2,3,9";

/// First line of the ephemeris block
pub const START_OF_EPHEMERIS: &str = "$$SOE";

/// Last line of the ephemeris block
pub const END_OF_EPHEMERIS: &str = "$$EOE";

/// Magnitude range reported when the target class has no numeric magnitude
pub const MAG_SENTINEL: f64 = -99.9;

// -------------------------------------------------------------------------------------------------
// Defaults
// -------------------------------------------------------------------------------------------------

/// First campaign tested by default
pub const FIRST_CAMPAIGN: CampaignNumber = 0;

/// Last campaign tested by default (K2 ended during C19)
pub const LAST_CAMPAIGN: CampaignNumber = 19;

/// Default ephemeris cadence in days
pub const DEFAULT_STEP_SIZE_DAYS: f64 = 2.0;

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
