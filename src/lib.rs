//! # k2ephem
//!
//! Check whether a Solar System body (asteroid, comet, planet) was or will be observable
//! during the campaigns of NASA's K2 mission.
//!
//! The ephemeris of the target, as seen from the Kepler spacecraft, is requested from
//! JPL/Horizons ([`horizons`]), parsed into a time-indexed table ([`ephemeris`]) and each
//! sample is tested against the footprint of the campaign it falls in ([`visibility`]).
//!
//! ```rust,no_run
//! use k2ephem::{check_target, CampaignCatalog, CheckParams, HorizonsEnv};
//!
//! let env = HorizonsEnv::new().unwrap();
//! let catalog = CampaignCatalog::k2();
//! for result in check_target(&env, &catalog, "999", &CheckParams::default()).unwrap() {
//!     println!("{result}");
//! }
//! ```
pub mod campaigns;
pub mod check_params;
pub mod constants;
pub mod env_state;
pub mod ephemeris;
pub mod footprint;
pub mod horizons;
pub mod k2ephem_errors;
pub mod time;
pub mod visibility;

pub use campaigns::{Campaign, CampaignCatalog, CampaignWindow};
pub use check_params::CheckParams;
pub use env_state::HorizonsEnv;
pub use ephemeris::{EphemerisRecord, EphemerisTable};
pub use footprint::{FootprintModel, KeplerFov};
pub use k2ephem_errors::K2EphemError;
pub use visibility::{check_target, check_visibility, fetch_and_check, VisibilityResult};
