//! # Campaign footprints
//!
//! The [`FootprintModel`] trait is the seam between the visibility evaluator and whatever
//! knows the campaign pointings: it hands out a campaign's time window, a footprint handle,
//! and answers whether a sky position falls on active silicon.
//!
//! [`CampaignCatalog`] implements it with a coarse model of the Kepler focal plane:
//! a 5×5 grid of square CCD modules without the four corners, projected on the sky around
//! the campaign boresight and rotated with the spacecraft roll. Modules lost during the
//! mission are removed. Each module is a spherical polygon whose great-circle edges are
//! stored as inward normals; a unit vector is on the module when all dot products are
//! non-negative. Gaps between the two CCDs of a module are not modelled.
use log::debug;
use nalgebra::Vector3;

use crate::{
    campaigns::{Campaign, CampaignCatalog, CampaignWindow},
    constants::{CampaignNumber, Degree, RADEG},
    k2ephem_errors::K2EphemError,
};

/// Source of campaign windows and footprints.
pub trait FootprintModel {
    /// Handle describing the footprint of one campaign.
    type Footprint;

    fn window_of(&self, campaign: CampaignNumber) -> Result<CampaignWindow, K2EphemError>;

    fn footprint_of(&self, campaign: CampaignNumber) -> Result<Self::Footprint, K2EphemError>;

    /// Is `(ra, dec)` on active silicon? `quiet` silences per-call diagnostics.
    fn is_on_footprint(
        &self,
        ra: Degree,
        dec: Degree,
        footprint: &Self::Footprint,
        quiet: bool,
    ) -> bool;
}

/// Distance between neighbouring module centers on the sky.
const MODULE_PITCH_DEG: f64 = 2.38;

/// Side of the active area of a module.
const MODULE_SIZE_DEG: f64 = 2.2;

/// Angle between the spacecraft roll and the focal plane axes.
const FOV_ROLL_OFFSET_DEG: f64 = 103.0;

/// Modules failed before the start of K2.
const FAILED_MODULES: [u8; 2] = [3, 7];

/// Module 4 failed during campaign 10.
const MODULE_4_FAILURE_CAMPAIGN: CampaignNumber = 10;

/// Unit vector pointing toward (ra, dec).
pub fn radec_to_unit(ra: Degree, dec: Degree) -> Vector3<f64> {
    let (ra, dec) = (ra * RADEG, dec * RADEG);
    Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
}

/// One CCD module outlined by four great circles.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulePatch {
    pub number: u8,
    edge_normals: [Vector3<f64>; 4],
}

impl ModulePatch {
    /// Build the patch from its corners, in either winding order.
    fn from_corners(number: u8, corners: [Vector3<f64>; 4]) -> Self {
        let center = corners.iter().sum::<Vector3<f64>>().normalize();
        let edge_normals = std::array::from_fn(|idx| {
            let normal = corners[idx].cross(&corners[(idx + 1) % 4]).normalize();
            if normal.dot(&center) < 0.0 {
                -normal
            } else {
                normal
            }
        });
        ModulePatch {
            number,
            edge_normals,
        }
    }

    pub fn contains(&self, direction: &Vector3<f64>) -> bool {
        self.edge_normals
            .iter()
            .all(|normal| normal.dot(direction) >= 0.0)
    }
}

/// Kepler focal plane for one campaign pointing.
#[derive(Debug, Clone, PartialEq)]
pub struct KeplerFov {
    boresight: Vector3<f64>,
    modules: Vec<ModulePatch>,
}

impl KeplerFov {
    /// Lay out the focal plane around the boresight of a campaign.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: boresight in degrees
    /// * `roll`: spacecraft roll in degrees
    /// * `failed_modules`: module numbers to leave out
    pub fn new(ra: Degree, dec: Degree, roll: Degree, failed_modules: &[u8]) -> Self {
        let boresight = radec_to_unit(ra, dec);
        let (ra_rad, dec_rad) = (ra * RADEG, dec * RADEG);

        // local east and north at the boresight, rotated into the focal plane axes
        let east = Vector3::new(-ra_rad.sin(), ra_rad.cos(), 0.0);
        let north = Vector3::new(
            -dec_rad.sin() * ra_rad.cos(),
            -dec_rad.sin() * ra_rad.sin(),
            dec_rad.cos(),
        );
        let theta = (roll + FOV_ROLL_OFFSET_DEG) * RADEG;
        let x_axis = east * theta.cos() + north * theta.sin();
        let y_axis = -east * theta.sin() + north * theta.cos();

        // gnomonic deprojection of focal plane offsets (degrees)
        let to_sky = |x: f64, y: f64| -> Vector3<f64> {
            (boresight + x_axis * (x * RADEG).tan() + y_axis * (y * RADEG).tan()).normalize()
        };

        let half = MODULE_SIZE_DEG / 2.0;
        let mut modules = Vec::with_capacity(21);
        for row in 0..5u8 {
            for col in 0..5u8 {
                let number = row * 5 + col + 1;
                let is_corner = matches!(number, 1 | 5 | 21 | 25);
                if is_corner || failed_modules.contains(&number) {
                    continue;
                }
                let cx = (f64::from(col) - 2.0) * MODULE_PITCH_DEG;
                let cy = (2.0 - f64::from(row)) * MODULE_PITCH_DEG;
                let corners = [
                    to_sky(cx - half, cy - half),
                    to_sky(cx + half, cy - half),
                    to_sky(cx + half, cy + half),
                    to_sky(cx - half, cy + half),
                ];
                modules.push(ModulePatch::from_corners(number, corners));
            }
        }

        KeplerFov { boresight, modules }
    }

    /// Module under (ra, dec), if any.
    pub fn module_at(&self, ra: Degree, dec: Degree) -> Option<u8> {
        let direction = radec_to_unit(ra, dec);
        if direction.dot(&self.boresight) <= 0.0 {
            return None;
        }
        self.modules
            .iter()
            .find(|module| module.contains(&direction))
            .map(|module| module.number)
    }

    pub fn modules(&self) -> &[ModulePatch] {
        &self.modules
    }
}

/// Modules unavailable during a campaign.
pub fn failed_modules(campaign: CampaignNumber) -> Vec<u8> {
    let mut failed = FAILED_MODULES.to_vec();
    if campaign >= MODULE_4_FAILURE_CAMPAIGN {
        failed.push(4);
    }
    failed
}

impl From<&Campaign> for KeplerFov {
    fn from(campaign: &Campaign) -> Self {
        KeplerFov::new(
            campaign.ra,
            campaign.dec,
            campaign.roll,
            &failed_modules(campaign.number),
        )
    }
}

impl FootprintModel for CampaignCatalog {
    type Footprint = KeplerFov;

    fn window_of(&self, campaign: CampaignNumber) -> Result<CampaignWindow, K2EphemError> {
        Ok(self.get(campaign)?.window)
    }

    fn footprint_of(&self, campaign: CampaignNumber) -> Result<KeplerFov, K2EphemError> {
        Ok(KeplerFov::from(self.get(campaign)?))
    }

    fn is_on_footprint(&self, ra: Degree, dec: Degree, footprint: &KeplerFov, quiet: bool) -> bool {
        let module = footprint.module_at(ra, dec);
        if !quiet {
            match module {
                Some(number) => debug!("({ra:.4}, {dec:.4}) is on module {number}"),
                None => debug!("({ra:.4}, {dec:.4}) is off silicon"),
            }
        }
        module.is_some()
    }
}
