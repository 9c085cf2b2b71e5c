use approx::assert_relative_eq;
use k2ephem::{
    footprint::FootprintModel, visibility::ValueRange, CampaignWindow, K2EphemError,
};

/// Horizons-like payload around the given data rows.
pub fn horizons_payload(mag_label: &str, rows: &[&str]) -> String {
    format!(
        "\
*******************************************************************************
 Revised: Oct 11, 2017             Test target
*******************************************************************************
 Date__(UT)__HR:MN, , , R.A._(a-app), DEC_(a-app), dRA*cosD,d(DEC)/dt,  {mag_label},  S-brt,
***************************************************************************************
$$SOE
{}
$$EOE
***************************************************************************************
Column meaning:
",
        rows.join("\n")
    )
}

/// A single campaign spanning October 2015, footprint a disk of 1 degree around (20, 0).
pub struct DiskModel;

pub struct Disk {
    pub ra: f64,
    pub dec: f64,
    pub radius: f64,
}

impl FootprintModel for DiskModel {
    type Footprint = Disk;

    fn window_of(&self, campaign: u32) -> Result<CampaignWindow, K2EphemError> {
        match campaign {
            0 => CampaignWindow::from_dates("2015-10-01", "2015-10-31"),
            _ => Err(K2EphemError::UnknownCampaign(campaign)),
        }
    }

    fn footprint_of(&self, campaign: u32) -> Result<Disk, K2EphemError> {
        self.window_of(campaign)?;
        Ok(Disk {
            ra: 20.0,
            dec: 0.0,
            radius: 1.0,
        })
    }

    fn is_on_footprint(&self, ra: f64, dec: f64, disk: &Disk, _quiet: bool) -> bool {
        (ra - disk.ra).hypot(dec - disk.dec) <= disk.radius
    }
}

pub fn assert_range_close(actual: &ValueRange, min: f64, max: f64) {
    assert_relative_eq!(actual.min, min, epsilon = 1e-9);
    assert_relative_eq!(actual.max, max, epsilon = 1e-9);
}
