//! # Campaign visibility
//!
//! For each campaign of a range, slice the ephemeris to the campaign window and look for a
//! sample that falls on the footprint. A campaign with at least one such sample is reported
//! once, with ranges of magnitude, motion and position over the whole window; campaigns
//! without one are left out of the result.
//!
//! [`check_target`] chains the three stages: Horizons request, parsing, evaluation.
//! [`fetch_and_check`] does the same and also hands back the parsed ephemeris.
use std::{fmt, io::Write};

use hifitime::Epoch;
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::{
    check_params::CheckParams,
    constants::{CampaignNumber, MAG_SENTINEL},
    env_state::HorizonsEnv,
    ephemeris::{EphemerisRecord, EphemerisTable},
    footprint::FootprintModel,
    horizons::fetch_ephemeris,
    k2ephem_errors::K2EphemError,
};

/// Closed range of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Range of the values, `None` when there are none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
            .map(|(min, max)| ValueRange { min, max })
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} to {:.2}", self.min, self.max)
    }
}

/// Statistics over the samples of a campaign window.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilitySummary {
    /// `-99.9 .. -99.9` when the target has no numeric magnitude
    pub mag: ValueRange,
    /// `None` when Horizons returned no rates
    pub motion: Option<ValueRange>,
    pub ra: ValueRange,
    pub dec: ValueRange,
    pub n_samples: usize,
}

impl VisibilitySummary {
    /// Summarize a non-empty slice of the ephemeris.
    fn from_rows(rows: &[EphemerisRecord]) -> Option<Self> {
        let mag = ValueRange::from_values(rows.iter().filter_map(|r| r.mag)).unwrap_or(ValueRange {
            min: MAG_SENTINEL,
            max: MAG_SENTINEL,
        });
        Some(VisibilitySummary {
            mag,
            motion: ValueRange::from_values(rows.iter().filter_map(|r| r.motion)),
            ra: ValueRange::from_values(rows.iter().map(|r| r.ra))?,
            dec: ValueRange::from_values(rows.iter().map(|r| r.dec))?,
            n_samples: rows.len(),
        })
    }
}

/// Outcome for a campaign where the target lands on silicon.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityResult {
    pub campaign: CampaignNumber,
    pub visible: bool,
    /// Epoch of the first sample found on silicon
    pub first_on_silicon: Epoch,
    pub summary: VisibilitySummary,
}

impl fmt::Display for VisibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(
            f,
            "Campaign C{}: visible (first on silicon at {})",
            self.campaign, self.first_on_silicon
        )?;
        if s.mag.min == MAG_SENTINEL {
            writeln!(f, "    magnitude : n.a.")?;
        } else {
            writeln!(f, "    magnitude : {}", s.mag)?;
        }
        match &s.motion {
            Some(motion) => writeln!(f, "    motion    : {motion} arcsec/h")?,
            None => writeln!(f, "    motion    : n.a.")?,
        }
        writeln!(f, "    ra        : {} deg", s.ra)?;
        write!(f, "    dec       : {} deg", s.dec)
    }
}

fn check_range(first: CampaignNumber, last: CampaignNumber) -> Result<(), K2EphemError> {
    if first > last {
        return Err(K2EphemError::InvalidCampaignRange { first, last });
    }
    Ok(())
}

/// Campaigns of `first..=last` during which the target falls on silicon.
///
/// Arguments
/// ---------
/// * `table`: ephemeris of the target
/// * `model`: campaign windows and footprints
/// * `first`, `last`: campaign range, both included
///
/// Return
/// ------
/// * One [`VisibilityResult`] per visible campaign, in campaign order
pub fn check_visibility<M: FootprintModel>(
    table: &EphemerisTable,
    model: &M,
    first: CampaignNumber,
    last: CampaignNumber,
) -> Result<Vec<VisibilityResult>, K2EphemError> {
    check_range(first, last)?;

    let mut results = Vec::new();
    for campaign in first..=last {
        let footprint = model.footprint_of(campaign)?;
        let rows = table.slice(&model.window_of(campaign)?);

        let Some(hit) = rows
            .iter()
            .find(|r| model.is_on_footprint(r.ra, r.dec, &footprint, true))
        else {
            continue;
        };
        let Some(summary) = VisibilitySummary::from_rows(rows) else {
            continue;
        };
        debug!("Target is visible in C{campaign} from {}", hit.epoch);
        results.push(VisibilityResult {
            campaign,
            visible: true,
            first_on_silicon: hit.epoch,
            summary,
        });
    }
    Ok(results)
}

/// Fetch, parse and evaluate in one go, keeping the parsed ephemeris.
///
/// Return
/// ------
/// * the ephemeris of the target over the campaign range, for further use (sky path export)
/// * the visible campaigns, as [`check_visibility`]
pub fn fetch_and_check<M: FootprintModel>(
    env: &HorizonsEnv,
    model: &M,
    target: &str,
    params: &CheckParams,
) -> Result<(EphemerisTable, Vec<VisibilityResult>), K2EphemError> {
    let payload = fetch_ephemeris(
        env,
        model,
        target,
        params.first_campaign,
        params.last_campaign,
        params.step_size_days,
    )?;
    let table = EphemerisTable::from_horizons(&payload)?;
    let results = check_visibility(&table, model, params.first_campaign, params.last_campaign)?;
    Ok((table, results))
}

/// Fetch, parse and evaluate in one go.
pub fn check_target<M: FootprintModel>(
    env: &HorizonsEnv,
    model: &M,
    target: &str,
    params: &CheckParams,
) -> Result<Vec<VisibilityResult>, K2EphemError> {
    fetch_and_check(env, model, target, params).map(|(_, results)| results)
}

/// One sample of the sky path, as exported for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkyPathPoint {
    pub campaign: CampaignNumber,
    pub epoch: String,
    pub ra: f64,
    pub dec: f64,
    pub mag: Option<f64>,
    pub motion: Option<f64>,
    pub on_silicon: bool,
}

/// Every sample of every campaign window, flagged on/off silicon.
///
/// Unlike [`check_visibility`], every row of the window is tested.
pub fn sky_path<M: FootprintModel>(
    table: &EphemerisTable,
    model: &M,
    first: CampaignNumber,
    last: CampaignNumber,
) -> Result<Vec<SkyPathPoint>, K2EphemError> {
    check_range(first, last)?;

    let mut points = Vec::new();
    for campaign in first..=last {
        let footprint = model.footprint_of(campaign)?;
        for row in table.slice(&model.window_of(campaign)?) {
            points.push(SkyPathPoint {
                campaign,
                epoch: row.epoch.to_string(),
                ra: row.ra,
                dec: row.dec,
                mag: row.mag,
                motion: row.motion,
                on_silicon: model.is_on_footprint(row.ra, row.dec, &footprint, true),
            });
        }
    }
    Ok(points)
}

/// Write a sky path as CSV, header included.
pub fn write_sky_path_csv<W: Write>(points: &[SkyPathPoint], writer: W) -> Result<(), K2EphemError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod visibility_test {
    use super::*;
    use crate::campaigns::CampaignWindow;
    use approx::assert_relative_eq;

    /// Campaign n spans October 10n+1 to 10n+10 of 2015; footprint is a box in ra/dec.
    struct BoxModel;

    struct RaDecBox {
        ra: (f64, f64),
        dec: (f64, f64),
    }

    impl FootprintModel for BoxModel {
        type Footprint = RaDecBox;

        fn window_of(&self, campaign: CampaignNumber) -> Result<CampaignWindow, K2EphemError> {
            if campaign > 2 {
                return Err(K2EphemError::UnknownCampaign(campaign));
            }
            let day = campaign * 10 + 1;
            CampaignWindow::from_dates(
                &format!("2015-10-{day:02}"),
                &format!("2015-10-{:02}", day + 9),
            )
        }

        fn footprint_of(&self, _campaign: CampaignNumber) -> Result<RaDecBox, K2EphemError> {
            Ok(RaDecBox {
                ra: (10.0, 20.0),
                dec: (-5.0, 5.0),
            })
        }

        fn is_on_footprint(&self, ra: f64, dec: f64, fp: &RaDecBox, _quiet: bool) -> bool {
            (fp.ra.0..=fp.ra.1).contains(&ra) && (fp.dec.0..=fp.dec.1).contains(&dec)
        }
    }

    fn payload(rows: &[&str]) -> String {
        format!(
            " Date__(UT)__HR:MN, , , R.A._(a-app), DEC_(a-app), dRA*cosD,d(DEC)/dt,  APmag,\n\
             ****\n$$SOE\n{}\n$$EOE\n",
            rows.join("\n")
        )
    }

    #[test]
    fn test_value_range() {
        let range = ValueRange::from_values([3.0, -1.0, 2.5]).unwrap();
        assert_eq!(range, ValueRange { min: -1.0, max: 3.0 });
        assert_eq!(ValueRange::from_values(Vec::<f64>::new()), None);
        assert_eq!(
            ValueRange::from_values([4.0]),
            Some(ValueRange { min: 4.0, max: 4.0 })
        );
    }

    #[test]
    fn test_only_visible_campaigns_are_reported() {
        let table = EphemerisTable::from_horizons(&payload(&[
            " 2015-Oct-02 00:00, , , 50.0, 0.0, 3.0, 4.0, 15.0,",
            " 2015-Oct-12 00:00, , , 15.0, 0.0, 6.0, 8.0, 14.0,",
            " 2015-Oct-15 00:00, , , 55.0, 1.0, 0.0, 1.0, 16.0,",
        ]))
        .unwrap();

        let results = check_visibility(&table, &BoxModel, 0, 2).unwrap();
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.campaign, 1);
        assert!(result.visible);
        assert_eq!(
            result.first_on_silicon,
            Epoch::from_gregorian_utc_at_midnight(2015, 10, 12)
        );

        // ranges cover the whole window, not only the visible sample
        let s = &result.summary;
        assert_eq!(s.n_samples, 2);
        assert_eq!(s.mag, ValueRange { min: 14.0, max: 16.0 });
        assert_eq!(s.ra, ValueRange { min: 15.0, max: 55.0 });
        assert_eq!(s.dec, ValueRange { min: 0.0, max: 1.0 });
        let motion = s.motion.unwrap();
        assert_relative_eq!(motion.max, 10.0);
        assert_relative_eq!(motion.min, 1.0);
    }

    #[test]
    fn test_magnitude_sentinel() {
        let table = EphemerisTable::from_horizons(&payload(&[
            " 2015-Oct-02 00:00, , , 12.0, 0.0, n.a., n.a., n.a.,",
        ]))
        .unwrap();
        let results = check_visibility(&table, &BoxModel, 0, 0).unwrap();
        assert_eq!(results.len(), 1);
        let s = &results[0].summary;
        assert_eq!(s.mag, ValueRange { min: -99.9, max: -99.9 });
        assert_eq!(s.motion, None);
        assert!(results[0].to_string().contains("magnitude : n.a."));
    }

    #[test]
    fn test_range_errors() {
        let table = EphemerisTable::from_horizons(&payload(&[
            " 2015-Oct-02 00:00, , , 12.0, 0.0, 1.0, 1.0, 15.0,",
        ]))
        .unwrap();
        assert_eq!(
            check_visibility(&table, &BoxModel, 2, 1),
            Err(K2EphemError::InvalidCampaignRange { first: 2, last: 1 })
        );
        assert_eq!(
            check_visibility(&table, &BoxModel, 0, 3),
            Err(K2EphemError::UnknownCampaign(3))
        );
    }

    #[test]
    fn test_fetch_and_check_stops_before_parsing() {
        let env = HorizonsEnv::with_settings(
            "http://127.0.0.1:9/horizons_batch.cgi",
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let params = CheckParams::builder()
            .first_campaign(0)
            .last_campaign(1)
            .build()
            .unwrap();
        assert!(matches!(
            fetch_and_check(&env, &BoxModel, "999", &params),
            Err(K2EphemError::FetchFailure(_))
        ));
        assert!(matches!(
            check_target(&env, &BoxModel, "999", &params),
            Err(K2EphemError::FetchFailure(_))
        ));

        let unknown = CheckParams {
            last_campaign: 3,
            ..params
        };
        assert_eq!(
            fetch_and_check(&env, &BoxModel, "999", &unknown),
            Err(K2EphemError::UnknownCampaign(3))
        );
    }

    #[test]
    fn test_sky_path_csv() {
        let table = EphemerisTable::from_horizons(&payload(&[
            " 2015-Oct-02 00:00, , , 12.0, 0.0, 1.0, 1.0, 15.0,",
            " 2015-Oct-05 00:00, , , 30.0, 0.0, 1.0, 1.0, n.a.,",
            " 2015-Oct-30 00:00, , , 30.0, 0.0, 1.0, 1.0, 15.0,",
        ]))
        .unwrap();
        let points = sky_path(&table, &BoxModel, 0, 1).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points[0].on_silicon);
        assert!(!points[1].on_silicon);

        let mut buffer = Vec::new();
        write_sky_path_csv(&points, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("campaign,epoch,ra,dec,mag,motion,on_silicon")
        );
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(2).unwrap().contains(",30.0,0.0,,"));
    }
}
