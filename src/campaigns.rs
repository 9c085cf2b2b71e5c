//! # K2 campaign catalog
//!
//! Pointings and observing windows of the K2 campaigns.
//!
//! A [`CampaignCatalog`] is either the built-in table ([`CampaignCatalog::k2`]) or a CSV file
//! with the columns `campaign,ra,dec,roll,start,stop` ([`CampaignCatalog::from_csv_path`]),
//! where `ra`/`dec` are the boresight in degrees, `roll` the spacecraft roll in degrees and
//! `start`/`stop` calendar dates (`YYYY-MM-DD`).
//!
//! ## Windows
//!
//! A campaign window spans from midnight UTC of its start date to the last instant of its
//! stop date, both ends included. This is the range used to slice an ephemeris table.
use std::{fs::File, io::Read, path::Path};

use hifitime::Epoch;
use serde::Deserialize;

use crate::{
    constants::{CampaignNumber, Degree},
    k2ephem_errors::K2EphemError,
    time::{end_of_day, parse_calendar_date},
};

/// Closed time interval `[start, stop]` of a campaign (UTC).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CampaignWindow {
    pub start: Epoch,
    pub stop: Epoch,
}

impl CampaignWindow {
    /// Build a window from two calendar dates, the stop day being fully included.
    pub fn from_dates(start: &str, stop: &str) -> Result<Self, K2EphemError> {
        let start = parse_calendar_date(start)?;
        let stop = end_of_day(&parse_calendar_date(stop)?);
        Ok(CampaignWindow { start, stop })
    }

    pub fn contains(&self, epoch: &Epoch) -> bool {
        self.start <= *epoch && *epoch <= self.stop
    }
}

/// One K2 campaign: where the spacecraft pointed and when.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub number: CampaignNumber,
    /// Boresight right ascension
    pub ra: Degree,
    /// Boresight declination
    pub dec: Degree,
    /// Spacecraft roll
    pub roll: Degree,
    pub window: CampaignWindow,
}

/// Row of a campaign CSV file.
#[derive(Debug, Deserialize)]
struct CampaignRecord {
    campaign: CampaignNumber,
    ra: f64,
    dec: f64,
    roll: f64,
    start: String,
    stop: String,
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = K2EphemError;

    fn try_from(record: CampaignRecord) -> Result<Self, Self::Error> {
        Ok(Campaign {
            number: record.campaign,
            ra: record.ra,
            dec: record.dec,
            roll: record.roll,
            window: CampaignWindow::from_dates(&record.start, &record.stop)?,
        })
    }
}

/// Built-in K2 field table: (campaign, ra, dec, roll, start, stop).
const K2_CAMPAIGNS: [(CampaignNumber, f64, f64, f64, &str, &str); 20] = [
    (0, 98.2964, 21.5879, 177.4811, "2014-03-08", "2014-05-27"),
    (1, 174.0004, 1.4217, 157.6989, "2014-05-30", "2014-08-21"),
    (2, 246.1264, -22.4473, 171.2284, "2014-08-23", "2014-11-13"),
    (3, 336.6637, -11.0960, -158.4991, "2014-11-14", "2015-02-03"),
    (4, 59.0759, 18.6605, -167.6992, "2015-02-07", "2015-04-23"),
    (5, 130.1576, 16.8296, 166.0591, "2015-04-27", "2015-07-10"),
    (6, 204.8650, -11.2953, -171.8250, "2015-07-14", "2015-09-30"),
    (7, 287.8299, -23.3608, -171.3476, "2015-10-04", "2015-12-26"),
    (8, 16.3379, 5.2551, -157.3711, "2016-01-03", "2016-03-23"),
    (9, 270.3544, -21.7798, 0.4407, "2016-04-21", "2016-07-01"),
    (10, 186.7794, -4.0271, 157.6280, "2016-07-06", "2016-09-20"),
    (11, 260.3880, -23.9759, 0.0, "2016-09-24", "2016-12-07"),
    (12, 351.6588, -5.1023, -161.2264, "2016-12-15", "2017-03-04"),
    (13, 72.7971, 20.7870, -172.7832, "2017-03-08", "2017-05-27"),
    (14, 160.6824, 6.8509, 157.3330, "2017-06-01", "2017-08-19"),
    (15, 233.6175, -20.0792, 157.7417, "2017-08-23", "2017-11-20"),
    (16, 133.7099, 18.5253, -163.2000, "2017-12-07", "2018-02-25"),
    (17, 202.5496, -7.7208, -171.4000, "2018-03-01", "2018-05-08"),
    (18, 130.1576, 16.8296, 166.0591, "2018-05-12", "2018-07-02"),
    (19, 347.2123, -4.2049, -157.5000, "2018-08-29", "2018-09-26"),
];

/// Ordered collection of campaigns, looked up by campaign number.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignCatalog {
    campaigns: Vec<Campaign>,
}

impl CampaignCatalog {
    /// Build a catalog from campaigns in any order.
    ///
    /// Fails with [`K2EphemError::DuplicateCampaign`] when a campaign number appears twice.
    pub fn new(mut campaigns: Vec<Campaign>) -> Result<Self, K2EphemError> {
        campaigns.sort_by_key(|c| c.number);
        if let Some(pair) = campaigns
            .windows(2)
            .find(|pair| pair[0].number == pair[1].number)
        {
            return Err(K2EphemError::DuplicateCampaign(pair[0].number));
        }
        Ok(CampaignCatalog { campaigns })
    }

    /// The K2 campaigns C0 to C19.
    pub fn k2() -> Self {
        let campaigns = K2_CAMPAIGNS
            .iter()
            .map(|&(number, ra, dec, roll, start, stop)| Campaign {
                number,
                ra,
                dec,
                roll,
                window: CampaignWindow::from_dates(start, stop)
                    .expect("built-in campaign dates are valid"),
            })
            .collect();
        CampaignCatalog::new(campaigns).expect("built-in campaign numbers are unique")
    }

    /// Read a catalog from CSV data with a `campaign,ra,dec,roll,start,stop` header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, K2EphemError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let campaigns = csv_reader
            .deserialize::<CampaignRecord>()
            .map(|record| Campaign::try_from(record?))
            .collect::<Result<Vec<_>, _>>()?;
        CampaignCatalog::new(campaigns)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, K2EphemError> {
        CampaignCatalog::from_csv_reader(File::open(path)?)
    }

    /// Get a campaign by number
    pub fn get(&self, number: CampaignNumber) -> Result<&Campaign, K2EphemError> {
        self.campaigns
            .binary_search_by_key(&number, |c| c.number)
            .map(|idx| &self.campaigns[idx])
            .map_err(|_| K2EphemError::UnknownCampaign(number))
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn last_number(&self) -> Option<CampaignNumber> {
        self.campaigns.last().map(|c| c.number)
    }
}
