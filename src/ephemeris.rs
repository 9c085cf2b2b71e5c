//! # Horizons ephemeris tables
//!
//! Turns the raw text answer of a Horizons observer-table request into an
//! [`EphemerisTable`]: one [`EphemerisRecord`] per sampled epoch, in ascending time order.
//!
//! ## Payload layout
//!
//! ```text
//! ... free text (target description, warnings, ...) ...
//!  Date__(UT)__HR:MN, , , R.A._(a-app), DEC_(a-app), dRA*cosD,d(DEC)/dt,  APmag,  S-brt,   <- header
//! ***************************************************************************************
//! $$SOE
//!  2015-Oct-04 00:00, , , 287.58344, -21.64262, 2.105541, -0.175617, 14.165, 2.212,
//!  ...
//! $$EOE
//! ... free text ...
//! ```
//!
//! The header sits two lines above `$$SOE`. The block between the sentinels is read as CSV,
//! the first column being the timestamp. Column labels are mapped to canonical names
//! (`ra`, `dec`, `dra`, `ddec`, `mag`); comets report `T-mag` where asteroids report `APmag`,
//! both end up as `mag`.
//!
//! ## Failure
//!
//! A payload without any row between the sentinels is what Horizons sends back when it does
//! not understand the request (unknown target, ambiguous designation, ...). The whole payload
//! is logged, since it carries Horizons' explanation, and returned in
//! [`K2EphemError::EphemFailure`].
use std::cmp::Ordering;

use hifitime::Epoch;
use log::{debug, error};

use crate::{
    campaigns::CampaignWindow,
    constants::{ArcsecPerHour, Degree, END_OF_EPHEMERIS, RADEG, START_OF_EPHEMERIS},
    k2ephem_errors::K2EphemError,
    time::parse_horizons_date,
};

/// Canonical ephemeris columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Ra,
    Dec,
    Dra,
    Ddec,
    Mag,
}

impl Column {
    /// Map a Horizons header label onto a canonical column.
    pub fn from_label(label: &str) -> Option<Column> {
        match label.trim() {
            "R.A._(a-app)" | "R.A._(ICRF/J2000.0)" | "R.A._(ICRF)" => Some(Column::Ra),
            "DEC_(a-app)" | "DEC_(ICRF/J2000.0)" | "DEC_(ICRF)" => Some(Column::Dec),
            "dRA*cosD" => Some(Column::Dra),
            "d(DEC)/dt" => Some(Column::Ddec),
            "APmag" | "T-mag" => Some(Column::Mag),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Column::Ra => "ra",
            Column::Dec => "dec",
            Column::Dra => "dra",
            Column::Ddec => "ddec",
            Column::Mag => "mag",
        }
    }
}

/// One sampled epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub epoch: Epoch,
    pub ra: Degree,
    pub dec: Degree,
    pub dra: Option<ArcsecPerHour>,
    pub ddec: Option<ArcsecPerHour>,
    /// `None` when Horizons has no magnitude for the target (`n.a.`)
    pub mag: Option<f64>,
    /// Total angular motion, see [`derive_motion`]
    pub motion: Option<ArcsecPerHour>,
}

/// Total angular motion from the RA and Dec rates.
///
/// `motion = sqrt((dra * cos(dec))² + ddec²)`, `dec` in degrees.
pub fn derive_motion(dra: ArcsecPerHour, ddec: ArcsecPerHour, dec: Degree) -> ArcsecPerHour {
    (dra * (dec * RADEG).cos()).hypot(ddec)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    BeforeData,
    InData,
}

/// Header line and data lines found between the sentinels.
#[derive(Debug, PartialEq)]
struct EphemerisBlock<'a> {
    header: &'a str,
    rows: Vec<&'a str>,
}

/// Locate the ephemeris block in a Horizons payload.
///
/// Return `None` when there is no `$$SOE`, no header line above it, or no row.
fn extract_block(payload: &str) -> Option<EphemerisBlock<'_>> {
    let mut state = ScanState::BeforeData;
    // the two lines preceding the current one, oldest first
    let mut lookback: [Option<&str>; 2] = [None, None];
    let mut header = None;
    let mut rows = Vec::new();

    for line in payload.lines() {
        match state {
            ScanState::BeforeData => {
                if line.starts_with(START_OF_EPHEMERIS) {
                    header = lookback[0];
                    state = ScanState::InData;
                } else {
                    lookback = [lookback[1], Some(line)];
                }
            }
            ScanState::InData => {
                if line.starts_with(END_OF_EPHEMERIS) {
                    break;
                }
                if !line.trim().is_empty() {
                    rows.push(line);
                }
            }
        }
    }

    match (header, rows.is_empty()) {
        (Some(header), false) => Some(EphemerisBlock { header, rows }),
        _ => None,
    }
}

/// Positions of the canonical columns in a header record.
#[derive(Debug, Default)]
struct ColumnIndex {
    ra: Option<usize>,
    dec: Option<usize>,
    dra: Option<usize>,
    ddec: Option<usize>,
    mag: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &csv::StringRecord) -> Self {
        let mut index = ColumnIndex::default();
        // first column is the timestamp
        for (idx, label) in header.iter().enumerate().skip(1) {
            let slot = match Column::from_label(label) {
                Some(Column::Ra) => &mut index.ra,
                Some(Column::Dec) => &mut index.dec,
                Some(Column::Dra) => &mut index.dra,
                Some(Column::Ddec) => &mut index.ddec,
                Some(Column::Mag) => &mut index.mag,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        index
    }
}

/// Parse one numeric cell; empty cells and `n.a.` are missing values.
fn parse_cell(
    record: &csv::StringRecord,
    idx: Option<usize>,
    column: Column,
) -> Result<Option<f64>, K2EphemError> {
    let Some(raw) = idx.and_then(|idx| record.get(idx)) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("n.a.") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| K2EphemError::InvalidField {
            column: column.name().to_string(),
            value: raw.to_string(),
        })
}

fn required_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: Column,
) -> Result<f64, K2EphemError> {
    parse_cell(record, Some(idx), column)?.ok_or_else(|| K2EphemError::InvalidField {
        column: column.name().to_string(),
        value: record.get(idx).unwrap_or_default().trim().to_string(),
    })
}

/// Time-ordered, non-empty ephemeris of one target.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisTable {
    records: Vec<EphemerisRecord>,
}

impl EphemerisTable {
    /// Parse a raw Horizons observer-table answer.
    ///
    /// Return
    /// ------
    /// * the table, sorted by epoch with duplicate epochs removed
    /// * [`K2EphemError::EphemFailure`] carrying the whole payload if no row was found
    /// * [`K2EphemError::MissingColumn`], [`K2EphemError::InvalidField`] or
    ///   [`K2EphemError::InvalidDate`] if the block is malformed
    pub fn from_horizons(payload: &str) -> Result<Self, K2EphemError> {
        debug!(
            "JPL Horizons ephemeris contains {} lines.",
            payload.lines().count()
        );
        let Some(block) = extract_block(payload) else {
            error!("{payload}");
            error!(
                "Uhoh, something went wrong! Most likely, JPL/Horizons did not recognize \
                 the target. Check their response above to understand why."
            );
            return Err(K2EphemError::EphemFailure {
                payload: payload.to_string(),
            });
        };

        let mut data = String::from(block.header);
        for row in &block.rows {
            data.push('\n');
            data.push_str(row);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        let columns = ColumnIndex::from_header(reader.headers()?);
        let ra_idx = columns.ra.ok_or(K2EphemError::MissingColumn("ra"))?;
        let dec_idx = columns.dec.ok_or(K2EphemError::MissingColumn("dec"))?;

        let mut records = Vec::with_capacity(block.rows.len());
        for result in reader.records() {
            let record = result?;
            let epoch = parse_horizons_date(record.get(0).unwrap_or_default())?;
            let ra = required_cell(&record, ra_idx, Column::Ra)?;
            let dec = required_cell(&record, dec_idx, Column::Dec)?;
            let dra = parse_cell(&record, columns.dra, Column::Dra)?;
            let ddec = parse_cell(&record, columns.ddec, Column::Ddec)?;
            let mag = parse_cell(&record, columns.mag, Column::Mag)?;
            let motion = match (dra, ddec) {
                (Some(dra), Some(ddec)) => Some(derive_motion(dra, ddec, dec)),
                _ => None,
            };
            records.push(EphemerisRecord {
                epoch,
                ra,
                dec,
                dra,
                ddec,
                mag,
                motion,
            });
        }

        // stable sort: the first of several rows sharing an epoch is kept
        records.sort_by(|a, b| a.epoch.partial_cmp(&b.epoch).unwrap_or(Ordering::Equal));
        records.dedup_by(|later, earlier| later.epoch == earlier.epoch);

        if records.is_empty() {
            return Err(K2EphemError::EphemFailure {
                payload: payload.to_string(),
            });
        }
        Ok(EphemerisTable { records })
    }

    pub fn records(&self) -> &[EphemerisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: an empty ephemeris is an [`K2EphemError::EphemFailure`].
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows whose epoch lies in `window`, bounds included.
    pub fn slice(&self, window: &CampaignWindow) -> &[EphemerisRecord] {
        let lo = self.records.partition_point(|r| r.epoch < window.start);
        let hi = self.records.partition_point(|r| r.epoch <= window.stop);
        &self.records[lo..hi.max(lo)]
    }
}
