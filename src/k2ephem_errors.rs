use thiserror::Error;

#[derive(Error, Debug)]
pub enum K2EphemError {
    #[error("HTTP request to JPL/Horizons failed: {0}")]
    FetchFailure(#[from] reqwest::Error),

    #[error("JPL/Horizons answered with HTTP status {status}")]
    HttpStatus { status: u16, body: String },

    #[error("JPL/Horizons ephemeris could not be retrieved (no data between $$SOE and $$EOE)")]
    EphemFailure { payload: String },

    #[error("Unknown K2 campaign: C{0}")]
    UnknownCampaign(u32),

    #[error("Campaign C{0} is listed more than once in the campaign catalog")]
    DuplicateCampaign(u32),

    #[error("Invalid campaign range: first campaign C{first} is after last campaign C{last}")]
    InvalidCampaignRange { first: u32, last: u32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Ephemeris table has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("Invalid value '{value}' in ephemeris column '{column}'")]
    InvalidField { column: String, value: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl K2EphemError {
    /// True when Horizons answered but the answer held no ephemeris rows.
    pub fn is_ephem_failure(&self) -> bool {
        matches!(self, K2EphemError::EphemFailure { .. })
    }
}

impl PartialEq for K2EphemError {
    fn eq(&self, other: &Self) -> bool {
        use K2EphemError::*;
        match (self, other) {
            // Transport and I/O errors are not comparable: same variant means equal
            (FetchFailure(_), FetchFailure(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            (HttpStatus { status: a, .. }, HttpStatus { status: b, .. }) => a == b,
            (EphemFailure { payload: a }, EphemFailure { payload: b }) => a == b,
            (UnknownCampaign(a), UnknownCampaign(b)) => a == b,
            (DuplicateCampaign(a), DuplicateCampaign(b)) => a == b,
            (
                InvalidCampaignRange {
                    first: f1,
                    last: l1,
                },
                InvalidCampaignRange {
                    first: f2,
                    last: l2,
                },
            ) => f1 == f2 && l1 == l2,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                InvalidField {
                    column: c1,
                    value: v1,
                },
                InvalidField {
                    column: c2,
                    value: v2,
                },
            ) => c1 == c2 && v1 == v2,
            (InvalidDate(a), InvalidDate(b)) => a == b,

            _ => false,
        }
    }
}
