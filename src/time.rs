use hifitime::Epoch;
use regex::Regex;
use std::sync::LazyLock;

use crate::k2ephem_errors::K2EphemError;

/// Horizons calendar timestamp, e.g. `2015-Oct-04 00:00` or `A.D. 2015-Oct-04 12:30:15.500`
static HORIZONS_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:A\.D\.\s+)?(\d{4})-([A-Za-z]{3})-(\d{1,2})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2})(?:\.(\d+))?)?)?$",
    )
    .expect("static Horizons date regex is valid")
});

/// ISO calendar date, e.g. `2015-10-04`
static CALENDAR_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("static calendar date regex is valid")
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn month_from_abbrev(abbrev: &str) -> Option<u8> {
    let lower = abbrev.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|idx| idx as u8 + 1)
}

/// Fractional-second digits (`"5"`, `"500"`, `"1234567891"`) → nanoseconds
fn fraction_to_nanos(digits: &str) -> u32 {
    let mut padded: String = digits.chars().take(9).collect();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}

#[allow(clippy::too_many_arguments)]
fn build_epoch(
    source: &str,
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanos: u32,
) -> Result<Epoch, K2EphemError> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || minute > 59 {
        return Err(K2EphemError::InvalidDate(source.to_string()));
    }
    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, nanos)
        .map_err(|_| K2EphemError::InvalidDate(source.to_string()))
}

/// Parse a timestamp as printed in the first column of a Horizons observer table.
///
/// Argument
/// --------
/// * `date_str`: a date in the format `YYYY-Mon-DD[ HH:MM[:SS[.fff]]]`, optionally
///   prefixed by `A.D.`
///
/// Return
/// ------
/// * the corresponding UTC epoch
pub fn parse_horizons_date(date_str: &str) -> Result<Epoch, K2EphemError> {
    let trimmed = date_str.trim();
    let caps = HORIZONS_DATE
        .captures(trimmed)
        .ok_or_else(|| K2EphemError::InvalidDate(trimmed.to_string()))?;

    let num = |idx: usize| -> u32 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let year: i32 = caps[1]
        .parse()
        .map_err(|_| K2EphemError::InvalidDate(trimmed.to_string()))?;
    let month = month_from_abbrev(&caps[2])
        .ok_or_else(|| K2EphemError::InvalidDate(trimmed.to_string()))?;
    let nanos = caps.get(7).map_or(0, |m| fraction_to_nanos(m.as_str()));

    build_epoch(
        trimmed,
        year,
        month,
        num(3) as u8,
        num(4) as u8,
        num(5) as u8,
        num(6) as u8,
        nanos,
    )
}

/// Parse a `YYYY-MM-DD` calendar date into the UTC epoch at midnight.
pub fn parse_calendar_date(date_str: &str) -> Result<Epoch, K2EphemError> {
    let trimmed = date_str.trim();
    let caps = CALENDAR_DATE
        .captures(trimmed)
        .ok_or_else(|| K2EphemError::InvalidDate(trimmed.to_string()))?;
    let field = |idx: usize| -> Result<u32, K2EphemError> {
        caps[idx]
            .parse()
            .map_err(|_| K2EphemError::InvalidDate(trimmed.to_string()))
    };
    build_epoch(
        trimmed,
        field(1)? as i32,
        field(2)? as u8,
        field(3)? as u8,
        0,
        0,
        0,
        0,
    )
}

/// Last representable instant of the UTC day containing `epoch`.
pub fn end_of_day(epoch: &Epoch) -> Epoch {
    let (year, month, day, ..) = epoch.to_gregorian_utc();
    Epoch::from_gregorian_utc(year, month, day, 23, 59, 59, 999_999_999)
}

/// Format the UTC calendar date of `epoch` as `YYYY-MM-DD`, the form expected by
/// the Horizons `START_TIME`/`STOP_TIME` parameters.
pub fn format_calendar_date(epoch: &Epoch) -> String {
    let (year, month, day, ..) = epoch.to_gregorian_utc();
    format!("{year:04}-{month:02}-{day:02}")
}

#[cfg(test)]
mod time_test {
    use super::*;

    #[test]
    fn test_parse_horizons_date() {
        let epoch = parse_horizons_date(" 2015-Oct-04 00:00").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc_at_midnight(2015, 10, 4));

        let epoch = parse_horizons_date("2016-Apr-22 13:45").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc_hms(2016, 4, 22, 13, 45, 0));

        let epoch = parse_horizons_date("A.D. 2021-Jul-04 12:47:24.5000").unwrap();
        assert_eq!(
            epoch,
            Epoch::from_gregorian_utc(2021, 7, 4, 12, 47, 24, 500_000_000)
        );

        let epoch = parse_horizons_date("2014-MAR-12").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc_at_midnight(2014, 3, 12));
    }

    #[test]
    fn test_parse_horizons_date_rejects_garbage() {
        assert_eq!(
            parse_horizons_date("2015-Foo-04 00:00"),
            Err(K2EphemError::InvalidDate("2015-Foo-04 00:00".into()))
        );
        assert!(parse_horizons_date("yesterday").is_err());
        assert!(parse_horizons_date("2015-Oct-04 25:00").is_err());
    }

    #[test]
    fn test_calendar_dates() {
        let start = parse_calendar_date("2014-03-12").unwrap();
        assert_eq!(start, Epoch::from_gregorian_utc_at_midnight(2014, 3, 12));
        assert_eq!(format_calendar_date(&start), "2014-03-12");

        let stop = end_of_day(&start);
        assert!(stop > start);
        assert!(stop < Epoch::from_gregorian_utc_at_midnight(2014, 3, 13));
        assert_eq!(format_calendar_date(&stop), "2014-03-12");

        assert!(parse_calendar_date("2014-13-01").is_err());
        assert!(parse_calendar_date("12/03/2014").is_err());
    }

    #[test]
    fn test_fraction_to_nanos() {
        assert_eq!(fraction_to_nanos("5"), 500_000_000);
        assert_eq!(fraction_to_nanos("0001"), 100_000);
        assert_eq!(fraction_to_nanos("1234567891"), 123_456_789);
    }
}
