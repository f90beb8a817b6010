// src/data/datetime.rs

//! SEL timestamp handling.
//!
//! The BMC syslog configuration has emitted two timestamp shapes over its
//! lifetime:
//!
//! - with-year, `2020 May 18 10:18:40`, displayed `2020-05-18 10:18:40`
//! - legacy without year, `May 18 10:18:40`, displayed `05-18 10:18:40`
//!
//! [`SelTimestamp`] is a tagged variant carrying its own parsing, display,
//! and comparison rules so the legacy year-loss stays localized to this
//! module. A `Legacy` instant compares only month/day/time-of-day;
//! cross-year ordering of legacy timestamps is undefined. That is a
//! long-standing artifact of the logger configuration, carried over
//! deliberately.

use std::fmt;
use std::str::FromStr;

use ::chrono::{
    Datelike,
    Local,
    Month,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
};
use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::Regex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// regex pattern fragments
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `R`egex `P`attern fragment, one or more blanks
pub const RP_BLANKS: &str = r"[[:blank:]]+";
/// `R`egex `P`attern fragment, a four-digit year
pub const RP_YEAR: &str = r"[12][0-9]{3}";
/// `R`egex `P`attern fragment, an abbreviated month name, e.g. `May`
pub const RP_MONTHB: &str = r"[A-Z][a-z]{2}";
/// `R`egex `P`attern fragment, day of month, one or two digits
pub const RP_DAY: &str = r"[0-9]{1,2}";
/// `R`egex `P`attern fragment, time of day `H:M:S`
pub const RP_TIME: &str = r"[0-9]{1,2}:[0-9]{2}:[0-9]{2}";

/// A raw syslog timestamp with a leading year, e.g. `2020 May 18 10:18:40`.
pub const RP_TS_WITHYEAR: &str =
    concatcp!(RP_YEAR, RP_BLANKS, RP_MONTHB, RP_BLANKS, RP_DAY, RP_BLANKS, RP_TIME);

/// A raw legacy syslog timestamp without a year, e.g. `May 18 10:18:40`.
pub const RP_TS_LEGACY: &str =
    concatcp!(RP_MONTHB, RP_BLANKS, RP_DAY, RP_BLANKS, RP_TIME);

/// strftime pattern for the raw with-year form. `%e` space-pads a
/// single-digit day, `Apr  6`, matching what the logger writes.
pub const DTP_RAW_WITHYEAR: &str = "%Y %b %e %H:%M:%S";
/// strftime pattern for the normalized (displayed) with-year form.
pub const DTP_NORM_WITHYEAR: &str = "%Y-%m-%d %H:%M:%S";

lazy_static! {
    /// raw legacy form, `May 18 10:18:40`
    static ref REGEX_TS_LEGACY_RAW: Regex = Regex::new(
        concatcp!(
            r"^[[:blank:]]*(?P<month>", RP_MONTHB, r")",
            RP_BLANKS, r"(?P<day>", RP_DAY, r")",
            RP_BLANKS, r"(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})[[:blank:]]*$",
        )
    ).unwrap();
    /// normalized legacy form, `05-18 10:18:40`
    static ref REGEX_TS_LEGACY_NORM: Regex = Regex::new(
        r"^[[:blank:]]*(?P<month>[01]?[0-9])-(?P<day>[0-9]{1,2})[[:blank:]]+(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})[[:blank:]]*$"
    ).unwrap();
}

/// Dummy year backing `Legacy` instants. A leap year so `Feb 29` remains
/// representable.
const LEGACY_DUMMY_YEAR: i32 = 1972;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SelTimestamp
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One SEL timestamp, tagged by which historical shape it was written in.
///
/// `Legacy` stores its `NaiveDateTime` with the year forced to
/// [`LEGACY_DUMMY_YEAR`]; the year digit never reaches output nor a
/// comparison against another `Legacy` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SelTimestamp {
    WithYear(NaiveDateTime),
    Legacy(NaiveDateTime),
}

impl SelTimestamp {
    /// Parse a timestamp string in any of the accepted shapes, trying the
    /// with-year shapes before the legacy shapes. Accepts both the raw
    /// syslog form and the normalized display form so a reformatted
    /// timestamp parses back to the same instant.
    pub fn parse(value: &str) -> Option<SelTimestamp> {
        let value_trim: &str = value.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(value_trim, DTP_NORM_WITHYEAR) {
            return Some(SelTimestamp::WithYear(dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value_trim, DTP_RAW_WITHYEAR) {
            return Some(SelTimestamp::WithYear(dt));
        }
        if let Some(captures) = REGEX_TS_LEGACY_RAW.captures(value) {
            let month: u32 = match Month::from_str(&captures["month"]) {
                Ok(m) => m.number_from_month(),
                Err(_) => return None,
            };
            return SelTimestamp::legacy_from_parts(month, &captures);
        }
        if let Some(captures) = REGEX_TS_LEGACY_NORM.captures(value) {
            let month: u32 = captures["month"].parse::<u32>().ok()?;
            return SelTimestamp::legacy_from_parts(month, &captures);
        }

        None
    }

    fn legacy_from_parts(
        month: u32,
        captures: &regex::Captures,
    ) -> Option<SelTimestamp> {
        let day: u32 = captures["day"].parse::<u32>().ok()?;
        let hour: u32 = captures["hour"].parse::<u32>().ok()?;
        let minute: u32 = captures["minute"].parse::<u32>().ok()?;
        let second: u32 = captures["second"].parse::<u32>().ok()?;
        let date: NaiveDate = NaiveDate::from_ymd_opt(LEGACY_DUMMY_YEAR, month, day)?;
        let time: NaiveTime = NaiveTime::from_hms_opt(hour, minute, second)?;

        Some(SelTimestamp::Legacy(date.and_time(time)))
    }

    pub const fn is_legacy(&self) -> bool {
        matches!(*self, SelTimestamp::Legacy(_))
    }

    /// The comparable local-time instant. For `Legacy` values the year
    /// component is the dummy year; mixed-shape comparisons are undefined.
    pub const fn instant(&self) -> &NaiveDateTime {
        match self {
            SelTimestamp::WithYear(dt) => dt,
            SelTimestamp::Legacy(dt) => dt,
        }
    }
}

impl fmt::Display for SelTimestamp {
    /// The normalized display form: `YYYY-MM-DD HH:MM:SS`, or
    /// `MM-DD HH:MM:SS` for legacy values.
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            SelTimestamp::WithYear(dt) => {
                write!(f, "{}", dt.format(DTP_NORM_WITHYEAR))
            }
            SelTimestamp::Legacy(dt) => {
                write!(f, "{:02}-{:02} {}", dt.month(), dt.day(), dt.format("%H:%M:%S"))
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// range check, wall clock
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Is `timestamp` within `[start, end]`, inclusive of both bounds?
///
/// Each argument is parsed independently. Fail-closed: if any of the three
/// fails to parse the answer is `false`.
pub fn timestamp_in_range(
    start: &str,
    end: &str,
    timestamp: &str,
) -> bool {
    let start_ts: SelTimestamp = match SelTimestamp::parse(start) {
        Some(ts) => ts,
        None => return false,
    };
    let end_ts: SelTimestamp = match SelTimestamp::parse(end) {
        Some(ts) => ts,
        None => return false,
    };
    let ts: SelTimestamp = match SelTimestamp::parse(timestamp) {
        Some(ts) => ts,
        None => return false,
    };

    start_ts.instant() <= ts.instant() && ts.instant() <= end_ts.instant()
}

/// Wall-clock "now" in the raw syslog shape, `2020 May 18 10:18:40`.
/// The shape self-emitted clear markers are written with.
pub fn now_raw_timestamp() -> String {
    Local::now()
        .format(DTP_RAW_WITHYEAR)
        .to_string()
}
