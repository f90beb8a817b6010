// src/data/sel.rs

//! Implements [`SelRecord`], one System Event Log entry.
//!
//! A `SelRecord` is parsed from one raw syslog line. Only critical-severity
//! lines and lines this utility emitted itself ("clear markers") are SEL
//! entries; anything else is rejected with
//! [`SelError::InvalidLogLine`].
//!
//! A record that cannot be decomposed into structured columns is *bare*:
//! it renders as its original raw text, byte for byte. Self-emitted clear
//! markers are always bare even though their timestamp/app/message fields
//! are populated; the historical output format prints them verbatim and
//! consumers compare that text literally.
//!
//! [`SelError::InvalidLogLine`]: crate::common::SelError

use crate::common::{FruFilter, FruId, SelError, FRU_ALL, FRU_SYS};
use crate::data::datetime::{
    timestamp_in_range,
    SelTimestamp,
    RP_BLANKS,
    RP_TS_LEGACY,
    RP_TS_WITHYEAR,
};
use crate::platform::pal::Pal;

use std::fmt;

use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::{Captures, Regex};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// markers and names
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The app name this utility logs under.
pub const SEL_APP_NAME: &str = "log-util";

/// Literal marker of a self-emitted line; the app name as syslog prints it.
pub const SEL_SELF_MARKER: &str = concatcp!(SEL_APP_NAME, ":");

/// Literal severity marker a SEL entry from another daemon must carry,
/// e.g. within `user.crit`.
pub const SEL_CRIT_MARKER: &str = ".crit";

pub const FRU_NAME_ALL: &str = "all";
pub const FRU_NAME_SYS: &str = "sys";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// line patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `C`apture `G`roup `P`attern, with-year timestamp
const CGP_TS_WITHYEAR: &str = concatcp!(r"(?P<ts>", RP_TS_WITHYEAR, r")");
/// `C`apture `G`roup `P`attern, legacy timestamp (no year)
const CGP_TS_LEGACY: &str = concatcp!(r"(?P<ts>", RP_TS_LEGACY, r")");
const CGP_HOST: &str = r"(?P<host>\S+)";
/// severity token, present but not captured
const RP_SEVERITY: &str = r"\S+";
const CGP_VERSION: &str = r"(?P<version>\S+)";
const CGP_APP: &str = r"(?P<app>\S+)";
const CGP_MESG: &str = r"(?P<mesg>.*)";

/// shared tail of both structured patterns: `<version>: <app>: <message>`
const RP_TAIL: &str =
    concatcp!(CGP_VERSION, ":", RP_BLANKS, CGP_APP, ":", RP_BLANKS, CGP_MESG, "$");

lazy_static! {
    /// structured entry, with-year timestamp:
    /// `2020 May 18 10:18:40 bmc-oob. user.crit fbtp-v2020.09.1: sensord: …`
    static ref REGEX_SEL_WITHYEAR: Regex = Regex::new(
        concatcp!(
            r"^[[:blank:]]*", CGP_TS_WITHYEAR, RP_BLANKS, CGP_HOST, RP_BLANKS,
            RP_SEVERITY, RP_BLANKS, RP_TAIL,
        )
    ).unwrap();
    /// structured entry, legacy timestamp (no year), same shape otherwise
    static ref REGEX_SEL_LEGACY: Regex = Regex::new(
        concatcp!(
            r"^[[:blank:]]*", CGP_TS_LEGACY, RP_BLANKS, CGP_HOST, RP_BLANKS,
            RP_SEVERITY, RP_BLANKS, RP_TAIL,
        )
    ).unwrap();
    /// self-emitted clear marker: `2020 May 21 17:29:55 log-util: User cleared …`
    static ref REGEX_SEL_SELF: Regex = Regex::new(
        concatcp!(
            r"^[[:blank:]]*", CGP_TS_WITHYEAR, RP_BLANKS, CGP_APP, ":", RP_BLANKS,
            CGP_MESG, "$",
        )
    ).unwrap();
    /// embedded FRU override, may appear anywhere in the message
    static ref REGEX_FRU_TOKEN: Regex = Regex::new(
        r"FRU:[[:blank:]]*(?P<fru>[0-9]+)"
    ).unwrap();

    /// Fixed header row for aligned output; same column widths as data rows.
    pub static ref SEL_HEADER: String = format!(
        "{:<4} {:<8} {:<22} {:<16} {}",
        "FRU#", "FRU_NAME", "TIME_STAMP", "APP_NAME", "MESSAGE",
    );
}

/// Reformat a raw captured timestamp to the normalized display form.
/// A capture that somehow fails to parse (e.g. a month-name-shaped token
/// that is not a month) is kept as captured.
fn normalize_ts(ts_raw: &str) -> String {
    match SelTimestamp::parse(ts_raw) {
        Some(ts) => ts.to_string(),
        None => ts_raw.to_string(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SelRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One SEL entry, parsed from one raw log line.
///
/// Immutable after parsing except through [`force_bare`], which only
/// discards the structured rendering.
///
/// Invariant: `fru_id` is never [`FRU_SYS`]; a record whose FRU resolved to
/// the system sentinel reports [`FRU_ALL`] and carries the distinction in
/// `fru_name` (`"sys"`).
///
/// [`force_bare`]: SelRecord::force_bare
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelRecord {
    fru_id: FruId,
    fru_name: String,
    /// normalized display timestamp; empty for bare non-marker records
    timestamp: String,
    hostname: String,
    fw_version: String,
    app_name: String,
    message: String,
    /// the original line, unmodified, leading whitespace included
    raw_line: String,
    /// render as `raw_line` verbatim
    bare: bool,
    /// emitted by this utility rather than another firmware daemon
    self_emitted: bool,
}

impl SelRecord {
    /// Parse one raw log line into a `SelRecord`.
    ///
    /// `default_fru` is the FRU assigned when the line carries no embedded
    /// `FRU: <n>` token; callers pass [`FRU_SYS`] when filtering for system
    /// records and [`FRU_ALL`] otherwise.
    ///
    /// Lines lacking both the critical-severity marker and the self-emitted
    /// marker fail with [`SelError::InvalidLogLine`].
    pub fn parse(
        line: &str,
        default_fru: FruId,
        pal: &dyn Pal,
    ) -> Result<SelRecord, SelError> {
        let self_emitted: bool = line.contains(SEL_SELF_MARKER);
        if !self_emitted && !line.contains(SEL_CRIT_MARKER) {
            return Err(SelError::InvalidLogLine);
        }

        let mut fru_id: FruId = default_fru;
        if let Some(captures) = REGEX_FRU_TOKEN.captures(line) {
            if let Ok(fru) = captures["fru"].parse::<FruId>() {
                fru_id = fru;
            }
        }
        // resolve the name; the SYS sentinel never leaves this block
        let fru_name: String = match fru_id {
            FRU_ALL => FRU_NAME_ALL.to_string(),
            FRU_SYS => {
                fru_id = FRU_ALL;
                FRU_NAME_SYS.to_string()
            }
            id => match pal.fru_name(id) {
                Some(name) => name,
                None => format!("fru{}", id),
            },
        };

        let mut record = SelRecord {
            fru_id,
            fru_name,
            timestamp: String::new(),
            hostname: String::new(),
            fw_version: String::new(),
            app_name: String::new(),
            message: String::new(),
            raw_line: line.to_string(),
            bare: true,
            self_emitted,
        };

        if let Some(captures) = REGEX_SEL_WITHYEAR.captures(line) {
            record.fill_structured(&captures);
        } else if let Some(captures) = REGEX_SEL_LEGACY.captures(line) {
            record.fill_structured(&captures);
        } else if self_emitted {
            if let Some(captures) = REGEX_SEL_SELF.captures(line) {
                // clear markers populate fields but remain bare; they must
                // render as their original text
                record.timestamp = normalize_ts(&captures["ts"]);
                record.app_name = captures["app"].to_string();
                record.message = captures["mesg"].to_string();
            }
        }
        defñ!("fru_id {} fru_name {:?} bare {}", record.fru_id, record.fru_name, record.bare);

        Ok(record)
    }

    fn fill_structured(
        &mut self,
        captures: &Captures,
    ) {
        self.timestamp = normalize_ts(&captures["ts"]);
        self.hostname = captures["host"].to_string();
        self.fw_version = captures["version"].to_string();
        self.app_name = captures["app"].to_string();
        self.message = captures["mesg"].to_string();
        self.bare = false;
    }

    /// Build the self-emitted marker recording that a clear of `fru` scope
    /// happened, optionally bounded by a time window, and parse it back
    /// into a record. The generated text is itself a valid self-emitted
    /// input line.
    pub fn make_clear_marker(
        fru: FruId,
        range: Option<(&str, &str)>,
        pal: &dyn Pal,
    ) -> Result<SelRecord, SelError> {
        let scope: String = match fru {
            FRU_ALL => FRU_NAME_ALL.to_string(),
            FRU_SYS => FRU_NAME_SYS.to_string(),
            id => format!("FRU: {}", id),
        };
        let line: String = match range {
            Some((start, end)) => format!(
                "{} {} User cleared {} logs from {} to {}",
                pal.now_raw(),
                SEL_SELF_MARKER,
                scope,
                start,
                end,
            ),
            None => format!(
                "{} {} User cleared {} logs",
                pal.now_raw(),
                SEL_SELF_MARKER,
                scope,
            ),
        };

        SelRecord::parse(&line, fru, pal)
    }

    /// Does this record belong to any FRU in `filter`?
    ///
    /// A filter selecting SYS matches records whose FRU resolved to the
    /// system sentinel (`fru_name == "sys"`); a filter selecting ALL
    /// matches every record.
    pub fn matches(
        &self,
        filter: &FruFilter,
    ) -> bool {
        if filter.contains_sys() && self.fru_name == FRU_NAME_SYS {
            return true;
        }

        filter.contains_all() || filter.contains(self.fru_id)
    }

    /// Is this record's timestamp within `[start, end]`? Fail-closed: a
    /// bound or an own-timestamp that does not parse answers `false`.
    pub fn fits_time_range(
        &self,
        start: &str,
        end: &str,
    ) -> bool {
        timestamp_in_range(start, end, &self.timestamp)
    }

    /// Discard the structured rendering; the record then renders as its
    /// original raw text. Used when rewriting files, where surviving lines
    /// must be copied through unmodified.
    pub fn force_bare(&mut self) {
        self.bare = true;
    }

    /// Field map for the JSON sink. Values are strings, `FRU#` included,
    /// matching the historical output format.
    pub fn json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "FRU#": self.fru_id.to_string(),
            "FRU_NAME": self.fru_name,
            "TIME_STAMP": self.timestamp,
            "APP_NAME": self.app_name,
            "MESSAGE": self.message,
        })
    }

    pub fn fru_id(&self) -> FruId {
        self.fru_id
    }

    pub fn fru_name(&self) -> &str {
        &self.fru_name
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn fw_version(&self) -> &str {
        &self.fw_version
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn raw(&self) -> &str {
        &self.raw_line
    }

    pub const fn is_bare(&self) -> bool {
        self.bare
    }

    pub const fn is_self_emitted(&self) -> bool {
        self.self_emitted
    }
}

impl fmt::Display for SelRecord {
    /// The externally-observed text form. Bare records are their raw line,
    /// byte for byte. Structured records are five left-justified columns,
    /// widths 4/8/22/16/unbounded, single-space separated; padding never
    /// truncates an over-length field.
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.bare {
            return write!(f, "{}", self.raw_line);
        }
        write!(
            f,
            "{:<4} {:<8} {:<22} {:<16} {}",
            self.fru_id, self.fru_name, self.timestamp, self.app_name, self.message,
        )
    }
}
