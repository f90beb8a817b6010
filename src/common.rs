// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::io;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FRU identifiers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Numeric identifier of one Field-Replaceable Unit.
pub type FruId = u8;

/// Scope sentinel: every FRU. Also the `FRU#` reported for records whose
/// FRU resolves to [`FRU_SYS`].
pub const FRU_ALL: FruId = 0;

/// Scope sentinel: BMC-internal ("system") records. Internal-only; a parsed
/// record never exposes this value through its `fru_id`, the distinction is
/// carried in `fru_name` instead.
pub const FRU_SYS: FruId = 0xFF;

/// An ordered set of [`FruId`] used to select records for printing or
/// clearing. Kept sorted so per-FRU clear markers are appended in ascending
/// numeric order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FruFilter {
    frus: BTreeSet<FruId>,
}

impl FruFilter {
    pub fn new() -> FruFilter {
        FruFilter { frus: BTreeSet::new() }
    }

    pub fn insert(
        &mut self,
        fru: FruId,
    ) {
        self.frus.insert(fru);
    }

    pub fn contains(
        &self,
        fru: FruId,
    ) -> bool {
        self.frus.contains(&fru)
    }

    pub fn contains_all(&self) -> bool {
        self.frus.contains(&FRU_ALL)
    }

    pub fn contains_sys(&self) -> bool {
        self.frus.contains(&FRU_SYS)
    }

    /// Ascending iteration over the selected FRU ids.
    pub fn iter(&self) -> btree_set::Iter<'_, FruId> {
        self.frus.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.frus.is_empty()
    }
}

impl FromIterator<FruId> for FruFilter {
    fn from_iter<I: IntoIterator<Item = FruId>>(iter: I) -> FruFilter {
        FruFilter {
            frus: BTreeSet::from_iter(iter),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error taxonomy for SEL processing.
///
/// `InvalidLogLine` is line-local and recoverable: [`SelStream`] skips the
/// offending line and continues. All other variants propagate to the caller.
///
/// [`SelStream`]: crate::readers::selstream::SelStream
#[derive(Debug)]
pub enum SelError {
    /// The line is neither a critical-severity event nor self-emitted,
    /// or otherwise not a SEL entry.
    InvalidLogLine,
    /// Could not create the sibling temporary file during a clear rewrite.
    TempFileCreateFailed(FPath, io::Error),
    /// Could not rename the rewritten temporary file over the log file.
    LogReplaceFailed(FPath, io::Error),
    /// Could not resolve the PID of the external log-writer process.
    PidLookupFailed(String),
    /// Resolved the PID but could not deliver the reload signal.
    ReloadSignalFailed(i32, nix::errno::Errno),
    /// The process-wide clear lock could not be constructed.
    LockUnavailable,
    /// Ambient I/O failure (reading a log file mid-stream, writing output).
    Io(io::Error),
}

impl fmt::Display for SelError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            SelError::InvalidLogLine => {
                write!(f, "not a SEL log line")
            }
            SelError::TempFileCreateFailed(path, err) => {
                write!(f, "cannot create temporary file beside {:?}: {}", path, err)
            }
            SelError::LogReplaceFailed(path, err) => {
                write!(f, "cannot replace log file {:?}: {}", path, err)
            }
            SelError::PidLookupFailed(mesg) => {
                write!(f, "cannot find logger process: {}", mesg)
            }
            SelError::ReloadSignalFailed(pid, errno) => {
                write!(f, "cannot signal logger process {}: {}", pid, errno)
            }
            SelError::LockUnavailable => {
                write!(f, "clear lock is unavailable")
            }
            SelError::Io(err) => {
                write!(f, "{}", err)
            }
        }
    }
}

impl std::error::Error for SelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelError::TempFileCreateFailed(_, err) => Some(err),
            SelError::LogReplaceFailed(_, err) => Some(err),
            SelError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SelError {
    fn from(err: io::Error) -> SelError {
        SelError::Io(err)
    }
}
