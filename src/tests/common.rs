// src/tests/common.rs

//! Shared fixtures: sample log lines, their expected aligned rows, and
//! helpers to lay rotated log file sets into a temporary directory.

use crate::common::{FPath, FPaths, SelError};
use crate::platform::loggerctl::LoggerControl;

use std::fs::File;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// sample lines, as the BMC syslog writes them
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// default-FRU entry, no embedded FRU token
pub const LINE_REBOOT: &str = " 2020 May 18 10:18:40 bmc-oob. user.crit fbtp-9b6bf3961d-dirty: healthd: BMC Reboot detected - caused by reboot command";

/// FRU 1 entry with a single-digit day in the timestamp
pub const LINE_ASSERT_FRU1: &str = " 2020 Apr  6 15:00:40 bmc-oob. user.crit fbtp-v2020.09.1: sensord: ASSERT: Upper Critical threshold - raised - FRU: 1, num: 214 curr_val: 59.00 C, thresh_val: 55.00 C, snr: MB_INLET_TEMP";

/// FRU 2 entry
pub const LINE_NIC_FRU2: &str = " 2020 May 18 10:18:38 bmc-oob. user.crit fbtp-9b6bf3961d-dirty: ncsid: FRU: 2 NIC AEN Supported: 0x7, AEN Enable Mask=0x7";

/// self-emitted clear marker naming FRU 2
pub const LINE_MARKER_FRU2: &str = "2020 May 21 17:29:55 log-util: User cleared FRU: 2 logs";

/// legacy timestamp shape, no year
pub const LINE_LEGACY: &str = " May 18 10:18:40 bmc-oob. user.crit fbtp-v2020.09.1: healthd: ECC Recoverable Error occurred";

/// non-critical chatter, not a SEL entry
pub const LINE_NOISE: &str = " 2020 May 18 10:18:41 bmc-oob. user.info fbtp-9b6bf3961d-dirty: ncsid: link status changed";

// expected aligned rows for the lines above

pub const ROW_REBOOT: &str = "0    all      2020-05-18 10:18:40    healthd          BMC Reboot detected - caused by reboot command";
pub const ROW_REBOOT_SYS: &str = "0    sys      2020-05-18 10:18:40    healthd          BMC Reboot detected - caused by reboot command";
pub const ROW_ASSERT_FRU1: &str = "1    mb       2020-04-06 15:00:40    sensord          ASSERT: Upper Critical threshold - raised - FRU: 1, num: 214 curr_val: 59.00 C, thresh_val: 55.00 C, snr: MB_INLET_TEMP";
pub const ROW_NIC_FRU2: &str = "2    nic      2020-05-18 10:18:38    ncsid            FRU: 2 NIC AEN Supported: 0x7, AEN Enable Mask=0x7";
pub const ROW_LEGACY: &str = "0    all      05-18 10:18:40         healthd          ECC Recoverable Error occurred";

pub const HEADER: &str = "FRU# FRU_NAME TIME_STAMP             APP_NAME         MESSAGE";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// rotated-file fixtures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lay one file per entry of `file_lines` into a fresh `TempDir`, named
/// like the rotated set (`logfile.0` oldest, `logfile` newest). Returns
/// the directory guard and the ordered path list.
pub fn create_log_files(file_lines: &[&[&str]]) -> (TempDir, FPaths) {
    let tempdir: TempDir = tempfile::tempdir().unwrap();
    let names: [&str; 2] = ["logfile.0", "logfile"];
    assert!(file_lines.len() <= names.len());
    let mut paths = FPaths::new();
    for (index, lines) in file_lines.iter().enumerate() {
        let path = tempdir
            .path()
            .join(names[index]);
        let mut file: File = File::create(&path).unwrap();
        for line in lines.iter() {
            writeln!(file, "{}", line).unwrap();
        }
        paths.push(FPath::from(path.to_str().unwrap()));
    }

    (tempdir, paths)
}

pub fn read_file(path: &FPath) -> String {
    std::fs::read_to_string(path).unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// logger-control double
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Records reload requests instead of signalling a daemon.
pub struct MockLoggerControl {
    reloads: Arc<AtomicUsize>,
}

impl MockLoggerControl {
    pub fn new() -> (MockLoggerControl, Arc<AtomicUsize>) {
        let reloads = Arc::new(AtomicUsize::new(0));
        (
            MockLoggerControl {
                reloads: reloads.clone(),
            },
            reloads,
        )
    }
}

impl LoggerControl for MockLoggerControl {
    fn reload(&self) -> Result<(), SelError> {
        self.reloads
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
