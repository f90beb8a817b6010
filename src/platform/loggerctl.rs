// src/platform/loggerctl.rs

//! Control of the external log-writer process.
//!
//! `rsyslogd` holds its output file open by inode. After a clear replaces
//! that inode via rename, the daemon must be told to reopen its target
//! path or it keeps appending to the orphaned old inode. [`Rsyslogd`]
//! finds the daemon's PID by process name and sends `SIGHUP`.

use crate::common::SelError;

use std::process::{Command, Output};

use ::nix::sys::signal::{kill, Signal};
use ::nix::unistd::Pid;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defx, defñ};

/// Process name of the external log writer.
pub const LOGGER_PROCESS: &str = "rsyslogd";

/// Seam for telling the external log writer to reopen its output.
pub trait LoggerControl {
    fn reload(&self) -> Result<(), SelError>;
}

/// The running `rsyslogd` daemon.
#[derive(Clone, Debug)]
pub struct Rsyslogd {
    process: String,
}

impl Rsyslogd {
    pub fn new() -> Rsyslogd {
        Rsyslogd {
            process: LOGGER_PROCESS.to_string(),
        }
    }
}

impl Default for Rsyslogd {
    fn default() -> Rsyslogd {
        Rsyslogd::new()
    }
}

/// Extract one PID from `pgrep` output: the first line, which must be
/// purely numeric.
pub fn parse_pid(output: &str) -> Result<i32, SelError> {
    let line: &str = output
        .lines()
        .next()
        .unwrap_or("")
        .trim();
    if line.is_empty() || !line.chars().all(|c| c.is_ascii_digit()) {
        return Err(SelError::PidLookupFailed(format!(
            "unexpected pgrep output {:?}",
            output,
        )));
    }

    line.parse::<i32>()
        .map_err(|err| SelError::PidLookupFailed(format!("{:?}: {}", line, err)))
}

impl LoggerControl for Rsyslogd {
    fn reload(&self) -> Result<(), SelError> {
        defn!("({:?})", self.process);
        let output: Output = Command::new("pgrep")
            .arg(&self.process)
            .output()
            .map_err(|err| SelError::PidLookupFailed(format!("pgrep: {}", err)))?;
        if !output.status.success() {
            return Err(SelError::PidLookupFailed(format!(
                "pgrep {} exited {}",
                self.process, output.status,
            )));
        }
        let stdout: String = String::from_utf8_lossy(&output.stdout).to_string();
        let pid: i32 = parse_pid(&stdout)?;
        kill(Pid::from_raw(pid), Signal::SIGHUP)
            .map_err(|errno| SelError::ReloadSignalFailed(pid, errno))?;
        defx!("sent SIGHUP to {}", pid);

        Ok(())
    }
}
