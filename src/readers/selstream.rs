// src/readers/selstream.rs

//! Implements [`SelStream`], the per-file line-stream filter.
//!
//! A `SelStream` reads raw lines, parses each into a [`SelRecord`], applies
//! the FRU filter (and time window, when both bounds are given), and renders
//! kept records to one of three sinks:
//!
//! - `Aligned`: the fixed-column text form, for printing.
//! - `RawPassthrough`: original line text with the keep-condition
//!   *inverted*; this selects the records that survive a clear.
//! - `Json`: an accumulated array, flushed once as `{"Logs": [...]}`.
//!
//! Lines that are not SEL entries are skipped, never fatal to the stream.
//!
//! [`SelRecord`]: crate::data::sel::SelRecord

use crate::common::{FruFilter, FruId, SelError, FRU_ALL, FRU_SYS};
use crate::data::sel::SelRecord;
use crate::platform::pal::Pal;

use std::io::{BufRead, Write};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Render mode of one [`SelStream`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {
    /// Fixed-column text rows.
    Aligned,
    /// Original line text, keep-condition inverted; used by clear to copy
    /// through everything *not* matching the clear filter.
    RawPassthrough,
    /// Accumulate field maps, flushed as one `{"Logs": [...]}` object.
    Json,
}

pub struct SelStream {
    mode: OutputMode,
    /// accumulated records, `Json` mode only
    logs: Vec<serde_json::Value>,
}

impl SelStream {
    pub fn new(mode: OutputMode) -> SelStream {
        SelStream {
            mode,
            logs: Vec::new(),
        }
    }

    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Filter one file's lines into `out` (or the JSON accumulator).
    ///
    /// The default FRU assigned to lines without an embedded `FRU: <n>`
    /// token is SYS when the filter selects SYS, else ALL. A time window
    /// applies only when both bounds are given.
    pub fn run<R, W>(
        &mut self,
        input: R,
        out: &mut W,
        filter: &FruFilter,
        range: Option<(&str, &str)>,
        pal: &dyn Pal,
    ) -> Result<(), SelError>
    where
        R: BufRead,
        W: Write,
    {
        defn!("mode {:?}", self.mode);
        let default_fru: FruId = match filter.contains_sys() {
            true => FRU_SYS,
            false => FRU_ALL,
        };
        let mut count_kept: usize = 0;
        for line in input.lines() {
            let line: String = line?;
            let mut record: SelRecord = match SelRecord::parse(&line, default_fru, pal) {
                Ok(record) => record,
                Err(SelError::InvalidLogLine) => continue,
                Err(err) => return Err(err),
            };
            if self.mode == OutputMode::Json && record.is_bare() {
                // markers and undecomposable lines are not JSON events
                continue;
            }
            let mut keep: bool = record.matches(filter);
            if let Some((start, end)) = range {
                keep = keep && record.fits_time_range(start, end);
            }
            if self.mode == OutputMode::RawPassthrough {
                keep = !keep;
            }
            if !keep {
                continue;
            }
            count_kept += 1;
            match self.mode {
                OutputMode::Aligned => {
                    writeln!(out, "{}", record)?;
                }
                OutputMode::RawPassthrough => {
                    record.force_bare();
                    writeln!(out, "{}", record)?;
                }
                OutputMode::Json => {
                    self.logs.push(record.json_value());
                }
            }
        }
        defx!("kept {}", count_kept);

        Ok(())
    }

    /// Finalize the stream. A no-op for the text modes; for `Json`, write
    /// the accumulated array under a single `"Logs"` key, pretty-printed.
    pub fn flush<W>(
        &mut self,
        out: &mut W,
    ) -> Result<(), SelError>
    where
        W: Write,
    {
        if self.mode == OutputMode::Json {
            let logs: Vec<serde_json::Value> = std::mem::take(&mut self.logs);
            let wrapped: serde_json::Value = serde_json::json!({ "Logs": logs });
            // serialization of a string-keyed Value map cannot fail; any
            // error here is the writer's
            let rendered: String = serde_json::to_string_pretty(&wrapped)
                .map_err(std::io::Error::from)?;
            writeln!(out, "{}", rendered)?;
        }
        out.flush()?;

        Ok(())
    }
}
