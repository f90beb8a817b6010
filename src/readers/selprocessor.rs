// src/readers/selprocessor.rs

//! Implements [`SelProcessor`], the multi-file orchestrator for the print
//! and clear operations.
//!
//! The rotated log file set is fixed and ordered, oldest first, newest
//! (actively written) last. A file that cannot be opened for read is
//! skipped; this is the one tolerated partial failure. A clear rewrites
//! each file through a sibling temporary file that is atomically renamed
//! over the original, so readers never observe a half-written file. The
//! set of files is *not* rewritten transactionally as a whole: a fatal
//! error mid-sequence leaves earlier files cleared and later files
//! untouched.

use crate::common::{FPath, FPaths, FruFilter, SelError};
use crate::data::sel::{SelRecord, SEL_HEADER};
use crate::debug::printers::e_wrn;
use crate::platform::loggerctl::{LoggerControl, Rsyslogd};
use crate::platform::pal::Pal;
use crate::readers::selstream::{OutputMode, SelStream};

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::tempfile::NamedTempFile;

/// The rotated SEL log files, oldest first, newest last. Written by the
/// external logger; this utility only reads them and, on clear, replaces
/// them in place.
pub const SEL_LOG_PATHS: [&str; 2] = ["/mnt/data/logfile.0", "/mnt/data/logfile"];

pub struct SelProcessor<'a> {
    /// ordered rotated-file list, oldest first
    paths: FPaths,
    pal: &'a dyn Pal,
    logger: Box<dyn LoggerControl>,
}

impl<'a> SelProcessor<'a> {
    pub fn new(pal: &'a dyn Pal) -> SelProcessor<'a> {
        SelProcessor::with_parts(
            SEL_LOG_PATHS
                .iter()
                .map(|path| path.to_string())
                .collect(),
            pal,
            Box::new(Rsyslogd::new()),
        )
    }

    /// Construct with explicit collaborators; how tests substitute a
    /// temporary file set and a recording logger control.
    pub fn with_parts(
        paths: FPaths,
        pal: &'a dyn Pal,
        logger: Box<dyn LoggerControl>,
    ) -> SelProcessor<'a> {
        SelProcessor { paths, pal, logger }
    }

    pub fn paths(&self) -> &FPaths {
        &self.paths
    }

    /// Print matching records from every log file, oldest to newest, to
    /// `out`. Aligned text by default; one `{"Logs": [...]}` object when
    /// `json` is set.
    pub fn print<W>(
        &self,
        filter: &FruFilter,
        range: Option<(&str, &str)>,
        json: bool,
        out: &mut W,
    ) -> Result<(), SelError>
    where
        W: Write,
    {
        defn!("filter {:?} range {:?} json {}", filter, range, json);
        let mode: OutputMode = match json {
            true => OutputMode::Json,
            false => OutputMode::Aligned,
        };
        let mut stream = SelStream::new(mode);
        if mode == OutputMode::Aligned {
            writeln!(out, "{}", *SEL_HEADER)?;
        }
        for path in self.paths.iter() {
            let file: File = match File::open(path) {
                Ok(file) => file,
                Err(err) => {
                    // rotated away or not yet created
                    defo!("skip {:?}: {}", path, err);
                    continue;
                }
            };
            stream.run(BufReader::new(file), out, filter, range, self.pal)?;
        }
        stream.flush(out)?;
        defx!();

        Ok(())
    }

    /// Destructively clear matching records from every log file. Surviving
    /// (non-matching) lines are copied through verbatim; the newest file
    /// additionally gets one clear marker per selected FRU, ascending.
    /// After the rewrite the external logger is signalled to reopen its
    /// output.
    ///
    /// The caller is expected to hold the [`ClearLock`] around this call.
    ///
    /// [`ClearLock`]: crate::platform::clearlock::ClearLock
    pub fn clear(
        &self,
        filter: &FruFilter,
        range: Option<(&str, &str)>,
    ) -> Result<(), SelError> {
        defn!("filter {:?} range {:?}", filter, range);
        let mut stream = SelStream::new(OutputMode::RawPassthrough);
        let index_last: usize = self.paths.len().saturating_sub(1);
        for (index, path) in self.paths.iter().enumerate() {
            let file: File = match File::open(path) {
                Ok(file) => file,
                Err(err) => {
                    defo!("skip {:?}: {}", path, err);
                    continue;
                }
            };
            let mut temp: NamedTempFile = self.open_sibling_temp(path)?;
            stream.run(BufReader::new(file), &mut temp, filter, range, self.pal)?;
            if index == index_last {
                for fru in filter.iter() {
                    let marker: SelRecord = SelRecord::make_clear_marker(*fru, range, self.pal)?;
                    writeln!(temp, "{}", marker.raw())?;
                }
            }
            temp.flush()?;
            // the logger keeps appending to this path after SIGHUP; keep
            // the original permission bits on the replacement
            if let Ok(metadata) = std::fs::metadata(path) {
                if let Err(err) = std::fs::set_permissions(temp.path(), metadata.permissions()) {
                    e_wrn!("cannot set permissions on {:?}: {}", temp.path(), err);
                }
            }
            defo!("rename {:?} over {:?}", temp.path(), path);
            temp.persist(path)
                .map_err(|err| SelError::LogReplaceFailed(path.clone(), err.error))?;
        }
        self.logger.reload()?;
        defx!();

        Ok(())
    }

    fn open_sibling_temp(
        &self,
        path: &FPath,
    ) -> Result<NamedTempFile, SelError> {
        // sibling directory so the final rename cannot cross filesystems
        let parent: &Path = Path::new(path.as_str())
            .parent()
            .unwrap_or_else(|| Path::new("."));

        NamedTempFile::new_in(parent)
            .map_err(|err| SelError::TempFileCreateFailed(path.clone(), err))
    }
}
