// src/bin/log-util.rs

//! Driver program _log-util_ drives the [_sellib_].
//!
//! Processes user-passed command-line arguments, resolves the FRU argument
//! to numeric ids through the platform abstraction layer, then runs one of
//! the two operations over the rotated SEL log files:
//!
//! - `--print`: render matching entries as aligned text or JSON to STDOUT.
//! - `--clear`: destructively remove matching entries, leaving everything
//!   else in place, then signal the system logger to reopen its output.
//!   Guarded by the process-wide clear lock.
//!
//! [_sellib_]: sellib

#![allow(non_camel_case_types)]

use std::io;
use std::process::ExitCode;

use ::clap::{ArgGroup, Parser};
use ::const_format::concatcp;
use ::sellib::common::{FruFilter, FruId};
use ::sellib::e_err;
use ::sellib::platform::clearlock::ClearLock;
use ::sellib::platform::pal::{BoardPal, Pal};
use ::sellib::readers::selprocessor::SelProcessor;
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx};

const CLI_HELP_AFTER: &str = "\
Time window bounds use the format \"YYYY-MM-DD HH:MM:SS\" and must be passed
together.

Examples:
  log-util all --print
  log-util nic --print --json
  log-util mb --clear --start \"2020-05-01 00:00:00\" --end \"2020-05-31 23:59:59\"
";

/// clap command-line arguments build-time definitions.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = "log-util",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\nVersion: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
    group(
        ArgGroup::new("action")
            .required(true)
            .args(["print", "clear"])
    ),
)]
struct CLI_Args {
    /// FRU scope to act on: "all", "sys", or a board FRU name
    /// such as "mb" or "nic". A FRU with a paired board is selected
    /// together with its pair.
    #[clap(required = true, verbatim_doc_comment)]
    fru: String,

    /// Print matching SEL entries to STDOUT.
    #[clap(long)]
    print: bool,

    /// Remove matching SEL entries from the log files, leaving
    /// non-matching entries untouched, and record a clear marker.
    #[clap(long, verbatim_doc_comment)]
    clear: bool,

    /// With --print, emit one {"Logs": [...]} JSON object instead of
    /// aligned text.
    #[clap(long, requires = "print", verbatim_doc_comment)]
    json: bool,

    /// Start of the time window, inclusive.
    #[clap(short = 's', long, requires = "end")]
    start: Option<String>,

    /// End of the time window, inclusive.
    #[clap(short = 'e', long, requires = "start")]
    end: Option<String>,
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();
    let args: CLI_Args = CLI_Args::parse();

    let pal = BoardPal;
    let ids: Vec<FruId> = match pal.fru_ids(&args.fru) {
        Some(ids) => ids,
        None => {
            e_err!("unknown FRU {:?}", args.fru);
            return ExitCode::FAILURE;
        }
    };
    let filter: FruFilter = ids.into_iter().collect();
    let range: Option<(&str, &str)> = match (args.start.as_deref(), args.end.as_deref()) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };
    defo!("fru {:?} filter {:?} range {:?}", args.fru, filter, range);

    let processor = SelProcessor::new(&pal);
    let result = if args.clear {
        // held for the whole rewrite; released on scope exit
        let _lock: ClearLock = match ClearLock::acquire() {
            Ok(lock) => lock,
            Err(err) => {
                e_err!("{}", err);
                return ExitCode::FAILURE;
            }
        };
        processor.clear(&filter, range)
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        processor.print(&filter, range, args.json, &mut out)
    };

    let exitcode: ExitCode = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}
