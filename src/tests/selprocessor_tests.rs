// src/tests/selprocessor_tests.rs

//! tests for `selprocessor.rs` `SelProcessor`; print and clear end-to-end
//! over rotated file sets laid into a temporary directory

use crate::common::{FPaths, FruFilter, FruId, FRU_ALL, FRU_SYS};
use crate::platform::pal::BoardPal;
use crate::readers::selprocessor::{SelProcessor, SEL_LOG_PATHS};
use crate::tests::common::{
    create_log_files,
    read_file,
    MockLoggerControl,
    HEADER,
    LINE_ASSERT_FRU1,
    LINE_MARKER_FRU2,
    LINE_NIC_FRU2,
    LINE_NOISE,
    LINE_REBOOT,
    ROW_ASSERT_FRU1,
    ROW_NIC_FRU2,
    ROW_REBOOT,
    ROW_REBOOT_SYS,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ::lazy_static::lazy_static;
use ::regex::Regex;

lazy_static! {
    /// a freshly-emitted clear marker line, any scope
    static ref REGEX_MARKER: Regex = Regex::new(
        r"^[0-9]{4} [A-Z][a-z]{2} [ 0-9]?[0-9] [0-9]{1,2}:[0-9]{2}:[0-9]{2} log-util: User cleared (?P<scope>.*) logs(?P<window> from .*)?$"
    ).unwrap();
}

fn processor<'a>(
    paths: &FPaths,
    pal: &'a BoardPal,
) -> (SelProcessor<'a>, Arc<AtomicUsize>) {
    let (logger, reloads) = MockLoggerControl::new();
    (
        SelProcessor::with_parts(paths.clone(), pal, Box::new(logger)),
        reloads,
    )
}

fn filter(frus: &[FruId]) -> FruFilter {
    frus.iter().copied().collect()
}

fn print_to_string(
    processor: &SelProcessor,
    filter: &FruFilter,
    range: Option<(&str, &str)>,
    json: bool,
) -> String {
    let mut out: Vec<u8> = Vec::new();
    processor
        .print(filter, range, json, &mut out)
        .unwrap();

    String::from_utf8(out).unwrap()
}

#[test]
fn test_default_paths() {
    let pal = BoardPal;
    let processor = SelProcessor::new(&pal);
    assert_eq!(processor.paths().as_slice(), SEL_LOG_PATHS);
}

#[test]
fn test_print_all_both_files() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT, LINE_ASSERT_FRU1],
        &[LINE_NOISE, LINE_NIC_FRU2, LINE_MARKER_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, _reloads) = processor(&paths, &pal);
    let output: String = print_to_string(&processor, &filter(&[FRU_ALL]), None, false);
    let expect: String = format!(
        "{}\n{}\n{}\n{}\n{}\n",
        HEADER, ROW_REBOOT, ROW_ASSERT_FRU1, ROW_NIC_FRU2, LINE_MARKER_FRU2,
    );
    assert_eq!(output, expect);
}

#[test]
fn test_print_single_fru() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT, LINE_ASSERT_FRU1],
        &[LINE_NIC_FRU2, LINE_MARKER_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, _reloads) = processor(&paths, &pal);
    let output: String = print_to_string(&processor, &filter(&[2]), None, false);
    let expect: String = format!("{}\n{}\n{}\n", HEADER, ROW_NIC_FRU2, LINE_MARKER_FRU2);
    assert_eq!(output, expect);
}

#[test]
fn test_print_sys() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT, LINE_ASSERT_FRU1],
        &[LINE_NIC_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, _reloads) = processor(&paths, &pal);
    let output: String = print_to_string(&processor, &filter(&[FRU_SYS]), None, false);
    let expect: String = format!("{}\n{}\n", HEADER, ROW_REBOOT_SYS);
    assert_eq!(output, expect);
}

/// unopenable files are skipped; printing continues with the rest
#[test]
fn test_print_skips_missing_file() {
    let (_tempdir, mut paths) = create_log_files(&[&[LINE_REBOOT]]);
    paths.insert(0, "/nonexistent/logfile.0".to_string());
    let pal = BoardPal;
    let (processor, _reloads) = processor(&paths, &pal);
    let output: String = print_to_string(&processor, &filter(&[FRU_ALL]), None, false);
    let expect: String = format!("{}\n{}\n", HEADER, ROW_REBOOT);
    assert_eq!(output, expect);
}

#[test]
fn test_print_json() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT],
        &[LINE_NIC_FRU2, LINE_MARKER_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, _reloads) = processor(&paths, &pal);
    let output: String = print_to_string(&processor, &filter(&[FRU_ALL]), None, true);
    assert!(!output.contains(HEADER));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let logs = value["Logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["FRU#"], "0");
    assert_eq!(logs[1]["FRU#"], "2");
}

#[test]
fn test_clear_all() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT, LINE_ASSERT_FRU1],
        &[LINE_NIC_FRU2, LINE_MARKER_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, reloads) = processor(&paths, &pal);
    processor
        .clear(&filter(&[FRU_ALL]), None)
        .unwrap();

    // the oldest file is emptied; only one fresh marker remains in the
    // newest file
    assert_eq!(read_file(&paths[0]), "");
    let newest: String = read_file(&paths[1]);
    let lines: Vec<&str> = newest.lines().collect();
    assert_eq!(lines.len(), 1, "newest file {:?}", newest);
    let captures = REGEX_MARKER
        .captures(lines[0])
        .unwrap_or_else(|| panic!("not a marker line {:?}", lines[0]));
    assert_eq!(&captures["scope"], "all");
    assert_eq!(reloads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_single_fru_preserves_others() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT, LINE_ASSERT_FRU1],
        &[LINE_NIC_FRU2, LINE_MARKER_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, reloads) = processor(&paths, &pal);
    processor
        .clear(&filter(&[2]), None)
        .unwrap();

    // non-FRU-2 rows survive verbatim, leading whitespace included
    let oldest: String = read_file(&paths[0]);
    assert_eq!(oldest, format!("{}\n{}\n", LINE_REBOOT, LINE_ASSERT_FRU1));
    let newest: String = read_file(&paths[1]);
    let lines: Vec<&str> = newest.lines().collect();
    assert_eq!(lines.len(), 1, "newest file {:?}", newest);
    let captures = REGEX_MARKER
        .captures(lines[0])
        .unwrap();
    assert_eq!(&captures["scope"], "FRU: 2");
    assert_eq!(reloads.load(Ordering::SeqCst), 1);
}

/// one marker per selected FRU, ascending id order
#[test]
fn test_clear_paired_frus_marker_order() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT],
        &[LINE_NIC_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, _reloads) = processor(&paths, &pal);
    processor
        .clear(&filter(&[4, 3]), None)
        .unwrap();

    let newest: String = read_file(&paths[1]);
    let lines: Vec<&str> = newest.lines().collect();
    // FRU 2 survives; then markers for 3 and 4 in ascending order
    assert_eq!(lines.len(), 3, "newest file {:?}", newest);
    assert_eq!(lines[0], LINE_NIC_FRU2);
    assert!(lines[1].ends_with("User cleared FRU: 3 logs"), "line {:?}", lines[1]);
    assert!(lines[2].ends_with("User cleared FRU: 4 logs"), "line {:?}", lines[2]);
}

/// rows matching the FRU but outside the window survive a windowed clear
#[test]
fn test_clear_time_window() {
    let (_tempdir, paths) = create_log_files(&[
        &[LINE_REBOOT, LINE_ASSERT_FRU1],
        &[LINE_NIC_FRU2],
    ]);
    let pal = BoardPal;
    let (processor, _reloads) = processor(&paths, &pal);
    let range: Option<(&str, &str)> = Some(("2020-04-01 00:00:00", "2020-04-30 23:59:59"));
    processor
        .clear(&filter(&[FRU_ALL]), range)
        .unwrap();

    // only the April entry is cleared
    assert_eq!(read_file(&paths[0]), format!("{}\n", LINE_REBOOT));
    let newest: String = read_file(&paths[1]);
    let lines: Vec<&str> = newest.lines().collect();
    assert_eq!(lines.len(), 2, "newest file {:?}", newest);
    assert_eq!(lines[0], LINE_NIC_FRU2);
    assert!(
        lines[1].ends_with("User cleared all logs from 2020-04-01 00:00:00 to 2020-04-30 23:59:59"),
        "line {:?}",
        lines[1],
    );
}

/// a missing file is skipped during clear; the rest are still rewritten
#[test]
fn test_clear_skips_missing_file() {
    let (_tempdir, mut paths) = create_log_files(&[&[LINE_NIC_FRU2]]);
    paths.insert(0, "/nonexistent/logfile.0".to_string());
    let pal = BoardPal;
    let (processor, reloads) = processor(&paths, &pal);
    processor
        .clear(&filter(&[2]), None)
        .unwrap();

    let newest: String = read_file(&paths[1]);
    let lines: Vec<&str> = newest.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("User cleared FRU: 2 logs"));
    assert_eq!(reloads.load(Ordering::SeqCst), 1);
}
