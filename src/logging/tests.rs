// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};
use super::activity::{ActivityLog, format_entry};
use chrono::NaiveDate;

fn fixed_now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_micro_opt(14, 30, 0, 42))
        .expect("valid timestamp")
}

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_log_level_filter_strings() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    insta::assert_snapshot!(
        filters.join(" | "),
        @"off | gitbackup=error | gitbackup=warn | gitbackup=info | gitbackup=debug | gitbackup=trace | trace"
    );
}

#[test]
fn test_console_ansi_follows_stderr() {
    use std::io::IsTerminal;

    let config = LogConfig::default();
    assert_eq!(config.console_ansi(), std::io::stderr().is_terminal());

    let plain = LogConfig::builder().with_console_ansi(false).build();
    assert!(!plain.console_ansi());
}

#[test]
fn test_format_entry() {
    let line = format_entry("Cloned https://example.com/r.git into /tmp/r", fixed_now());
    insta::assert_snapshot!(
        line.trim_end(),
        @"2024-03-05 14:30:00.000042 - Cloned https://example.com/r.git into /tmp/r"
    );
    assert!(line.ends_with('\n'));
}

#[test]
fn test_format_entry_flattens_newlines() {
    let line = format_entry("Error cloning x: fatal: one\nfatal: two\n", fixed_now());
    assert_eq!(line.lines().count(), 1);
    assert!(line.contains("fatal: one fatal: two"));
}

#[test]
fn test_activity_log_appends() {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let log = ActivityLog::new(temp.path().join("nested").join("log.txt"));

    log.append("first", fixed_now());
    log.append("second", fixed_now());

    let content = std::fs::read_to_string(log.path()).expect("log should exist");
    let messages: Vec<_> = content
        .lines()
        .filter_map(|l| l.split_once(" - ").map(|(_, m)| m))
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn test_activity_log_failure_is_swallowed() {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    // A directory in place of the log file makes the open fail
    let log = ActivityLog::new(temp.path());
    log.append("lost", fixed_now());
    assert!(temp.path().is_dir());
}
