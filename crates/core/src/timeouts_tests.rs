// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    instant = { TimeoutClass::Instant, 2 },
    quick = { TimeoutClass::Quick, 5 },
    short = { TimeoutClass::Short, 10 },
    fast = { TimeoutClass::Fast, 30 },
    default = { TimeoutClass::Default, 60 },
    lint = { TimeoutClass::Lint, 300 },
    build = { TimeoutClass::Build, 600 },
    deploy = { TimeoutClass::Deploy, 900 },
    test_suite = { TimeoutClass::TestSuite, 1200 },
    http_request = { TimeoutClass::HttpRequest, 30 },
    cluster_login = { TimeoutClass::ClusterLogin, 120 },
)]
fn timeout_class_duration(class: TimeoutClass, expected_secs: u64) {
    assert_eq!(class.duration(), Duration::from_secs(expected_secs));
}

#[parameterized(
    short = { OutputCap::Short, 1_000 },
    medium = { OutputCap::Medium, 2_000 },
    standard = { OutputCap::Standard, 5_000 },
    long = { OutputCap::Long, 10_000 },
    full = { OutputCap::Full, 15_000 },
    extended = { OutputCap::Extended, 20_000 },
)]
fn output_cap_chars(cap: OutputCap, expected: usize) {
    assert_eq!(cap.chars(), expected);
}

#[parameterized(
    minutes = { "30m", 30 },
    hours = { "2h", 120 },
    days = { "1d", 1440 },
    weeks = { "1w", 10080 },
    zero = { "0m", 0 },
)]
fn duration_of_parses_suffix(input: &str, expected_minutes: u64) {
    assert_eq!(duration_of(input), Ok(expected_minutes));
}

#[parameterized(
    empty = { "" },
    no_suffix = { "30" },
    bad_suffix = { "30x" },
    bad_number = { "xm" },
    single_char = { "m" },
)]
fn duration_of_rejects_invalid(input: &str) {
    assert!(duration_of(input).is_err());
}

#[test]
fn default_timeout_class_is_default() {
    assert_eq!(TimeoutClass::default(), TimeoutClass::Default);
}
