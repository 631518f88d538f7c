use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::estimate::HalfInning;

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub fn half_inning_name(half: HalfInning) -> &'static str {
    match half {
        HalfInning::Top => "top",
        HalfInning::Bottom => "bottom",
    }
}

/// "Top of the 9th"
pub fn inning_label(half: HalfInning, inning: u32) -> String {
    format!("{} of the {}", capitalize(half_inning_name(half)), ordinal(inning))
}

pub fn remaining_time_label(ms: u64) -> String {
    format!("Estimated time remaining: {ms}ms")
}

/// Coarse reading of a millisecond count, e.g. "1h 5m" or "2m 15s".
pub fn humanize_ms(ms: u64) -> String {
    let secs = ms / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m"),
    }
}

/// "6:08PM 6/01/2023"
pub fn game_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%-I:%M%p %-m/%d/%Y").to_string()
}

/// "6:08:05PM 6/01/2023"
pub fn updated_at<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%-I:%M:%S%p %-m/%d/%Y").to_string()
}

pub fn stat_or_dash(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
