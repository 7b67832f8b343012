//! Human-relative time rendering ("3 hours ago", "in a day").

use chrono::{DateTime, Utc};

const DAYS_TO_MONTHS: f64 = 4800.0 / 146_097.0;

/// Current Unix timestamp in seconds
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Render a Unix timestamp relative to `now`
pub fn relative_from_unix(timestamp: i64, now: DateTime<Utc>) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(then) => relative_time(then, now),
        None => "Invalid date".to_string(),
    }
}

/// Render `then` relative to `now`, rounding to the largest sensible unit
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = (now - then).num_milliseconds();
    let ms = elapsed_ms.unsigned_abs() as f64;

    let seconds = (ms / 1000.0).round();
    let minutes = (ms / 60_000.0).round();
    let hours = (ms / 3_600_000.0).round();
    let days_exact = ms / 86_400_000.0;
    let days = days_exact.round();
    let months = (days_exact * DAYS_TO_MONTHS).round();
    let years = (days_exact * DAYS_TO_MONTHS / 12.0).round();

    let phrase = if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes)
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours)
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days)
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{} months", months)
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{} years", years)
    };

    if elapsed_ms < 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}
