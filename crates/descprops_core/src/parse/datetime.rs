//! Date token resolution for `\due` and `\start`.
//!
//! # Responsibility
//! - Resolve short date tokens (`tm`, `fr`, `15`, `3d`) into absolute instants.
//! - Delegate everything else to a [`FallbackDateResolver`].
//!
//! # Invariants
//! - Strategies are tried in fixed order: keyword, day of month, day offset, fallback.
//!   The first strategy that recognizes the token decides the result, even when
//!   that result is a failure.
//! - Day-of-month and day-offset results are at the start of their day in the
//!   run's zone.

use crate::parse::natural::FallbackDateResolver;
use crate::parse::zone::LocalNow;
use chrono::{DateTime, Datelike, Days, FixedOffset, Months};
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_OFFSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?(\d+)d$").expect("valid day offset regex"));

/// Resolves command date parameters against a captured "now".
pub struct DateTimeResolver<'a> {
    fallback: &'a dyn FallbackDateResolver,
}

impl<'a> DateTimeResolver<'a> {
    pub fn new(fallback: &'a dyn FallbackDateResolver) -> Self {
        Self { fallback }
    }

    /// Resolves `parameter` relative to `now`; `None` when it is not a usable date.
    pub fn resolve(&self, parameter: &str, now: LocalNow<'_>) -> Option<DateTime<FixedOffset>> {
        let raw = parameter.trim();
        let token = raw.to_lowercase();

        if token == "now" {
            return Some(now.instant);
        }
        if let Some(phrase) = keyword_phrase(&token) {
            return self.fallback.resolve(phrase, now);
        }

        if !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit()) {
            let day = token.parse::<u32>().ok()?;
            return resolve_day_of_month(day, now);
        }

        if let Some(caps) = DAY_OFFSET_RE.captures(&token) {
            let days = caps[1].parse::<u64>().ok()?;
            let shifted = now.instant.checked_add_days(Days::new(days))?;
            return self.fallback.start_of_day(shifted, now.zone);
        }

        self.fallback.resolve(raw, now)
    }
}

/// Maps shortcut tokens to the fallback phrase they stand for.
fn keyword_phrase(token: &str) -> Option<&'static str> {
    match token {
        "tm" | "tom" | "tomorrow" => Some("tomorrow"),
        "mo" | "mon" | "monday" => Some("next monday"),
        "tu" | "tue" | "tuesday" => Some("next tuesday"),
        "we" | "wed" | "wednesday" => Some("next wednesday"),
        "th" | "thu" | "thursday" => Some("next thursday"),
        "fr" | "fri" | "friday" => Some("next friday"),
        "sa" | "sat" | "saturday" => Some("next saturday"),
        "su" | "sun" | "sunday" => Some("next sunday"),
        _ => None,
    }
}

/// Picks this month when `day` is today or later, otherwise next month.
///
/// Fails when the picked month has fewer than `day` days; there is no
/// further roll-over.
fn resolve_day_of_month(day: u32, now: LocalNow<'_>) -> Option<DateTime<FixedOffset>> {
    if !(1..=31).contains(&day) {
        return None;
    }
    let today = now.today();
    let this_month = today.with_day(1)?;
    let target_month = if day >= today.day() {
        this_month
    } else {
        this_month.checked_add_months(Months::new(1))?
    };
    now.midnight(target_month.with_day(day)?)
}
