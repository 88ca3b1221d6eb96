//! General-purpose natural-language date resolver.
//!
//! # Responsibility
//! - Resolve free-form date/time phrases relative to a given "now".
//! - Normalize instants to the start of their day.
//!
//! # Invariants
//! - Resolution never reads the wall clock; "now" is always an input.
//! - Day boundaries and wall-clock times are computed in the zone carried by
//!   "now", using the offset that applies on the target day.
//! - "next <weekday>" is strictly after today (one week ahead when today matches).

use crate::parse::zone::{CalendarZone, LocalNow};
use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    Weekday,
};
use once_cell::sync::Lazy;
use regex::Regex;

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?\d+)\s*(mins?|minutes?|hours?|days?|weeks?)$")
        .expect("valid relative offset regex")
});

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Fallback resolver consulted when no built-in shortcut matches.
pub trait FallbackDateResolver {
    /// Resolves `text` relative to `now`. `None` means the text is not a date.
    fn resolve(&self, text: &str, now: LocalNow<'_>) -> Option<DateTime<FixedOffset>>;

    /// Returns the first instant of the calendar day `instant` falls on in `zone`.
    fn start_of_day(
        &self,
        instant: DateTime<FixedOffset>,
        zone: &dyn CalendarZone,
    ) -> Option<DateTime<FixedOffset>> {
        zone.midnight(zone.localize(instant).date_naive())
    }
}

/// Default fallback resolver covering the common English phrases and ISO forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalDateResolver;

impl FallbackDateResolver for NaturalDateResolver {
    fn resolve(&self, text: &str, now: LocalNow<'_>) -> Option<DateTime<FixedOffset>> {
        let raw = text.trim();
        let lowered = raw.to_lowercase();
        let today = now.today();

        match lowered.as_str() {
            "now" => return Some(now.instant),
            "today" | "midnight" => return now.midnight(today),
            "tomorrow" => return now.midnight(today.succ_opt()?),
            "yesterday" => return now.midnight(today.pred_opt()?),
            _ => {}
        }

        if let Some(rest) = lowered.strip_prefix("next ") {
            let weekday = parse_weekday(rest.trim())?;
            return now.midnight(upcoming_weekday(today, weekday, false)?);
        }
        if let Some(weekday) = parse_weekday(&lowered) {
            return now.midnight(upcoming_weekday(today, weekday, true)?);
        }

        if let Some(caps) = RELATIVE_RE.captures(&lowered) {
            let amount: i64 = caps[1].parse().ok()?;
            return shift(now, amount, &caps[2]);
        }

        parse_absolute(raw, now)
    }
}

/// Minutes and hours are elapsed time; days and weeks keep the wall-clock time.
fn shift(now: LocalNow<'_>, amount: i64, unit: &str) -> Option<DateTime<FixedOffset>> {
    if unit.starts_with("min") || unit.starts_with("hour") {
        let delta = if unit.starts_with("min") {
            TimeDelta::try_minutes(amount)
        } else {
            TimeDelta::try_hours(amount)
        }?;
        let shifted = now.instant.checked_add_signed(delta)?;
        return Some(now.zone.localize(shifted));
    }

    let delta = if unit.starts_with("day") {
        TimeDelta::try_days(amount)
    } else {
        TimeDelta::try_weeks(amount)
    }?;
    now.at_local(now.instant.naive_local().checked_add_signed(delta)?)
}

fn parse_absolute(raw: &str, now: LocalNow<'_>) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(now.zone.localize(parsed));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return now.at_local(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return now.midnight(parsed);
        }
    }
    if let Ok(time) = NaiveTime::parse_from_str(raw, "%H:%M") {
        return now.at_local(now.today().and_time(time));
    }
    None
}

fn upcoming_weekday(today: NaiveDate, target: Weekday, include_today: bool) -> Option<NaiveDate> {
    let current = today.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    let mut ahead = (wanted + 7 - current) % 7;
    if ahead == 0 && !include_today {
        ahead = 7;
    }
    today.checked_add_days(Days::new(u64::from(ahead)))
}

fn parse_weekday(value: &str) -> Option<Weekday> {
    match value {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}
