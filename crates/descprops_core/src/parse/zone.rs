//! Calendar zones for day-based date arithmetic.
//!
//! # Responsibility
//! - Turn local wall-clock dates into instants in a concrete timezone.
//! - Express instants in the offset their zone uses at that instant.
//!
//! # Invariants
//! - Offsets are looked up per instant, never copied from "now"; a date on the
//!   far side of a DST change gets that side's offset.
//! - Ambiguous wall-clock times resolve to their earlier instant.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use std::fmt::Debug;

/// Timezone in which day boundaries are computed.
pub trait CalendarZone: Debug {
    /// Re-expresses `instant` in the offset this zone uses at that instant.
    fn localize(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset>;

    /// Instant at which local clocks show `local`.
    ///
    /// `None` when the time falls into a gap skipped by a forward shift.
    fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>>;

    /// First instant of `date`.
    ///
    /// When a forward shift skips midnight, the day starts one hour later.
    fn midnight(&self, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
        let start = date.and_hms_opt(0, 0, 0)?;
        self.at_local(start)
            .or_else(|| self.at_local(start.checked_add_signed(TimeDelta::try_hours(1)?)?))
    }
}

fn localize_in<Tz: TimeZone>(zone: &Tz, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    instant.with_timezone(zone).fixed_offset()
}

fn at_local_in<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    zone.from_local_datetime(&local)
        .earliest()
        .map(|instant| instant.fixed_offset())
}

impl CalendarZone for Local {
    fn localize(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        localize_in(self, instant)
    }

    fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        at_local_in(self, local)
    }
}

impl CalendarZone for Utc {
    fn localize(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        localize_in(self, instant)
    }

    fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        at_local_in(self, local)
    }
}

impl CalendarZone for FixedOffset {
    fn localize(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        localize_in(self, instant)
    }

    fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        at_local_in(self, local)
    }
}

/// "Now" of one run, bound to the zone its calendar arithmetic happens in.
#[derive(Debug, Clone, Copy)]
pub struct LocalNow<'z> {
    /// Current instant, expressed in the zone's offset.
    pub instant: DateTime<FixedOffset>,
    pub zone: &'z dyn CalendarZone,
}

impl<'z> LocalNow<'z> {
    pub fn new(instant: DateTime<FixedOffset>, zone: &'z dyn CalendarZone) -> Self {
        Self {
            instant: zone.localize(instant),
            zone,
        }
    }

    /// Local calendar date of "now".
    pub fn today(&self) -> NaiveDate {
        self.instant.date_naive()
    }

    pub fn midnight(&self, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
        self.zone.midnight(date)
    }

    pub fn at_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        self.zone.at_local(local)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::CentralEuropeAutumn2026;
    use super::{CalendarZone, LocalNow};
    use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

    fn at(value: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(value).expect("valid test timestamp")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn midnight_uses_the_offset_of_the_target_day() {
        let zone = CentralEuropeAutumn2026;
        let before = zone.midnight(date(2026, 10, 24)).unwrap();
        let after = zone.midnight(date(2026, 10, 30)).unwrap();

        assert_eq!(before, at("2026-10-24T00:00:00+02:00"));
        assert_eq!(before.offset().local_minus_utc(), 7200);
        assert_eq!(after, at("2026-10-30T00:00:00+01:00"));
        assert_eq!(after.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn repeated_hour_resolves_to_earlier_instant() {
        let zone = CentralEuropeAutumn2026;
        let local = date(2026, 10, 25).and_hms_opt(2, 30, 0).unwrap();
        assert_eq!(zone.at_local(local), Some(at("2026-10-25T02:30:00+02:00")));
    }

    #[test]
    fn local_now_reports_the_zone_date() {
        // 23:30 UTC is already the next day in UTC+2.
        let now = LocalNow::new(at("2026-10-14T23:30:00+00:00"), &CentralEuropeAutumn2026);
        assert_eq!(now.today(), date(2026, 10, 15));
        assert_eq!(now.instant.offset().local_minus_utc(), 7200);

        let utc = LocalNow::new(at("2026-10-15T01:30:00+02:00"), &Utc);
        assert_eq!(utc.today(), date(2026, 10, 14));
    }
}
