//! Ambient inputs for one extraction run.
//!
//! # Responsibility
//! - Abstract the wall clock and the acting user behind small traits.
//! - Capture both once per run so every command of that run sees the same values.
//! - Keep the clock's timezone next to "now" so day arithmetic follows DST.

use crate::model::task::UserId;
use crate::parse::zone::{CalendarZone, LocalNow};
use chrono::{DateTime, FixedOffset, Local};

/// Source of the current instant and the timezone calendar days are counted in.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
    fn zone(&self) -> &dyn CalendarZone;
}

/// Identity of the user on whose behalf extraction runs.
pub trait SessionIdentity {
    fn current_user_id(&self) -> UserId;
}

/// Wall clock in the host's timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn zone(&self) -> &dyn CalendarZone {
        &Local
    }
}

/// Clock frozen at one instant; days are counted in that instant's offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }

    fn zone(&self) -> &dyn CalendarZone {
        self.0.offset()
    }
}

/// Session bound to one known user.
#[derive(Debug, Clone, Copy)]
pub struct FixedSession(pub UserId);

impl SessionIdentity for FixedSession {
    fn current_user_id(&self) -> UserId {
        self.0
    }
}

/// Values read once at the start of a run and shared by every line.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub now: LocalNow<'a>,
    pub user_id: UserId,
}

impl<'a> ParseContext<'a> {
    pub fn capture(clock: &'a dyn Clock, session: &dyn SessionIdentity) -> Self {
        Self {
            now: LocalNow::new(clock.now(), clock.zone()),
            user_id: session.current_user_id(),
        }
    }
}
