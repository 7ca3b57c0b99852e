use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Governs how close to a slot's start a member may still cancel. Pure
/// date/time arithmetic against the facility's local wall clock; it never
/// reads ledger state, so callers can evaluate it before attempting a
/// cancel.
#[derive(Debug, Clone, Copy)]
pub struct CancellationPolicy {
    notice: Duration,
}

impl CancellationPolicy {
    pub fn new(notice_hours: i64) -> Self {
        Self {
            notice: Duration::hours(notice_hours),
        }
    }

    /// True when the slot starts at least the notice period from now.
    pub fn allows(&self, date: NaiveDate, start_time: NaiveTime) -> bool {
        self.allows_at(date, start_time, Local::now().naive_local())
    }

    /// Exactly the notice period ahead still allows.
    pub fn allows_at(&self, date: NaiveDate, start_time: NaiveTime, now: NaiveDateTime) -> bool {
        let start = NaiveDateTime::new(date, start_time);
        start.signed_duration_since(now) >= self.notice
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::new(24)
    }
}
