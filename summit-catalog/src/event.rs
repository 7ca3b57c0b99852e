use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Membership tiers, ordered: a higher tier grants entry to any slot at or
/// below it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    Basic,
    Premium,
    All,
}

/// A single dated, timed, capacity-bounded bookable slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub kind: String,
    pub program: String,
    pub location: String,
    pub capacity: u32,
    pub booked_count: u32,
    pub tier: AccessTier,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.booked_count >= self.capacity
    }

    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.booked_count)
    }
}

/// Fields for a new slot; the catalog assigns `id` and starts
/// `bookedCount` at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub kind: String,
    pub program: String,
    pub location: String,
    pub capacity: u32,
    pub tier: AccessTier,
}

/// Partial update; only fields present in the payload are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub kind: Option<String>,
    pub program: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    /// Administrative correction only; the booking flow never sets this.
    pub booked_count: Option<u32>,
    pub tier: Option<AccessTier>,
}
