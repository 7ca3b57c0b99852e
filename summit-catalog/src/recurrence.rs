use crate::catalog::EventCatalog;
use crate::event::{AccessTier, Event, EventDraft};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Deserialize;

/// How a slot template repeats across its date range.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
}

/// Weekday numbers as the admin UI sends them: 0 = Sunday .. 6 = Saturday.
pub const DEFAULT_WEEKDAYS: [u32; 5] = [1, 2, 3, 4, 5];

/// A slot template plus a repetition rule; consumed once to produce a batch
/// of catalog entries, never persisted itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceSpec {
    pub title: String,
    pub kind: String,
    pub program: String,
    pub location: String,
    pub tier: AccessTier,
    pub capacity: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub repeat: Repeat,
    pub start_date: NaiveDate,
    /// Ignored for `repeat = none`.
    pub end_date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday; defaults to Mon-Fri for weekly repeats.
    pub weekdays: Option<Vec<u32>>,
}

impl RecurrenceSpec {
    fn draft_for(&self, date: NaiveDate) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            date,
            start_time: self.start_time,
            end_time: self.end_time,
            kind: self.kind.clone(),
            program: self.program.clone(),
            location: self.location.clone(),
            capacity: self.capacity,
            tier: self.tier,
        }
    }
}

/// Expands the spec into one catalog entry per matching calendar day,
/// ascending by date. Every occurrence goes through `EventCatalog::create`,
/// so ids and persistence match manually created slots. A reversed date
/// range yields no events for `daily`/`weekly`.
pub fn materialize(catalog: &mut EventCatalog, spec: &RecurrenceSpec) -> Vec<Event> {
    let mut created = Vec::new();
    match spec.repeat {
        Repeat::None => {
            created.push(catalog.create(spec.draft_for(spec.start_date)));
        }
        Repeat::Daily => {
            for day in days_between(spec.start_date, spec.end_date) {
                created.push(catalog.create(spec.draft_for(day)));
            }
        }
        Repeat::Weekly => {
            let allowed = spec
                .weekdays
                .clone()
                .unwrap_or_else(|| DEFAULT_WEEKDAYS.to_vec());
            for day in days_between(spec.start_date, spec.end_date) {
                if allowed.contains(&day.weekday().num_days_from_sunday()) {
                    created.push(catalog.create(spec.draft_for(day)));
                }
            }
        }
    }
    created
}

fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}
