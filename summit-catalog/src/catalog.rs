use crate::event::{Event, EventDraft, EventPatch};
use serde::Deserialize;
use summit_store::SnapshotStore;

pub const STORE_NAME: &str = "events";

/// Prefix for catalog-assigned ids. Seed schedule ids must not use it, so
/// the two id spaces stay disjoint.
pub const DYNAMIC_ID_PREFIX: &str = "evt-";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("event not found: {0}")]
    NotFound(String),

    #[error("event is at capacity: {0}")]
    EventFull(String),
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CatalogSnapshot {
    events: Vec<Event>,
    next_id: u64,
}

/// The dynamic set of bookable slots. Every mutation writes the full
/// snapshot before returning; `booked_count` moves only through
/// `seat`/`unseat` (booking flow) or an explicit `booked_count` patch
/// (administrative correction).
pub struct EventCatalog {
    events: Vec<Event>,
    next_id: u64,
    snapshots: SnapshotStore,
}

impl EventCatalog {
    pub fn load(snapshots: SnapshotStore) -> Self {
        let snap: CatalogSnapshot = snapshots.load(STORE_NAME).unwrap_or_default();
        Self {
            events: snap.events,
            next_id: snap.next_id.max(1),
            snapshots,
        }
    }

    pub fn create(&mut self, draft: EventDraft) -> Event {
        let event = Event {
            id: format!("{DYNAMIC_ID_PREFIX}{}", self.next_id),
            title: draft.title,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            kind: draft.kind,
            program: draft.program,
            location: draft.location,
            capacity: draft.capacity,
            booked_count: 0,
            tier: draft.tier,
        };
        self.next_id += 1;
        self.events.push(event.clone());
        self.persist();
        event
    }

    /// Applies only the fields present in the patch. A zero capacity is
    /// ignored rather than breaking the slot; `booked_count` is clamped to
    /// capacity so the occupancy invariant survives corrections.
    pub fn update(&mut self, id: &str, patch: EventPatch) -> Result<Event, CatalogError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(start_time) = patch.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            event.end_time = end_time;
        }
        if let Some(kind) = patch.kind {
            event.kind = kind;
        }
        if let Some(program) = patch.program {
            event.program = program;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(capacity) = patch.capacity {
            if capacity > 0 {
                event.capacity = capacity;
            }
        }
        if let Some(booked_count) = patch.booked_count {
            event.booked_count = booked_count;
        }
        if let Some(tier) = patch.tier {
            event.tier = tier;
        }
        event.booked_count = event.booked_count.min(event.capacity);

        let updated = event.clone();
        self.persist();
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn list_all(&self) -> &[Event] {
        &self.events
    }

    /// Capacity check and increment in one step, so no caller can observe a
    /// free seat and then overfill the slot.
    pub fn seat(&mut self, id: &str) -> Result<Event, CatalogError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if event.booked_count >= event.capacity {
            return Err(CatalogError::EventFull(id.to_string()));
        }
        event.booked_count += 1;

        let seated = event.clone();
        self.persist();
        Ok(seated)
    }

    /// Decrement on cancellation. Floors at zero and ignores unknown ids;
    /// seed-schedule slots are not tracked here.
    pub fn unseat(&mut self, id: &str) {
        if let Some(event) = self.events.iter_mut().find(|e| e.id == id) {
            event.booked_count = event.booked_count.saturating_sub(1);
            self.persist();
        }
    }

    fn persist(&self) {
        self.snapshots.persist(
            STORE_NAME,
            &serde_json::json!({
                "events": self.events,
                "nextId": self.next_id,
            }),
        );
    }
}
