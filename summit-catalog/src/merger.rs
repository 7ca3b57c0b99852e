use crate::catalog::{EventCatalog, DYNAMIC_ID_PREFIX};
use crate::event::Event;

/// Read-only union of the static seed schedule with the dynamic catalog.
/// The seed list is loaded once at startup and never mutated; its ids live
/// in a separate namespace from catalog-assigned `evt-` ids.
pub struct EventMerger {
    seed: Vec<Event>,
}

impl EventMerger {
    pub fn new(seed: Vec<Event>) -> Self {
        for event in &seed {
            if event.id.starts_with(DYNAMIC_ID_PREFIX) {
                tracing::warn!(
                    id = %event.id,
                    "seed event uses the dynamic id prefix and may shadow a catalog entry"
                );
            }
        }
        Self { seed }
    }

    pub fn seed_events(&self) -> &[Event] {
        &self.seed
    }

    pub fn seed_event(&self, id: &str) -> Option<&Event> {
        self.seed.iter().find(|e| e.id == id)
    }

    /// Seed schedule first, then the dynamic catalog.
    pub fn list_merged(&self, catalog: &EventCatalog) -> Vec<Event> {
        self.seed
            .iter()
            .chain(catalog.list_all())
            .cloned()
            .collect()
    }

    pub fn get_merged<'a>(&'a self, catalog: &'a EventCatalog, id: &str) -> Option<&'a Event> {
        self.seed_event(id).or_else(|| catalog.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AccessTier, EventDraft};
    use chrono::{NaiveDate, NaiveTime};
    use summit_store::SnapshotStore;

    fn seed_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            title: "Open mat".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            kind: "open".to_string(),
            program: "general".to_string(),
            location: "Mat room".to_string(),
            capacity: 20,
            booked_count: 0,
            tier: AccessTier::Basic,
        }
    }

    fn draft() -> EventDraft {
        EventDraft {
            title: "Spin".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            kind: "training".to_string(),
            program: "cardio".to_string(),
            location: "Studio".to_string(),
            capacity: 8,
            tier: AccessTier::Premium,
        }
    }

    #[test]
    fn test_merged_list_unions_both_sources() {
        let merger = EventMerger::new(vec![seed_event("seed-1"), seed_event("seed-2")]);
        let mut catalog = EventCatalog::load(SnapshotStore::in_memory());
        let created = catalog.create(draft());

        let merged = merger.list_merged(&catalog);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].id, "seed-1");
        assert_eq!(merged[2].id, created.id);
    }

    #[test]
    fn test_get_merged_finds_either_source() {
        let merger = EventMerger::new(vec![seed_event("seed-1")]);
        let mut catalog = EventCatalog::load(SnapshotStore::in_memory());
        let created = catalog.create(draft());

        assert!(merger.get_merged(&catalog, "seed-1").is_some());
        assert!(merger.get_merged(&catalog, &created.id).is_some());
        assert!(merger.get_merged(&catalog, "seed-9").is_none());
    }
}
