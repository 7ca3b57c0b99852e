use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use summit_catalog::{CatalogError, EventCatalog, EventMerger};
use summit_store::SnapshotStore;

pub const STORE_NAME: &str = "bookings";

/// A member's reservation against one slot. Identity is the
/// (member, event) pair; at most one booking exists per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub member_id: String,
    pub event_id: String,
    pub athlete_name: String,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("member already booked this event")]
    AlreadyBooked,

    #[error("event is at capacity")]
    EventFull,

    #[error("not found: {0}")]
    NotFound(String),
}

/// Flat list of bookings; lookups scan. Booking and cancelling move the
/// catalog's occupancy count in the same call, so the count and the ledger
/// never drift apart.
pub struct BookingLedger {
    bookings: Vec<Booking>,
    snapshots: SnapshotStore,
}

impl BookingLedger {
    pub fn load(snapshots: SnapshotStore) -> Self {
        let bookings: Vec<Booking> = snapshots.load(STORE_NAME).unwrap_or_default();
        Self {
            bookings,
            snapshots,
        }
    }

    pub fn get_for_member(&self, member_id: &str) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|b| b.member_id == member_id)
            .cloned()
            .collect()
    }

    pub fn get(&self, member_id: &str, event_id: &str) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.member_id == member_id && b.event_id == event_id)
    }

    /// Reserves a seat. Catalog slots are seated (capacity check plus
    /// increment in one step); seed-schedule slots are capacity-checked
    /// against their frozen count only. An id found in neither source fails
    /// closed with `NotFound`.
    pub fn book(
        &mut self,
        catalog: &mut EventCatalog,
        merger: &EventMerger,
        member_id: &str,
        event_id: &str,
        athlete_name: &str,
    ) -> Result<Booking, BookingError> {
        if self.get(member_id, event_id).is_some() {
            return Err(BookingError::AlreadyBooked);
        }

        match catalog.seat(event_id) {
            Ok(_) => {}
            Err(CatalogError::EventFull(_)) => return Err(BookingError::EventFull),
            Err(CatalogError::NotFound(_)) => match merger.seed_event(event_id) {
                Some(seed) if seed.is_full() => return Err(BookingError::EventFull),
                Some(_) => {}
                None => return Err(BookingError::NotFound(event_id.to_string())),
            },
        }

        let booking = Booking {
            member_id: member_id.to_string(),
            event_id: event_id.to_string(),
            athlete_name: athlete_name.to_string(),
            booked_at: Utc::now(),
        };
        self.bookings.push(booking.clone());
        self.persist();
        tracing::info!(member = member_id, event = event_id, "booking created");
        Ok(booking)
    }

    /// Renames the athlete on an existing booking. An empty or
    /// whitespace-only name leaves the record untouched and returns it as-is.
    pub fn update_athlete_name(
        &mut self,
        member_id: &str,
        event_id: &str,
        name: &str,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.member_id == member_id && b.event_id == event_id)
            .ok_or_else(|| BookingError::NotFound(format!("{member_id}/{event_id}")))?;

        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(booking.clone());
        }

        booking.athlete_name = trimmed.to_string();
        let updated = booking.clone();
        self.persist();
        Ok(updated)
    }

    /// Removes the booking and frees the seat. No time check happens here:
    /// the notice window is a caller concern via `CancellationPolicy`, so
    /// staff-driven cancellations inside the window stay possible.
    pub fn cancel(
        &mut self,
        catalog: &mut EventCatalog,
        member_id: &str,
        event_id: &str,
    ) -> Result<(), BookingError> {
        let idx = self
            .bookings
            .iter()
            .position(|b| b.member_id == member_id && b.event_id == event_id)
            .ok_or_else(|| BookingError::NotFound(format!("{member_id}/{event_id}")))?;

        self.bookings.remove(idx);
        catalog.unseat(event_id);
        self.persist();
        tracing::info!(member = member_id, event = event_id, "booking cancelled");
        Ok(())
    }

    fn persist(&self) {
        self.snapshots.persist(STORE_NAME, &self.bookings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_catalog::{AccessTier, Event, EventDraft};

    fn draft(capacity: u32) -> EventDraft {
        EventDraft {
            title: "Open gym".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: chrono::NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: chrono::NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            kind: "training".to_string(),
            program: "strength".to_string(),
            location: "Main hall".to_string(),
            capacity,
            tier: AccessTier::Basic,
        }
    }

    fn seed_event(id: &str, capacity: u32, booked_count: u32) -> Event {
        Event {
            id: id.to_string(),
            title: "Open mat".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            start_time: chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            kind: "open".to_string(),
            program: "general".to_string(),
            location: "Mat room".to_string(),
            capacity,
            booked_count,
            tier: AccessTier::Basic,
        }
    }

    fn fixture(capacity: u32) -> (BookingLedger, EventCatalog, EventMerger, String) {
        let mut catalog = EventCatalog::load(SnapshotStore::in_memory());
        let event = catalog.create(draft(capacity));
        let ledger = BookingLedger::load(SnapshotStore::in_memory());
        let merger = EventMerger::new(vec![seed_event("seed-1", 2, 2)]);
        (ledger, catalog, merger, event.id)
    }

    #[test]
    fn test_double_booking_increments_once() {
        let (mut ledger, mut catalog, merger, event_id) = fixture(5);

        assert!(ledger
            .book(&mut catalog, &merger, "ana@example.com", &event_id, "Ana")
            .is_ok());
        assert_eq!(
            ledger.book(&mut catalog, &merger, "ana@example.com", &event_id, "Ana"),
            Err(BookingError::AlreadyBooked)
        );
        assert_eq!(catalog.get(&event_id).unwrap().booked_count, 1);
    }

    #[test]
    fn test_full_event_rejects_and_count_is_unchanged() {
        let (mut ledger, mut catalog, merger, event_id) = fixture(1);

        ledger
            .book(&mut catalog, &merger, "ana@example.com", &event_id, "Ana")
            .unwrap();
        assert_eq!(
            ledger.book(&mut catalog, &merger, "ben@example.com", &event_id, "Ben"),
            Err(BookingError::EventFull)
        );
        assert_eq!(catalog.get(&event_id).unwrap().booked_count, 1);
    }

    #[test]
    fn test_unknown_event_fails_closed() {
        let (mut ledger, mut catalog, merger, _) = fixture(5);

        assert!(matches!(
            ledger.book(&mut catalog, &merger, "ana@example.com", "evt-404", "Ana"),
            Err(BookingError::NotFound(_))
        ));
        assert!(ledger.get_for_member("ana@example.com").is_empty());
    }

    #[test]
    fn test_seed_event_booking_checks_frozen_capacity() {
        let (mut ledger, mut catalog, _, _) = fixture(5);
        let merger = EventMerger::new(vec![
            seed_event("seed-open", 20, 0),
            seed_event("seed-full", 2, 2),
        ]);

        assert!(ledger
            .book(&mut catalog, &merger, "ana@example.com", "seed-open", "Ana")
            .is_ok());
        assert_eq!(
            ledger.book(&mut catalog, &merger, "ana@example.com", "seed-full", "Ana"),
            Err(BookingError::EventFull)
        );
    }

    #[test]
    fn test_cancel_frees_the_seat_once() {
        let (mut ledger, mut catalog, merger, event_id) = fixture(1);

        ledger
            .book(&mut catalog, &merger, "ana@example.com", &event_id, "Ana")
            .unwrap();
        ledger
            .cancel(&mut catalog, "ana@example.com", &event_id)
            .unwrap();
        assert_eq!(catalog.get(&event_id).unwrap().booked_count, 0);

        assert!(matches!(
            ledger.cancel(&mut catalog, "ana@example.com", &event_id),
            Err(BookingError::NotFound(_))
        ));
        assert_eq!(catalog.get(&event_id).unwrap().booked_count, 0);
    }

    #[test]
    fn test_update_athlete_name_rejects_blank() {
        let (mut ledger, mut catalog, merger, event_id) = fixture(5);
        ledger
            .book(&mut catalog, &merger, "ana@example.com", &event_id, "Ana")
            .unwrap();

        let unchanged = ledger
            .update_athlete_name("ana@example.com", &event_id, "   ")
            .unwrap();
        assert_eq!(unchanged.athlete_name, "Ana");

        let renamed = ledger
            .update_athlete_name("ana@example.com", &event_id, " Ana Souza ")
            .unwrap();
        assert_eq!(renamed.athlete_name, "Ana Souza");
    }

    #[test]
    fn test_get_for_member_only_returns_own_rows() {
        let (mut ledger, mut catalog, merger, event_id) = fixture(5);
        let second = catalog.create(draft(5));

        ledger
            .book(&mut catalog, &merger, "ana@example.com", &event_id, "Ana")
            .unwrap();
        ledger
            .book(&mut catalog, &merger, "ana@example.com", &second.id, "Ana")
            .unwrap();
        ledger
            .book(&mut catalog, &merger, "ben@example.com", &event_id, "Ben")
            .unwrap();

        assert_eq!(ledger.get_for_member("ana@example.com").len(), 2);
        assert_eq!(ledger.get_for_member("ben@example.com").len(), 1);
    }

    #[test]
    fn test_reload_preserves_bookings() {
        let store = SnapshotStore::in_memory();
        let mut catalog = EventCatalog::load(SnapshotStore::in_memory());
        let event = catalog.create(draft(5));
        let merger = EventMerger::new(Vec::new());

        let mut ledger = BookingLedger::load(store.clone());
        ledger
            .book(&mut catalog, &merger, "ana@example.com", &event.id, "Ana")
            .unwrap();

        let reloaded = BookingLedger::load(store);
        assert!(reloaded.get("ana@example.com", &event.id).is_some());
    }
}
