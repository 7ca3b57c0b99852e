use chrono::{NaiveDate, NaiveTime};
use std::sync::{Arc, Mutex, MutexGuard};
use summit_booking::{Booking, BookingError, BookingLedger, CancellationPolicy};
use summit_catalog::{
    materialize, CatalogError, Event, EventCatalog, EventDraft, EventMerger, EventPatch,
    RecurrenceSpec,
};
use summit_credits::{
    CreditLedger, CreditReason, CreditTransaction, MemberDirectory, MemberRecord, RecordOutcome,
};
use summit_store::{FsBackend, SnapshotStore, SummitConfig};

/// The process-wide booking core: one instance of each store, loaded once
/// from snapshots at construction and held for the process lifetime. Every
/// store sits behind its own mutex so check-then-mutate sequences stay
/// atomic on a preemptive runtime; where two stores are needed the catalog
/// lock is taken before the booking lock.
pub struct Engine {
    catalog: Mutex<EventCatalog>,
    merger: EventMerger,
    bookings: Mutex<BookingLedger>,
    credits: Mutex<CreditLedger>,
    members: Mutex<MemberDirectory>,
    policy: CancellationPolicy,
}

impl Engine {
    /// Filesystem-backed engine; snapshot files live under the configured
    /// data directory. A read-only filesystem degrades to warn-and-continue
    /// on every persist.
    pub fn open(config: &SummitConfig, seed: Vec<Event>) -> Self {
        let snapshots = SnapshotStore::new(Arc::new(FsBackend::new(&config.data.dir)));
        Self::with_snapshots(snapshots, config, seed)
    }

    /// Memory-backed engine for tests and ephemeral deployments.
    pub fn in_memory(seed: Vec<Event>) -> Self {
        Self::with_snapshots(SnapshotStore::in_memory(), &SummitConfig::default(), seed)
    }

    pub fn with_snapshots(snapshots: SnapshotStore, config: &SummitConfig, seed: Vec<Event>) -> Self {
        let catalog = EventCatalog::load(snapshots.clone());
        let bookings = BookingLedger::load(snapshots.clone());
        let credits = CreditLedger::load(snapshots.clone(), config.credits.log_retention);
        let members = MemberDirectory::load(snapshots);

        tracing::info!(
            events = catalog.list_all().len(),
            seed_events = seed.len(),
            "booking core loaded"
        );

        Self {
            catalog: Mutex::new(catalog),
            merger: EventMerger::new(seed),
            bookings: Mutex::new(bookings),
            credits: Mutex::new(credits),
            members: Mutex::new(members),
            policy: CancellationPolicy::new(config.booking.cancellation_notice_hours),
        }
    }

    fn lock<T>(store: &Mutex<T>) -> MutexGuard<'_, T> {
        store.lock().expect("store mutex poisoned")
    }

    // --- Event catalog -----------------------------------------------------

    pub fn create_event(&self, draft: EventDraft) -> Event {
        Self::lock(&self.catalog).create(draft)
    }

    pub fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event, CatalogError> {
        Self::lock(&self.catalog).update(id, patch)
    }

    pub fn delete_event(&self, id: &str) -> bool {
        Self::lock(&self.catalog).delete(id)
    }

    pub fn event(&self, id: &str) -> Option<Event> {
        Self::lock(&self.catalog).get(id).cloned()
    }

    pub fn events(&self) -> Vec<Event> {
        Self::lock(&self.catalog).list_all().to_vec()
    }

    pub fn materialize(&self, spec: &RecurrenceSpec) -> Vec<Event> {
        materialize(&mut Self::lock(&self.catalog), spec)
    }

    // --- Merged schedule ---------------------------------------------------

    pub fn merged_events(&self) -> Vec<Event> {
        self.merger.list_merged(&Self::lock(&self.catalog))
    }

    pub fn merged_event(&self, id: &str) -> Option<Event> {
        let catalog = Self::lock(&self.catalog);
        self.merger.get_merged(&catalog, id).cloned()
    }

    // --- Bookings ----------------------------------------------------------

    pub fn book(
        &self,
        member_id: &str,
        event_id: &str,
        athlete_name: &str,
    ) -> Result<Booking, BookingError> {
        let mut catalog = Self::lock(&self.catalog);
        let mut bookings = Self::lock(&self.bookings);
        bookings.book(&mut catalog, &self.merger, member_id, event_id, athlete_name)
    }

    pub fn cancel_booking(&self, member_id: &str, event_id: &str) -> Result<(), BookingError> {
        let mut catalog = Self::lock(&self.catalog);
        let mut bookings = Self::lock(&self.bookings);
        bookings.cancel(&mut catalog, member_id, event_id)
    }

    pub fn update_athlete_name(
        &self,
        member_id: &str,
        event_id: &str,
        name: &str,
    ) -> Result<Booking, BookingError> {
        Self::lock(&self.bookings).update_athlete_name(member_id, event_id, name)
    }

    pub fn bookings_for(&self, member_id: &str) -> Vec<Booking> {
        Self::lock(&self.bookings).get_for_member(member_id)
    }

    pub fn booking(&self, member_id: &str, event_id: &str) -> Option<Booking> {
        Self::lock(&self.bookings).get(member_id, event_id).cloned()
    }

    /// Display-side gate for the cancellation window; `cancel_booking`
    /// itself applies no time check.
    pub fn can_cancel(&self, date: NaiveDate, start_time: NaiveTime) -> bool {
        self.policy.allows(date, start_time)
    }

    // --- Credits -----------------------------------------------------------

    pub fn record_credit(
        &self,
        email: &str,
        amount: i64,
        reason: CreditReason,
        reference: Option<String>,
    ) -> RecordOutcome {
        let mut credits = Self::lock(&self.credits);
        let mut members = Self::lock(&self.members);
        credits.record(&mut members, email, amount, reason, reference)
    }

    pub fn recent_credit_transactions(
        &self,
        email: &str,
        limit: Option<usize>,
    ) -> Vec<CreditTransaction> {
        let limit = limit.unwrap_or(summit_credits::ledger::DEFAULT_RECENT_LIMIT);
        Self::lock(&self.credits).recent(email, limit)
    }

    pub fn member_balance(&self, email: &str) -> Option<i64> {
        Self::lock(&self.members).find(email).map(|m| m.credits)
    }

    pub fn upsert_member(&self, record: MemberRecord) {
        Self::lock(&self.members).upsert(record)
    }

    pub fn set_member_credits(&self, email: &str, value: i64) -> Option<i64> {
        Self::lock(&self.members).set_credits(email, value)
    }
}
