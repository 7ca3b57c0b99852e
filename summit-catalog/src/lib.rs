pub mod catalog;
pub mod event;
pub mod merger;
pub mod recurrence;

pub use catalog::{CatalogError, EventCatalog, DYNAMIC_ID_PREFIX};
pub use event::{AccessTier, Event, EventDraft, EventPatch};
pub use merger::EventMerger;
pub use recurrence::{materialize, RecurrenceSpec, Repeat};
