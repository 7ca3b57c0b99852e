pub mod ledger;
pub mod policy;

pub use ledger::{Booking, BookingError, BookingLedger};
pub use policy::CancellationPolicy;
