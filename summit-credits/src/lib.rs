pub mod ledger;
pub mod member;

pub use ledger::{CreditLedger, CreditReason, CreditTransaction, RecordOutcome};
pub use member::{MemberDirectory, MemberRecord};
