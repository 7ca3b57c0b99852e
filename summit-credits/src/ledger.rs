use crate::member::MemberDirectory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use summit_store::SnapshotStore;
use uuid::Uuid;

pub const STORE_NAME: &str = "credit-transactions";
pub const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CreditReason {
    Purchase,
    Refund,
    BookingSpend,
    AdminAdjustment,
    MembershipGrant,
    Other,
}

/// One signed adjustment in the append-only log. Never edited after being
/// written; corrections are new offsetting transactions. The `reference`
/// carries an external id (e.g. a payment-provider session) when one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransaction {
    pub id: String,
    pub email: String,
    pub amount: i64,
    pub reason: CreditReason,
    pub reference: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// What `record` hands back. `committed` is false only for unusable input
/// (the returned transaction then carries an empty id and was never
/// appended); `new_balance` is `None` when no member record matched.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub committed: bool,
    pub new_balance: Option<i64>,
    pub transaction: CreditTransaction,
}

/// Append-only log of credit adjustments with a bounded retention window.
/// The denormalized member balance is updated synchronously at write time
/// and stays authoritative even after old log entries are pruned.
pub struct CreditLedger {
    log: Vec<CreditTransaction>,
    retention: usize,
    snapshots: SnapshotStore,
}

impl CreditLedger {
    pub fn load(snapshots: SnapshotStore, retention: usize) -> Self {
        let log: Vec<CreditTransaction> = snapshots.load(STORE_NAME).unwrap_or_default();
        Self {
            log,
            retention,
            snapshots,
        }
    }

    /// Appends a transaction and applies its delta to the member's balance
    /// in the same call. A transaction for an email with no member record
    /// is still kept as an audit trail for not-yet-provisioned accounts.
    pub fn record(
        &mut self,
        members: &mut MemberDirectory,
        email: &str,
        amount: i64,
        reason: CreditReason,
        reference: Option<String>,
    ) -> RecordOutcome {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return RecordOutcome {
                committed: false,
                new_balance: None,
                transaction: CreditTransaction {
                    id: String::new(),
                    email,
                    amount,
                    reason,
                    reference,
                    recorded_at: Utc::now(),
                },
            };
        }

        let transaction = CreditTransaction {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            amount,
            reason,
            reference,
            recorded_at: Utc::now(),
        };
        self.log.push(transaction.clone());
        if self.log.len() > self.retention {
            let excess = self.log.len() - self.retention;
            self.log.drain(..excess);
        }
        self.persist();

        let new_balance = members.apply_delta(&email, amount);
        if new_balance.is_none() {
            tracing::info!(%email, "credit recorded for unprovisioned account");
        }

        RecordOutcome {
            committed: true,
            new_balance,
            transaction,
        }
    }

    /// Most-recent-first transactions for one email, case-insensitive.
    pub fn recent(&self, email: &str, limit: usize) -> Vec<CreditTransaction> {
        let email = email.trim();
        self.log
            .iter()
            .rev()
            .filter(|t| t.email.eq_ignore_ascii_case(email))
            .take(limit)
            .cloned()
            .collect()
    }

    fn persist(&self) {
        self.snapshots.persist(STORE_NAME, &self.log);
    }
}
