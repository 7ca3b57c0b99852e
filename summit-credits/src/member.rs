use serde::{Deserialize, Serialize};
use summit_store::SnapshotStore;

pub const STORE_NAME: &str = "members";

/// The slice of the member record this core owns: the denormalized credit
/// balance the ledger feeds. Identity and roles live with the external
/// auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub email: String,
    pub name: String,
    pub credits: i64,
}

pub struct MemberDirectory {
    members: Vec<MemberRecord>,
    snapshots: SnapshotStore,
}

impl MemberDirectory {
    pub fn load(snapshots: SnapshotStore) -> Self {
        let members: Vec<MemberRecord> = snapshots.load(STORE_NAME).unwrap_or_default();
        Self { members, snapshots }
    }

    pub fn find(&self, email: &str) -> Option<&MemberRecord> {
        let email = email.trim();
        self.members.iter().find(|m| m.email.eq_ignore_ascii_case(email))
    }

    /// Adds or replaces a record, matching on email case-insensitively.
    pub fn upsert(&mut self, record: MemberRecord) {
        match self
            .members
            .iter_mut()
            .find(|m| m.email.eq_ignore_ascii_case(&record.email))
        {
            Some(existing) => *existing = record,
            None => self.members.push(record),
        }
        self.persist();
    }

    /// Applies a signed delta without clamping. The ledger is the only
    /// caller; a misuse can drive a balance negative, which the ledger's
    /// own callers must guard against.
    pub fn apply_delta(&mut self, email: &str, amount: i64) -> Option<i64> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.email.eq_ignore_ascii_case(email))?;
        member.credits += amount;
        let balance = member.credits;
        self.persist();
        Some(balance)
    }

    /// Direct balance set for admin correction screens; the only path that
    /// clamps at zero.
    pub fn set_credits(&mut self, email: &str, value: i64) -> Option<i64> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.email.eq_ignore_ascii_case(email))?;
        member.credits = value.max(0);
        let balance = member.credits;
        self.persist();
        Some(balance)
    }

    fn persist(&self) {
        self.snapshots.persist(STORE_NAME, &self.members);
    }
}
