//! Entity trait shared by every persisted collection

use serde::{de::DeserializeOwned, Serialize};

use portal_shared::{EntityId, Timestamp};

pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Caller-supplied fields of a new record (no id, no timestamps).
    type Draft;
    /// Partial update; `None` fields stay untouched.
    type Patch;

    /// Prefix of freshly generated ids, e.g. `project`.
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn updated_at(&self) -> Timestamp;

    /// Builds the record with `created_at = updated_at = now`.
    fn create(id: EntityId, now: Timestamp, draft: Self::Draft) -> Self;
    fn apply(&mut self, patch: Self::Patch);
    fn touch(&mut self, now: Timestamp);
}
