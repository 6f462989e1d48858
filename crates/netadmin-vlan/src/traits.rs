use crate::error::StoreResult;
use crate::model::{Vlan, VlanId};

/// The authoritative VLAN collection.
///
/// All implementations must satisfy these invariants:
/// - Operations are atomic with respect to each other. Reads may run
///   concurrently; mutations are serialized and never observed half-applied.
/// - Reads return copies. Callers never hold references into the store.
/// - A mutation returns `Ok` only once the change is durable.
/// - Failures are returned to the caller, never logged or swallowed.
pub trait VlanStore: Send + Sync {
    /// Snapshot of every record. Empty when the store is empty.
    fn list(&self) -> Vec<Vlan>;

    /// The record for `id`, or `None` if there is none.
    fn get(&self, id: &VlanId) -> Option<Vlan>;

    /// Insert or overwrite the record under `vlan.id`.
    ///
    /// The caller assigns the id; use [`VlanId::new`] for a new record.
    fn save(&self, vlan: Vlan) -> StoreResult<()>;

    /// Replace every field of an existing record.
    ///
    /// Fails with `StoreError::NotFound` if `vlan.id` is not present.
    fn update(&self, vlan: Vlan) -> StoreResult<()>;

    /// Remove a record permanently.
    ///
    /// Fails with `StoreError::NotFound` if `id` is not present.
    fn delete(&self, id: &VlanId) -> StoreResult<()>;
}
