//! VLAN records for the network administration API.
//!
//! This crate owns everything about a VLAN record that is independent of
//! HTTP: the data model, the admission rules every record must satisfy, and
//! the record store that keeps an in-memory collection consistent with a
//! JSON file on disk.
//!
//! # Key Types
//!
//! - [`Vlan`] -- a VLAN segment: id, tag, name, subnet, gateway, status
//! - [`VlanId`] -- store-assigned UUID v7 identifier
//! - [`Violation`] -- one broken admission rule, see [`validate`]
//! - [`VlanStore`] -- list/get/save/update/delete over the collection
//! - [`FileVlanStore`] -- `RwLock`-guarded map mirrored to a JSON array file
//!
//! # Store Rules
//!
//! 1. Every record in the store has passed [`validate`], including records
//!    loaded at startup. An invalid file refuses to load.
//! 2. Reads share the lock; mutations hold it exclusively, including the
//!    file rewrite, so no reader observes a half-applied change.
//! 3. A successful mutation returns only after the whole collection has been
//!    rewritten and synced.
//! 4. A failed rewrite is reported once. The in-memory change is kept.

pub mod error;
pub mod file;
pub mod model;
pub mod persist;
pub mod traits;
pub mod validation;

pub use error::{StoreError, StoreResult};
pub use file::FileVlanStore;
pub use model::{NewVlan, Vlan, VlanId};
pub use traits::VlanStore;
pub use validation::{ensure_valid, validate, ValidationError, Violation, MAX_TAG, MIN_TAG};
