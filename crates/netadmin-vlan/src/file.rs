//! JSON file-backed VLAN store.
//!
//! [`FileVlanStore`] keeps the collection in a `HashMap` behind a single
//! `RwLock` and mirrors it to a JSON array file. Every mutation rewrites the
//! whole file while holding the write guard.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::model::{Vlan, VlanId};
use crate::persist::{read_records, write_records};
use crate::traits::VlanStore;
use crate::validation::{ensure_valid, validate, ValidationError};

/// A [`VlanStore`] persisted to a single JSON file.
///
/// The store assumes exclusive control of its file. Changes made to the file
/// by other processes while the store is open are neither detected nor
/// preserved.
#[derive(Debug)]
pub struct FileVlanStore {
    path: PathBuf,
    vlans: RwLock<HashMap<VlanId, Vlan>>,
}

impl FileVlanStore {
    /// Open the store at `path`.
    ///
    /// A missing file is created holding an empty array. An existing file
    /// must decode as an array of records that all pass validation;
    /// otherwise the store is not opened. When the file repeats an id the
    /// later record wins and a warning is logged.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let vlans = match std::fs::metadata(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                write_records(&path, std::iter::empty())?;
                info!(path = %path.display(), "created empty vlan store");
                HashMap::new()
            }
            _ => {
                let vlans = load(&path)?;
                info!(path = %path.display(), count = vlans.len(), "loaded vlan store");
                vlans
            }
        };

        Ok(Self {
            path,
            vlans: RwLock::new(vlans),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    // Mutations replace whole entries, so a panic under the guard cannot
    // leave a half-written record behind and the poison flag is ignored.
    fn read_guard(&self) -> RwLockReadGuard<'_, HashMap<VlanId, Vlan>> {
        self.vlans.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, HashMap<VlanId, Vlan>> {
        self.vlans.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rewrite the file from `vlans`. Called with the write guard held.
    fn persist(&self, vlans: &HashMap<VlanId, Vlan>) -> StoreResult<()> {
        write_records(&self.path, sorted(vlans))
    }
}

impl VlanStore for FileVlanStore {
    fn list(&self) -> Vec<Vlan> {
        sorted(&self.read_guard()).into_iter().cloned().collect()
    }

    fn get(&self, id: &VlanId) -> Option<Vlan> {
        self.read_guard().get(id).cloned()
    }

    fn save(&self, vlan: Vlan) -> StoreResult<()> {
        ensure_valid(&vlan)?;
        let mut vlans = self.write_guard();
        debug!(id = %vlan.id, tag = vlan.tag, "saving vlan");
        vlans.insert(vlan.id, vlan);
        self.persist(&vlans)
    }

    fn update(&self, vlan: Vlan) -> StoreResult<()> {
        ensure_valid(&vlan)?;
        let mut vlans = self.write_guard();
        match vlans.entry(vlan.id) {
            Entry::Occupied(mut entry) => {
                debug!(id = %vlan.id, tag = vlan.tag, "updating vlan");
                entry.insert(vlan);
            }
            Entry::Vacant(_) => return Err(StoreError::NotFound(vlan.id)),
        }
        self.persist(&vlans)
    }

    fn delete(&self, id: &VlanId) -> StoreResult<()> {
        let mut vlans = self.write_guard();
        if vlans.remove(id).is_none() {
            return Err(StoreError::NotFound(*id));
        }
        debug!(%id, "deleted vlan");
        self.persist(&vlans)
    }
}

/// Decode the file and build the id map, rejecting any invalid record.
fn load(path: &Path) -> StoreResult<HashMap<VlanId, Vlan>> {
    let records = read_records(path)?;
    let mut vlans = HashMap::with_capacity(records.len());
    for vlan in records {
        if let Some(source) = ValidationError::new(validate(&vlan)) {
            return Err(StoreError::InvalidRecord {
                path: path.to_path_buf(),
                id: vlan.id,
                source,
            });
        }
        let id = vlan.id;
        if vlans.insert(id, vlan).is_some() {
            warn!(path = %path.display(), %id, "duplicate vlan id in store file; keeping the later record");
        }
    }
    Ok(vlans)
}

/// Records ordered by id, which for v7 ids is creation order.
fn sorted(vlans: &HashMap<VlanId, Vlan>) -> Vec<&Vlan> {
    let mut records: Vec<&Vlan> = vlans.values().collect();
    records.sort_by_key(|vlan| vlan.id);
    records
}
