use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::validation::{validate, Violation};

/// Unique identifier for a VLAN record (UUID v7 for time-ordering).
///
/// Serialized as the canonical hyphenated UUID string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VlanId(uuid::Uuid);

impl VlanId {
    /// Generate a new time-ordered VLAN ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for VlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VlanId({})", self.0)
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// A VLAN network segment.
///
/// Field order matches the persisted and wire layout:
/// `id`, `vid`, `name`, `subnet`, `gateway`, `status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    /// Assigned by the creating side, never changed afterwards.
    pub id: VlanId,
    /// 802.1Q VLAN tag, valid in `1..=4094`.
    #[serde(rename = "vid", default)]
    pub tag: u16,
    /// Display name, must not be empty.
    #[serde(default)]
    pub name: String,
    /// Network prefix in CIDR notation. Host bits are kept as given.
    pub subnet: IpNet,
    /// Gateway address, must lie inside `subnet`.
    pub gateway: IpAddr,
    /// Free-form administrative state, e.g. `enabled` or `disabled`.
    #[serde(default)]
    pub status: String,
}

impl Vlan {
    /// Check the admission rules. An empty list means the record is valid.
    pub fn validate(&self) -> Vec<Violation> {
        validate(self)
    }
}

/// Creation payload: a [`Vlan`] without its id.
///
/// Clients may send an `id` field; it is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVlan {
    #[serde(rename = "vid", default)]
    pub tag: u16,
    #[serde(default)]
    pub name: String,
    pub subnet: IpNet,
    pub gateway: IpAddr,
    #[serde(default)]
    pub status: String,
}

impl NewVlan {
    /// Attach an id, producing a full record.
    pub fn into_vlan(self, id: VlanId) -> Vlan {
        Vlan {
            id,
            tag: self.tag,
            name: self.name,
            subnet: self.subnet,
            gateway: self.gateway,
            status: self.status,
        }
    }
}
