//! Strongly-typed identifiers for simulation entities.
//!
//! Newtype wrappers keep virtual point handles, cable ids and
//! scheduler subscriptions from being mixed up with plain integers.

use serde::{Deserialize, Serialize};

/// Handle of a registered virtual point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VirtualPointId(pub u32);

/// Identifier of a cable within a host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CableId(pub u32);

/// Handle returned when a tick subscriber is registered with the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub u64);

impl From<u32> for VirtualPointId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for CableId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
