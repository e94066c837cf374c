//! Member identity and resolution.
//!
//! Membership itself (joins, departures, failure detection) is owned by
//! the cluster service; this protocol only resolves an originating
//! member id to a live member, or learns that it has departed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cluster member identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptor for a live cluster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: MemberId,
    address: String,
}

impl Member {
    pub fn new(id: MemberId, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Membership view consumed by the protocol.
pub trait Membership {
    /// Resolve a member id to a live member, `None` once it departed.
    fn resolve_member(&self, id: MemberId) -> Option<Member>;
}
