//! Local ownership state per partition.
//!
//! The ownership table itself (and the transfer protocol that mutates
//! it) lives outside this crate; the replication layer only observes the
//! state and reacts to it.

use crate::partition::version::PartitionId;

/// What this member currently is, with respect to one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// No replica of the partition is resident here.
    NotOwned,
    /// This member holds the partition's backup replica; `applied` is the
    /// highest backup version already applied locally.
    Backup { applied: i64 },
    /// Mid-handoff of partition responsibility. Requests for the
    /// partition are still legitimately processed until the transfer
    /// completes.
    TransferringOut { applied: i64 },
}

impl ControlState {
    /// Applied backup version, when a replica is resident.
    pub fn applied_version(&self) -> Option<i64> {
        match self {
            ControlState::NotOwned => None,
            ControlState::Backup { applied } | ControlState::TransferringOut { applied } => {
                Some(*applied)
            }
        }
    }

    /// Whether a replica of the partition is resident on this member.
    pub fn is_resident(&self) -> bool {
        !matches!(self, ControlState::NotOwned)
    }
}

/// View of the partition ownership table consumed by the protocol.
pub trait PartitionOwnership {
    /// Control state of one partition on this member.
    fn control_state(&self, partition: PartitionId) -> ControlState;

    /// Number of partitions in the service topology.
    fn partition_count(&self) -> u32;

    /// Whether this member is the partition's backup owner.
    fn is_backup_owner(&self, partition: PartitionId) -> bool {
        matches!(self.control_state(partition), ControlState::Backup { .. })
    }
}
