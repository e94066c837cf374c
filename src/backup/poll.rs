//! Completion gating on the backup send path.
//!
//! The bookkeeping object governing an in-flight request may only stop
//! waiting once the local backup state has caught up to exactly the
//! version carried by that request. Completions can be delivered out of
//! wire order, so the gate is re-polled on every completion notification
//! until it answers true.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::backup::request::{MultiBackupRequest, SingleBackupRequest};
use crate::partition::control::{ControlState, PartitionOwnership};
use crate::partition::version::{PartitionId, VersionMap};

/// Whether the partition's applied state sits exactly one version behind
/// the requested one. Behind, ahead, or not resident all mean the
/// acknowledgment cannot be released yet.
fn caught_up(state: ControlState, version: i64) -> bool {
    match state.applied_version() {
        Some(applied) => applied == version - 1,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Single-partition poll
// ---------------------------------------------------------------------------

/// Completion gate for a single-partition backup request.
#[derive(Debug)]
pub struct SingleBackupPoll {
    partition: PartitionId,
    version: i64,
    delivered: AtomicBool,
}

impl SingleBackupPoll {
    pub fn new(request: &SingleBackupRequest) -> Self {
        Self {
            partition: request.partition(),
            version: request.version(),
            delivered: AtomicBool::new(false),
        }
    }

    /// Record the transport-level delivery acknowledgment.
    pub fn confirm_delivery(&self) {
        self.delivered.store(true, Ordering::Release);
    }

    pub fn delivery_confirmed(&self) -> bool {
        self.delivered.load(Ordering::Acquire)
    }

    /// Version condition alone: applied backup version equals exactly
    /// `requested − 1`.
    pub fn is_closeable_on_delivery(&self, ownership: &dyn PartitionOwnership) -> bool {
        caught_up(ownership.control_state(self.partition), self.version)
    }

    /// Safe to finalize: delivery acknowledged and the version condition
    /// holds.
    pub fn is_closeable(&self, ownership: &dyn PartitionOwnership) -> bool {
        self.delivery_confirmed() && self.is_closeable_on_delivery(ownership)
    }
}

// ---------------------------------------------------------------------------
// Multi-partition poll
// ---------------------------------------------------------------------------

/// Completion gate for a batch backup request. One unresolved partition
/// anywhere in the batch blocks finalization of the whole batch.
#[derive(Debug)]
pub struct MultiBackupPoll {
    versions: VersionMap,
    delivered: AtomicBool,
}

impl MultiBackupPoll {
    pub fn new(request: &MultiBackupRequest) -> Self {
        Self {
            versions: request.versions().clone(),
            delivered: AtomicBool::new(false),
        }
    }

    /// Record the transport-level delivery acknowledgment.
    pub fn confirm_delivery(&self) {
        self.delivered.store(true, Ordering::Release);
    }

    pub fn delivery_confirmed(&self) -> bool {
        self.delivered.load(Ordering::Acquire)
    }

    /// Version condition alone, for every pair carried by the request.
    pub fn is_closeable_on_delivery(&self, ownership: &dyn PartitionOwnership) -> bool {
        self.versions
            .iter()
            .all(|(partition, version)| caught_up(ownership.control_state(partition), version))
    }

    /// Safe to finalize: delivery acknowledged and every pair satisfies
    /// the version condition.
    pub fn is_closeable(&self, ownership: &dyn PartitionOwnership) -> bool {
        self.delivery_confirmed() && self.is_closeable_on_delivery(ownership)
    }
}
