//! Common test harness utilities for integration tests.
//!
//! Provides a recording implementation of the protocol's collaborator
//! traits so tests can drive the receive path and observe every
//! decision it makes.

// Not all test files use all helpers; silence dead_code warnings for unused exports.
#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use lattice::control::{ControlState, PartitionOwnership};
use lattice::gate::{BackupHost, BackupReceiver};
use lattice::member::{Member, MemberId, Membership};
use lattice::ping::RetryContinuation;
use lattice::request::{BackupRequest, MultiBackupRequest, SingleBackupRequest};
use lattice::version::PartitionId;

/// Collaborator double recording everything the gate asks of it.
#[derive(Default)]
pub struct RecordingHost {
    controls: Mutex<HashMap<PartitionId, ControlState>>,
    members: Mutex<HashMap<MemberId, Member>>,
    processed_single: Mutex<Vec<SingleBackupRequest>>,
    processed_multi: Mutex<Vec<MultiBackupRequest>>,
    acknowledged: Mutex<Vec<BackupRequest>>,
    pending_pings: Mutex<Vec<(MemberId, RetryContinuation)>>,
    ping_log: Mutex<Vec<MemberId>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_control(&self, partition: PartitionId, state: ControlState) {
        self.controls.lock().insert(partition, state);
    }

    pub fn clear_control(&self, partition: PartitionId) {
        self.controls.lock().remove(&partition);
    }

    pub fn add_member(&self, id: MemberId, address: &str) {
        self.members.lock().insert(id, Member::new(id, address));
    }

    pub fn remove_member(&self, id: MemberId) {
        self.members.lock().remove(&id);
    }

    /// Pop the oldest un-resumed ping, if any.
    pub fn take_ping(&self) -> Option<(MemberId, RetryContinuation)> {
        let mut pending = self.pending_pings.lock();
        if pending.is_empty() {
            None
        } else {
            Some(pending.remove(0))
        }
    }

    /// Total pings ever issued, including resumed ones.
    pub fn pings_issued(&self) -> usize {
        self.ping_log.lock().len()
    }

    pub fn processed_single(&self) -> Vec<SingleBackupRequest> {
        self.processed_single.lock().clone()
    }

    pub fn processed_multi(&self) -> Vec<MultiBackupRequest> {
        self.processed_multi.lock().clone()
    }

    pub fn acknowledged(&self) -> Vec<BackupRequest> {
        self.acknowledged.lock().clone()
    }
}

impl PartitionOwnership for RecordingHost {
    fn control_state(&self, partition: PartitionId) -> ControlState {
        self.controls
            .lock()
            .get(&partition)
            .copied()
            .unwrap_or(ControlState::NotOwned)
    }

    fn partition_count(&self) -> u32 {
        16
    }
}

impl Membership for RecordingHost {
    fn resolve_member(&self, id: MemberId) -> Option<Member> {
        self.members.lock().get(&id).cloned()
    }
}

impl BackupHost for RecordingHost {
    fn process_backup(&self, request: SingleBackupRequest) {
        self.processed_single.lock().push(request);
    }

    fn process_backup_multi(&self, request: MultiBackupRequest) {
        self.processed_multi.lock().push(request);
    }

    fn send_ping(&self, member: MemberId, continuation: RetryContinuation) {
        self.ping_log.lock().push(member);
        self.pending_pings.lock().push((member, continuation));
    }

    fn forward_or_reply(&self, request: BackupRequest) {
        self.acknowledged.lock().push(request);
    }
}

/// Receiver wired to a recording host.
pub fn receiver(host: &Arc<RecordingHost>) -> BackupReceiver {
    BackupReceiver::new(host.clone())
}

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
