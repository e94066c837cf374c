//! Ownership gating on the backup receive path.
//!
//! Every delivered backup request is classified against the local
//! ownership table before any backup work happens. Owned partitions go
//! straight to the ordering-enforcing processor; unowned partitions are
//! either re-confirmed with the sender through a single ping round trip
//! or discarded and acknowledged. The gate runs synchronously to
//! completion from the dispatcher's point of view; the ping is its only
//! asynchronous suspension point.
//!
//! Gate evaluation never serializes access to shared partition state.
//! Enforcing per-partition apply order across concurrently dispatched
//! requests is entirely the processor's obligation.

use std::sync::Arc;

use crate::backup::request::{BackupRequest, MultiBackupRequest, SingleBackupRequest};
use crate::cluster::member::{MemberId, Membership};
use crate::cluster::ping::RetryContinuation;
use crate::partition::control::{ControlState, PartitionOwnership};
use crate::partition::version::PartitionId;

/// Everything the receive path consumes from the surrounding service:
/// the ownership table, membership, the backup processor, and the
/// transport operations for pings and acknowledgments.
pub trait BackupHost: PartitionOwnership + Membership + Send + Sync {
    /// Apply a single-partition backup, enforcing per-partition version
    /// order. Sole owner of ordering correctness.
    fn process_backup(&self, request: SingleBackupRequest);

    /// Apply the effective set of a batch backup, enforcing per-partition
    /// version order. Sole owner of ordering correctness.
    fn process_backup_multi(&self, request: MultiBackupRequest);

    /// Issue an ownership-confirmation ping to a member, registering the
    /// continuation for the response. Must not block.
    fn send_ping(&self, member: MemberId, continuation: RetryContinuation);

    /// Acknowledge completion of the request to its origin without doing
    /// further local backup work for the partitions it still carries.
    fn forward_or_reply(&self, request: BackupRequest);
}

/// Receive-side entry point: gates delivered requests against ownership.
#[derive(Clone)]
pub struct BackupReceiver {
    host: Arc<dyn BackupHost>,
}

impl BackupReceiver {
    pub fn new(host: Arc<dyn BackupHost>) -> Self {
        Self { host }
    }

    /// Entry point for the dispatch layer; invoked once per delivered
    /// request, and once more per request resumed by a continuation.
    pub fn on_received(&self, request: BackupRequest) {
        match request {
            BackupRequest::Single(request) => self.receive_single(request),
            BackupRequest::Multi(request) => self.receive_multi(request),
        }
    }

    // -- single-partition gate ----------------------------------------------

    fn receive_single(&self, request: SingleBackupRequest) {
        match self.host.control_state(request.partition()) {
            ControlState::Backup { .. } | ControlState::TransferringOut { .. } => {
                self.host.process_backup(request);
            }
            ControlState::NotOwned => self.reject_single(request),
        }
    }

    fn reject_single(&self, request: SingleBackupRequest) {
        let origin = request.origin();
        if request.is_confirmed() || self.host.resolve_member(origin).is_none() {
            tracing::debug!(
                partition = %request.partition(),
                origin = %origin,
                confirmed = request.is_confirmed(),
                "discarding backup for unowned partition"
            );
            self.host.forward_or_reply(BackupRequest::Single(request));
        } else {
            tracing::debug!(
                partition = %request.partition(),
                origin = %origin,
                "pinging origin to confirm unowned partition"
            );
            let continuation =
                RetryContinuation::new(self.clone(), BackupRequest::Single(request));
            self.host.send_ping(origin, continuation);
        }
    }

    // -- multi-partition gate -----------------------------------------------

    fn receive_multi(&self, mut request: MultiBackupRequest) {
        // Full scan of every pair, every pass. The rejection set is
        // per-pass and distinct from the request's durable skip set.
        let mut rejected: Vec<PartitionId> = Vec::new();
        for (partition, _) in request.versions().iter() {
            if !self.host.control_state(partition).is_resident() {
                rejected.push(partition);
            }
        }

        if rejected.is_empty() {
            self.host.process_backup_multi(request);
            return;
        }

        let origin = request.origin();
        if request.is_confirmed() || self.host.resolve_member(origin).is_none() {
            // Rejection is now final for these partitions.
            tracing::debug!(
                rejected = rejected.len(),
                origin = %origin,
                confirmed = request.is_confirmed(),
                "committing rejected partitions to skip set"
            );
            request.skip_partitions(rejected);
            if request.effective_partitions().is_empty() {
                self.host.forward_or_reply(BackupRequest::Multi(request));
            } else {
                self.host.process_backup_multi(request);
            }
        } else {
            // Rejection stays provisional until the retry confirms it; an
            // in-flight ownership transfer may still land these partitions
            // here. Nothing is processed on this pass.
            tracing::debug!(
                rejected = rejected.len(),
                origin = %origin,
                "pinging origin before committing batch rejections"
            );
            let continuation =
                RetryContinuation::new(self.clone(), BackupRequest::Multi(request));
            self.host.send_ping(origin, continuation);
        }
    }
}

impl std::fmt::Debug for BackupReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupReceiver").finish_non_exhaustive()
    }
}
