//! Versioned backup requests.
//!
//! A primary owner replicates mutations to its backup members as backup
//! requests: either a single (partition, version) pair or a batch of
//! pairs spanning many partitions. Requests are mutated in place while
//! the receive side gates them (skip growth, confirmation flip) and are
//! discarded once acknowledged or forwarded; nothing outlives the
//! request's in-flight lifetime.

use std::fmt;
use std::fmt::Write as _;

use crate::cluster::member::MemberId;
use crate::partition::version::{PartitionId, SkipSet, VersionMap};

// ---------------------------------------------------------------------------
// Single-partition request
// ---------------------------------------------------------------------------

/// Replication of exactly one (partition, version) pair.
#[derive(Debug, Clone)]
pub struct SingleBackupRequest {
    partition: PartitionId,
    version: i64,
    origin: MemberId,
    sync: bool,
    confirmed: bool,
}

impl SingleBackupRequest {
    pub fn new(origin: MemberId, partition: PartitionId, version: i64, sync: bool) -> Self {
        Self {
            partition,
            version,
            origin,
            sync,
            confirmed: false,
        }
    }

    pub fn partition(&self) -> PartitionId {
        self.partition
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn origin(&self) -> MemberId {
        self.origin
    }

    /// Whether the sender waits for the backup to be applied before
    /// acknowledging its client.
    pub fn is_sync(&self) -> bool {
        self.sync
    }

    /// Whether ownership has already been re-confirmed with the sender.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub(crate) fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }

    /// Copy carrying transmittable state only: partition, version, sync.
    /// A forwarded copy always starts unconfirmed.
    pub fn clone_for_transmit(&self) -> Self {
        Self::new(self.origin, self.partition, self.version, self.sync)
    }

    /// Diagnostic string.
    pub fn describe(&self) -> String {
        format!(
            "BackupSingle{{partition={}, version={}, origin={}, sync={}, confirmed={}}}",
            self.partition, self.version, self.origin, self.sync, self.confirmed
        )
    }
}

impl fmt::Display for SingleBackupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ---------------------------------------------------------------------------
// Multi-partition request
// ---------------------------------------------------------------------------

/// Replication of a batch of (partition, version) pairs.
///
/// Partitions in one batch can resolve to different ownership outcomes,
/// so the request tracks the partitions it has given up on in a skip
/// set and exposes the remainder as its effective set.
#[derive(Debug, Clone)]
pub struct MultiBackupRequest {
    versions: VersionMap,
    skip: SkipSet,
    origin: MemberId,
    sync: bool,
    confirmed: bool,
}

impl MultiBackupRequest {
    /// Create a freshly sent batch. Senders never create an empty batch.
    pub fn new(origin: MemberId, versions: VersionMap, sync: bool) -> Self {
        debug_assert!(!versions.is_empty(), "sender created an empty backup batch");
        Self {
            versions,
            skip: SkipSet::new(),
            origin,
            sync,
            confirmed: false,
        }
    }

    pub fn versions(&self) -> &VersionMap {
        &self.versions
    }

    pub fn skip(&self) -> &SkipSet {
        &self.skip
    }

    pub fn origin(&self) -> MemberId {
        self.origin
    }

    pub fn is_sync(&self) -> bool {
        self.sync
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub(crate) fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }

    /// Exclude partitions from current and future processing of this
    /// request instance.
    pub(crate) fn skip_partitions(&mut self, partitions: impl IntoIterator<Item = PartitionId>) {
        self.skip.extend(partitions);
    }

    /// Partitions still subject to processing: keys of the version map
    /// minus the skip set. Recomputed on every call; the skip set may
    /// have grown since the last one.
    pub fn effective_partitions(&self) -> Vec<PartitionId> {
        self.versions
            .partitions()
            .filter(|partition| !self.skip.contains(*partition))
            .collect()
    }

    /// (partition, version) pairs still subject to processing.
    pub fn effective_versions(&self) -> Vec<(PartitionId, i64)> {
        self.versions
            .iter()
            .filter(|(partition, _)| !self.skip.contains(*partition))
            .collect()
    }

    /// Copy carrying transmittable state only: the version map and the
    /// sync flag. The skip set is local bookkeeping and the confirmed
    /// flag never travels; a forwarded copy starts unconfirmed.
    pub fn clone_for_transmit(&self) -> Self {
        Self {
            versions: self.versions.clone(),
            skip: SkipSet::new(),
            origin: self.origin,
            sync: self.sync,
            confirmed: false,
        }
    }

    /// Diagnostic string.
    pub fn describe(&self) -> String {
        let mut out = String::from("BackupMulti{versions=[");
        for (index, (partition, version)) in self.versions.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}:{}", partition, version);
        }
        out.push_str("], skip=[");
        for (index, partition) in self.skip.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}", partition);
        }
        let _ = write!(
            out,
            "], origin={}, sync={}, confirmed={}}}",
            self.origin, self.sync, self.confirmed
        );
        out
    }
}

impl fmt::Display for MultiBackupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ---------------------------------------------------------------------------
// Request envelope
// ---------------------------------------------------------------------------

/// Either backup request kind; the unit the dispatch layer and the retry
/// continuation operate on.
#[derive(Debug, Clone)]
pub enum BackupRequest {
    Single(SingleBackupRequest),
    Multi(MultiBackupRequest),
}

impl BackupRequest {
    pub fn origin(&self) -> MemberId {
        match self {
            BackupRequest::Single(request) => request.origin(),
            BackupRequest::Multi(request) => request.origin(),
        }
    }

    pub fn is_sync(&self) -> bool {
        match self {
            BackupRequest::Single(request) => request.is_sync(),
            BackupRequest::Multi(request) => request.is_sync(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        match self {
            BackupRequest::Single(request) => request.is_confirmed(),
            BackupRequest::Multi(request) => request.is_confirmed(),
        }
    }

    pub(crate) fn mark_confirmed(&mut self) {
        match self {
            BackupRequest::Single(request) => request.mark_confirmed(),
            BackupRequest::Multi(request) => request.mark_confirmed(),
        }
    }

    pub fn clone_for_transmit(&self) -> Self {
        match self {
            BackupRequest::Single(request) => BackupRequest::Single(request.clone_for_transmit()),
            BackupRequest::Multi(request) => BackupRequest::Multi(request.clone_for_transmit()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            BackupRequest::Single(request) => request.describe(),
            BackupRequest::Multi(request) => request.describe(),
        }
    }
}

impl fmt::Display for BackupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_multi() -> MultiBackupRequest {
        let versions: VersionMap = [(PartitionId(3), 10), (PartitionId(7), 11)]
            .into_iter()
            .collect();
        MultiBackupRequest::new(MemberId(1), versions, true)
    }

    #[test]
    fn effective_set_excludes_skipped() {
        let mut request = sample_multi();
        assert_eq!(
            request.effective_partitions(),
            vec![PartitionId(3), PartitionId(7)]
        );

        request.skip_partitions([PartitionId(7)]);
        assert_eq!(request.effective_partitions(), vec![PartitionId(3)]);
        assert_eq!(request.effective_versions(), vec![(PartitionId(3), 10)]);
    }

    #[test]
    fn effective_union_skip_covers_all_keys() {
        let mut request = sample_multi();
        request.skip_partitions([PartitionId(3)]);

        let mut union: Vec<PartitionId> = request.effective_partitions();
        union.extend(request.skip().iter());
        union.sort_unstable();

        let keys: Vec<PartitionId> = request.versions().partitions().collect();
        assert_eq!(union, keys);
    }

    #[test]
    fn clone_for_transmit_drops_local_state() {
        let mut request = sample_multi();
        request.skip_partitions([PartitionId(7)]);
        request.mark_confirmed();

        let copy = request.clone_for_transmit();
        assert!(copy.skip().is_empty());
        assert!(!copy.is_confirmed());
        assert_eq!(copy.versions(), request.versions());
        assert!(copy.is_sync());
    }

    #[test]
    fn confirmation_flips_once() {
        let mut request = BackupRequest::Single(SingleBackupRequest::new(
            MemberId(2),
            PartitionId(5),
            42,
            false,
        ));
        assert!(!request.is_confirmed());
        request.mark_confirmed();
        assert!(request.is_confirmed());
        // A transmit clone never inherits the flag.
        assert!(!request.clone_for_transmit().is_confirmed());
    }

    #[test]
    fn describe_lists_versions_and_skip() {
        let mut request = sample_multi();
        request.skip_partitions([PartitionId(7)]);
        let text = request.describe();
        assert!(text.contains("3:10"));
        assert!(text.contains("skip=[7]"));
        assert!(text.contains("confirmed=false"));
    }
}
