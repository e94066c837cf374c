//! Partition identity and version bookkeeping.
//!
//! Backup propagation is versioned per partition: the sender assigns a
//! monotonically increasing counter to every mutation it replicates, and
//! the receive side uses those counters to detect gaps and reordering.
//! This module holds the shared vocabulary: partition ids, the sparse
//! version map carried by batch requests, the append-only skip set used
//! while a request is being gated, and the sender-side version assigner.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Partition identifier.
///
/// Ordered so that version maps and skip sets iterate deterministically,
/// which keeps wire encoding and diagnostics stable for a given request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PartitionId(pub u32);

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Version Map
// ---------------------------------------------------------------------------

/// Sparse mapping from partition id to the sender-assigned version of the
/// mutation being replicated.
///
/// Keys are unique; a map freshly created by a sender is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionMap {
    entries: BTreeMap<PartitionId, i64>,
}

impl VersionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version for a partition, returning any previous value.
    pub fn insert(&mut self, partition: PartitionId, version: i64) -> Option<i64> {
        self.entries.insert(partition, version)
    }

    pub fn get(&self, partition: PartitionId) -> Option<i64> {
        self.entries.get(&partition).copied()
    }

    pub fn contains(&self, partition: PartitionId) -> bool {
        self.entries.contains_key(&partition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate (partition, version) pairs in partition order.
    pub fn iter(&self) -> impl Iterator<Item = (PartitionId, i64)> + '_ {
        self.entries.iter().map(|(p, v)| (*p, *v))
    }

    /// Iterate the partition keys in order.
    pub fn partitions(&self) -> impl Iterator<Item = PartitionId> + '_ {
        self.entries.keys().copied()
    }
}

impl FromIterator<(PartitionId, i64)> for VersionMap {
    fn from_iter<I: IntoIterator<Item = (PartitionId, i64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Skip Set
// ---------------------------------------------------------------------------

/// Partitions excluded from current and future processing of one request
/// instance.
///
/// Allocated lazily on the first exclusion, grows by union only, and is
/// owned exclusively by its request. Never serialized: a skip set is
/// meaningless anywhere but on the member that rejected the partitions.
#[derive(Debug, Clone, Default)]
pub struct SkipSet {
    entries: Option<BTreeSet<PartitionId>>,
}

impl SkipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, partition: PartitionId) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|set| set.contains(&partition))
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate skipped partitions in order.
    pub fn iter(&self) -> impl Iterator<Item = PartitionId> + '_ {
        self.entries.iter().flat_map(|set| set.iter().copied())
    }

    /// Merge partitions into the set, allocating on first use.
    pub(crate) fn extend(&mut self, partitions: impl IntoIterator<Item = PartitionId>) {
        self.entries
            .get_or_insert_with(BTreeSet::new)
            .extend(partitions);
    }
}

// ---------------------------------------------------------------------------
// Version Assigner
// ---------------------------------------------------------------------------

/// Persisted view of one assigner counter for checkpoint storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionEntry {
    pub partition: PartitionId,
    pub last_version: i64,
}

/// Sender-side allocator of monotonically increasing backup versions,
/// one counter per partition.
#[derive(Debug, Default)]
pub struct VersionAssigner {
    last: HashMap<PartitionId, i64>,
}

impl VersionAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next version for a partition. The first allocation
    /// for a partition yields 1.
    pub fn next_version(&mut self, partition: PartitionId) -> i64 {
        let next = self
            .last
            .get(&partition)
            .copied()
            .unwrap_or(0)
            .saturating_add(1);
        self.last.insert(partition, next);
        next
    }

    /// Most recently allocated version for a partition, if any.
    pub fn last_version(&self, partition: PartitionId) -> Option<i64> {
        self.last.get(&partition).copied()
    }

    pub fn snapshot(&self) -> Vec<VersionEntry> {
        self.last
            .iter()
            .map(|(partition, last)| VersionEntry {
                partition: *partition,
                last_version: *last,
            })
            .collect()
    }

    pub fn hydrate(&mut self, entries: &[VersionEntry]) {
        self.last.clear();
        for entry in entries {
            self.last.insert(entry.partition, entry.last_version);
        }
    }
}
