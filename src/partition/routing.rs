//! Key-to-partition placement hashing.
//!
//! Senders derive the partition for a cache key from a stable 64-bit
//! hash fed through a jump consistent hash, so every member maps the
//! same key to the same partition without coordination.

use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::partition::control::PartitionOwnership;
use crate::partition::version::PartitionId;

/// Compute a stable 64-bit hash for placement.
fn hash64(bytes: impl AsRef<[u8]>) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes.as_ref());
    hasher.finish()
}

/// Jump-consistent hash over `buckets` partitions.
pub fn jump_consistent_hash(key: u64, buckets: u64) -> u64 {
    if buckets == 0 {
        return 0;
    }
    let mut b: i64 = -1;
    let mut j: i64 = 0;
    let mut k = key;
    while j < buckets as i64 {
        b = j;
        k = k.wrapping_mul(2_862_933_555_777_941_757).wrapping_add(1);
        j = (((b + 1) as f64) * (1u64 << 31) as f64 / (((k >> 33) + 1) as f64)).floor() as i64;
    }
    b as u64
}

/// Partition owning a cache key, for a topology of `partition_count`
/// partitions.
pub fn key_partition(key: impl AsRef<[u8]>, partition_count: u32) -> PartitionId {
    PartitionId(jump_consistent_hash(hash64(key), u64::from(partition_count)) as u32)
}

/// Partition owning a cache key, in the topology an ownership view
/// reports.
pub fn owning_partition(ownership: &dyn PartitionOwnership, key: impl AsRef<[u8]>) -> PartitionId {
    key_partition(key, ownership.partition_count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_is_stable_and_bounded() {
        let a = key_partition(b"orders:1017", 257);
        let b = key_partition(b"orders:1017", 257);
        assert_eq!(a, b);
        assert!(a.0 < 257);
    }

    #[test]
    fn jump_hash_is_bounded() {
        for key in 0..64u64 {
            assert!(jump_consistent_hash(key, 8) < 8);
        }
    }

    #[test]
    fn owning_partition_follows_the_reported_topology() {
        use crate::partition::control::ControlState;

        struct FixedTopology(u32);

        impl PartitionOwnership for FixedTopology {
            fn control_state(&self, _partition: PartitionId) -> ControlState {
                ControlState::NotOwned
            }

            fn partition_count(&self) -> u32 {
                self.0
            }
        }

        let topology = FixedTopology(31);
        let partition = owning_partition(&topology, b"sessions:42");
        assert_eq!(partition, key_partition(b"sessions:42", 31));
        assert!(partition.0 < 31);
    }

    #[test]
    fn growing_the_topology_moves_few_keys() {
        // Jump hash only relocates keys onto the new partitions.
        let mut moved = 0;
        for key in 0..1000u64 {
            let before = jump_consistent_hash(key, 16);
            let after = jump_consistent_hash(key, 17);
            if before != after {
                assert_eq!(after, 16);
                moved += 1;
            }
        }
        assert!(moved > 0);
        assert!(moved < 200);
    }
}
