//! Configuration for the backup replication protocol.
//!
//! Mirrors the deployment knobs a service exposes for its replication
//! layer: partition topology, backup fan-out, ping timing, and frame
//! bounds. Parsed with serde and validated before use.

use serde::Deserialize;
use thiserror::Error;

use crate::wire::codec::{MAX_FRAME_SIZE, MIN_FRAME_SIZE};

/// Default partition count.
pub const DEFAULT_PARTITION_COUNT: u32 = 257;

/// Default number of backup copies per partition.
pub const DEFAULT_BACKUP_COUNT: u32 = 1;

/// Default timeout for a ping round trip, in milliseconds.
pub const DEFAULT_PING_TIMEOUT_MS: u64 = 10_000;

/// Replication protocol configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplicationConfig {
    /// Number of partitions the keyspace is divided into.
    pub partition_count: u32,
    /// Number of backup copies maintained per partition.
    pub backup_count: u32,
    /// Timeout for an ownership-confirmation ping round trip.
    pub ping_timeout_ms: u64,
    /// Upper bound on a single wire frame.
    pub max_frame_bytes: usize,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            partition_count: DEFAULT_PARTITION_COUNT,
            backup_count: DEFAULT_BACKUP_COUNT,
            ping_timeout_ms: DEFAULT_PING_TIMEOUT_MS,
            max_frame_bytes: MAX_FRAME_SIZE,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("partition count must be positive")]
    ZeroPartitions,
    #[error("ping timeout must be positive")]
    ZeroPingTimeout,
    #[error("max frame bytes {configured} exceeds protocol limit {limit}")]
    FrameBoundTooLarge { configured: usize, limit: usize },
    #[error("max frame bytes {0} cannot hold a request header")]
    FrameBoundTooSmall(usize),
}

impl ReplicationConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partition_count == 0 {
            return Err(ConfigError::ZeroPartitions);
        }
        if self.ping_timeout_ms == 0 {
            return Err(ConfigError::ZeroPingTimeout);
        }
        if self.max_frame_bytes > MAX_FRAME_SIZE {
            return Err(ConfigError::FrameBoundTooLarge {
                configured: self.max_frame_bytes,
                limit: MAX_FRAME_SIZE,
            });
        }
        if self.max_frame_bytes < MIN_FRAME_SIZE {
            return Err(ConfigError::FrameBoundTooSmall(self.max_frame_bytes));
        }
        Ok(())
    }
}
