//! Cluster membership and ping plumbing.
//!
//! This module provides the cluster-facing collaborators of the
//! replication protocol:
//! - `member` - Member identity and resolution
//! - `ping` - Ping outcomes, retry continuations, outstanding-ping registry

pub mod member;
pub mod ping;

pub use member::*;
pub use ping::*;
