//! Backup replication protocol core.
//!
//! This module implements the receive-side state machine for versioned
//! backup requests:
//! - `request` - Single- and multi-partition backup requests
//! - `gate` - Ownership gating on the receive path
//! - `poll` - Completion gating on the send path

pub mod gate;
pub mod poll;
pub mod request;

pub use gate::*;
pub use poll::*;
pub use request::*;
