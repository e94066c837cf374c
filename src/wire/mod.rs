//! Wire protocol for backup replication.
//!
//! This module handles the byte-level protocol between members:
//! - `types` - Fixed-width wire primitives
//! - `codec` - Frame codec and request encode/decode

pub mod codec;
pub mod types;

pub use codec::*;
pub use types::*;
