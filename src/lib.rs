#![deny(unused, dead_code)]
#![deny(clippy::all, clippy::pedantic)]
// Module naming: common pattern in domain-driven code
#![allow(clippy::module_name_repetitions)]
// Documentation style: many terms don't need backticks
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
// API ergonomics: prefer simplicity over must_use annotations
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
// Format strings: allow non-inlined for readability
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
// Numeric casts: intentional in protocol code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
// Control flow style
#![allow(clippy::single_match_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::if_not_else)]
// Option/Result patterns
#![allow(clippy::option_if_let_else)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::unnecessary_wraps)]
// Passing style
#![allow(clippy::trivially_copy_pass_by_ref)]
// Self usage
#![allow(clippy::unused_self)]
// Iterator patterns
#![allow(clippy::iter_without_into_iter)]
// Import style
#![allow(clippy::wildcard_imports)]

//! Lattice - Partitioned in-memory cache with versioned backup replication.
//!
//! This crate implements the receive side of the backup replication
//! protocol: a primary owner propagates mutations to backup members as
//! versioned backup requests, and the backup member applies them in the
//! correct per-partition order even while partition ownership moves
//! between members and requests or acknowledgments race on the network.
//!
//! # Module Organization
//!
//! ## Core
//! - `core::config` - Protocol configuration and validation
//!
//! ## Partition Model
//! - `partition::version` - Partition ids, version maps, skip sets
//! - `partition::control` - Local ownership state per partition
//! - `partition::routing` - Key-to-partition placement hashing
//!
//! ## Cluster
//! - `cluster::member` - Member identity and resolution
//! - `cluster::ping` - Ping round trips and retry continuations
//!
//! ## Backup Protocol
//! - `backup::request` - Single- and multi-partition backup requests
//! - `backup::gate` - Ownership gating on the receive path
//! - `backup::poll` - Completion gating on the send path
//!
//! ## Wire
//! - `wire::types` - Fixed-width wire primitives
//! - `wire::codec` - Frame codec and request encode/decode
//!
//! ## Dispatch
//! - `service` - Receive loop turning delivered frames into gate calls

// Core infrastructure
pub mod core;

// Partition model
pub mod partition;

// Cluster
pub mod cluster;

// Backup protocol
pub mod backup;

// Wire
pub mod wire;

// Dispatch
pub mod service;

// Re-exports for convenience
pub use self::core::config;
pub use backup::{gate, poll, request};
pub use cluster::{member, ping};
pub use partition::{control, routing, version};
pub use service::ReplicationService;
