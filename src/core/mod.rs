//! Core runtime infrastructure.
//!
//! This module contains the configuration surface for the replication
//! protocol:
//! - `config` - Configuration parsing and validation

pub mod config;

pub use config::*;
