//! # Tally API
//!
//! Application layer: command functions and the composition root.
//!
//! This crate contains:
//! - Commands, one per exposed operation, with execution logging
//! - Application context (dependency injection)
//! - The `tally` command-line surface (`cli`) and binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the SQLite adapters into the core services

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

pub use commands::*;
pub use context::*;
