//! # Tally Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - SQLite repositories for entries and projects
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `tally-core`
//! - Contains all "impure" code (I/O, the database)

pub mod config;
pub mod database;
pub mod errors;
pub mod observability;

pub use database::{DbManager, SqliteEntryRepository, SqliteProjectRepository};
pub use errors::InfraError;
pub use observability::init_tracing;
