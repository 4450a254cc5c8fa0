//! Shared test helpers for `tally-core` integration tests.
//!
//! In-memory stores and a fully wired service harness, so behaviour tests
//! don't repeat the wiring.

#![allow(dead_code)]

pub mod fixtures;
pub mod repositories;

pub use fixtures::*;
