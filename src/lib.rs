//! This file is the root of the `strata_plan` Rust crate.
//!
//! strata_plan is the request-to-task compiler of the strata seismic-cube
//! extraction service: given a query document (slice or curtain), the
//! survey's geometry manifest and a task size, it computes exactly which
//! storage fragments must be read and how that work is batched, and emits an
//! ordered list of serialized task messages with a trailing process header.
//!
//! The crate performs no I/O and keeps no state; see `bridge` for the public
//! entry point.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod geometry;
pub mod messages;
pub mod schedule;
pub mod translate;
pub mod types;

mod error;

pub use error::StrataError;
