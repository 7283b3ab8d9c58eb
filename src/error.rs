//! This module defines the single, unified error type for the entire strata
//! scheduling library. It uses the `thiserror` crate to provide ergonomic,
//! context-aware error handling.
//!
//! The taxonomy is deliberately small. Every failure mode of a compilation
//! maps onto one of three semantic categories, and the caller (the service
//! layer) decides how each becomes a client-visible response:
//!
//! - `NotFound`: the request names a dimension or line number that does not
//!   exist in the survey manifest. A bad request, not a bug.
//! - `Config`: caller or infrastructure misconfiguration, e.g. a task size
//!   below 1 or an unrecognized query function.
//! - `Internal`: an invariant the scheduler relies on was violated. Should
//!   never fire in practice and must alert operators when it does.
//!
//! A failed compilation produces no partial schedule; errors propagate
//! unchanged through the dispatcher to its caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrataError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad configuration: {0}")]
    Config(String),

    #[error("internal logic error (this is a bug): {0}")]
    Internal(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error from the Serde JSON library, typically a malformed request
    /// document or an unparsable embedded manifest.
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),
}
