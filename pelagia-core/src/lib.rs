//! Shared primitives for the Pelagia statistics workspace.
//!
//! `pelagia-core` provides the foundation the other Pelagia crates build on:
//!
//! - **Error types** — [`PelagiaError`] and [`Result`] for structured error
//!   handling, with length-mismatch checks for paired inputs
//! - **Traits** — small cross-crate abstractions like [`Summarizable`]

pub mod error;
pub mod traits;

pub use error::{PelagiaError, Result};
pub use traits::*;
