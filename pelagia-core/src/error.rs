//! Structured error types for the Pelagia workspace.

use thiserror::Error;

/// Unified error type for all Pelagia operations.
///
/// Errors represent caller contract violations and fail fast, before any
/// computation runs. Degenerate numeric cases (empty input, zero variance,
/// zero MAD) are not errors; they propagate as `f64::NAN` in the IEEE-754
/// convention.
#[derive(Debug, Error)]
pub enum PelagiaError {
    /// Paired or weighted inputs whose lengths disagree.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first sequence.
        left: usize,
        /// Length of the other sequence (or weight vector).
        right: usize,
    },

    /// Invalid input (bad arguments, out-of-range parameters)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl PelagiaError {
    /// Check that two paired sequences have equal length.
    pub fn check_lengths(left: usize, right: usize) -> Result<()> {
        if left == right {
            Ok(())
        } else {
            Err(PelagiaError::LengthMismatch { left, right })
        }
    }
}

/// Convenience alias used throughout the Pelagia workspace.
pub type Result<T> = std::result::Result<T, PelagiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_display() {
        let err = PelagiaError::LengthMismatch { left: 3, right: 5 };
        assert_eq!(err.to_string(), "length mismatch: 3 vs 5");
    }

    #[test]
    fn check_lengths_ok() {
        assert!(PelagiaError::check_lengths(4, 4).is_ok());
        assert!(PelagiaError::check_lengths(4, 2).is_err());
    }
}
