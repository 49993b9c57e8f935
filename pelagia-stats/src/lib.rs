//! Numeric statistics kernels for the Pelagia workspace.
//!
//! - **Descriptive statistics** — streaming Welford accumulators, mean
//!   variants, variance, standard deviation, coefficient of variation,
//!   covariance ([`descriptive`])
//! - **Rank transform** — average ranks with shared tie ranks ([`rank`])
//! - **Kendall rank correlation** — O(n log n) tau-A/B/C via merge-sort
//!   inversion counting ([`kendall`])
//! - **Pearson and Spearman** — classic and weighted product-moment
//!   correlation ([`correlation`])
//! - **Robust statistics** — quickselect median, MAD, biweighted
//!   midcorrelation ([`robust`])
//! - **Correlation matrices** — pairwise matrices over any correlation
//!   function, and the RV2 matrix-correlation coefficient ([`matrix`])
//!
//! Contract violations (unequal paired lengths, out-of-range parameters)
//! return [`pelagia_core::PelagiaError`]; degenerate numeric cases (empty
//! input, zero variance, zero MAD) propagate NaN. Enable the `parallel`
//! feature to fill correlation matrices with rayon; results are
//! bit-identical to the sequential path.

pub mod correlation;
pub mod descriptive;
pub mod kendall;
pub mod matrix;
pub mod rank;
pub mod robust;

pub use correlation::{pearson, pearson_weighted, spearman};
pub use descriptive::{mean, variance, SummaryStats};
pub use kendall::{kendall_tau_a, kendall_tau_b, kendall_tau_c, TieTally};
pub use matrix::{rv2, CorrelationMatrix};
pub use rank::average_ranks;
pub use robust::{bicor, bicor_column_matrix, bicor_row_matrix, mad, median};
