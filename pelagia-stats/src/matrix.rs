//! Correlation matrices and matrix-level correlation.
//!
//! [`CorrelationMatrix`] applies any symmetric pairwise correlation function
//! across all row (or column) pairs of a matrix given as slices-of-rows.
//! Only the upper triangle is computed; the diagonal is forced to 1 and the
//! lower triangle mirrored. [`rv2`] aggregates two whole matrices into a
//! single matrix-correlation coefficient.

use pelagia_core::{PelagiaError, Result, Summarizable};

/// A square, symmetric correlation matrix with unit diagonal.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Flat storage (row-major, n×n).
    data: Vec<f64>,
    /// Number of variables.
    size: usize,
}

impl CorrelationMatrix {
    /// Build a correlation matrix over the rows of `rows` with the given
    /// pairwise correlation function.
    ///
    /// All rows must share one length and at least one row is required.
    /// `corr` is assumed symmetric; it runs once per unordered pair `i < j`
    /// and the result is mirrored. Entries may be NaN (degenerate pairs)
    /// without failing the whole matrix.
    pub fn row_wise<F>(rows: &[&[f64]], corr: F) -> Result<Self>
    where
        F: Fn(&[f64], &[f64]) -> Result<f64> + Sync,
    {
        if rows.is_empty() {
            return Err(PelagiaError::InvalidInput(
                "correlation matrix: need at least one variable".into(),
            ));
        }
        let obs_len = rows[0].len();
        for row in rows.iter() {
            PelagiaError::check_lengths(obs_len, row.len())?;
        }

        let n = rows.len();
        #[cfg(feature = "parallel")]
        let upper: Vec<Vec<(usize, f64)>> = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|i| {
                    ((i + 1)..n)
                        .map(|j| corr(rows[i], rows[j]).map(|r| (j, r)))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let upper: Vec<Vec<(usize, f64)>> = (0..n)
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| corr(rows[i], rows[j]).map(|r| (j, r)))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let mut data = vec![0.0; n * n];
        for (i, row) in upper.iter().enumerate() {
            data[i * n + i] = 1.0;
            for &(j, r) in row {
                data[i * n + j] = r;
                data[j * n + i] = r;
            }
        }

        Ok(CorrelationMatrix { data, size: n })
    }

    /// Build a correlation matrix over the columns of `rows` — identical to
    /// [`CorrelationMatrix::row_wise`] after an implicit transpose.
    pub fn column_wise<F>(rows: &[&[f64]], corr: F) -> Result<Self>
    where
        F: Fn(&[f64], &[f64]) -> Result<f64> + Sync,
    {
        let transposed = transpose(rows)?;
        let refs: Vec<&[f64]> = transposed.iter().map(|v| v.as_slice()).collect();
        Self::row_wise(&refs, corr)
    }

    /// Correlation between variable `i` and variable `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    /// Number of variables.
    pub fn n(&self) -> usize {
        self.size
    }

    /// Flat row-major view of the matrix.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Summarizable for CorrelationMatrix {
    fn summary(&self) -> String {
        format!("CorrelationMatrix: {}x{}", self.size, self.size)
    }
}

/// Transpose a slices-of-rows matrix, validating that it is rectangular.
pub(crate) fn transpose(rows: &[&[f64]]) -> Result<Vec<Vec<f64>>> {
    if rows.is_empty() {
        return Err(PelagiaError::InvalidInput(
            "transpose: need at least one row".into(),
        ));
    }
    let cols = rows[0].len();
    for row in rows.iter() {
        PelagiaError::check_lengths(cols, row.len())?;
    }
    Ok((0..cols)
        .map(|j| rows.iter().map(|row| row[j]).collect())
        .collect())
}

/// RV2 matrix-correlation coefficient between two matrices with the same
/// number of rows.
///
/// Forms the inner-product (gram) matrices `XXᵀ` and `YYᵀ` with their
/// diagonals zeroed, then
/// `rv2 = Σ(XXᵀ∘YYᵀ) / √(Σ(XXᵀ∘XXᵀ) · Σ(YYᵀ∘YYᵀ))`.
/// Zeroing the diagonals removes the self-products that inflate the classic
/// RV coefficient for thin matrices. Degenerate (all-zero) matrices yield
/// NaN; ragged input or mismatched row counts are errors.
pub fn rv2(x_rows: &[&[f64]], y_rows: &[&[f64]]) -> Result<f64> {
    PelagiaError::check_lengths(x_rows.len(), y_rows.len())?;
    let gx = gram_zero_diag(x_rows)?;
    let gy = gram_zero_diag(y_rows)?;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for (a, b) in gx.iter().zip(gy.iter()) {
        sum_xy += a * b;
        sum_xx += a * a;
        sum_yy += b * b;
    }
    Ok(sum_xy / (sum_xx * sum_yy).sqrt())
}

/// Flat n×n gram matrix of `rows` with a zeroed diagonal.
fn gram_zero_diag(rows: &[&[f64]]) -> Result<Vec<f64>> {
    if rows.is_empty() {
        return Err(PelagiaError::InvalidInput(
            "rv2: need at least one row".into(),
        ));
    }
    let cols = rows[0].len();
    for row in rows.iter() {
        PelagiaError::check_lengths(cols, row.len())?;
    }

    let n = rows.len();
    let mut gram = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dot: f64 = rows[i].iter().zip(rows[j].iter()).map(|(a, b)| a * b).sum();
            gram[i * n + j] = dot;
            gram[j * n + i] = dot;
        }
    }
    Ok(gram)
}

// ── Tests ──────────────────────────────────────────────────────────────────
