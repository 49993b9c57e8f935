//! Robust statistics: quickselect median, MAD, and biweighted
//! midcorrelation (bicor).
//!
//! Bicor replaces Pearson's mean/variance with median/MAD, downweighting
//! outliers: observations further than 9 MADs from the median contribute
//! nothing. A zero MAD makes the normalization factor zero and the result
//! NaN — propagated, never thrown.

use pelagia_core::{PelagiaError, Result};

use crate::matrix::CorrelationMatrix;

// ---------------------------------------------------------------------------
// Simple RNG (xorshift64) for pivot selection
// ---------------------------------------------------------------------------

struct SelectRng {
    state: u64,
}

impl SelectRng {
    fn new(seed: u64) -> Self {
        SelectRng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform index in `[lo, hi]`.
    fn index_in(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.next_u64() as usize) % (hi - lo + 1)
    }
}

// Fixed pivot seed: the computation is pure, so a constant seed keeps
// results reproducible across calls and platforms.
const PIVOT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

// ---------------------------------------------------------------------------
// Quickselect median and MAD
// ---------------------------------------------------------------------------

/// Median of `data` via randomized quickselect on a private working copy.
///
/// Even-length input averages the two middle order statistics, found by two
/// selections sharing the same working copy. Empty input or any NaN
/// encountered during selection yields NaN; the caller's slice is never
/// mutated.
pub fn median(data: &[f64]) -> f64 {
    let n = data.len();
    if n == 0 {
        return f64::NAN;
    }
    let mut work = data.to_vec();
    let mut rng = SelectRng::new(PIVOT_SEED);
    if n % 2 == 1 {
        select(&mut work, n / 2, &mut rng)
    } else {
        let upper = select(&mut work, n / 2, &mut rng);
        let lower = select(&mut work, n / 2 - 1, &mut rng);
        0.5 * (lower + upper)
    }
}

/// Median absolute deviation from the median.
pub fn mad(data: &[f64]) -> f64 {
    let center = median(data);
    let deviations: Vec<f64> = data.iter().map(|&x| (x - center).abs()).collect();
    median(&deviations)
}

/// Select the k-th order statistic (0-based) by repeated random-pivot
/// partitioning.
///
/// NaN is unordered, so a NaN pivot or a NaN met mid-partition would make
/// the partition loop meaningless; both short-circuit to NaN instead.
fn select(v: &mut [f64], k: usize, rng: &mut SelectRng) -> f64 {
    let mut lo = 0;
    let mut hi = v.len() - 1;
    loop {
        if lo == hi {
            return v[lo];
        }
        let pivot = v[rng.index_in(lo, hi)];
        if pivot.is_nan() {
            return f64::NAN;
        }

        // Three-way partition around the pivot value.
        let mut lt = lo;
        let mut gt = hi;
        let mut i = lo;
        while i <= gt {
            let vi = v[i];
            if vi.is_nan() {
                return f64::NAN;
            }
            if vi < pivot {
                v.swap(lt, i);
                lt += 1;
                i += 1;
            } else if vi > pivot {
                v.swap(i, gt);
                // gt > 0 here: the pivot-valued element lives in v[lt..=gt],
                // so the whole range cannot be greater than the pivot.
                gt -= 1;
            } else {
                i += 1;
            }
        }

        if k < lt {
            hi = lt - 1;
        } else if k > gt {
            lo = gt + 1;
        } else {
            return pivot;
        }
    }
}

// ---------------------------------------------------------------------------
// Biweighted midcorrelation
// ---------------------------------------------------------------------------

/// Normalize one sample for bicor: biweight around the median, scaled so
/// the vector has unit Euclidean norm.
///
/// `u = (x - median) / (9·MAD)`; weight `(1 - u²)²` inside `|u| < 1`, zero
/// outside. Zero MAD zeroes every weighted deviation and the division by
/// the zero norm factor propagates NaN.
fn biweight_normalize(data: &[f64]) -> Vec<f64> {
    let center = median(data);
    let scale = 9.0 * mad(data);

    let mut weighted: Vec<f64> = data
        .iter()
        .map(|&x| {
            let d = x - center;
            let u = d / scale;
            let w = if u.abs() < 1.0 {
                let t = 1.0 - u * u;
                t * t
            } else {
                0.0
            };
            d * w
        })
        .collect();

    let norm = weighted.iter().map(|v| v * v).sum::<f64>().sqrt();
    for v in weighted.iter_mut() {
        *v /= norm;
    }
    weighted
}

/// Biweighted midcorrelation between `x` and `y`.
///
/// Errors on unequal lengths; degenerate inputs (zero MAD, empty) yield
/// NaN.
pub fn bicor(x: &[f64], y: &[f64]) -> Result<f64> {
    PelagiaError::check_lengths(x.len(), y.len())?;
    let nx = biweight_normalize(x);
    let ny = biweight_normalize(y);
    Ok(nx.iter().zip(ny.iter()).map(|(a, b)| a * b).sum())
}

/// Biweighted midcorrelation of a pre-paired sequence.
pub fn bicor_of_pairs(pairs: &[(f64, f64)]) -> f64 {
    let (x, y): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
    let nx = biweight_normalize(&x);
    let ny = biweight_normalize(&y);
    nx.iter().zip(ny.iter()).map(|(a, b)| a * b).sum()
}

/// Pairwise bicor matrix over the rows of `rows`.
///
/// Each row is biweight-normalized exactly once up front; the O(rows²)
/// pairwise loop then reduces to dot products. Rows must share one length.
pub fn bicor_row_matrix(rows: &[&[f64]]) -> Result<CorrelationMatrix> {
    let normalized: Vec<Vec<f64>> = rows.iter().map(|r| biweight_normalize(r)).collect();
    let refs: Vec<&[f64]> = normalized.iter().map(|v| v.as_slice()).collect();
    CorrelationMatrix::row_wise(&refs, |a, b| {
        Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
    })
}

/// Pairwise bicor matrix over the columns of `rows` (implicit transpose).
pub fn bicor_column_matrix(rows: &[&[f64]]) -> Result<CorrelationMatrix> {
    let transposed = crate::matrix::transpose(rows)?;
    let refs: Vec<&[f64]> = transposed.iter().map(|v| v.as_slice()).collect();
    bicor_row_matrix(&refs)
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn median_odd() {
        assert_eq!(median(&[5.0, 1.0, 3.0, 2.0, 4.0]), 3.0);
    }

    #[test]
    fn median_even() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn median_single() {
        assert_eq!(median(&[7.0]), 7.0);
    }

    #[test]
    fn median_empty_is_nan() {
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn median_with_duplicates() {
        assert_eq!(median(&[2.0, 2.0, 2.0, 1.0, 3.0]), 2.0);
        assert_eq!(median(&[1.0, 1.0, 2.0, 2.0]), 1.5);
    }

    #[test]
    fn median_nan_propagates() {
        assert!(median(&[1.0, f64::NAN, 3.0]).is_nan());
        assert!(median(&[f64::NAN]).is_nan());
    }

    #[test]
    fn median_does_not_mutate_input() {
        let data = [3.0, 1.0, 2.0];
        let _ = median(&data);
        assert_eq!(data, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn median_deterministic() {
        let data: Vec<f64> = (0..101).map(|i| ((i * 37) % 101) as f64).collect();
        let first = median(&data);
        assert_eq!(first, 50.0);
        assert_eq!(median(&data), first);
    }

    #[test]
    fn mad_known_data() {
        let data = [1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
        // median = 2, |deviations| = [1,1,0,0,2,4,7], median = 1
        assert_eq!(mad(&data), 1.0);
    }

    #[test]
    fn mad_constant_is_zero() {
        assert_eq!(mad(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn bicor_reference_value() {
        let pairs = [(32.1, 1.2), (3.1, 0.4), (2.932, 3.85)];
        let r = bicor_of_pairs(&pairs);
        assert!((r - (-0.9303913046)).abs() < TOL, "bicor = {r}");
    }

    #[test]
    fn bicor_matches_of_pairs() {
        let x = [32.1, 3.1, 2.932];
        let y = [1.2, 0.4, 3.85];
        let pairs = [(32.1, 1.2), (3.1, 0.4), (2.932, 3.85)];
        assert_eq!(bicor(&x, &y).unwrap(), bicor_of_pairs(&pairs));
    }

    #[test]
    fn bicor_self_correlation_is_one() {
        let x = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        assert!((bicor(&x, &x).unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn bicor_zero_mad_is_nan() {
        let x = [3.0, 3.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(bicor(&x, &y).unwrap().is_nan());
    }

    #[test]
    fn bicor_length_mismatch() {
        assert!(bicor(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn bicor_row_matrix_matches_pairwise() {
        let a = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        let b = [2.0, 3.0, 1.0, 9.0, 4.0, 6.0];
        let c = [9.0, 5.0, 8.0, 1.0, 4.0, 2.0];
        let m = bicor_row_matrix(&[&a, &b, &c]).unwrap();
        assert_eq!(m.n(), 3);
        assert_eq!(m.get(0, 0), 1.0);
        assert!((m.get(0, 1) - bicor(&a, &b).unwrap()).abs() < TOL);
        assert!((m.get(0, 2) - bicor(&a, &c).unwrap()).abs() < TOL);
        assert_eq!(m.get(1, 2), m.get(2, 1));
    }

    #[test]
    fn bicor_column_matrix_transposes() {
        // 3 rows × 2 columns → 2×2 matrix over the columns.
        let rows: [&[f64]; 3] = [&[1.0, 9.0], &[2.0, 5.0], &[3.0, 1.0]];
        let m = bicor_column_matrix(&rows).unwrap();
        assert_eq!(m.n(), 2);
        let col0 = [1.0, 2.0, 3.0];
        let col1 = [9.0, 5.0, 1.0];
        assert!((m.get(0, 1) - bicor(&col0, &col1).unwrap()).abs() < TOL);
    }
}
