//! Pearson and Spearman correlation coefficients.
//!
//! Zero variance in either input makes the coefficient undefined; following
//! floating-point convention this propagates as NaN rather than erroring,
//! so matrix-wide computations can continue past a degenerate pair. Only
//! unequal lengths are rejected.

use pelagia_core::{PelagiaError, Result};

use crate::rank::average_ranks;

/// Pearson product-moment correlation coefficient between `x` and `y`.
///
/// Clamped to [-1, 1] against floating rounding. NaN if either series is
/// constant or empty; errors on unequal lengths.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    PelagiaError::check_lengths(x.len(), y.len())?;
    let n = x.len();
    if n == 0 {
        return Ok(f64::NAN);
    }

    let n_f = n as f64;
    let mean_x: f64 = x.iter().sum::<f64>() / n_f;
    let mean_y: f64 = y.iter().sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 0/0 when either variable is constant.
    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Weighted Pearson correlation with per-observation weights.
///
/// Means, variances and the covariance are all weight-scaled:
/// `r = Σw·dx·dy / √(Σw·dx² · Σw·dy²)`. Errors when `x`, `y` and `weights`
/// do not share one length; degenerate weights or variance yield NaN.
pub fn pearson_weighted(x: &[f64], y: &[f64], weights: &[f64]) -> Result<f64> {
    PelagiaError::check_lengths(x.len(), y.len())?;
    PelagiaError::check_lengths(x.len(), weights.len())?;
    if x.is_empty() {
        return Ok(f64::NAN);
    }

    let w_total: f64 = weights.iter().sum();
    let mean_x: f64 = weights.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f64>() / w_total;
    let mean_y: f64 = weights.iter().zip(y.iter()).map(|(w, v)| w * v).sum::<f64>() / w_total;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for ((xi, yi), wi) in x.iter().zip(y.iter()).zip(weights.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += wi * dx * dy;
        var_x += wi * dx * dx;
        var_y += wi * dy * dy;
    }

    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Spearman rank correlation: Pearson over average ranks of each input.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64> {
    PelagiaError::check_lengths(x.len(), y.len())?;
    pearson(&average_ranks(x), &average_ranks(y))
}

// ── Tests ──────────────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn paired_vecs(max_len: usize) -> BoxedStrategy<(Vec<f64>, Vec<f64>)> {
        proptest::collection::vec(-1e6_f64..1e6, 2..=max_len)
            .prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e6_f64..1e6, n..=n))
            })
            .boxed()
    }

    proptest! {
        #[test]
        fn pearson_bounded((x, y) in paired_vecs(50)) {
            let r = pearson(&x, &y).unwrap();
            prop_assert!(r.is_nan() || (-1.0..=1.0).contains(&r), "r = {r}");
        }

        #[test]
        fn pearson_symmetric((x, y) in paired_vecs(50)) {
            let xy = pearson(&x, &y).unwrap();
            let yx = pearson(&y, &x).unwrap();
            prop_assert!((xy.is_nan() && yx.is_nan()) || (xy - yx).abs() < 1e-10);
        }

        #[test]
        fn spearman_bounded((x, y) in paired_vecs(50)) {
            let r = spearman(&x, &y).unwrap();
            prop_assert!(r.is_nan() || (-1.0..=1.0).contains(&r), "r = {r}");
        }

        #[test]
        fn kendall_tau_b_bounded((x, y) in paired_vecs(30)) {
            let tau = crate::kendall::kendall_tau_b(&x, &y).unwrap();
            prop_assert!(tau.is_nan() || (-1.0..=1.0).contains(&tau), "tau = {tau}");
        }

        #[test]
        fn mean_permutation_invariant(mut x in proptest::collection::vec(-1e6_f64..1e6, 1..50)) {
            let before = crate::descriptive::mean(&x);
            x.reverse();
            let after = crate::descriptive::mean(&x);
            prop_assert!((before - after).abs() < 1e-6 * before.abs().max(1.0));
        }

        #[test]
        fn var_permutation_invariant(mut x in proptest::collection::vec(-1e6_f64..1e6, 2..50)) {
            let before = crate::descriptive::variance(&x);
            x.reverse();
            let after = crate::descriptive::variance(&x);
            prop_assert!((before - after).abs() < 1e-6 * before.abs().max(1.0));
        }

        #[test]
        fn median_permutation_invariant(mut x in proptest::collection::vec(-1e6_f64..1e6, 1..50)) {
            let before = crate::robust::median(&x);
            x.reverse();
            let after = crate::robust::median(&x);
            prop_assert!((before - after).abs() < 1e-12);
        }
    }
}
