//! Descriptive statistics for numeric data.
//!
//! Provides the streaming [`SummaryStats`] accumulator (Welford's online
//! update) and individual functions ([`mean`], [`variance`], [`std_dev`],
//! [`covariance`], etc.) built on top of it.
//!
//! Degenerate inputs (empty data, n ≤ 1 for variance) yield `f64::NAN`
//! rather than an error; only paired inputs of unequal length are rejected
//! with [`PelagiaError::LengthMismatch`].

use pelagia_core::{PelagiaError, Result, Summarizable};

/// Sufficient statistics of a sample, accumulated in one streaming pass.
///
/// Uses Welford's online update, which bounds rounding error by never
/// forming the large intermediate sums `Σx` and `Σx²`:
///
/// ```text
/// n     += 1
/// delta  = v - mean
/// mean  += delta / n
/// m2    += delta * (v - mean)
/// ```
///
/// Variance and standard deviation derive from `(count, mean, m2)` without
/// re-scanning the data.
#[derive(Debug, Clone, Copy)]
pub struct SummaryStats {
    /// Number of observations.
    pub count: usize,
    /// Running arithmetic mean (NaN while empty).
    pub mean: f64,
    /// Sum of squared deviations from the running mean.
    pub m2: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl SummaryStats {
    /// An empty accumulator.
    pub fn new() -> Self {
        SummaryStats {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Fold one observation into the accumulator.
    pub fn push(&mut self, v: f64) {
        self.count += 1;
        let delta = v - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (v - self.mean);
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }

    /// Arithmetic mean; NaN when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Sample variance (denominator n−1); NaN when n ≤ 1.
    pub fn sample_variance(&self) -> f64 {
        if self.count <= 1 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Population variance (denominator n); NaN when n ≤ 1.
    pub fn population_variance(&self) -> f64 {
        if self.count <= 1 {
            f64::NAN
        } else {
            self.m2 / self.count as f64
        }
    }

    /// Sample standard deviation.
    pub fn sample_std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    /// Population standard deviation.
    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f64> for SummaryStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = SummaryStats::new();
        for v in iter {
            acc.push(v);
        }
        acc
    }
}

impl Summarizable for SummaryStats {
    fn summary(&self) -> String {
        format!(
            "n={}, mean={:.4}, var={:.4}, min={:.4}, max={:.4}",
            self.count,
            self.mean(),
            self.sample_variance(),
            self.min,
            self.max,
        )
    }
}

// ── Mean variants ──────────────────────────────────────────────────────────

/// Arithmetic mean; NaN for empty input.
pub fn mean(data: &[f64]) -> f64 {
    data.iter().copied().collect::<SummaryStats>().mean()
}

/// Mean of `f(v)` over `data`; NaN for empty input.
pub fn mean_by<F: Fn(f64) -> f64>(data: &[f64], f: F) -> f64 {
    data.iter().map(|&v| f(v)).collect::<SummaryStats>().mean()
}

/// Weighted mean `Σ wᵢ·xᵢ / Σ wᵢ`.
///
/// Errors when `weights` and `data` differ in length. Zero total weight
/// yields NaN.
pub fn weighted_mean(weights: &[f64], data: &[f64]) -> Result<f64> {
    PelagiaError::check_lengths(weights.len(), data.len())?;
    let mut num = 0.0;
    let mut den = 0.0;
    for (&w, &x) in weights.iter().zip(data.iter()) {
        num += w * x;
        den += w;
    }
    Ok(num / den)
}

/// Symmetrically trimmed (truncated) mean.
///
/// Sorts ascending, drops `k = floor(n·proportion)` elements from each end
/// and averages the remainder. `proportion` must lie in `[0, 0.5]`; an
/// empty remainder yields NaN.
pub fn trimmed_mean(data: &[f64], proportion: f64) -> Result<f64> {
    if !(0.0..=0.5).contains(&proportion) {
        return Err(PelagiaError::InvalidInput(format!(
            "trimmed_mean: proportion must be in [0, 0.5] (got {proportion})",
        )));
    }
    let n = data.len();
    let k = (n as f64 * proportion).floor() as usize;
    if 2 * k >= n {
        return Ok(f64::NAN);
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(mean(&sorted[k..n - k]))
}

// ── Variance family ────────────────────────────────────────────────────────

/// Sample variance (denominator n−1); NaN when n ≤ 1.
pub fn variance(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .collect::<SummaryStats>()
        .sample_variance()
}

/// Population variance (denominator n); NaN when n ≤ 1.
pub fn variance_population(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .collect::<SummaryStats>()
        .population_variance()
}

/// Sample variance of `f(v)` over `data`.
pub fn variance_by<F: Fn(f64) -> f64>(data: &[f64], f: F) -> f64 {
    data.iter()
        .map(|&v| f(v))
        .collect::<SummaryStats>()
        .sample_variance()
}

/// Population variance of `f(v)` over `data`.
pub fn variance_population_by<F: Fn(f64) -> f64>(data: &[f64], f: F) -> f64 {
    data.iter()
        .map(|&v| f(v))
        .collect::<SummaryStats>()
        .population_variance()
}

/// Sample standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Population standard deviation.
pub fn std_dev_population(data: &[f64]) -> f64 {
    variance_population(data).sqrt()
}

/// Sample standard deviation of `f(v)` over `data`.
pub fn std_dev_by<F: Fn(f64) -> f64>(data: &[f64], f: F) -> f64 {
    variance_by(data, f).sqrt()
}

/// Population standard deviation of `f(v)` over `data`.
pub fn std_dev_population_by<F: Fn(f64) -> f64>(data: &[f64], f: F) -> f64 {
    variance_population_by(data, f).sqrt()
}

/// Coefficient of variation (sample std dev / mean).
pub fn cv(data: &[f64]) -> f64 {
    let acc: SummaryStats = data.iter().copied().collect();
    acc.sample_std_dev() / acc.mean()
}

/// Coefficient of variation (population std dev / mean).
pub fn cv_population(data: &[f64]) -> f64 {
    let acc: SummaryStats = data.iter().copied().collect();
    acc.population_std_dev() / acc.mean()
}

/// Sample coefficient of variation of `f(v)` over `data`.
pub fn cv_by<F: Fn(f64) -> f64>(data: &[f64], f: F) -> f64 {
    let acc: SummaryStats = data.iter().map(|&v| f(v)).collect();
    acc.sample_std_dev() / acc.mean()
}

/// Population coefficient of variation of `f(v)` over `data`.
pub fn cv_population_by<F: Fn(f64) -> f64>(data: &[f64], f: F) -> f64 {
    let acc: SummaryStats = data.iter().map(|&v| f(v)).collect();
    acc.population_std_dev() / acc.mean()
}

// ── Covariance ─────────────────────────────────────────────────────────────

/// Covariance over a pair stream with the given denominator offset.
///
/// Uses the `E[XY] − E[X]·E[Y]` form; `ddof = 0` for the population
/// estimator, `ddof = 1` for the sample estimator.
fn cov_impl<I: Iterator<Item = (f64, f64)>>(pairs: I, ddof: usize) -> f64 {
    let mut n = 0usize;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    for (x, y) in pairs {
        n += 1;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
    }
    if n <= ddof {
        return f64::NAN;
    }
    let n_f = n as f64;
    (sum_xy - sum_x * sum_y / n_f) / (n_f - ddof as f64)
}

/// Sample covariance (denominator n−1); errors on unequal lengths.
pub fn covariance(x: &[f64], y: &[f64]) -> Result<f64> {
    PelagiaError::check_lengths(x.len(), y.len())?;
    Ok(cov_impl(x.iter().copied().zip(y.iter().copied()), 1))
}

/// Population covariance (denominator n); errors on unequal lengths.
pub fn covariance_population(x: &[f64], y: &[f64]) -> Result<f64> {
    PelagiaError::check_lengths(x.len(), y.len())?;
    Ok(cov_impl(x.iter().copied().zip(y.iter().copied()), 0))
}

/// Sample covariance of a pre-paired sequence.
pub fn cov_of_pairs(pairs: &[(f64, f64)]) -> f64 {
    cov_impl(pairs.iter().copied(), 1)
}

/// Population covariance of a pre-paired sequence.
pub fn cov_population_of_pairs(pairs: &[(f64, f64)]) -> f64 {
    cov_impl(pairs.iter().copied(), 0)
}

/// Sample covariance of `f(item)` projections.
pub fn cov_by<T, F: Fn(&T) -> (f64, f64)>(items: &[T], f: F) -> f64 {
    cov_impl(items.iter().map(f), 1)
}

/// Population covariance of `f(item)` projections.
pub fn cov_population_by<T, F: Fn(&T) -> (f64, f64)>(items: &[T], f: F) -> f64 {
    cov_impl(items.iter().map(f), 0)
}

// ── Tests ──────────────────────────────────────────────────────────────────
