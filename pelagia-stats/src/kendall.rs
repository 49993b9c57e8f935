//! Kendall rank correlation (tau-A, tau-B, tau-C).
//!
//! Uses Knight's O(n log n) algorithm: sort an index permutation
//! lexicographically by `(x, y)`, then merge-sort it by `y` counting
//! cross-inversions. Each inversion is one discordant pair; tie runs over
//! the two sorted orders give the correction terms for the tau variants.
//!
//! Reference: Knight (1966), "A computer method for calculating Kendall's
//! tau with ungrouped data", JASA 61(314).

use pelagia_core::{PelagiaError, Result};

/// Pair counts underlying every tau variant.
///
/// For n observations there are `n0 = n(n-1)/2` pairs; `n1`/`n2` count
/// pairs tied in x/y, `n3` pairs tied in both, and `swaps` the merge-sort
/// inversions between the x-order and the y-order. The tie-adjusted
/// concordant-minus-discordant count is [`TieTally::pq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieTally {
    /// Total number of index pairs, n(n-1)/2.
    pub n0: u64,
    /// Pairs tied in x.
    pub n1: u64,
    /// Pairs tied in y.
    pub n2: u64,
    /// Pairs tied in both x and y.
    pub n3: u64,
    /// Inversions counted while merge-sorting the x-order by y.
    pub swaps: u64,
}

impl TieTally {
    /// Concordant minus discordant pairs, tie-adjusted:
    /// `n0 - n1 - n2 + n3 - 2·swaps`.
    pub fn pq(&self) -> i64 {
        self.n0 as i64 - self.n1 as i64 - self.n2 as i64 + self.n3 as i64
            - 2 * self.swaps as i64
    }
}

/// Compute the [`TieTally`] for paired sequences `x`, `y`.
///
/// Errors on unequal lengths. `n = 0` yields the all-zero tally, from which
/// every tau evaluates to NaN.
pub fn tie_tally(x: &[f64], y: &[f64]) -> Result<TieTally> {
    PelagiaError::check_lengths(x.len(), y.len())?;
    let n = x.len();
    if n == 0 {
        return Ok(TieTally {
            n0: 0,
            n1: 0,
            n2: 0,
            n3: 0,
            swaps: 0,
        });
    }
    let n0 = (n as u64) * (n as u64 - 1) / 2;

    // Index permutation sorted lexicographically by (x, y).
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]).then(y[a].total_cmp(&y[b])));

    // Ties in x, and in both x and y, are contiguous runs of this order.
    let n1 = tied_pairs(&order, |&a, &b| x[a].total_cmp(&x[b]).is_eq());
    let n3 = tied_pairs(&order, |&a, &b| {
        x[a].total_cmp(&x[b]).is_eq() && y[a].total_cmp(&y[b]).is_eq()
    });

    // Merge-sort the permutation by y, counting cross-inversions. Each
    // inversion is a pair ordered by x but reversed by y: one discordant
    // pair not already accounted for by a tie.
    let mut buf = vec![0usize; n];
    let swaps = sort_by_y_counting_swaps(&mut order, &mut buf, y);

    // Ties in y are contiguous only after the y-sort has stabilized the
    // order; counting them earlier undercounts runs split by x.
    let n2 = tied_pairs(&order, |&a, &b| y[a].total_cmp(&y[b]).is_eq());

    Ok(TieTally {
        n0,
        n1,
        n2,
        n3,
        swaps,
    })
}

/// Kendall's tau-A: `pq / n0`, no tie adjustment.
///
/// NaN when there are no pairs (n < 2).
pub fn kendall_tau_a(x: &[f64], y: &[f64]) -> Result<f64> {
    let t = tie_tally(x, y)?;
    if t.n0 == 0 {
        return Ok(f64::NAN);
    }
    Ok(t.pq() as f64 / t.n0 as f64)
}

/// Kendall's tau-B: `pq / √((n0-n1)(n0-n2))`.
///
/// NaN when either variable is fully tied (`n0 == n1` or `n0 == n2`),
/// including the no-pairs case.
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Result<f64> {
    let t = tie_tally(x, y)?;
    if t.n0 == t.n1 || t.n0 == t.n2 {
        return Ok(f64::NAN);
    }
    let denom = ((t.n0 - t.n1) as f64 * (t.n0 - t.n2) as f64).sqrt();
    Ok(t.pq() as f64 / denom)
}

/// Kendall's tau-C (Stuart's tau-C): `2·pq / (n²·(m-1)/m)` with
/// `m = min(distinct x values, distinct y values)`.
///
/// NaN when n = 0 or fewer than two distinct values exist on either side.
pub fn kendall_tau_c(x: &[f64], y: &[f64]) -> Result<f64> {
    let t = tie_tally(x, y)?;
    let n = x.len();
    let m = distinct_count(x).min(distinct_count(y));
    if n == 0 || m < 2 {
        return Ok(f64::NAN);
    }
    let n_f = n as f64;
    let m_f = m as f64;
    Ok(2.0 * t.pq() as f64 / (n_f * n_f * (m_f - 1.0) / m_f))
}

// ── Internal ───────────────────────────────────────────────────────────────

/// Sum of k(k-1)/2 over maximal runs of `order` where `eq` holds between
/// adjacent members.
fn tied_pairs<F: Fn(&usize, &usize) -> bool>(order: &[usize], eq: F) -> u64 {
    let n = order.len();
    let mut total = 0u64;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && eq(&order[i], &order[j]) {
            j += 1;
        }
        let k = (j - i) as u64;
        total += k * (k - 1) / 2;
        i = j;
    }
    total
}

/// Merge sort `order` by `y` value, returning the number of inversions.
///
/// Stable: equal y values never count as inversions, so ties contribute no
/// swaps. `buf` is scratch space of the same length.
fn sort_by_y_counting_swaps(order: &mut [usize], buf: &mut [usize], y: &[f64]) -> u64 {
    let n = order.len();
    if n <= 1 {
        return 0;
    }
    let mid = n / 2;
    let mut swaps = {
        let (lo, hi) = order.split_at_mut(mid);
        let (buf_lo, buf_hi) = buf.split_at_mut(mid);
        sort_by_y_counting_swaps(lo, buf_lo, y) + sort_by_y_counting_swaps(hi, buf_hi, y)
    };

    let mut left = 0;
    let mut right = mid;
    for slot in buf.iter_mut() {
        if left < mid && (right >= n || y[order[left]].total_cmp(&y[order[right]]).is_le()) {
            *slot = order[left];
            left += 1;
        } else {
            // order[right] jumps over every unconsumed left element.
            swaps += (mid - left) as u64;
            *slot = order[right];
            right += 1;
        }
    }
    order.copy_from_slice(buf);
    swaps
}

/// Number of distinct values under `total_cmp` equality.
fn distinct_count(data: &[f64]) -> usize {
    if data.is_empty() {
        return 0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    1 + sorted
        .windows(2)
        .filter(|w| !w[0].total_cmp(&w[1]).is_eq())
        .count()
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn tau_a_distinct_reference() {
        let x = [5.05, 6.75, 3.21, 2.66];
        let y = [1.65, 26.5, -0.64, 6.95];
        let tau = kendall_tau_a(&x, &y).unwrap();
        assert!((tau - 1.0 / 3.0).abs() < TOL, "tau = {tau}");
    }

    #[test]
    fn tau_b_distinct_matches_tau_a() {
        // Without ties tau-B reduces to tau-A.
        let x = [5.05, 6.75, 3.21, 2.66];
        let y = [1.65, 26.5, -0.64, 6.95];
        let tau = kendall_tau_b(&x, &y).unwrap();
        assert!((tau - 1.0 / 3.0).abs() < TOL, "tau = {tau}");
    }

    #[test]
    fn tau_variants_tied_reference() {
        let x = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        let y = [2.0, 2.0, 4.0, 4.0, 6.0, 6.0, 8.0, 8.0, 10.0];
        let a = kendall_tau_a(&x, &y).unwrap();
        let b = kendall_tau_b(&x, &y).unwrap();
        let c = kendall_tau_c(&x, &y).unwrap();
        assert!((a - 0.7222222222).abs() < TOL, "tau_a = {a}");
        assert!((b - 0.8845379627).abs() < TOL, "tau_b = {b}");
        assert!((c - 0.962962963).abs() < TOL, "tau_c = {c}");
    }

    #[test]
    fn tie_tally_tied_reference() {
        let x = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        let y = [2.0, 2.0, 4.0, 4.0, 6.0, 6.0, 8.0, 8.0, 10.0];
        let t = tie_tally(&x, &y).unwrap();
        assert_eq!(t.n0, 36);
        assert_eq!(t.n1, 9);
        assert_eq!(t.n2, 4);
        assert_eq!(t.n3, 3);
        assert_eq!(t.swaps, 0);
        assert_eq!(t.pq(), 26);
    }

    #[test]
    fn perfect_concordance() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert!((kendall_tau_a(&x, &y).unwrap() - 1.0).abs() < TOL);
        assert!((kendall_tau_b(&x, &y).unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn perfect_discordance() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        let t = tie_tally(&x, &y).unwrap();
        assert_eq!(t.swaps, 10); // every pair inverted
        assert!((kendall_tau_a(&x, &y).unwrap() + 1.0).abs() < TOL);
        assert!((kendall_tau_b(&x, &y).unwrap() + 1.0).abs() < TOL);
    }

    #[test]
    fn matches_naive_counting() {
        // Deterministic pseudo-random data with ties, checked against the
        // O(n²) definition.
        let mut state = 0x9E3779B9u64;
        let mut next = || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) % 7) as f64
        };
        let x: Vec<f64> = (0..64).map(|_| next()).collect();
        let y: Vec<f64> = (0..64).map(|_| next()).collect();

        let mut concordant = 0i64;
        let mut discordant = 0i64;
        for i in 0..x.len() {
            for j in (i + 1)..x.len() {
                let prod = (x[i] - x[j]) * (y[i] - y[j]);
                if prod > 0.0 {
                    concordant += 1;
                } else if prod < 0.0 {
                    discordant += 1;
                }
            }
        }

        let t = tie_tally(&x, &y).unwrap();
        assert_eq!(t.pq(), concordant - discordant);
    }

    #[test]
    fn constant_x_is_nan_for_tau_b() {
        let x = [7.0, 7.0, 7.0, 7.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(kendall_tau_b(&x, &y).unwrap().is_nan());
        assert!(kendall_tau_b(&y, &x).unwrap().is_nan());
        assert!(kendall_tau_c(&x, &y).unwrap().is_nan());
    }

    #[test]
    fn empty_input_is_nan() {
        assert!(kendall_tau_a(&[], &[]).unwrap().is_nan());
        assert!(kendall_tau_b(&[], &[]).unwrap().is_nan());
        assert!(kendall_tau_c(&[], &[]).unwrap().is_nan());
    }

    #[test]
    fn single_element_is_nan() {
        assert!(kendall_tau_a(&[1.0], &[2.0]).unwrap().is_nan());
    }

    #[test]
    fn length_mismatch_is_error() {
        assert!(tie_tally(&[1.0, 2.0], &[1.0]).is_err());
        assert!(kendall_tau_a(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn inputs_not_mutated() {
        let x = [3.0, 1.0, 2.0];
        let y = [2.0, 3.0, 1.0];
        let _ = kendall_tau_b(&x, &y).unwrap();
        assert_eq!(x, [3.0, 1.0, 2.0]);
        assert_eq!(y, [2.0, 3.0, 1.0]);
    }
}
