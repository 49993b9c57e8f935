//! Average-rank transform for numeric data.
//!
//! Feeds [`crate::correlation::spearman`]: each value is replaced by its
//! 1-based position in sorted order, with maximal runs of equal values
//! sharing the mean of their positions.

/// Assign average ranks (1-based) to `data`.
///
/// Indices are stable-sorted by value with [`f64::total_cmp`], then every
/// maximal run of equal values spanning sorted positions `[a, b]` receives
/// the rank `((a+1) + (b+1)) / 2`.
///
/// NaN handling: `total_cmp` orders NaN after every real number, so NaN
/// entries deterministically receive the largest ranks instead of
/// scrambling the sort.
///
/// Empty input produces empty output.
pub fn average_ranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        // Find the end of the run of equal values.
        let mut j = i + 1;
        while j < n && data[order[j]].total_cmp(&data[order[i]]).is_eq() {
            j += 1;
        }
        // 1-based positions i+1 ..= j share their mean rank.
        let rank_val = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank_val;
        }
        i = j;
    }

    ranks
}

// ── Tests ──────────────────────────────────────────────────────────────────
