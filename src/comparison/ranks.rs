// Tie-aware ranking
//
// Each group of equal values receives the mean of the 1-based ranks it
// would occupy, so the result does not depend on input order.

/// Ranks of `values` with ties averaged, plus the size of every tie group
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Rank of `values[i]`, 1-based
    pub ranks: Vec<f64>,
    /// Sizes of groups with more than one member
    pub tie_groups: Vec<usize>,
}

impl Ranking {
    pub fn has_ties(&self) -> bool {
        !self.tie_groups.is_empty()
    }

    /// Tie term `sum(t^3 - t)` used by the variance correction
    pub fn tie_correction(&self) -> f64 {
        self.tie_groups
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}

/// Rank `values` ascending with average ranks for ties
///
/// Values compare with exact equality; callers must not pass NaN.
pub fn average_ranks(values: &[f64]) -> Ranking {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| values[x].total_cmp(&values[y]));

    let mut ranks = vec![0.0_f64; n];
    let mut tie_groups = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j hold 1-based ranks i+1..=j
        let avg_rank = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        if j - i > 1 {
            tie_groups.push(j - i);
        }
        i = j;
    }

    Ranking { ranks, tie_groups }
}
