// Paired non-parametric comparison of benchmark variants
//
// Two variants are compared only on files measured under both. The
// Wilcoxon signed-rank test on the per-file differences gives significance;
// the rank-biserial correlation gives direction and effect size.
//
// No distributional assumption is made about runtimes, which are typically
// heavy-tailed and heteroscedastic across input sizes.

mod comparator;
mod config;
mod pairwise;
mod ranks;
mod signed_rank;

pub use comparator::{compare_variants, ComparisonOutcome, ComparisonResult};
pub use config::{Alternative, ComparisonConfig, LowSamplePolicy};
pub use pairwise::{compare_against, compare_all, ComparisonReport, EntryStatus, ReportEntry};
pub use ranks::{average_ranks, Ranking};
pub use signed_rank::{exact_null_counts, signed_rank_test, PValueMethod, SignedRankTest};

#[cfg(test)]
mod tests;
