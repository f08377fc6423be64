// Comparator scenarios on realistic diff-tool timings

use super::*;
use crate::aggregate::EstimateTable;
use crate::error::AnalysisError;
use crate::record::PointEstimate;
use std::collections::BTreeMap;

fn map(values: &[(&str, f64)]) -> BTreeMap<String, f64> {
    values.iter().map(|(f, v)| (f.to_string(), *v)).collect()
}

fn series(prefix: &str, values: &[f64]) -> BTreeMap<String, f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("{}{:03}", prefix, i), *v))
        .collect()
}

/// Three files, A slower everywhere: W+ = 6, W- = 0, r = 1
#[test]
fn test_three_file_example() {
    let a = map(&[("f1", 10.0), ("f2", 12.0), ("f3", 11.0)]);
    let b = map(&[("f1", 9.0), ("f2", 9.0), ("f3", 10.0)]);

    let outcome = compare_variants("A", &a, "B", &b, &ComparisonConfig::default()).unwrap();
    assert!(outcome.is_low_sample());

    let r = outcome.result();
    assert_eq!(r.n, 3);
    assert_eq!(r.w_plus, 6.0);
    assert_eq!(r.w_minus, 0.0);
    assert_eq!(r.rank_biserial_correlation, 1.0);
    assert_eq!(r.normalized_w, 1.0);
    assert_eq!(r.two_sided_statistic(), 0.0);
}

/// Swapping A and B negates r and complements normalized W
#[test]
fn test_swap_symmetry() {
    let a = series("f", &[5.0, 7.5, 3.0, 9.0, 4.0, 6.0, 8.0, 2.0, 10.0, 11.0, 1.5]);
    let b = series("f", &[4.0, 8.0, 2.0, 7.0, 4.5, 5.0, 6.5, 2.0, 9.5, 14.0, 1.0]);
    let config = ComparisonConfig::default();

    let ab = compare_variants("A", &a, "B", &b, &config).unwrap().into_result();
    let ba = compare_variants("B", &b, "A", &a, &config).unwrap().into_result();

    assert_eq!(ab.n, ba.n);
    assert!((ab.rank_biserial_correlation + ba.rank_biserial_correlation).abs() < 1e-12);
    assert!((ab.normalized_w - (1.0 - ba.normalized_w)).abs() < 1e-12);
    assert!((ab.p_value - ba.p_value).abs() < 1e-12);
}

/// Equal values on a file are excluded from n but counted as common
#[test]
fn test_zero_differences_excluded() {
    let a = map(&[("f1", 10.0), ("f2", 5.0), ("f3", 7.0)]);
    let b = map(&[("f1", 10.0), ("f2", 6.0), ("f3", 7.5)]);

    let r = compare_variants("A", &a, "B", &b, &ComparisonConfig::default())
        .unwrap()
        .into_result();
    assert_eq!(r.common, 3);
    assert_eq!(r.n, 2);
    assert_eq!(r.rank_biserial_correlation, -1.0);
}

#[test]
fn test_no_overlap() {
    let a = map(&[("f1", 1.0)]);
    let b = map(&[("f2", 1.0)]);
    let err = compare_variants("A", &a, "B", &b, &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::NoOverlap { .. }));
}

/// All-zero differences must not be reported as a zero correlation
#[test]
fn test_degenerate_comparison() {
    let a = map(&[("f1", 1.0), ("f2", 2.0)]);
    let err = compare_variants("A", &a, "B", &a.clone(), &ComparisonConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::DegenerateComparison { common: 2, .. }
    ));
}

#[test]
fn test_non_positive_estimate_rejected() {
    let a = map(&[("f1", 0.0), ("f2", 2.0)]);
    let b = map(&[("f1", 1.0), ("f2", 1.0)]);
    let err = compare_variants("A", &a, "B", &b, &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue(_)));
}

/// Files outside the intersection do not need valid values
#[test]
fn test_unshared_files_ignored() {
    let a = map(&[("f1", 2.0), ("only_a", f64::NAN)]);
    let b = map(&[("f1", 1.0), ("only_b", -3.0)]);
    let r = compare_variants("A", &a, "B", &b, &ComparisonConfig::default())
        .unwrap()
        .into_result();
    assert_eq!(r.common, 1);
}

#[test]
fn test_low_sample_skip_policy() {
    let a = map(&[("f1", 10.0), ("f2", 12.0), ("f3", 11.0)]);
    let b = map(&[("f1", 9.0), ("f2", 9.0), ("f3", 10.0)]);
    let config = ComparisonConfig {
        low_sample_policy: LowSamplePolicy::Skip,
        ..ComparisonConfig::default()
    };
    let err = compare_variants("A", &a, "B", &b, &config).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::LowSampleSize {
            n: 3,
            required: 10,
            ..
        }
    ));
}

/// Twelve files, candidate consistently faster: significant, reliable
#[test]
fn test_consistent_speedup_is_significant() {
    let baseline = series(
        "Foo",
        &[120.0, 80.0, 95.0, 300.0, 45.0, 60.0, 210.0, 150.0, 88.0, 99.0, 130.0, 75.0],
    );
    let candidate: BTreeMap<String, f64> = baseline
        .iter()
        .enumerate()
        .map(|(i, (f, v))| (f.clone(), v * 0.5 - i as f64 * 0.01))
        .collect();

    let outcome =
        compare_variants("hyperast", &candidate, "gumtree", &baseline, &ComparisonConfig::default())
            .unwrap();
    assert!(!outcome.is_low_sample());

    let r = outcome.result();
    assert_eq!(r.n, 12);
    assert_eq!(r.method, PValueMethod::Exact);
    assert_eq!(r.rank_biserial_correlation, -1.0);
    // Exact two-sided p for W+ = 0, n = 12 is 2 / 4096
    assert!((r.p_value - 2.0 / 4096.0).abs() < 1e-12);
    assert!(r.is_significant(0.05));
}

/// Reordering input keys cannot change the outcome
#[test]
fn test_deterministic_under_key_order() {
    let a1 = map(&[("x", 3.0), ("y", 1.0), ("z", 4.0), ("w", 1.5)]);
    let b1 = map(&[("x", 2.0), ("y", 2.0), ("z", 1.0), ("w", 0.5)]);
    let a2 = map(&[("w", 1.5), ("z", 4.0), ("y", 1.0), ("x", 3.0)]);
    let b2 = map(&[("z", 1.0), ("w", 0.5), ("x", 2.0), ("y", 2.0)]);
    let config = ComparisonConfig::default();
    assert_eq!(
        compare_variants("A", &a1, "B", &b1, &config).unwrap(),
        compare_variants("A", &a2, "B", &b2, &config).unwrap()
    );
}

fn table() -> EstimateTable {
    let mut estimates = Vec::new();
    for i in 0..12 {
        let file = format!("F{}", i);
        let base = 10.0 + i as f64;
        for (variant, value) in [
            ("gumtree", base * 2.0),
            ("hyperast", base),
            ("lazy", base * 1.5 + 0.1),
        ] {
            estimates.push(PointEstimate {
                file_id: file.clone(),
                variant_id: variant.to_string(),
                value,
            });
        }
    }
    // Variant sharing no file with anyone
    estimates.push(PointEstimate {
        file_id: "lonely.java".to_string(),
        variant_id: "orphan".to_string(),
        value: 1.0,
    });
    EstimateTable::from_estimates(&estimates)
}

#[test]
fn test_compare_all_reports_every_pair() {
    let report = compare_all(&table(), &ComparisonConfig::default()).unwrap();
    // 4 variants -> 6 unordered pairs
    assert_eq!(report.entries.len(), 6);
    assert_eq!(report.computed().count(), 3);
    assert_eq!(report.skipped().count(), 3);
    for skipped in report.skipped() {
        assert!(skipped.variant_a == "orphan" || skipped.variant_b == "orphan");
        match &skipped.status {
            EntryStatus::Skipped { kind, .. } => assert_eq!(*kind, "no_overlap"),
            EntryStatus::Computed { .. } => unreachable!(),
        }
    }
}

#[test]
fn test_compare_against_baseline() {
    let report = compare_against(&table(), "gumtree", &ComparisonConfig::default()).unwrap();
    assert_eq!(report.entries.len(), 3);
    let hyperast = report
        .computed()
        .find(|r| r.variant_a == "hyperast")
        .unwrap();
    assert_eq!(hyperast.variant_b, "gumtree");
    assert_eq!(hyperast.rank_biserial_correlation, -1.0);
}

#[test]
fn test_compare_against_unknown_baseline() {
    let err = compare_against(&table(), "nope", &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidConfig(_)));
}

#[test]
fn test_empty_table_rejected() {
    let empty = EstimateTable::default();
    assert!(empty.is_empty());
    let config = ComparisonConfig::default();

    let err = compare_all(&empty, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue(_)));
    let err = compare_against(&empty, "gumtree", &config).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue(_)));
}
