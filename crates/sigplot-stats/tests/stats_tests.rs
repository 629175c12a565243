//! Statistical primitive integration tests

use proptest::prelude::*;
use rstest::rstest;
use sigplot_stats::{average_ranks, rank_sum, BoxStats, GaussianKde, StatsError, SummaryStats};

// === Rank-sum ===

#[rstest]
// Reference values from the normal approximation without tie correction
#[case(&[1.0, 2.0, 3.0, 4.0, 5.0], &[6.0, 7.0, 8.0, 9.0, 10.0], -2.611_164_839, 0.009_023_438)]
#[case(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 0.0, 1.0)]
#[case(&[1.0, 3.0], &[2.0], 0.0, 1.0)]
fn test_rank_sum_reference(
    #[case] a: &[f64],
    #[case] b: &[f64],
    #[case] statistic: f64,
    #[case] p_value: f64,
) {
    let result = rank_sum(a, b);
    assert!((result.statistic - statistic).abs() < 1e-6, "z = {}", result.statistic);
    assert!((result.p_value - p_value).abs() < 1e-5, "p = {}", result.p_value);
}

#[rstest]
#[case(&[], &[1.0])]
#[case(&[1.0], &[])]
#[case(&[1.0, f64::NAN], &[2.0])]
#[case(&[1.0], &[f64::INFINITY])]
fn test_rank_sum_undefined(#[case] a: &[f64], #[case] b: &[f64]) {
    let result = rank_sum(a, b);
    assert!(result.p_value.is_nan());
    assert!(result.statistic.is_nan());
}

#[test]
fn test_rank_sum_antisymmetric() {
    let a = [0.3, 1.2, 2.2, 0.8];
    let b = [1.9, 2.5, 3.1, 2.8, 4.0];
    let ab = rank_sum(&a, &b);
    let ba = rank_sum(&b, &a);
    assert!((ab.statistic + ba.statistic).abs() < 1e-12);
    assert!((ab.p_value - ba.p_value).abs() < 1e-12);
}

// === Box statistics ===

#[test]
fn test_box_stats_with_flier() {
    let stats = BoxStats::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0, 40.0]).unwrap();
    assert_eq!(stats.fliers, vec![40.0]);
    assert_eq!(stats.whisker_high, 5.0);
    assert_eq!(stats.whisker_low, 1.0);
    assert_eq!(stats.extent(), (1.0, 40.0));
}

#[test]
fn test_box_stats_empty() {
    assert_eq!(BoxStats::from_data(&[f64::NAN]), Err(StatsError::EmptySample));
}

// === KDE ===

#[test]
fn test_kde_rejects_constant_sample() {
    assert!(matches!(
        GaussianKde::new(&[3.0, 3.0, 3.0]),
        Err(StatsError::InvalidBandwidth(_))
    ));
}

#[test]
fn test_kde_grid_extends_by_cut() {
    let data = [0.0, 1.0, 2.0, 3.0, 4.0];
    let kde = GaussianKde::new(&data).unwrap();
    let grid = kde.density_grid(50, 2.0);
    let (lo, hi) = grid.bounds().unwrap();
    assert!((lo - (0.0 - 2.0 * kde.bandwidth())).abs() < 1e-12);
    assert!((hi - (4.0 + 2.0 * kde.bandwidth())).abs() < 1e-12);
    assert_eq!(grid.support.len(), 50);
}

// === Property-Based Tests ===

proptest! {
    #[test]
    fn test_p_value_bounded(
        a in prop::collection::vec(-1e3f64..1e3, 1..20),
        b in prop::collection::vec(-1e3f64..1e3, 1..20)
    ) {
        let p = rank_sum(&a, &b).p_value;
        prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
    }

    #[test]
    fn test_ranks_sum_to_triangle(values in prop::collection::vec(-50i32..50, 1..40)) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let n = values.len() as f64;
        let total: f64 = average_ranks(&values).iter().sum();
        prop_assert!((total - n * (n + 1.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_quartiles_ordered(values in prop::collection::vec(-1e3f64..1e3, 1..50)) {
        let s = SummaryStats::from_data(&values);
        prop_assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);

        let b = BoxStats::from_data(&values).unwrap();
        prop_assert!(b.whisker_low <= b.q1 && b.q3 <= b.whisker_high);
    }

    #[test]
    fn test_density_integrates_to_one(values in prop::collection::vec(-10.0f64..10.0, 2..30)) {
        prop_assume!(values.iter().any(|v| (v - values[0]).abs() > 1e-3));
        let kde = GaussianKde::new(&values).unwrap();
        let grid = kde.density_grid(2000, 6.0);
        let step = grid.support[1] - grid.support[0];
        let area: f64 = grid.density.iter().sum::<f64>() * step;
        prop_assert!((area - 1.0).abs() < 1e-2, "area = {}", area);
    }
}
