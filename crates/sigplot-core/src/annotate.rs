//! Pairwise significance annotations
//!
//! Every chart kind compares its groups pairwise and stacks one bracket per
//! pair above the data. [`SignificanceAnnotator`] owns that layout:
//!
//! 1. Pairs are enumerated as `(i, j)` with `i < j` in input order, so the
//!    first pair sits lowest.
//! 2. Each pair gets a p-value from a [`RankSumTest`] and a [`Tier`].
//! 3. Brackets start at the top of the pre-annotation y range and climb by
//!    a fixed increment of 10% of that range, so bands never overlap.
//!
//! The result is an [`AnnotationPlan`]: plain geometry that any rendering
//! sink can draw.

use serde::{Deserialize, Serialize};
use sigplot_stats::rank_sum;
use tracing::debug;

use crate::axis::AxisRange;
use crate::error::Result;
use crate::group::{validate_groups, Group};

/// Bracket tick half-height as a fraction of the data maximum
pub const TICK_FRACTION: f64 = 0.01;

/// Vertical step between bands as a fraction of the initial y span
pub const INCREMENT_FRACTION: f64 = 0.1;

/// Label offset above the bracket baseline, in tick heights
pub const LABEL_OFFSET: f64 = 1.05;

/// Headroom kept above the last band, in tick heights
pub const HEADROOM_TICKS: f64 = 6.0;

/// Source of two-sample p-values
pub trait RankSumTest {
    /// Two-sided p-value in `[0, 1]`, or NaN when undefined
    fn p_value(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Wilcoxon rank-sum test with the normal approximation
#[derive(Debug, Clone, Copy, Default)]
pub struct WilcoxonRankSum;

impl RankSumTest for WilcoxonRankSum {
    fn p_value(&self, a: &[f64], b: &[f64]) -> f64 {
        rank_sum(a, b).p_value
    }
}

impl<F> RankSumTest for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn p_value(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

/// Discrete significance bucket of a p-value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// p < 1e-5
    P1e5,
    /// p < 1e-4
    P1e4,
    /// p < 1e-3
    P1e3,
    /// p < 1e-2
    P1e2,
    /// p < 0.05
    P05,
    NotSignificant,
}

/// Strict upper bounds, tightest first
const TIER_THRESHOLDS: [(f64, Tier); 5] = [
    (1e-5, Tier::P1e5),
    (1e-4, Tier::P1e4),
    (1e-3, Tier::P1e3),
    (1e-2, Tier::P1e2),
    (0.05, Tier::P05),
];

impl Tier {
    /// Bucket a p-value. Comparisons are strict, so a p-value equal to a
    /// threshold lands in the next looser tier; NaN is not significant.
    pub fn from_p_value(p: f64) -> Self {
        TIER_THRESHOLDS
            .iter()
            .find(|(bound, _)| p < *bound)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::NotSignificant)
    }

    /// Asterisk glyph drawn above the bracket
    pub fn glyph(&self) -> &'static str {
        match self {
            Tier::P1e5 => "*****",
            Tier::P1e4 => "****",
            Tier::P1e3 => "***",
            Tier::P1e2 => "**",
            Tier::P05 => "*",
            Tier::NotSignificant => "(n.s.)",
        }
    }

    /// Short description of the bucket
    pub fn name(&self) -> &'static str {
        match self {
            Tier::P1e5 => "p<1e-5",
            Tier::P1e4 => "p<1e-4",
            Tier::P1e3 => "p<1e-3",
            Tier::P1e2 => "p<1e-2",
            Tier::P05 => "p<0.05",
            Tier::NotSignificant => "not-significant",
        }
    }

    pub fn is_significant(&self) -> bool {
        !matches!(self, Tier::NotSignificant)
    }
}

/// What text goes above each bracket
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// Tier glyph only
    #[default]
    Glyph,
    /// Glyph, prefixed with `p = 0.xxxxx` for non-significant pairs
    PValueWhenNotSignificant,
}

impl LabelStyle {
    pub fn format(&self, p_value: f64, tier: Tier) -> String {
        match self {
            LabelStyle::PValueWhenNotSignificant if !tier.is_significant() => {
                format!("p = {:.5} {}", p_value, tier.glyph())
            }
            _ => tier.glyph().to_string(),
        }
    }
}

/// Outcome of comparing two groups
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    /// Index of the first group (the smaller index)
    pub left: usize,
    /// Index of the second group
    pub right: usize,
    pub left_name: String,
    pub right_name: String,
    pub p_value: f64,
    pub tier: Tier,
}

/// Horizontal bracket with a tick at each end
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub x_left: f64,
    pub x_right: f64,
    /// Baseline y of the bracket
    pub y: f64,
    /// Tick height
    pub tick: f64,
}

impl Bracket {
    /// Points of the bracket outline: up the left tick, across, down the
    /// right tick
    pub fn polyline(&self) -> [(f64, f64); 4] {
        let top = self.y + self.tick;
        [
            (self.x_left, self.y),
            (self.x_left, top),
            (self.x_right, top),
            (self.x_right, self.y),
        ]
    }

    pub fn mid_x(&self) -> f64 {
        (self.x_left + self.x_right) / 2.0
    }
}

/// One drawn comparison: bracket plus label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBand {
    pub pair: PairResult,
    pub bracket: Bracket,
    /// Label anchor (horizontally centered, text above)
    pub label_x: f64,
    pub label_y: f64,
    pub label: String,
}

impl AnnotationBand {
    /// Highest y reached by the bracket or its label anchor
    pub fn top(&self) -> f64 {
        let bracket = &self.bracket;
        bracket.y.max(bracket.y + bracket.tick).max(self.label_y)
    }
}

/// Full set of bands for one chart plus the resulting vertical extent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPlan {
    /// Bands in pair enumeration order, lowest first
    pub bands: Vec<AnnotationBand>,
    /// Vertical step between consecutive bands
    pub increment: f64,
    /// Running y position after the last band
    pub final_y: f64,
    /// Tick height of the last band drawn, 0 when none
    pub h_last: f64,
}

impl AnnotationPlan {
    /// Plan with no bands, used when p-values are not shown
    pub fn empty(axis: &AxisRange) -> Self {
        Self {
            bands: Vec::new(),
            increment: INCREMENT_FRACTION * axis.span(),
            final_y: axis.max,
            h_last: 0.0,
        }
    }

    /// Top y limit that keeps every bracket and label visible:
    /// `max(requested, final_y) + 6 * h_last`, raised when needed so the
    /// last band keeps `6 * |h_last|` of headroom. Negative data gives
    /// negative ticks, which would otherwise pull the top below the band.
    pub fn final_top(&self, requested_y_max: Option<f64>) -> f64 {
        let top = requested_y_max.map_or(self.final_y, |y| y.max(self.final_y))
            + HEADROOM_TICKS * self.h_last;
        match self.bands.last() {
            Some(band) => top.max(band.top() + HEADROOM_TICKS * self.h_last.abs()),
            None => top,
        }
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Computes pairwise comparisons and their stacked bracket layout
#[derive(Debug, Clone, Default)]
pub struct SignificanceAnnotator<T = WilcoxonRankSum> {
    test: T,
    label_style: LabelStyle,
}

impl SignificanceAnnotator<WilcoxonRankSum> {
    /// Annotator using the Wilcoxon rank-sum test
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: RankSumTest> SignificanceAnnotator<T> {
    /// Annotator with a custom p-value source
    pub fn with_test(test: T) -> Self {
        Self {
            test,
            label_style: LabelStyle::default(),
        }
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    /// Compare every pair of `groups` and lay out one band per pair.
    ///
    /// `axis` is the y range in effect before any annotation: bands start
    /// at `axis.max` and climb by 10% of its span. `data_max` is the largest
    /// raw sample and sizes the bracket ticks. Group `i` sits at `x = i`.
    ///
    /// Fails with `InvalidInput` when there are fewer than two groups or any
    /// group is empty; no test is run in that case.
    pub fn compute_annotations(
        &self,
        groups: &[Group],
        axis: &AxisRange,
        data_max: f64,
    ) -> Result<AnnotationPlan> {
        validate_groups(groups)?;

        let increment = INCREMENT_FRACTION * axis.span();
        let mut y_position = axis.max;
        let mut h_last = 0.0;
        let mut bands = Vec::with_capacity(groups.len() * (groups.len() - 1) / 2);

        for (i, j) in pair_indices(groups.len()) {
            let (a, b) = (&groups[i], &groups[j]);
            let p_value = self.test.p_value(&a.samples, &b.samples);
            let tier = Tier::from_p_value(p_value);

            let h = data_max * TICK_FRACTION;
            let bracket = Bracket {
                x_left: i as f64,
                x_right: j as f64,
                y: y_position,
                tick: h,
            };

            debug!(
                left = %a.name,
                right = %b.name,
                p_value,
                tier = tier.name(),
                y = y_position,
                "significance band"
            );

            bands.push(AnnotationBand {
                label_x: bracket.mid_x(),
                label_y: y_position + h * LABEL_OFFSET,
                label: self.label_style.format(p_value, tier),
                bracket,
                pair: PairResult {
                    left: i,
                    right: j,
                    left_name: a.name.clone(),
                    right_name: b.name.clone(),
                    p_value,
                    tier,
                },
            });

            h_last = h;
            y_position += increment;
        }

        Ok(AnnotationPlan {
            bands,
            increment,
            final_y: y_position,
            h_last,
        })
    }
}

/// All `(i, j)` with `i < j < n`, in row-major order
pub fn pair_indices(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(n: usize) -> Vec<Group> {
        (0..n)
            .map(|i| {
                let base = i as f64 * 10.0;
                let samples: Vec<f64> = (1..=5).map(|k| base + k as f64).collect();
                Group::new(format!("g{i}"), samples)
            })
            .collect()
    }

    #[test]
    fn test_pair_order() {
        let pairs: Vec<_> = pair_indices(4).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(pair_indices(1).count(), 0);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_p_value(1e-8), Tier::P1e5);
        assert_eq!(Tier::from_p_value(1e-5), Tier::P1e4);
        assert_eq!(Tier::from_p_value(0.049), Tier::P05);
        assert_eq!(Tier::from_p_value(0.05), Tier::NotSignificant);
        assert_eq!(Tier::from_p_value(f64::NAN), Tier::NotSignificant);
    }

    #[test]
    fn test_three_groups_stack_by_increment() {
        let annotator = SignificanceAnnotator::new();
        let axis = AxisRange::new(0.0, 50.0);
        let plan = annotator.compute_annotations(&groups(3), &axis, 25.0).unwrap();

        assert_eq!(plan.len(), 3);
        assert!((plan.increment - 5.0).abs() < 1e-12);
        assert_eq!(plan.bands[0].bracket.y, 50.0);
        let step = plan.bands[2].bracket.y - plan.bands[1].bracket.y;
        assert!((step - plan.increment).abs() < 1e-12);

        let band = &plan.bands[1];
        assert_eq!((band.pair.left, band.pair.right), (0, 2));
        assert_eq!(band.label_x, 1.0);
        assert!((band.bracket.tick - 0.25).abs() < 1e-12);
        assert!((band.label_y - (55.0 + 0.25 * 1.05)).abs() < 1e-12);
    }

    #[test]
    fn test_final_top() {
        let annotator = SignificanceAnnotator::with_test(|_: &[f64], _: &[f64]| 0.5);
        let axis = AxisRange::new(0.0, 10.0);
        let plan = annotator.compute_annotations(&groups(2), &axis, 20.0).unwrap();

        assert!((plan.final_y - 11.0).abs() < 1e-12);
        assert!((plan.final_top(None) - (11.0 + 6.0 * 0.2)).abs() < 1e-12);
        assert!((plan.final_top(Some(30.0)) - (30.0 + 6.0 * 0.2)).abs() < 1e-12);

        let empty = AnnotationPlan::empty(&axis);
        assert_eq!(empty.final_top(None), 10.0);
        assert_eq!(empty.final_top(Some(12.0)), 12.0);
    }

    #[test]
    fn test_final_top_with_negative_ticks() {
        let annotator = SignificanceAnnotator::with_test(|_: &[f64], _: &[f64]| 0.5);
        let gs = vec![
            Group::new("a", [-1000.0, -999.8, -999.5]),
            Group::new("b", [-999.3, -999.1, -999.0]),
        ];
        let axis = AxisRange::new(-1000.05, -998.95);
        let plan = annotator.compute_annotations(&gs, &axis, -999.0).unwrap();

        let band = &plan.bands[0];
        assert!(band.bracket.tick < 0.0);
        assert_eq!(band.top(), band.bracket.y);

        let top = plan.final_top(None);
        assert!(top > band.label_y);
        assert!(top > band.bracket.y);
        assert!(top > axis.min);
        assert!((top - (band.bracket.y + 6.0 * 9.99)).abs() < 1e-9);
    }

    #[test]
    fn test_label_style() {
        let verbose = LabelStyle::PValueWhenNotSignificant;
        assert_eq!(verbose.format(0.123456, Tier::NotSignificant), "p = 0.12346 (n.s.)");
        assert_eq!(verbose.format(0.001, Tier::P1e2), "**");
        assert_eq!(LabelStyle::Glyph.format(0.5, Tier::NotSignificant), "(n.s.)");
    }

    #[test]
    fn test_empty_group_runs_no_test() {
        let calls = std::cell::Cell::new(0);
        let annotator = SignificanceAnnotator::with_test(|_: &[f64], _: &[f64]| {
            calls.set(calls.get() + 1);
            0.5
        });
        let mut gs = groups(3);
        gs[2].samples.clear();

        let err = annotator
            .compute_annotations(&gs, &AxisRange::new(0.0, 1.0), 1.0)
            .unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(calls.get(), 0);
    }
}
