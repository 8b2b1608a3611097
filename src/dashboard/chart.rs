//! Score trend series.

use crate::models::{ChartPoint, GeneralSummary};

/// A single point carries no trend, so the chart needs at least two.
pub const MIN_CHART_POINTS: usize = 2;

/// Map summaries to positional points, keeping the input order.
pub fn build(summaries: &[GeneralSummary]) -> Vec<ChartPoint> {
    summaries
        .iter()
        .enumerate()
        .map(|(index, summary)| ChartPoint {
            index,
            score: summary.score,
        })
        .collect()
}

/// Whether a series of `len` points should be drawn at all.
pub fn is_chartable(len: usize) -> bool {
    len >= MIN_CHART_POINTS
}
