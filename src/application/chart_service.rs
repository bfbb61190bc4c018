// Chart service - raw and smoothed series for the two selected channels
use crate::application::resolver::Resolver;
use crate::application::smoothing::smooth;
use crate::domain::telemetry::{Channel, ChartData, ChartSelection, SeriesData, TimeSeriesPoint};
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    resolver: Arc<Resolver>,
    max_radius: usize,
    range_padding: f64,
}

impl ChartService {
    pub fn new(resolver: Arc<Resolver>, max_radius: usize, range_padding: f64) -> Self {
        Self {
            resolver,
            max_radius,
            range_padding,
        }
    }

    pub fn clamp_radius(&self, radius: usize) -> usize {
        radius.min(self.max_radius)
    }

    /// Window bounds default to the recording's ends, are swapped when
    /// reversed and clamped to the time axis.
    pub fn window(&self, from: Option<i64>, to: Option<i64>) -> (i64, i64) {
        let axis = self.resolver.axis();
        let from = from.unwrap_or(axis.t_min);
        let to = to.unwrap_or(axis.t_max);
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        (lo.max(axis.t_min), hi.min(axis.t_max))
    }

    /// Series cut to the window first, then smoothed, so samples outside the
    /// window never bleed into the edges.
    pub fn build(&self, selection: ChartSelection, from: Option<i64>, to: Option<i64>) -> ChartData {
        let radius = self.clamp_radius(selection.radius);
        let (lo, hi) = self.window(from, to);
        ChartData::new(
            radius,
            (lo, hi),
            self.build_series(selection.left, radius, (lo, hi)),
            self.build_series(selection.right, radius, (lo, hi)),
        )
    }

    fn build_series(&self, channel: Channel, radius: usize, (lo, hi): (i64, i64)) -> SeriesData {
        let raw = self.resolver.records().series(channel, lo, hi);
        let smoothed = smooth(&raw, radius);
        let range = compute_range(&smoothed, self.range_padding);
        SeriesData::new(channel, raw, smoothed, range)
    }
}

/// Y-axis range over the finite values, widened by `padding` of the span.
/// A flat series gets ±1, a series without finite values gets `[0, 1]`.
pub fn compute_range(points: &[TimeSeriesPoint], padding: f64) -> (f64, f64) {
    let mut finite = points.iter().map(|p| p.value).filter(|v| v.is_finite());
    let Some(first) = finite.next() else {
        return (0.0, 1.0);
    };
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let span = max - min;
    (min - span * padding, max + span * padding)
}
