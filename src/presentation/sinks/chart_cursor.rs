// Chart cursor - smoothed values of both selected channels under the playhead
use crate::application::record_store::RecordStore;
use crate::application::sink::{RenderContext, Sink};
use crate::application::smoothing::smooth_at;
use crate::domain::dashboard::{ChartCursorView, SinkView};
use crate::domain::telemetry::{Channel, ChartSelection};
use crate::domain::time_axis::TimeAxis;

pub struct ChartCursorSink {
    selection: ChartSelection,
    second: i64,
    left: Option<f64>,
    right: Option<f64>,
}

impl ChartCursorSink {
    pub fn new() -> Self {
        Self {
            selection: ChartSelection::default(),
            second: 0,
            left: None,
            right: None,
        }
    }
}

/// Smoothed value of `channel` at record `index`, or None inside a gap
fn smoothed_at(records: &RecordStore, channel: Channel, index: Option<usize>, radius: usize) -> Option<f64> {
    let rows = records.records();
    index
        .map(|i| smooth_at(rows.len(), |k| rows[k].chart_value(channel), i, radius))
        .filter(|v| v.is_finite())
}

impl Sink for ChartCursorSink {
    fn name(&self) -> &'static str {
        "chart"
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        let records = ctx.resolver.records();
        let index = records.nearest_index(ctx.state.second);
        let ChartSelection { left, right, radius } = self.selection;
        self.left = smoothed_at(records, left, index, radius);
        self.right = smoothed_at(records, right, index, radius);
        self.second = ctx.state.second;
    }

    fn reset(&mut self, axis: &TimeAxis) {
        self.second = axis.t_min;
        self.left = None;
        self.right = None;
    }

    fn select_chart(&mut self, selection: &ChartSelection) {
        self.selection = *selection;
    }

    fn view(&self) -> SinkView {
        SinkView::Chart(ChartCursorView {
            second: self.second,
            selection: self.selection,
            left: self.left,
            right: self.right,
        })
    }
}
