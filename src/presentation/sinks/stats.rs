// Running statistics from the start of the recording to the playhead
use crate::application::running_stats::RunningStats;
use crate::application::sink::{RenderContext, Sink, SinkGate};
use crate::domain::dashboard::{SinkView, StatsView};
use crate::domain::time_axis::TimeAxis;

/// Reads the resolver's shared prefix tables; holds only the current view
pub struct StatsSink {
    view: StatsView,
    empty: StatsView,
}

impl StatsSink {
    pub fn new(stats: &RunningStats) -> Self {
        let empty = StatsView {
            channels: stats.over_first(0),
        };
        Self {
            view: empty.clone(),
            empty,
        }
    }
}

impl Sink for StatsSink {
    fn name(&self) -> &'static str {
        "stats"
    }

    fn gate(&self) -> SinkGate {
        SinkGate::AfterStart
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        let count = ctx.resolver.records().count_through(ctx.state.second);
        self.view = StatsView {
            channels: ctx.resolver.running_stats().over_first(count),
        };
    }

    fn reset(&mut self, _axis: &TimeAxis) {
        self.view = self.empty.clone();
    }

    fn view(&self) -> SinkView {
        SinkView::Stats(self.view.clone())
    }
}
