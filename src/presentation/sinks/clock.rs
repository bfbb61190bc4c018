// Playback clock - time-of-day label for the playhead
use crate::application::sink::{RenderContext, Sink};
use crate::domain::dashboard::{ClockView, SinkView};
use crate::domain::time_axis::{TimeAxis, clock_label};

#[derive(Debug, Default)]
pub struct ClockSink {
    view: ClockView,
}

impl ClockSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn show(&mut self, second: i64) {
        self.view = ClockView {
            second,
            label: clock_label(second),
        };
    }
}

impl Sink for ClockSink {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        self.show(ctx.state.second);
    }

    fn reset(&mut self, axis: &TimeAxis) {
        self.show(axis.t_min);
    }

    fn view(&self) -> SinkView {
        SinkView::Clock(self.view.clone())
    }
}
