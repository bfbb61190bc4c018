// Sink interface - every renderer consumes resolved state through this trait
use crate::application::resolver::{ResolvedState, Resolver};
use crate::domain::dashboard::SinkView;
use crate::domain::telemetry::ChartSelection;
use crate::domain::time_axis::TimeAxis;

/// Whether a sink follows the playhead before the first play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkGate {
    /// Clock, transcript, event, chart cursor, map marker
    Always,
    /// Gauges and telemetry-derived indicators stay at rest until first play
    AfterStart,
}

/// Input for one render pass; every sink in the pass sees the same state
pub struct RenderContext<'a> {
    pub state: &'a ResolvedState<'a>,
    pub resolver: &'a Resolver,
}

pub trait Sink: Send {
    fn name(&self) -> &'static str;

    fn gate(&self) -> SinkGate {
        SinkGate::Always
    }

    fn render(&mut self, ctx: &RenderContext<'_>);

    /// Back to the blank / all-zero state shown after stop
    fn reset(&mut self, axis: &TimeAxis);

    /// Drop any in-flight visual transition
    fn interrupt(&mut self) {}

    fn select_chart(&mut self, _selection: &ChartSelection) {}

    fn view(&self) -> SinkView;
}
