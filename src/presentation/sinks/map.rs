// Map marker - aircraft position and heading on the flight path
use crate::application::sink::{RenderContext, Sink};
use crate::domain::dashboard::{MapView, SinkView};
use crate::domain::time_axis::TimeAxis;

/// Aircraft marker on the flight path
#[derive(Debug, Default)]
pub struct MapSink {
    view: MapView,
}

impl MapSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for MapSink {
    fn name(&self) -> &'static str {
        "map"
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        let state = ctx.state;
        self.view = MapView {
            fraction: state.path_fraction,
            index: state.path_index,
            position: state.position,
            bearing: state.bearing,
        };
    }

    fn reset(&mut self, _axis: &TimeAxis) {
        self.view = MapView::default();
    }

    fn view(&self) -> SinkView {
        SinkView::Map(self.view.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resolver::tests::sample_resolver;
    use crate::domain::flight_path::PathPoint;

    #[test]
    fn test_marker_moves_along_path() {
        let resolver = sample_resolver();
        let mut sink = MapSink::new();

        let state = resolver.resolve(110);
        sink.render(&RenderContext {
            state: &state,
            resolver: &resolver,
        });
        let SinkView::Map(view) = sink.view() else {
            panic!("expected map view");
        };
        assert_eq!(view.fraction, 0.25);
        assert_eq!(view.index, Some(1));
        assert_eq!(view.position, Some(PathPoint::new(0.0, 0.5)));
        assert_eq!(view.bearing, Some(0.0));

        sink.reset(&resolver.axis());
        let SinkView::Map(view) = sink.view() else {
            panic!("expected map view");
        };
        assert_eq!(view.index, None);
        assert_eq!(view.position, None);
    }
}
