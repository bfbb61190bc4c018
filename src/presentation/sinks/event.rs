// Latest timeline annotation at or before the playhead
use crate::application::sink::{RenderContext, Sink};
use crate::domain::dashboard::{EventView, SinkView};
use crate::domain::time_axis::TimeAxis;

#[derive(Debug, Default)]
pub struct EventSink {
    view: EventView,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for EventSink {
    fn name(&self) -> &'static str {
        "event"
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        self.view = EventView {
            t: ctx.state.event.map(|e| e.t),
            text: ctx.state.event.map(|e| e.text.clone()),
        };
    }

    fn reset(&mut self, _axis: &TimeAxis) {
        self.view = EventView::default();
    }

    fn view(&self) -> SinkView {
        SinkView::Event(self.view.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resolver::tests::sample_resolver;

    fn render_at(sink: &mut EventSink, second: i64) -> EventView {
        let resolver = sample_resolver();
        let state = resolver.resolve(second);
        sink.render(&RenderContext {
            state: &state,
            resolver: &resolver,
        });
        match sink.view() {
            SinkView::Event(view) => view,
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_event_follows_latest_annotation() {
        let mut sink = EventSink::new();
        assert_eq!(render_at(&mut sink, 109).text.as_deref(), Some("a"));
        assert_eq!(render_at(&mut sink, 110).text.as_deref(), Some("b"));
        assert_eq!(render_at(&mut sink, 140).t, Some(130));

        sink.reset(&TimeAxis::new(100, 140));
        assert!(matches!(sink.view(), SinkView::Event(EventView { t: None, text: None })));
    }
}
