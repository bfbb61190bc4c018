// Cockpit transcript around the playhead
use crate::application::sink::{RenderContext, Sink};
use crate::domain::dashboard::{SinkView, TranscriptLine, TranscriptView};
use crate::domain::time_axis::{TimeAxis, clock_label};

pub struct TranscriptSink {
    window_secs: i64,
    view: TranscriptView,
}

impl TranscriptSink {
    pub fn new(window_secs: i64) -> Self {
        Self {
            window_secs: window_secs.max(0),
            view: TranscriptView::default(),
        }
    }
}

impl Sink for TranscriptSink {
    fn name(&self) -> &'static str {
        "transcript"
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        let second = ctx.state.second;
        let lines = ctx
            .resolver
            .records()
            .window(second - self.window_secs, second + self.window_secs)
            .iter()
            .filter_map(|record| {
                let text = record.transcript.as_ref()?;
                Some(TranscriptLine {
                    t: record.t,
                    label: clock_label(record.t),
                    crew: record.crew.clone().unwrap_or_default(),
                    text: text.clone(),
                    now: record.t == second,
                })
            })
            .collect();
        self.view = TranscriptView { lines };
    }

    fn reset(&mut self, _axis: &TimeAxis) {
        self.view = TranscriptView::default();
    }

    fn view(&self) -> SinkView {
        SinkView::Transcript(self.view.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resolver::tests::sample_resolver;

    fn lines_at(sink: &mut TranscriptSink, second: i64) -> Vec<TranscriptLine> {
        let resolver = sample_resolver();
        let state = resolver.resolve(second);
        sink.render(&RenderContext {
            state: &state,
            resolver: &resolver,
        });
        match sink.view() {
            SinkView::Transcript(view) => view.lines,
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_window_and_now_flag() {
        let mut sink = TranscriptSink::new(3);

        let lines = lines_at(&mut sink, 105);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "00:01:45");
        assert_eq!(lines[0].crew, "CP");
        assert_eq!(lines[0].text, "ALTITUDE");
        assert!(lines[0].now);

        let lines = lines_at(&mut sink, 102);
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].now);

        assert!(lines_at(&mut sink, 109).is_empty());
    }
}
