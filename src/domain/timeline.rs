// Timeline domain models
use serde::Serialize;

/// Human-authored annotation at a second since local midnight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub t: i64,
    pub text: String,
}

impl TimelineEvent {
    pub fn new(t: i64, text: impl Into<String>) -> Self {
        Self { t, text: text.into() }
    }
}

/// Event placed on the scrub bar as a percentage of the time axis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMarker {
    pub t: i64,
    pub text: String,
    pub percent: f64,
}
