// Timeline markup parser
use crate::domain::timeline::TimelineEvent;
use crate::infrastructure::parse_outcome::ParseOutcome;
use once_cell::sync::Lazy;
use regex::Regex;

/// `- HH:MM:SS — free text`; an en-dash separator is tolerated
static EVENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-*]\s*(\d{2}):(\d{2}):(\d{2})\s*[—–]\s*(.*)$").expect("timeline pattern is valid")
});

fn event_from_line(line: &str) -> Option<TimelineEvent> {
    let captures = EVENT_LINE.captures(line)?;
    let hour: i64 = captures[1].parse().ok()?;
    let minute: i64 = captures[2].parse().ok()?;
    let second: i64 = captures[3].parse().ok()?;
    if hour >= 24 || minute >= 60 || second >= 60 {
        return None;
    }
    Some(TimelineEvent::new(
        hour * 3600 + minute * 60 + second,
        captures[4].trim(),
    ))
}

/// Extract events from the markup, sorted ascending by time.
/// Lines that are not events count as skipped.
pub fn parse_timeline(text: &str) -> ParseOutcome<TimelineEvent> {
    let mut outcome = ParseOutcome::default();
    for line in text.lines() {
        match event_from_line(line) {
            Some(event) => outcome.items.push(event),
            None => outcome.skipped += 1,
        }
    }
    outcome.items.sort_by_key(|e| e.t);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeline() {
        let text = "# Línea de tiempo\n\
                    \n\
                    - 20:16:40 — Impacto con el agua\n\
                    - 20:10:05 — Despegue desde Eglin\r\n\
                    Texto libre sin marca\n\
                    * 20:12:00 – Entrada en niebla\n\
                    - 20:10:05 — Segundo evento\n";
        let outcome = parse_timeline(text);

        let times: Vec<i64> = outcome.items.iter().map(|e| e.t).collect();
        assert_eq!(times, vec![72605, 72605, 72720, 73000]);
        assert_eq!(outcome.items[0].text, "Despegue desde Eglin");
        assert_eq!(outcome.items[1].text, "Segundo evento");
        assert_eq!(outcome.items[2].text, "Entrada en niebla");
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn test_malformed_times_skipped() {
        let outcome = parse_timeline("- 25:00:00 — late\n- 20:61:00 — bad\n- 2:00:00 — short\n- 20:00:00 no dash\n");
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.skipped, 4);
    }
}
