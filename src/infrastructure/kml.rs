// KML flight path parser
use crate::domain::flight_path::PathPoint;
use crate::infrastructure::parse_outcome::ParseOutcome;

const OPEN_TAG: &str = "<coordinates>";
const CLOSE_TAG: &str = "</coordinates>";

/// All `lon,lat[,alt]` tuples from every `coordinates` element, in document order.
///
/// Malformed XML falls back to scanning the raw text for coordinate blocks.
pub fn parse_path(text: &str) -> ParseOutcome<PathPoint> {
    let mut outcome = ParseOutcome::default();
    if text.trim().is_empty() {
        return outcome;
    }

    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    match roxmltree::Document::parse_with_options(text, options) {
        Ok(doc) => {
            for node in doc
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "coordinates")
            {
                if let Some(block) = node.text() {
                    parse_block(block, &mut outcome);
                }
            }
        }
        Err(e) => {
            tracing::warn!("Flight path is not well-formed XML ({}), scanning text instead", e);
            for block in scan_blocks(text) {
                parse_block(block, &mut outcome);
            }
        }
    }
    outcome
}

fn scan_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    while let Some(open) = text[start..].find(OPEN_TAG) {
        let body_start = start + open + OPEN_TAG.len();
        let Some(close) = text[body_start..].find(CLOSE_TAG) else {
            break;
        };
        blocks.push(&text[body_start..body_start + close]);
        start = body_start + close + CLOSE_TAG.len();
    }
    blocks
}

fn parse_block(block: &str, outcome: &mut ParseOutcome<PathPoint>) {
    for token in block.split_whitespace() {
        match parse_tuple(token) {
            Some(point) => outcome.items.push(point),
            None => outcome.skipped += 1,
        }
    }
}

/// Altitude, when present, is ignored
fn parse_tuple(token: &str) -> Option<PathPoint> {
    let mut parts = token.split(',');
    let lon: f64 = parts.next()?.trim().parse().ok()?;
    let lat: f64 = parts.next()?.trim().parse().ok()?;
    (lon.is_finite() && lat.is_finite()).then(|| PathPoint::new(lon, lat))
}
