// Tower observation table embedded in the mishap brief markdown
use crate::domain::weather::WeatherObservation;
use crate::infrastructure::parse_outcome::ParseOutcome;
use once_cell::sync::Lazy;
use regex::Regex;

const TABLE_TITLE: &str = "Surface Observations from Hurlburt Tower";

static CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<td>(.*)</td>$").expect("table cell pattern is valid"));

/// "1955" becomes "19:55"; anything else passes through without spaces
fn clock_cell(cell: &str) -> String {
    let compact: String = cell.chars().filter(|c| *c != ' ').collect();
    if compact.len() == 4 && compact.chars().all(|c| c.is_ascii_digit()) {
        format!("{}:{}", &compact[..2], &compact[2..])
    } else {
        compact
    }
}

fn time_pair(cell: &str) -> (String, String) {
    match cell.split_once('/') {
        Some((local, zulu)) => (clock_cell(local), clock_cell(zulu)),
        None => (clock_cell(cell), String::new()),
    }
}

fn visibility(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// "OVC 012 (1,200 ft)" style cells: every digit in the cell, read as one number
fn ceiling(cell: &str) -> Option<f64> {
    let digits: String = cell.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<f64>().ok()
}

/// Observations in table order. Cells are read in (time, visibility, ceiling)
/// triples; a trailing partial triple or a row with neither value is skipped.
/// Text without the table yields nothing.
pub fn parse_weather(text: &str) -> ParseOutcome<WeatherObservation> {
    let mut outcome = ParseOutcome::default();
    let Some(start) = text.find(TABLE_TITLE) else {
        return outcome;
    };

    let mut cells = Vec::new();
    for line in text[start..].lines() {
        let line = line.trim();
        if line.starts_with("</table>") {
            break;
        }
        if let Some(captures) = CELL.captures(line) {
            cells.push(captures[1].trim().to_string());
        }
    }

    let chunks = cells.chunks_exact(3);
    outcome.skipped += usize::from(!chunks.remainder().is_empty());
    for chunk in chunks {
        let (time_local, time_zulu) = time_pair(&chunk[0]);
        let visibility_sm = visibility(&chunk[1]);
        let ceiling_ft = ceiling(&chunk[2]);
        if visibility_sm.is_none() && ceiling_ft.is_none() {
            outcome.skipped += 1;
            continue;
        }
        outcome.items.push(WeatherObservation {
            time_local,
            time_zulu,
            visibility_sm,
            ceiling_ft,
        });
    }
    outcome
}
