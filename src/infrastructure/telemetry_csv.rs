// Telemetry CSV parser
use crate::domain::telemetry::TelemetryRecord;
use crate::infrastructure::parse_outcome::ParseOutcome;
use csv::{ReaderBuilder, StringRecord, Trim};

const HOUR: &str = "local hour";
const MINUTE: &str = "local minute";
const SECOND: &str = "local second";
const AIRSPEED: &str = "tas";
const RADAR_ALTITUDE: &str = "altitude radar";
const VERTICAL_SPEED: &str = "vertical speed";
const TORQUE_1: &str = "eng 1 torque";
const TORQUE_2: &str = "eng 2 torque";
const GROUND_SPEED: &str = "ground speed";
const TRANSCRIPT: &str = "transcripts";
const CREW: &str = "crew";

/// Column positions resolved from the header row
#[derive(Debug, Default)]
struct Columns {
    hour: Option<usize>,
    minute: Option<usize>,
    second: Option<usize>,
    airspeed: Option<usize>,
    radar_altitude: Option<usize>,
    vertical_speed: Option<usize>,
    torque1: Option<usize>,
    torque2: Option<usize>,
    ground_speed: Option<usize>,
    transcript: Option<usize>,
    crew: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Self {
        let mut columns = Columns::default();
        for (idx, header) in headers.iter().enumerate() {
            let slot = match normalize_header(header).as_str() {
                HOUR => &mut columns.hour,
                MINUTE => &mut columns.minute,
                SECOND => &mut columns.second,
                AIRSPEED => &mut columns.airspeed,
                RADAR_ALTITUDE => &mut columns.radar_altitude,
                VERTICAL_SPEED => &mut columns.vertical_speed,
                TORQUE_1 => &mut columns.torque1,
                TORQUE_2 => &mut columns.torque2,
                GROUND_SPEED => &mut columns.ground_speed,
                TRANSCRIPT => &mut columns.transcript,
                CREW => &mut columns.crew,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }
        columns
    }

    fn record(&self, row: &StringRecord) -> Option<TelemetryRecord> {
        let hour = time_component(row, self.hour, 24)?;
        let minute = time_component(row, self.minute, 60)?;
        let second = time_component(row, self.second, 60)?;

        let mut record = TelemetryRecord::new(hour * 3600 + minute * 60 + second);
        record.airspeed = number(row, self.airspeed);
        record.radar_altitude = number(row, self.radar_altitude);
        record.vertical_speed = number(row, self.vertical_speed);
        record.torque1 = number(row, self.torque1);
        record.torque2 = number(row, self.torque2);
        record.ground_speed = number(row, self.ground_speed);
        record.transcript = text(row, self.transcript);
        record.crew = text(row, self.crew);
        Some(record)
    }
}

/// "Local_Hour", " local hour " and "Local Hour" all name the same column
fn normalize_header(header: &str) -> String {
    header.trim().replace('_', " ").to_lowercase()
}

fn field(row: &StringRecord, column: Option<usize>) -> Option<&str> {
    column.and_then(|idx| row.get(idx)).map(str::trim)
}

/// Numeric field; empty or non-numeric reads as NaN
fn number(row: &StringRecord, column: Option<usize>) -> f64 {
    field(row, column)
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Clock field in `0..limit`; anything else makes the row malformed
fn time_component(row: &StringRecord, column: Option<usize>, limit: i64) -> Option<i64> {
    let value = number(row, column);
    (value >= 0.0 && value < limit as f64).then(|| value.trunc() as i64)
}

fn text(row: &StringRecord, column: Option<usize>) -> Option<String> {
    field(row, column)
        .map(|value| value.trim_matches('"').trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Parse recorder rows in file order. Rows without a usable local time are skipped.
pub fn parse_records(text: &str) -> ParseOutcome<TelemetryRecord> {
    let mut outcome = ParseOutcome::default();
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!("Telemetry header row unreadable: {}", e);
            return outcome;
        }
    };
    let columns = Columns::locate(&headers);
    if columns.hour.is_none() || columns.minute.is_none() || columns.second.is_none() {
        tracing::warn!("Telemetry header lacks local time columns: {:?}", headers);
    }

    for result in reader.records() {
        match result.ok().and_then(|row| columns.record(&row)) {
            Some(record) => outcome.items.push(record),
            None => outcome.skipped += 1,
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let csv = "Local Hour,Local Minute,Local Second,TAS,Altitude Radar,Vertical Speed,Eng 1 Torque,Eng 2 Torque,Ground Speed,Transcripts,Crew\n\
                   20,16,28,95.5,310,-450,42,41,88,,\n\
                   20,16,29,96,,n/a,42,40.5,89,\"Check altitude, check altitude\",CP\n";
        let outcome = parse_records(csv);

        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.items.len(), 2);
        let first = &outcome.items[0];
        assert_eq!(first.t, 72988);
        assert_eq!(first.airspeed, 95.5);
        assert_eq!(first.vertical_speed, -450.0);
        assert!(first.transcript.is_none());

        let second = &outcome.items[1];
        assert!(second.radar_altitude.is_nan());
        assert!(second.vertical_speed.is_nan());
        assert_eq!(second.transcript.as_deref(), Some("Check altitude, check altitude"));
        assert_eq!(second.crew.as_deref(), Some("CP"));
    }

    #[test]
    fn test_escaped_quotes_are_stripped() {
        let csv = "Local Hour,Local Minute,Local Second,Transcripts\n\
                   1,0,0,\"\"\"Pull up, pull up\"\"\"\n";
        let outcome = parse_records(csv);
        assert_eq!(outcome.items[0].transcript.as_deref(), Some("Pull up, pull up"));
    }

    #[test]
    fn test_rows_without_time_are_skipped() {
        let csv = "Local_Hour,Local_Minute,Local_Second,TAS\n\
                   ,16,28,90\n\
                   20,x,28,90\n\
                   20.0,16,30,91\n\
                   20,16\n";
        let outcome = parse_records(csv);
        assert_eq!(outcome.skipped, 3);
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].t, 72990);
    }

    #[test]
    fn test_out_of_range_time_is_skipped() {
        let csv = "Local Hour,Local Minute,Local Second\n\
                   1e300,0,0\n\
                   -5,0,0\n\
                   24,0,0\n\
                   20,60,0\n\
                   20,0,60\n\
                   inf,0,0\n\
                   23,59,59.9\n\
                   20,0,0\n";
        let outcome = parse_records(csv);
        assert_eq!(outcome.skipped, 6);
        let times: Vec<i64> = outcome.items.iter().map(|r| r.t).collect();
        assert_eq!(times, vec![86_399, 72_000]);
    }

    #[test]
    fn test_missing_columns_read_as_gaps() {
        let outcome = parse_records("Local Hour,Local Minute,Local Second\n0,0,5\n");
        let record = &outcome.items[0];
        assert_eq!(record.t, 5);
        assert!(record.ground_speed.is_nan());
        assert!(record.crew.is_none());
    }

    #[test]
    fn test_empty_input() {
        let outcome = parse_records("");
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.skipped, 0);
    }
}
