use rse_engine::workflows::race::RunnerRecord;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const MISSING_MARKERS: [&str; 5] = ["nan", "none", "nc", "na", "-"];

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRunnerNumber { line: u64, value: String },
    InvalidArrival { line: u64, value: String },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to read race export: {}", err),
            IngestError::Csv(err) => write!(f, "invalid race CSV data: {}", err),
            IngestError::InvalidRunnerNumber { line, value } => {
                write!(f, "line {}: runner number '{}' is not a whole number", line, value)
            }
            IngestError::InvalidArrival { line, value } => {
                write!(f, "line {}: arrival '{}' is not a runner number", line, value)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Csv(err) => Some(err),
            IngestError::InvalidRunnerNumber { .. } | IngestError::InvalidArrival { .. } => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Identifies one race across the runners and results exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RaceKey {
    pub date: String,
    pub venue: String,
    pub race: String,
}

impl RaceKey {
    fn new(date: Option<String>, venue: Option<String>, race: Option<String>) -> Self {
        Self {
            date: date.unwrap_or_default(),
            venue: venue.unwrap_or_default().to_ascii_lowercase(),
            race: race.unwrap_or_default(),
        }
    }

    /// Stable identifier fed into the audit seed.
    pub fn source_id(&self) -> String {
        format!("{}_{}_R{}", self.date, self.venue, self.race)
    }
}

/// Runner row tagged with the race it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerEntry {
    pub key: RaceKey,
    pub record: RunnerRecord,
}

/// Discipline and official finishing order of a past race.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceResult {
    pub key: RaceKey,
    pub discipline: String,
    pub arrival: Vec<u32>,
}

pub fn load_runners(path: &Path) -> Result<Vec<RunnerEntry>, IngestError> {
    parse_runners(File::open(path)?)
}

pub fn load_races(path: &Path) -> Result<Vec<RaceResult>, IngestError> {
    parse_races(File::open(path)?)
}

/// Parse a normalized runners export; rows without a runner number are skipped.
pub fn parse_runners<R: Read>(reader: R) -> Result<Vec<RunnerEntry>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<RunnerRow>().enumerate() {
        let row = record?;
        let Some(raw_number) = row.number.as_deref() else {
            continue;
        };
        let line = data_line(index);
        let number = parse_runner_number(raw_number).ok_or_else(|| {
            IngestError::InvalidRunnerNumber {
                line,
                value: raw_number.to_string(),
            }
        })?;

        entries.push(RunnerEntry {
            key: RaceKey::new(row.date, row.venue, row.race),
            record: RunnerRecord {
                number,
                name: row.name.unwrap_or_default(),
                rest_days: row.rest_days,
                active: row.active,
                sigma: row.sigma,
                ia_rank: row.ia_rank,
                rating: row.rating,
                odds: row.odds,
                driver_name: row.driver.as_deref().and_then(driver_name),
                driver_rating: row.driver_rating,
            },
        });
    }

    debug!(runners = entries.len(), "runners export parsed");
    Ok(entries)
}

pub fn parse_races<R: Read>(reader: R) -> Result<Vec<RaceResult>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut races = Vec::new();

    for (index, record) in csv_reader.deserialize::<RaceRow>().enumerate() {
        let row = record?;
        let line = data_line(index);

        let mut arrival = Vec::new();
        for raw in [&row.arrival_1, &row.arrival_2, &row.arrival_3]
            .into_iter()
            .flatten()
        {
            let number = parse_runner_number(raw).ok_or_else(|| IngestError::InvalidArrival {
                line,
                value: raw.clone(),
            })?;
            arrival.push(number);
        }

        races.push(RaceResult {
            key: RaceKey::new(row.date, row.venue, row.race),
            discipline: row.discipline.unwrap_or_default(),
            arrival,
        });
    }

    debug!(races = races.len(), "races export parsed");
    Ok(races)
}

/// Group runner rows by race, keeping card order within each race.
pub fn group_by_race(entries: Vec<RunnerEntry>) -> BTreeMap<RaceKey, Vec<RunnerRecord>> {
    let mut races: BTreeMap<RaceKey, Vec<RunnerRecord>> = BTreeMap::new();
    for entry in entries {
        races.entry(entry.key).or_default().push(entry.record);
    }
    races
}

// header occupies line 1
fn data_line(index: usize) -> u64 {
    index as u64 + 2
}

#[derive(Debug, Deserialize)]
struct RunnerRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    venue: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    race: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_float")]
    rest_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    active: Option<bool>,
    #[serde(default, deserialize_with = "lenient_float")]
    sigma: Option<f64>,
    #[serde(default, deserialize_with = "lenient_float")]
    ia_rank: Option<f64>,
    #[serde(default, deserialize_with = "lenient_float")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_float")]
    odds: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    driver: Option<String>,
    #[serde(default, deserialize_with = "lenient_float")]
    driver_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RaceRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    venue: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    race: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    discipline: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    arrival_1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    arrival_2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    arrival_3: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && !is_missing_marker(value)))
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    Ok(opt.as_deref().and_then(parse_float))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    Ok(opt.as_deref().and_then(parse_flag))
}

fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// Accepts a comma decimal separator; anything unparsable is unknown.
pub(crate) fn parse_float(raw: &str) -> Option<f64> {
    let value = raw.trim().replace(',', ".");
    if value.is_empty() || is_missing_marker(&value) {
        return None;
    }
    value.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" | "oui" | "y" => Some(true),
        "0" | "0.0" | "false" | "no" | "non" | "n" => Some(false),
        _ => None,
    }
}

fn parse_runner_number(raw: &str) -> Option<u32> {
    let value = parse_float(raw)?;
    if value >= 1.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

/// Keep the driver part of a combined `Driver / Trainer` cell.
pub(crate) fn driver_name(raw: &str) -> Option<String> {
    let name = raw.split('/').next().unwrap_or(raw).trim();
    if name.is_empty() || is_missing_marker(name) {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_accept_comma_decimals_and_missing_markers() {
        assert_eq!(parse_float("12,5"), Some(12.5));
        assert_eq!(parse_float(" 7 "), Some(7.0));
        assert_eq!(parse_float("NC"), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn flags_accept_numeric_and_french_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("Oui"), Some(true));
        assert_eq!(parse_flag("non"), Some(false));
        assert_eq!(parse_flag("0.0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn driver_cell_keeps_driver_before_slash() {
        assert_eq!(driver_name("E. Raffin / J. Bruneau").as_deref(), Some("E. Raffin"));
        assert_eq!(driver_name("M. Abrivard").as_deref(), Some("M. Abrivard"));
        assert_eq!(driver_name(" / trainer"), None);
    }

    #[test]
    fn runner_numbers_must_be_whole() {
        assert_eq!(parse_runner_number("4"), Some(4));
        assert_eq!(parse_runner_number("4.0"), Some(4));
        assert_eq!(parse_runner_number("4.5"), None);
        assert_eq!(parse_runner_number("0"), None);
    }

    #[test]
    fn parses_runner_rows_with_missing_columns() {
        let csv = "number,name,rest_days,active,driver\n\
                   3,Idao de Tillard,14,1,E. Raffin / S. Guarato\n\
                   ,Blank row,,,\n\
                   7,Hooker Berry,nc,,\n";

        let entries = parse_runners(csv.as_bytes()).expect("csv parses");

        assert_eq!(entries.len(), 2);
        let first = &entries[0].record;
        assert_eq!(first.number, 3);
        assert_eq!(first.rest_days, Some(14.0));
        assert_eq!(first.active, Some(true));
        assert_eq!(first.driver_name.as_deref(), Some("E. Raffin"));
        assert_eq!(first.sigma, None);
        let second = &entries[1].record;
        assert_eq!(second.rest_days, None);
        assert_eq!(second.active, None);
        assert_eq!(entries[0].key, RaceKey::default());
    }

    #[test]
    fn rejects_fractional_runner_numbers() {
        let csv = "number,name\n2.5,Half\n";
        let err = parse_runners(csv.as_bytes()).expect_err("invalid number");
        assert!(matches!(err, IngestError::InvalidRunnerNumber { ref value, .. } if value == "2.5"));
    }

    #[test]
    fn parses_race_results_and_skips_blank_arrivals() {
        let csv = "date,venue,race,discipline,arrival_1,arrival_2,arrival_3\n\
                   2025-01-26,Vincennes,4,trot,6,2,\n";

        let races = parse_races(csv.as_bytes()).expect("csv parses");

        assert_eq!(races.len(), 1);
        assert_eq!(races[0].key.venue, "vincennes");
        assert_eq!(races[0].key.source_id(), "2025-01-26_vincennes_R4");
        assert_eq!(races[0].discipline, "trot");
        assert_eq!(races[0].arrival, vec![6, 2]);
    }

    #[test]
    fn groups_runners_by_race_key() {
        let csv = "date,venue,race,number,name\n\
                   2025-01-26,vincennes,4,1,A\n\
                   2025-01-26,vincennes,5,1,B\n\
                   2025-01-26,VINCENNES,4,2,C\n";

        let grouped = group_by_race(parse_runners(csv.as_bytes()).expect("csv parses"));

        assert_eq!(grouped.len(), 2);
        let key = RaceKey {
            date: "2025-01-26".to_string(),
            venue: "vincennes".to_string(),
            race: "4".to_string(),
        };
        let names: Vec<&str> = grouped[&key].iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}
