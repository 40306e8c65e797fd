use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::StringRecord;

use crate::record::Record;

/// Load and normalize a training-data CSV export. Field-level problems
/// (bad numbers, bad dates) coerce to absent values; only I/O and CSV
/// structure errors fail the load.
pub fn load_records_csv(path: &Path) -> Result<Vec<Record>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open training data csv {}", path.display()))?;
    records_from_reader(reader)
}

/// Same normalization over any reader, for in-memory input and tests.
pub fn records_from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>> {
    let headers = reader.headers().context("read csv headers")?.clone();
    let cols = ColumnMap::from_headers(&headers);

    let mut out = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("read csv row {}", i + 2))?;
        if let Some(record) = cols.record_from_row(&row) {
            out.push(record);
        }
    }
    Ok(out)
}

/// Header positions resolved through a forgiving normalization, so
/// `Metric_Type`, `metric type` and `MetricType` all land on one column.
#[derive(Debug, Default)]
struct ColumnMap {
    first_name: Option<usize>,
    last_name: Option<usize>,
    full_name: Option<usize>,
    team: Option<usize>,
    age: Option<usize>,
    metric: Option<usize>,
    date: Option<usize>,
    attempts: [Option<usize>; 3],
    last_attempt: Option<usize>,
    average: Option<usize>,
    highest: Option<usize>,
    lowest: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut cols = ColumnMap::default();
        for (i, raw) in headers.iter().enumerate() {
            match normalize_header(raw).as_str() {
                "playernamefirst" | "firstname" => cols.first_name = Some(i),
                "playernamelast" | "lastname" => cols.last_name = Some(i),
                "fullname" | "player" | "playername" => cols.full_name = Some(i),
                "team" => cols.team = Some(i),
                "age" => cols.age = Some(i),
                "metrictype" | "metric" => cols.metric = Some(i),
                "date" => cols.date = Some(i),
                "attempt1" => cols.attempts[0] = Some(i),
                "attempt2" => cols.attempts[1] = Some(i),
                "attempt3" => cols.attempts[2] = Some(i),
                "lastattempt" => cols.last_attempt = Some(i),
                "average" => cols.average = Some(i),
                "highest" => cols.highest = Some(i),
                "lowest" => cols.lowest = Some(i),
                _ => {}
            }
        }
        cols
    }

    fn record_from_row(&self, row: &StringRecord) -> Option<Record> {
        let full_name = self.full_name_from(row);
        let metric = self.text(row, self.metric);
        // Without a name or a metric the row can never join a group.
        if full_name.is_empty() || metric.is_empty() {
            return None;
        }

        Some(Record {
            full_name,
            team: self.text(row, self.team),
            age: self.number(row, self.age).and_then(age_from_number),
            metric,
            date: self.text_opt(row, self.date).and_then(parse_date),
            attempts: [
                self.number(row, self.attempts[0]),
                self.number(row, self.attempts[1]),
                self.number(row, self.attempts[2]),
            ],
            last_attempt: self.number(row, self.last_attempt),
            average: self.number(row, self.average),
            highest: self.number(row, self.highest),
            lowest: self.number(row, self.lowest),
        })
    }

    fn full_name_from(&self, row: &StringRecord) -> String {
        if let Some(name) = self.text_opt(row, self.full_name) {
            if !name.is_empty() {
                return name;
            }
        }
        let first = self.text(row, self.first_name);
        let last = self.text(row, self.last_name);
        format!("{first} {last}").trim().to_string()
    }

    fn text(&self, row: &StringRecord, idx: Option<usize>) -> String {
        self.text_opt(row, idx).unwrap_or_default()
    }

    fn text_opt(&self, row: &StringRecord, idx: Option<usize>) -> Option<String> {
        let raw = row.get(idx?)?.trim();
        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    }

    fn number(&self, row: &StringRecord, idx: Option<usize>) -> Option<f64> {
        parse_number(row.get(idx?)?)
    }
}

fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Tolerant numeric coercion: strips decorations, treats empty and "-" as
/// absent, never fails the row.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    let cleaned = cleaned.replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn age_from_number(v: f64) -> Option<u32> {
    if v.is_finite() && (0.0..=120.0).contains(&v) {
        Some(v as u32)
    } else {
        None
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d"];

/// Unparseable dates become absent, mirroring the coerce-to-missing policy
/// of the numeric columns.
pub fn parse_date(raw: impl AsRef<str>) -> Option<NaiveDate> {
    let s = raw.as_ref().trim();
    // Timestamp exports carry a time suffix; the date prefix is enough.
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
