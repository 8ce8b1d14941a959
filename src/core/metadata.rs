use crate::core::{LoadSummary, MetadataTable};
use crate::utils::error::{ExplorerError, Result};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

pub const DATE_COLUMN: &str = "date";

/// Reads tab-separated metadata with a header row and keeps the rows whose
/// `date` resolves to a calendar month.
pub fn parse_tsv(bytes: &[u8]) -> Result<MetadataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns = dedupe_headers(reader.headers()?.iter());
    let date_index = columns
        .iter()
        .position(|c| c == DATE_COLUMN)
        .ok_or(ExplorerError::MissingDateColumn)?;

    let mut table = MetadataTable {
        columns,
        ..Default::default()
    };

    for record in reader.records() {
        let record = record?;
        table.total_rows += 1;

        if record.len() > table.columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(ExplorerError::ValidationError {
                message: format!(
                    "Expected {} fields in line {}, saw {}",
                    table.columns.len(),
                    line,
                    record.len()
                ),
            });
        }

        let Some(month) = record.get(date_index).and_then(month_of) else {
            continue;
        };

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(table.columns.len(), String::new());
        table.rows.push(row);
        table.months.push(month);
    }

    tracing::debug!(
        total = table.total_rows,
        kept = table.valid_rows(),
        columns = table.columns.len(),
        "parsed metadata"
    );

    Ok(table)
}

/// Repeated header names get a `.N` suffix (`c`, `c.1`, `c.2`) so every
/// column stays addressable by name.
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();

    for name in headers {
        let mut column = name.to_string();
        if taken.contains(&column) {
            let count = seen.entry(name).or_insert(1);
            loop {
                column = format!("{}.{}", name, count);
                *count += 1;
                if !taken.contains(&column) {
                    break;
                }
            }
        }
        taken.insert(column.clone());
        columns.push(column);
    }
    columns
}

/// `YYYY-MM` for a full or month-precision date, `None` for anything vaguer.
pub fn month_of(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.len() < 7 || !value.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let day = match value.len() {
        7 => format!("{}-01", value),
        10 => value.to_string(),
        n if n > 10 && matches!(value.as_bytes()[10], b'T' | b' ') => value[..10].to_string(),
        _ => return None,
    };

    NaiveDate::parse_from_str(&day, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m").to_string())
}

pub fn summarize(table: &MetadataTable) -> LoadSummary {
    let dropped = table.dropped_rows();
    let mut message = format!("Metadata has {} rows.", table.total_rows);
    if dropped > 0 {
        message.push_str(&format!(
            " {} were dropped due to ambiguous/missing date information. \
             A future version of this app may be able to extract months from ambiguous dates.",
            dropped
        ));
    }

    LoadSummary {
        total_rows: table.total_rows,
        valid_rows: table.valid_rows(),
        dropped_rows: dropped,
        message,
    }
}
