use serde::{Deserialize, Serialize};

/// Parsed metadata with every row that carries a usable month.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// `YYYY-MM` for each entry of `rows`.
    pub months: Vec<String>,
    /// Rows read before undated ones were dropped.
    pub total_rows: usize,
}

impl MetadataTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn valid_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn dropped_rows(&self) -> usize {
        self.total_rows - self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row].get(column).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub dropped_rows: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOption {
    pub column: String,
    pub unique_count: usize,
    pub label: String,
}

impl ColumnOption {
    pub fn new(column: impl Into<String>, unique_count: usize) -> Self {
        let column = column.into();
        let label = format!("{} (n={})", column, unique_count);
        Self {
            column,
            unique_count,
            label,
        }
    }

    /// The blank entry at the top of the Color By list.
    pub fn none() -> Self {
        Self {
            column: String::new(),
            unique_count: 0,
            label: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSpec {
    pub title: String,
    pub months: Vec<String>,
    pub series: Vec<Series>,
    pub stacked: bool,
    pub tooltip: String,
}

impl PlotSpec {
    /// Bar height per month across all series.
    pub fn totals(&self) -> Vec<usize> {
        (0..self.months.len())
            .map(|i| self.series.iter().map(|s| s.counts[i]).sum())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedDataset {
    pub session_id: String,
    pub source: String,
    pub summary: LoadSummary,
    pub columns: Vec<ColumnOption>,
    pub plot: PlotSpec,
}

/// Raw bytes handed over by a source before decompression.
#[derive(Debug, Clone)]
pub struct SourcePayload {
    pub name: String,
    pub bytes: Vec<u8>,
}
