use crate::core::{ColumnOption, MetadataTable, PlotSpec, Series};
use crate::utils::error::{ExplorerError, Result};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const CATEGORY_LIMIT: usize = 19;
pub const MIN_UNIQUE_VALUES: usize = 3;
pub const OTHER_CATEGORY: &str = "other";
pub const MISSING_CATEGORY: &str = "(missing)";

/// The 20-color categorical palette; a stack of `n` series uses the first `n`.
pub const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

const BAR_COLOR: &str = "#1f77b4";

/// Columns worth coloring by, fewest distinct values first.
pub fn column_options(table: &MetadataTable, min_unique: usize) -> Vec<ColumnOption> {
    let mut options: Vec<ColumnOption> = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let unique: HashSet<&str> = (0..table.valid_rows())
                .map(|row| table.cell(row, index))
                .filter(|value| !value.is_empty())
                .collect();
            ColumnOption::new(name.clone(), unique.len())
        })
        .filter(|option| option.unique_count >= min_unique)
        .collect();

    options.sort_by_key(|option| option.unique_count);
    options
}

/// Selector entries: the blank default followed by [`column_options`].
pub fn selector_options(table: &MetadataTable, min_unique: usize) -> Vec<ColumnOption> {
    std::iter::once(ColumnOption::none())
        .chain(column_options(table, min_unique))
        .collect()
}

/// Distinct months in chronological order.
pub fn sorted_months(table: &MetadataTable) -> Vec<String> {
    // Zero-padded YYYY-MM sorts lexically in calendar order.
    let unique: HashSet<&String> = table.months.iter().collect();
    let mut months: Vec<String> = unique.into_iter().cloned().collect();
    months.sort();
    months
}

pub fn per_month(table: &MetadataTable) -> PlotSpec {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for month in &table.months {
        *counts.entry(month.as_str()).or_default() += 1;
    }

    PlotSpec {
        title: "Sequences per month".to_string(),
        months: counts.keys().map(|m| m.to_string()).collect(),
        series: vec![Series {
            name: "count".to_string(),
            color: BAR_COLOR.to_string(),
            counts: counts.values().copied().collect(),
        }],
        stacked: false,
        tooltip: "@x (n=@top)".to_string(),
    }
}

fn category_at(table: &MetadataTable, row: usize, column: usize) -> &str {
    match table.cell(row, column) {
        "" => MISSING_CATEGORY,
        value => value,
    }
}

/// Per-month counts split by the values of `column`. The `limit` most common
/// values keep their own series; the rest are folded into `other`.
pub fn stacked_per_month(table: &MetadataTable, column: &str, limit: usize) -> Result<PlotSpec> {
    let index = table
        .column_index(column)
        .ok_or_else(|| ExplorerError::UnknownColumn {
            column: column.to_string(),
        })?;

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for row in 0..table.valid_rows() {
        *frequency.entry(category_at(table, row, index)).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let top: HashSet<&str> = ranked.iter().take(limit).map(|(value, _)| *value).collect();

    let months = sorted_months(table);
    let month_index: HashMap<&str, usize> = months
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, Vec<usize>> = HashMap::new();
    for row in 0..table.valid_rows() {
        let value = category_at(table, row, index);
        let category = if top.contains(value) {
            value
        } else {
            OTHER_CATEGORY
        };
        let bucket = counts.entry(category).or_insert_with(|| {
            order.push(category);
            vec![0; months.len()]
        });
        bucket[month_index[table.months[row].as_str()]] += 1;
    }

    let series = order
        .iter()
        .enumerate()
        .map(|(i, category)| Series {
            name: category.to_string(),
            color: CATEGORY20[i % CATEGORY20.len()].to_string(),
            counts: counts.remove(category).unwrap_or_default(),
        })
        .collect();

    Ok(PlotSpec {
        title: format!("Sequences per month colored by '{}'", column),
        months,
        series,
        stacked: true,
        tooltip: "$name @time (n=@$name)".to_string(),
    })
}
