//! Column specs and cell formatting for table widgets.

use std::cmp::Ordering;

use api::Row;
use serde_json::Value;

use crate::core::format;

/// Shown for a missing or null numeric cell.
pub const MISSING_NUMBER: &str = "N/A";
/// Shown for a missing or null text cell.
pub const MISSING_TEXT: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Text,
    Count,
    Number(usize),
    Currency,
    Percent,
}

impl CellFormat {
    fn placeholder(self) -> &'static str {
        match self {
            CellFormat::Text => MISSING_TEXT,
            _ => MISSING_NUMBER,
        }
    }

    fn is_numeric(self) -> bool {
        !matches!(self, CellFormat::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub header: &'static str,
    pub format: CellFormat,
    /// Overrides the format's placeholder for absent or null cells.
    pub missing: Option<&'static str>,
}

impl ColumnSpec {
    pub const fn new(key: &'static str, header: &'static str, format: CellFormat) -> Self {
        Self {
            key,
            header,
            format,
            missing: None,
        }
    }

    pub const fn missing_as(mut self, placeholder: &'static str) -> Self {
        self.missing = Some(placeholder);
        self
    }

    fn render(&self, value: Option<&Value>) -> String {
        match (value.filter(|v| !v.is_null()), self.missing) {
            (None, Some(placeholder)) => placeholder.to_string(),
            (value, _) => format_cell(value, self.format),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Display ordering applied when a table is bound. Rows lacking the key sort
/// last in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSort {
    pub key: &'static str,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub columns: &'static [ColumnSpec],
    pub sort: Option<RowSort>,
}

impl TableSpec {
    pub const fn new(columns: &'static [ColumnSpec]) -> Self {
        Self {
            columns,
            sort: None,
        }
    }

    pub const fn sorted_by(mut self, key: &'static str, order: SortOrder) -> Self {
        self.sort = Some(RowSort { key, order });
        self
    }
}

enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
}

fn sort_key<'a>(row: &'a Row, key: &str) -> Option<SortKey<'a>> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64().map(SortKey::Number),
        Value::String(s) => Some(match s.trim().parse::<f64>() {
            Ok(number) => SortKey::Number(number),
            Err(_) => SortKey::Text(s.as_str()),
        }),
        _ => None,
    }
}

fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    match (a, b) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    }
}

/// Row indices in display order. The rows themselves are left untouched.
fn display_order(rows: &[Row], sort: Option<RowSort>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    let Some(sort) = sort else {
        return order;
    };
    order.sort_by(|&a, &b| {
        match (sort_key(&rows[a], sort.key), sort_key(&rows[b], sort.key)) {
            (Some(x), Some(y)) => {
                let ordering = compare_keys(&x, &y);
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    order
}

/// A bound table: headers plus fully formatted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub headers: Vec<String>,
    /// Right-align flags per column (numeric columns).
    pub numeric: Vec<bool>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    pub fn bind(columns: &[ColumnSpec], rows: &[Row]) -> Self {
        Self::bind_ordered(columns, rows, (0..rows.len()).collect())
    }

    /// Bind `rows` through `spec`, applying its display sort.
    pub fn from_spec(spec: &TableSpec, rows: &[Row]) -> Self {
        Self::bind_ordered(spec.columns, rows, display_order(rows, spec.sort))
    }

    fn bind_ordered(columns: &[ColumnSpec], rows: &[Row], order: Vec<usize>) -> Self {
        Self {
            headers: columns.iter().map(|c| c.header.to_string()).collect(),
            numeric: columns.iter().map(|c| c.format.is_numeric()).collect(),
            rows: order
                .into_iter()
                .map(|idx| {
                    columns
                        .iter()
                        .map(|column| column.render(rows[idx].get(column.key)))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

pub fn format_cell(value: Option<&Value>, fmt: CellFormat) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return fmt.placeholder().to_string();
    };

    let formatter: fn(f64) -> String = match fmt {
        CellFormat::Text => return text_cell(value),
        CellFormat::Count => format::format_count,
        CellFormat::Currency => format::format_currency,
        CellFormat::Percent => format::format_percent,
        CellFormat::Number(decimals) => {
            return numeric(value)
                .map(|number| format::format_number(number, decimals))
                .unwrap_or_else(|| MISSING_NUMBER.to_string());
        }
    };

    numeric(value)
        .map(formatter)
        .unwrap_or_else(|| MISSING_NUMBER.to_string())
}

fn text_cell(value: &Value) -> String {
    match value {
        Value::String(s) if s.trim().is_empty() => MISSING_TEXT.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) | Value::Null => MISSING_TEXT.to_string(),
    }
}
