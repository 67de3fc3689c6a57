//! Payload returned by `POST /analyze/`.
//!
//! Every top-level section is optional. The service omits sections it could not
//! compute, and the dashboard treats an absent section exactly like an empty
//! one.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel label the service emits when a chart has nothing to plot.
pub const NO_DATA_LABEL: &str = "No Data Available";

/// Dataset name given to a flat `{labels, data}` series.
pub const FLAT_SERIES_NAME: &str = "Value";

/// One table row: column name to scalar.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub kpis: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub charts: Option<BTreeMap<String, ChartData>>,
    #[serde(default)]
    pub tables: Option<BTreeMap<String, Vec<Row>>>,
    #[serde(default)]
    pub raw_data: BTreeMap<String, serde_json::Value>,
    /// One row per calendar day, sent at the top level next to `charts`.
    #[serde(default)]
    pub daily_summary: Vec<Row>,
}

impl AnalysisResult {
    /// KPI value when present, non-null and finite.
    pub fn kpi(&self, key: &str) -> Option<f64> {
        self.kpis
            .get(key)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }

    pub fn chart(&self, key: &str) -> Option<&ChartData> {
        self.charts.as_ref()?.get(key)
    }

    pub fn table(&self, key: &str) -> Option<&[Row]> {
        self.tables.as_ref()?.get(key).map(Vec::as_slice)
    }

    /// Rows stored under `raw_data[key]`. Entries that are not arrays of
    /// objects resolve to `None`; non-object array items are skipped.
    pub fn raw_rows(&self, key: &str) -> Option<Vec<Row>> {
        let items = self.raw_data.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, alias = "label")]
    pub name: String,
    #[serde(default)]
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSide {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<Option<f64>>,
}

impl PairedSide {
    fn usable_labels(&self) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|label| *label != NO_DATA_LABEL)
    }
}

/// Chart series as sent by the service.
///
/// `Paired` covers the two-sided charts (steamers vs drifters and friends)
/// where each side carries its own category list. A flat `{labels, data}`
/// series is read as a single dataset named [`FLAT_SERIES_NAME`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Paired {
        left: PairedSide,
        right: PairedSide,
    },
    Series {
        #[serde(default)]
        labels: Vec<String>,
        #[serde(default)]
        datasets: Vec<Dataset>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChartWire {
    Paired {
        left: PairedSide,
        right: PairedSide,
    },
    Series {
        #[serde(default)]
        labels: Vec<String>,
        #[serde(default)]
        datasets: Option<Vec<Dataset>>,
        #[serde(default)]
        data: Option<Vec<Option<f64>>>,
    },
}

impl From<ChartWire> for ChartData {
    fn from(wire: ChartWire) -> Self {
        match wire {
            ChartWire::Paired { left, right } => ChartData::Paired { left, right },
            ChartWire::Series {
                labels,
                datasets,
                data,
            } => {
                let datasets = match (datasets, data) {
                    (Some(sets), _) if !sets.is_empty() => sets,
                    (_, Some(data)) => vec![Dataset {
                        name: FLAT_SERIES_NAME.to_string(),
                        data,
                    }],
                    (sets, None) => sets.unwrap_or_default(),
                };
                ChartData::Series { labels, datasets }
            }
        }
    }
}

impl<'de> Deserialize<'de> for ChartData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ChartWire::deserialize(deserializer).map(ChartData::from)
    }
}

impl ChartData {
    /// Shared emptiness rule. A chart is drawable only when it has at least one
    /// real category and at least one value to put against it.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Series { labels, datasets } => {
                let has_label = labels.iter().any(|label| label != NO_DATA_LABEL);
                let has_value = datasets
                    .iter()
                    .any(|set| set.data.iter().any(Option::is_some));
                !(has_label && has_value)
            }
            ChartData::Paired { left, right } => {
                left.usable_labels().next().is_none() && right.usable_labels().next().is_none()
            }
        }
    }
}

/// Shared emptiness rule for row sequences.
pub fn rows_empty(rows: &[Row]) -> bool {
    rows.is_empty()
}
