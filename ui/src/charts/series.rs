//! Turns payload chart data into a drawable [`ChartModel`].
//!
//! Everything here borrows the payload and builds fresh vectors; display-only
//! reordering never touches the analysis result.

use api::{ChartData, NO_DATA_LABEL};

use super::palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    HorizontalBar { sort_ascending: bool },
    Line,
    Pie,
    Doughnut,
    GroupedBar,
    Tornado,
}

impl ChartKind {
    pub fn css_modifier(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::HorizontalBar { .. } => "hbar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Doughnut => "doughnut",
            ChartKind::GroupedBar => "grouped",
            ChartKind::Tornado => "tornado",
        }
    }
}

/// Axis captions, including units: `ROI (%)`, `Profit (Units)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisTitles {
    pub x: Option<&'static str>,
    pub y: Option<&'static str>,
}

impl AxisTitles {
    pub const NONE: AxisTitles = AxisTitles { x: None, y: None };

    pub const fn y(title: &'static str) -> Self {
        AxisTitles {
            x: None,
            y: Some(title),
        }
    }

    pub const fn xy(x: &'static str, y: &'static str) -> Self {
        AxisTitles {
            x: Some(x),
            y: Some(y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesModel {
    pub name: String,
    pub values: Vec<f64>,
    /// One colour per value.
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<SeriesModel>,
    pub axes: AxisTitles,
}

impl ChartModel {
    pub fn with_axes(mut self, axes: AxisTitles) -> Self {
        self.axes = axes;
        self
    }

    pub fn show_legend(&self) -> bool {
        self.series.len() > 1 || matches!(self.kind, ChartKind::Pie | ChartKind::Doughnut)
    }
}

/// Categories plus named value columns aligned to them.
struct Normalized {
    categories: Vec<String>,
    columns: Vec<(String, Vec<f64>)>,
}

fn normalize(data: &ChartData) -> Normalized {
    match data {
        ChartData::Series { labels, datasets } => {
            let keep: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, label)| label.as_str() != NO_DATA_LABEL)
                .map(|(idx, _)| idx)
                .collect();
            let categories = keep.iter().map(|&idx| labels[idx].clone()).collect();
            let columns = datasets
                .iter()
                .map(|set| {
                    let values = keep
                        .iter()
                        .map(|&idx| set.data.get(idx).copied().flatten().unwrap_or(0.0))
                        .collect();
                    (set.name.clone(), values)
                })
                .collect();
            Normalized {
                categories,
                columns,
            }
        }
        ChartData::Paired { left, right } => {
            let mut categories: Vec<String> = Vec::new();
            for label in left.labels.iter().chain(right.labels.iter()) {
                if label != NO_DATA_LABEL && !categories.contains(label) {
                    categories.push(label.clone());
                }
            }
            let column = |labels: &[String], data: &[Option<f64>]| -> Vec<f64> {
                categories
                    .iter()
                    .map(|category| {
                        labels
                            .iter()
                            .position(|label| label == category)
                            .and_then(|idx| data.get(idx).copied().flatten())
                            .unwrap_or(0.0)
                    })
                    .collect()
            };
            let columns = vec![
                (left.name.clone(), column(&left.labels, &left.data)),
                (right.name.clone(), column(&right.labels, &right.data)),
            ];
            Normalized {
                categories,
                columns,
            }
        }
    }
}

/// Whether `data` can be drawn as `kind`. Slice charts need at least one
/// positive value in their first dataset; every other kind draws whatever
/// passes the payload emptiness rule.
pub fn is_drawable(kind: ChartKind, data: &ChartData) -> bool {
    if data.is_empty() {
        return false;
    }
    match kind {
        ChartKind::Pie | ChartKind::Doughnut => normalize(data)
            .columns
            .first()
            .is_some_and(|(_, values)| values.iter().any(|value| *value > 0.0)),
        _ => true,
    }
}

/// Index order for an ascending sort on `values`. Stable, NaN-safe.
fn ascending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

fn reorder<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&idx| items[idx].clone()).collect()
}

/// Build the drawable model for `kind`. Callers run the emptiness guard first;
/// a chart with no columns still yields a model with no series.
pub fn build_model(kind: ChartKind, data: &ChartData) -> ChartModel {
    let Normalized {
        mut categories,
        mut columns,
    } = normalize(data);

    match kind {
        ChartKind::HorizontalBar {
            sort_ascending: true,
        } => {
            if let Some((_, first)) = columns.first() {
                let order = ascending_order(first);
                categories = reorder(&categories, &order);
                for (_, values) in columns.iter_mut() {
                    *values = reorder(values, &order);
                }
            }
        }
        ChartKind::Pie | ChartKind::Doughnut => columns.truncate(1),
        ChartKind::Tornado => {
            columns.truncate(2);
            if let Some((_, left)) = columns.first_mut() {
                for value in left.iter_mut() {
                    *value = -value.abs();
                }
            }
            if let Some((_, right)) = columns.get_mut(1) {
                for value in right.iter_mut() {
                    *value = value.abs();
                }
            }
        }
        _ => {}
    }

    let single = columns.len() == 1;
    let series = columns
        .into_iter()
        .enumerate()
        .map(|(idx, (name, values))| {
            let colors = values
                .iter()
                .enumerate()
                .map(|(point, value)| match kind {
                    ChartKind::Pie | ChartKind::Doughnut => palette::categorical(point),
                    ChartKind::Bar | ChartKind::HorizontalBar { .. } if single => {
                        palette::signed(*value)
                    }
                    ChartKind::Tornado => {
                        if idx == 0 {
                            palette::LOSS
                        } else {
                            palette::GAIN
                        }
                    }
                    _ => palette::categorical(idx),
                })
                .collect();
            SeriesModel {
                name,
                values,
                colors,
            }
        })
        .collect();

    ChartModel {
        kind,
        categories,
        series,
        axes: AxisTitles::NONE,
    }
}
