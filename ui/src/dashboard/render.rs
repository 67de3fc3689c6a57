//! Turns an analysis result into KPI cards, tabs and widgets.

use std::borrow::Cow;

use api::{rows_empty, AnalysisResult, ChartData, Row};
use tracing::debug;

use crate::charts::{build_model, is_drawable, ChartTheme};

use super::kpi::{build_cards, KpiCard};
use super::registry::{SectionSpec, Source, VisualDescriptor, VisualKind, SECTIONS};
use super::table::TableModel;
use super::tabs::{Tab, TabState};
use super::widgets::{ChartWidget, WidgetBody, WidgetRegistry};

/// A descriptor's dataset, borrowed from the payload where possible.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    Chart(&'a ChartData),
    Rows(Cow<'a, [Row]>),
}

impl Resolved<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            Resolved::Chart(chart) => chart.is_empty(),
            Resolved::Rows(rows) => rows_empty(rows),
        }
    }

    /// Emptiness refined by what the descriptor will draw.
    pub fn is_drawable(&self, kind: VisualKind) -> bool {
        match (self, kind) {
            (Resolved::Chart(chart), VisualKind::Chart(kind)) => is_drawable(kind, chart),
            _ => !self.is_empty(),
        }
    }
}

pub fn resolve(result: &AnalysisResult, source: Source) -> Option<Resolved<'_>> {
    match source {
        Source::Chart(key) => result.chart(key).map(Resolved::Chart),
        Source::Table(key) => result.table(key).map(|rows| Resolved::Rows(Cow::Borrowed(rows))),
        Source::Raw(key) => result.raw_rows(key).map(|rows| Resolved::Rows(Cow::Owned(rows))),
        Source::DailySummary => Some(Resolved::Rows(Cow::Borrowed(&result.daily_summary))),
    }
}

/// Emission guard. Used both to decide whether a section exists and whether a
/// slot gets a widget, so the two can never disagree.
pub fn qualifying<'a>(
    result: &'a AnalysisResult,
    descriptor: &VisualDescriptor,
) -> Option<Resolved<'a>> {
    resolve(result, descriptor.source).filter(|data| data.is_drawable(descriptor.kind))
}

pub fn section_qualifies(result: &AnalysisResult, section: &SectionSpec) -> bool {
    section
        .visuals
        .iter()
        .any(|descriptor| qualifying(result, descriptor).is_some())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Widget,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub target_id: &'static str,
    pub title: &'static str,
    pub state: SlotState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub id: &'static str,
    pub title: &'static str,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedDashboard {
    pub kpis: Vec<KpiCard>,
    pub sections: Vec<RenderedSection>,
}

impl RenderedDashboard {
    pub fn is_blank(&self) -> bool {
        self.kpis.is_empty() && self.sections.is_empty()
    }
}

fn widget_body(result: &AnalysisResult, descriptor: &VisualDescriptor) -> Option<WidgetBody> {
    let data = qualifying(result, descriptor)?;
    match (descriptor.kind, data) {
        (VisualKind::Chart(kind), Resolved::Chart(chart)) => Some(WidgetBody::Chart(ChartWidget {
            model: build_model(kind, chart).with_axes(descriptor.axes),
            theme: ChartTheme::Screen,
        })),
        (VisualKind::Table(spec), Resolved::Rows(rows)) => {
            Some(WidgetBody::Table(TableModel::from_spec(&spec, &rows)))
        }
        _ => None,
    }
}

/// Rebuild the whole dashboard for `result` against `sections`.
///
/// Every previously live widget is disposed first; the registry then holds
/// exactly the widgets for qualifying descriptors.
pub fn render_sections(
    result: &AnalysisResult,
    sections: &[SectionSpec],
    widgets: &mut WidgetRegistry,
    tabs: &mut TabState,
) -> RenderedDashboard {
    widgets.clear();

    let kpis = build_cards(result);
    let mut rendered = Vec::new();

    for section in sections {
        if !section_qualifies(result, section) {
            debug!(section = section.id, "skipping empty section");
            continue;
        }
        let slots = section
            .visuals
            .iter()
            .map(|descriptor| {
                let state = match widget_body(result, descriptor) {
                    Some(body) => {
                        widgets.set(descriptor.target_id, descriptor.title, body);
                        SlotState::Widget
                    }
                    None => SlotState::NoData,
                };
                Slot {
                    target_id: descriptor.target_id,
                    title: descriptor.title,
                    state,
                }
            })
            .collect();
        rendered.push(RenderedSection {
            id: section.id,
            title: section.title,
            slots,
        });
    }

    tabs.reset(
        rendered
            .iter()
            .map(|section| Tab {
                id: section.id,
                title: section.title,
            })
            .collect(),
    );

    RenderedDashboard {
        kpis,
        sections: rendered,
    }
}

pub fn render_dashboard(
    result: &AnalysisResult,
    widgets: &mut WidgetRegistry,
    tabs: &mut TabState,
) -> RenderedDashboard {
    render_sections(result, SECTIONS, widgets, tabs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{palette, ChartKind};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> AnalysisResult {
        serde_json::from_value(value).unwrap()
    }

    fn all_descriptors() -> impl Iterator<Item = &'static VisualDescriptor> {
        SECTIONS.iter().flat_map(|section| section.visuals.iter())
    }

    fn render(result: &AnalysisResult) -> (RenderedDashboard, WidgetRegistry, TabState) {
        let mut widgets = WidgetRegistry::new();
        let mut tabs = TabState::default();
        let rendered = render_dashboard(result, &mut widgets, &mut tabs);
        (rendered, widgets, tabs)
    }

    fn no_data() -> serde_json::Value {
        json!({ "labels": ["No Data Available"], "datasets": [] })
    }

    /// Shape of a full `/analyze/` response: every chart key present, the
    /// daily summary at the top level, no `kpis`/`tables`/`raw_data`.
    fn service_payload() -> AnalysisResult {
        payload(json!({
            "daily_summary": [
                { "Date": "2024-03-01", "Bets Placed": 3, "Units Staked": 3, "Units Returned": 4.5,
                  "ROI %": 50.0, "Win Rate %": 33.333, "Avg Odds": 5.1, "CLV %": 0,
                  "Drifters %": 66.667, "Steamers %": 33.333 },
                { "Date": "2024-03-02", "Bets Placed": 2, "Units Staked": 2, "Units Returned": 0.0,
                  "ROI %": -100.0, "Win Rate %": 0.0, "Avg Odds": 7.25, "CLV %": 0,
                  "Drifters %": 50.0, "Steamers %": 50.0 }
            ],
            "charts": {
                "cumulative_profit": { "labels": ["2024-02-29", "2024-03-01", "2024-03-02"],
                    "datasets": [{ "name": "TipsterA", "data": [0, 1.5, -0.5] }] },
                "rolling_roi": { "labels": ["2024-02-29", "2024-03-01", "2024-03-02"],
                    "datasets": [{ "name": "TipsterA", "data": [0, 50, -10] }] },
                "roi_by_tipster": { "labels": ["TipsterA"], "datasets": [{ "name": "ROI", "data": [-10.0] }] },
                "roi_by_odds": { "labels": ["<3", "3-6", "6+"], "datasets": [{ "name": "ROI", "data": [5, -20, 40] }] },
                "price_movement_histogram": { "labels": ["-20%", "0%", "20%"],
                    "datasets": [{ "name": "Count", "data": [1, 2, 2] }] },
                "clv_trend": { "labels": ["2024-03-01", "2024-03-02"], "data": [1.2, -0.4] },
                "win_rate_vs_field_size": { "labels": ["5-8", "9-12"],
                    "datasets": [{ "name": "Win Rate", "data": [25, 10] }] }
            }
        }))
    }

    #[test]
    fn full_service_payload_fills_every_slot() {
        let result = service_payload();
        let (rendered, widgets, tabs) = render(&result);

        assert_eq!(widgets.len(), 8);
        for descriptor in all_descriptors().filter(|d| !matches!(
            d.source,
            Source::Table(_) | Source::Raw(_)
        )) {
            assert!(widgets.contains(descriptor.target_id), "missing {}", descriptor.target_id);
        }
        let ids: Vec<_> = rendered.sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["summary", "performance", "market"]);
        assert!(tabs.is_active("summary"));
        assert!(rendered.kpis.is_empty());
    }

    #[test]
    fn daily_summary_shows_newest_day_first() {
        let result = service_payload();
        let snapshot = result.clone();
        let (_, widgets, _) = render(&result);
        let WidgetBody::Table(table) = &widgets.get("table-daily-summary").unwrap().body else {
            panic!("expected table");
        };
        assert_eq!(table.headers[0], "Date");
        assert_eq!(table.headers.len(), 10);
        assert_eq!(table.rows[0][0], "2024-03-02");
        assert_eq!(table.rows[1][5], "33.33");
        assert_eq!(result, snapshot);
    }

    #[test]
    fn charts_pick_up_axis_captions() {
        let (_, widgets, _) = render(&service_payload());
        let WidgetBody::Chart(chart) = &widgets.get("chart-win-rate-vs-field-size").unwrap().body
        else {
            panic!("expected chart");
        };
        assert_eq!(chart.model.axes.x, Some("Field Size"));
        assert_eq!(chart.model.axes.y, Some("Win Rate (%)"));
        assert!(chart.svg(640, 320).contains("Win Rate (%)"));

        let WidgetBody::Chart(clv) = &widgets.get("chart-clv-trend").unwrap().body else {
            panic!("expected chart");
        };
        assert_eq!(clv.model.series[0].name, "Value");
    }

    #[test]
    fn fresh_history_renders_nothing() {
        let result = payload(json!({
            "daily_summary": [],
            "charts": {
                "cumulative_profit": no_data(), "rolling_roi": no_data(), "roi_by_tipster": no_data(),
                "roi_by_odds": no_data(), "price_movement_histogram": no_data(),
                "clv_trend": no_data(), "win_rate_vs_field_size": no_data()
            }
        }));
        let (rendered, widgets, tabs) = render(&result);
        assert!(widgets.is_empty());
        assert!(rendered.is_blank());
        assert!(tabs.active().is_none());
    }

    #[test]
    fn spec_example_renders_one_card_and_one_bar_chart() {
        let result = payload(json!({
            "kpis": { "total_tips": 42 },
            "charts": {
                "roi_by_tipster": {
                    "labels": ["A", "B"],
                    "datasets": [{ "name": "x", "data": [10, -5] }]
                }
            },
            "tables": {}
        }));
        let (rendered, widgets, _) = render(&result);

        assert_eq!(rendered.kpis.len(), 1);
        assert_eq!(rendered.kpis[0].caption(), "Total Tips: 42");
        assert_eq!(widgets.len(), 1);

        let widget = widgets.get("chart-roi-by-tipster").unwrap();
        let WidgetBody::Chart(chart) = &widget.body else {
            panic!("expected a chart widget");
        };
        assert_eq!(chart.model.categories.len(), 2);
        assert_eq!(chart.model.series[0].colors[1], palette::LOSS);
    }

    #[test]
    fn widget_exists_iff_dataset_non_empty() {
        let mut result = service_payload();
        if let Some(charts) = result.charts.as_mut() {
            charts.insert("roi_by_odds".into(), serde_json::from_value(no_data()).unwrap());
            charts.remove("clv_trend");
        }
        result.tables = Some([("tipster_summary".to_string(), Vec::new())].into());
        let (rendered, widgets, _) = render(&result);

        for descriptor in all_descriptors() {
            let non_empty = resolve(&result, descriptor.source)
                .map(|data| !data.is_empty())
                .unwrap_or(false);
            assert_eq!(
                widgets.contains(descriptor.target_id),
                non_empty,
                "target {}",
                descriptor.target_id
            );
        }

        for section in &rendered.sections {
            for slot in &section.slots {
                assert_eq!(
                    slot.state == SlotState::Widget,
                    widgets.contains(slot.target_id)
                );
            }
        }
    }

    #[test]
    fn sentinel_chart_gets_placeholder_slot() {
        let mut result = service_payload();
        if let Some(charts) = result.charts.as_mut() {
            charts.insert("roi_by_odds".into(), serde_json::from_value(no_data()).unwrap());
        }
        let (rendered, widgets, _) = render(&result);

        let performance = rendered.sections.iter().find(|s| s.id == "performance").unwrap();
        let slot = performance
            .slots
            .iter()
            .find(|slot| slot.target_id == "chart-roi-by-odds")
            .unwrap();
        assert_eq!(slot.state, SlotState::NoData);
        assert!(!widgets.contains("chart-roi-by-odds"));
    }

    #[test]
    fn missing_top_level_sections_render_nothing() {
        let result = payload(json!({ "kpis": { "roi": 4.2 } }));
        let (rendered, widgets, _) = render(&result);
        assert_eq!(rendered.kpis.len(), 1);
        assert!(rendered.sections.is_empty());
        assert!(widgets.is_empty());
    }

    #[test]
    fn rerender_keeps_one_instance_per_target() {
        let mut widgets = WidgetRegistry::new();
        let mut tabs = TabState::default();
        render_dashboard(&service_payload(), &mut widgets, &mut tabs);
        let first = widgets.len();
        render_dashboard(&service_payload(), &mut widgets, &mut tabs);
        assert_eq!(widgets.len(), first);
        assert_eq!(widgets.disposed_count(), first as u64);

        let second = payload(json!({
            "charts": { "rolling_roi": { "labels": ["w1"], "datasets": [{ "name": "ROI", "data": [1.0] }] } }
        }));
        render_dashboard(&second, &mut widgets, &mut tabs);
        assert_eq!(widgets.len(), 1);
        assert!(widgets.contains("chart-rolling-roi"));
        assert!(!widgets.contains("chart-roi-by-tipster"));
    }

    const SORTED_SECTIONS: &[SectionSpec] = &[SectionSpec {
        id: "mix",
        title: "Mix",
        visuals: &[
            VisualDescriptor {
                kind: VisualKind::Chart(ChartKind::HorizontalBar {
                    sort_ascending: true,
                }),
                source: Source::Chart("drift"),
                title: "Drift",
                target_id: "chart-drift",
                axes: crate::charts::AxisTitles::NONE,
            },
            VisualDescriptor {
                kind: VisualKind::Chart(ChartKind::Pie),
                source: Source::Chart("share"),
                title: "Share",
                target_id: "chart-share",
                axes: crate::charts::AxisTitles::NONE,
            },
        ],
    }];

    #[test]
    fn rendering_does_not_mutate_payload() {
        let result = payload(json!({
            "charts": {
                "drift": {
                    "labels": ["Ascot", "York", "Ayr"],
                    "datasets": [{ "name": "Drift", "data": [0.4, -0.2, 0.1] }]
                }
            }
        }));
        let snapshot = result.clone();
        let mut widgets = WidgetRegistry::new();
        let mut tabs = TabState::default();
        render_sections(&result, SORTED_SECTIONS, &mut widgets, &mut tabs);
        assert_eq!(result, snapshot);

        let WidgetBody::Chart(chart) = &widgets.get("chart-drift").unwrap().body else {
            panic!("expected chart");
        };
        assert_eq!(chart.model.categories, vec!["York", "Ayr", "Ascot"]);
    }

    #[test]
    fn pie_without_positive_values_gets_placeholder() {
        let result = payload(json!({
            "charts": {
                "drift": { "labels": ["Ascot"], "datasets": [{ "name": "Drift", "data": [1.0] }] },
                "share": { "labels": ["Flat", "Hurdle"], "datasets": [{ "name": "P/L", "data": [-4, 0] }] }
            }
        }));
        let mut widgets = WidgetRegistry::new();
        let mut tabs = TabState::default();
        let rendered = render_sections(&result, SORTED_SECTIONS, &mut widgets, &mut tabs);
        assert!(!widgets.contains("chart-share"));
        assert_eq!(rendered.sections[0].slots[1].state, SlotState::NoData);
    }

    #[test]
    fn raw_rows_bind_to_recent_tips_table() {
        let result = payload(json!({
            "raw_data": { "recent_tips": [{ "horse": "Desert Orchid", "odds": 4.5 }] }
        }));
        let (rendered, widgets, _) = render(&result);
        assert_eq!(rendered.sections[0].id, "details");
        let WidgetBody::Table(table) = &widgets.get("table-recent-tips").unwrap().body else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0][2], "Desert Orchid");
        assert_eq!(table.rows[0][4], "4.50");
        assert_eq!(table.rows[0][5], "N/A");
    }
}
