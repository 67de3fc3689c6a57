//! PDF report export of the rendered dashboard.

pub mod capture;
pub mod delivery;
pub mod fonts;
pub mod layout;
pub mod pdf;

use thiserror::Error;
use time::{macros::format_description, OffsetDateTime};
use tracing::info;

use crate::dashboard::render::{RenderedDashboard, SlotState};
use crate::dashboard::widgets::{WidgetBody, WidgetRegistry};

pub use capture::{capture_chart, ChartCapture, RasterImage, ResvgCapture, ThemeSwap};
pub use delivery::{report_filename, PlatformSink, ReportSink, PDF_MIME};
pub use layout::{layout, KpiLine, ReportContent, ReportItem, ReportLayout, ReportSection};

pub const REPORT_TITLE: &str = "Paddock Racing Report";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("There is no analysis to export yet. Upload files and run an analysis first.")]
    NothingToExport,
    #[error("Another operation is still running.")]
    Busy,
    #[error("Could not capture chart: {0}")]
    Capture(String),
    #[error("Could not build the PDF: {0}")]
    Pdf(String),
    #[error("Could not save the report: {0}")]
    Delivery(String),
}

fn generated_line(now: OffsetDateTime) -> String {
    let stamp = now
        .format(&format_description!(
            "[year]-[month]-[day] [hour]:[minute] UTC"
        ))
        .unwrap_or_default();
    format!("Generated {stamp}")
}

/// Collect KPI rows, chart captures and bound tables for every section that
/// is currently rendered. Charts are captured one at a time.
pub fn compose(
    rendered: &RenderedDashboard,
    widgets: &mut WidgetRegistry,
    capture: &mut dyn ChartCapture,
    now: OffsetDateTime,
) -> Result<ReportContent, ExportError> {
    let kpis = rendered
        .kpis
        .iter()
        .map(|card| KpiLine {
            label: card.label.to_string(),
            value: card.value.clone(),
            tone: card.tone,
        })
        .collect();

    let mut sections = Vec::with_capacity(rendered.sections.len());
    for section in &rendered.sections {
        let mut items = Vec::new();
        for slot in section.slots.iter().filter(|slot| slot.state == SlotState::Widget) {
            let Some(widget) = widgets.get_mut(slot.target_id) else {
                continue;
            };
            let item = match &mut widget.body {
                WidgetBody::Chart(chart) => ReportItem::Chart {
                    title: widget.title.to_string(),
                    image: capture_chart(chart, capture)?,
                },
                WidgetBody::Table(model) => ReportItem::Table {
                    title: widget.title.to_string(),
                    model: model.clone(),
                },
            };
            items.push(item);
        }
        sections.push(ReportSection {
            title: section.title.to_string(),
            items,
        });
    }

    Ok(ReportContent {
        title: REPORT_TITLE.to_string(),
        generated: generated_line(now),
        kpis,
        sections,
    })
}

/// Compose, lay out and serialize the report.
pub fn build_report(
    rendered: &RenderedDashboard,
    widgets: &mut WidgetRegistry,
    capture: &mut dyn ChartCapture,
    now: OffsetDateTime,
) -> Result<Vec<u8>, ExportError> {
    let content = compose(rendered, widgets, capture, now)?;
    let report = layout(&content);
    info!(
        pages = report.pages.len(),
        charts = report.images.len(),
        "report laid out"
    );
    let bytes = pdf::write_pdf(&report);
    if bytes.is_empty() {
        return Err(ExportError::Pdf("empty document".into()));
    }
    Ok(bytes)
}
