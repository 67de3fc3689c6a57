//! Static declaration of every chart and table the dashboard can show,
//! grouped by tab.
//!
//! Chart keys, titles and axis captions follow what `POST /analyze/` sends:
//! seven charts under `charts` plus the top-level `daily_summary` rows.

use crate::charts::{AxisTitles, ChartKind};

use super::table::{CellFormat, ColumnSpec, SortOrder, TableSpec, MISSING_NUMBER};

/// Where a visual's data lives in the analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Chart(&'static str),
    Table(&'static str),
    Raw(&'static str),
    DailySummary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualKind {
    Chart(ChartKind),
    Table(TableSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualDescriptor {
    pub kind: VisualKind,
    pub source: Source,
    pub title: &'static str,
    pub target_id: &'static str,
    pub axes: AxisTitles,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub visuals: &'static [VisualDescriptor],
}

const fn chart(
    kind: ChartKind,
    key: &'static str,
    title: &'static str,
    target_id: &'static str,
    axes: AxisTitles,
) -> VisualDescriptor {
    VisualDescriptor {
        kind: VisualKind::Chart(kind),
        source: Source::Chart(key),
        title,
        target_id,
        axes,
    }
}

const fn table(
    spec: TableSpec,
    source: Source,
    title: &'static str,
    target_id: &'static str,
) -> VisualDescriptor {
    VisualDescriptor {
        kind: VisualKind::Table(spec),
        source,
        title,
        target_id,
        axes: AxisTitles::NONE,
    }
}

pub const DAILY_SUMMARY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("Date", "Date", CellFormat::Text).missing_as(MISSING_NUMBER),
    ColumnSpec::new("Bets Placed", "Bets Placed", CellFormat::Count),
    ColumnSpec::new("Units Staked", "Units Staked", CellFormat::Count),
    ColumnSpec::new("Units Returned", "Units Returned", CellFormat::Number(2)),
    ColumnSpec::new("ROI %", "ROI %", CellFormat::Number(2)),
    ColumnSpec::new("Win Rate %", "Win Rate %", CellFormat::Number(2)),
    ColumnSpec::new("Avg Odds", "Avg Odds", CellFormat::Number(2)),
    ColumnSpec::new("CLV %", "CLV %", CellFormat::Number(2)),
    ColumnSpec::new("Drifters %", "Drifters %", CellFormat::Number(2)),
    ColumnSpec::new("Steamers %", "Steamers %", CellFormat::Number(2)),
];

pub const TIPSTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("tipster", "Tipster", CellFormat::Text),
    ColumnSpec::new("tips", "Tips", CellFormat::Count),
    ColumnSpec::new("winners", "Winners", CellFormat::Count),
    ColumnSpec::new("strike_rate", "Strike %", CellFormat::Percent),
    ColumnSpec::new("avg_odds", "Avg Odds", CellFormat::Number(2)),
    ColumnSpec::new("profit", "P/L", CellFormat::Currency),
    ColumnSpec::new("roi", "ROI", CellFormat::Percent),
];

pub const RECENT_TIP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("date", "Date", CellFormat::Text),
    ColumnSpec::new("tipster", "Tipster", CellFormat::Text),
    ColumnSpec::new("horse", "Horse", CellFormat::Text),
    ColumnSpec::new("course", "Course", CellFormat::Text),
    ColumnSpec::new("odds", "Odds", CellFormat::Number(2)),
    ColumnSpec::new("bsp", "BSP", CellFormat::Number(2)),
    ColumnSpec::new("result", "Result", CellFormat::Text),
    ColumnSpec::new("profit", "P/L", CellFormat::Currency),
];

const ROI_PCT: AxisTitles = AxisTitles::y("ROI (%)");

pub const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "summary",
        title: "Daily Summary",
        visuals: &[table(
            TableSpec::new(DAILY_SUMMARY_COLUMNS).sorted_by("Date", SortOrder::Descending),
            Source::DailySummary,
            "Daily Summary",
            "table-daily-summary",
        )],
    },
    SectionSpec {
        id: "performance",
        title: "Performance",
        visuals: &[
            chart(
                ChartKind::Line,
                "cumulative_profit",
                "Cumulative Profit Over Time",
                "chart-cumulative-profit",
                AxisTitles::y("Profit (Units)"),
            ),
            chart(
                ChartKind::Line,
                "rolling_roi",
                "30-Day Rolling ROI Over Time",
                "chart-rolling-roi",
                ROI_PCT,
            ),
            chart(
                ChartKind::Bar,
                "roi_by_tipster",
                "ROI by Tipster",
                "chart-roi-by-tipster",
                ROI_PCT,
            ),
            chart(
                ChartKind::Bar,
                "roi_by_odds",
                "ROI by Odds Band",
                "chart-roi-by-odds",
                ROI_PCT,
            ),
        ],
    },
    SectionSpec {
        id: "market",
        title: "Market",
        visuals: &[
            chart(
                ChartKind::Bar,
                "price_movement_histogram",
                "Price Movement Distribution",
                "chart-price-movement-histogram",
                AxisTitles::xy("Price Movement (%)", "Count"),
            ),
            chart(
                ChartKind::Line,
                "clv_trend",
                "CLV Trend Over Time",
                "chart-clv-trend",
                AxisTitles::y("CLV (%)"),
            ),
            chart(
                ChartKind::Bar,
                "win_rate_vs_field_size",
                "Win Rate vs Field Size",
                "chart-win-rate-vs-field-size",
                AxisTitles::xy("Field Size", "Win Rate (%)"),
            ),
        ],
    },
    SectionSpec {
        id: "details",
        title: "Details",
        visuals: &[
            table(
                TableSpec::new(TIPSTER_COLUMNS),
                Source::Table("tipster_summary"),
                "Tipster Summary",
                "table-tipster-summary",
            ),
            table(
                TableSpec::new(RECENT_TIP_COLUMNS),
                Source::Raw("recent_tips"),
                "Recent Tips",
                "table-recent-tips",
            ),
        ],
    },
];
