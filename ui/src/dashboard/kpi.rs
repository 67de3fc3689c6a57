//! KPI cards: the fixed set of headline metrics the dashboard knows how to show.

use api::AnalysisResult;

use crate::core::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiFormat {
    Count,
    Currency,
    Percent,
    Decimal,
}

impl KpiFormat {
    pub fn apply(self, value: f64) -> String {
        match self {
            KpiFormat::Count => format::format_count(value),
            KpiFormat::Currency => format::format_currency(value),
            KpiFormat::Percent => format::format_percent(value),
            KpiFormat::Decimal => format::format_number(value, 2),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KpiSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub format: KpiFormat,
    /// Colour the card by sign (profit, ROI).
    pub signed: bool,
}

const fn kpi(
    key: &'static str,
    label: &'static str,
    icon: &'static str,
    format: KpiFormat,
    signed: bool,
) -> KpiSpec {
    KpiSpec {
        key,
        label,
        icon,
        format,
        signed,
    }
}

/// Recognized KPI keys, in display order.
pub const KPI_SPECS: &[KpiSpec] = &[
    kpi("total_tips", "Total Tips", "🏇", KpiFormat::Count, false),
    kpi("total_tipsters", "Tipsters", "🧑", KpiFormat::Count, false),
    kpi("winners", "Winners", "🏆", KpiFormat::Count, false),
    kpi("strike_rate", "Strike Rate", "🎯", KpiFormat::Percent, false),
    kpi("total_staked", "Total Staked", "💷", KpiFormat::Currency, false),
    kpi("total_profit", "Profit/Loss", "📈", KpiFormat::Currency, true),
    kpi("roi", "ROI", "💹", KpiFormat::Percent, true),
    kpi("avg_odds", "Average Odds", "🎲", KpiFormat::Decimal, false),
    kpi("avg_bsp", "Average BSP", "📊", KpiFormat::Decimal, false),
    kpi("beat_bsp_pct", "Beat BSP", "⚡", KpiFormat::Percent, false),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
}

impl Tone {
    pub fn css_modifier(self) -> &'static str {
        match self {
            Tone::Neutral => "kpi-card--neutral",
            Tone::Positive => "kpi-card--positive",
            Tone::Negative => "kpi-card--negative",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub value: String,
    pub raw: f64,
    pub tone: Tone,
}

impl KpiCard {
    /// `Label: value`, as printed in the report KPI table.
    pub fn caption(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

/// Cards for every recognized key with a usable value. Unknown keys and
/// null values produce nothing.
pub fn build_cards(result: &AnalysisResult) -> Vec<KpiCard> {
    KPI_SPECS
        .iter()
        .filter_map(|spec| {
            let raw = result.kpi(spec.key)?;
            let tone = match (spec.signed, raw) {
                (false, _) => Tone::Neutral,
                (true, v) if v < 0.0 => Tone::Negative,
                (true, _) => Tone::Positive,
            };
            Some(KpiCard {
                key: spec.key,
                label: spec.label,
                icon: spec.icon,
                value: spec.format.apply(raw),
                raw,
                tone,
            })
        })
        .collect()
}
