//! Shared UI crate for Paddock: dashboard state, chart rendering, report export
//! and the Dioxus views used by the web and desktop launchers.

pub mod charts;
pub mod core;
pub mod dashboard;
pub mod i18n;
pub mod report;
pub mod views;

pub mod components {
    pub mod app_navbar;
    mod kpi_grid;
    mod notice_banner;
    mod section_panel;
    mod upload_panel;

    pub use app_navbar::AppNavbar;
    pub use kpi_grid::KpiGrid;
    pub use notice_banner::NoticeBanner;
    pub use section_panel::{SectionPanel, SectionTabs};
    pub use upload_panel::UploadPanel;
}

pub use crate::core::config::{DashboardConfig, FileKind};

/// Stylesheet shared by every launcher; inlined so packaged builds need no
/// asset directory.
pub const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/theme/main.css"
));
