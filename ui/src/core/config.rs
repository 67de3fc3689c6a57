//! Session configuration handed to the dashboard by the platform launcher.

use serde::{Deserialize, Serialize};

/// Upload formats the analysis service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FileKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "xlsx" => Some(FileKind::Xlsx),
            "xls" => Some(FileKind::Xls),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            FileKind::Csv => "text/csv",
            FileKind::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            FileKind::Xls => "application/vnd.ms-excel",
        }
    }

    /// Value for an `<input type="file" accept=...>` attribute.
    pub fn accept_attr(kinds: &[FileKind]) -> String {
        kinds
            .iter()
            .map(|kind| match kind {
                FileKind::Csv => ".csv",
                FileKind::Xlsx => ".xlsx",
                FileKind::Xls => ".xls",
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Origin of the analysis service, without a trailing path.
    pub api_base: String,
    /// Files required before submit is enabled.
    pub min_files: usize,
    pub accepted: Vec<FileKind>,
    /// Report filenames are `{report_prefix}-{timestamp}.pdf`.
    pub report_prefix: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            min_files: 1,
            accepted: vec![FileKind::Csv, FileKind::Xlsx, FileKind::Xls],
            report_prefix: "paddock-report".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn accepts(&self, name: &str) -> Option<FileKind> {
        FileKind::from_name(name).filter(|kind| self.accepted.contains(kind))
    }
}
