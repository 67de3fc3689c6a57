//! Dashboard state: upload queue, visual registry, rendering and the
//! presenter that ties them together.

pub mod actions;
pub mod kpi;
pub mod presenter;
pub mod registry;
pub mod render;
pub mod table;
pub mod tabs;
pub mod upload;
pub mod widgets;

use api::ApiError;
use thiserror::Error;

pub use actions::{Dispatch, UiAction};
pub use presenter::{ClearTicket, DashboardPresenter, SubmitCompletion, SubmitTicket};
pub use render::{RenderedDashboard, RenderedSection, Slot, SlotState};
pub use upload::{FileHandle, QueuedFile, UploadQueue};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UploadError {
    #[error("Please select at least {required} file(s) before analysing (currently {queued}).")]
    Validation { required: usize, queued: usize },
    #[error("Another operation is still running.")]
    Busy,
    #[error("{}", .0.user_message())]
    Api(ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn css_modifier(self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice--info",
            NoticeLevel::Warning => "notice--warning",
            NoticeLevel::Error => "notice--error",
        }
    }
}

/// A message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// The web shell reloads the page once this notice is dismissed.
    pub reload_on_dismiss: bool,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            reload_on_dismiss: false,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn then_reload(mut self) -> Self {
        self.reload_on_dismiss = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Upload,
    Dashboard,
}
