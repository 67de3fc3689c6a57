//! User intents and the effects they ask the async shell to run.

use tracing::debug;

use super::presenter::{ClearTicket, DashboardPresenter, SubmitTicket};
use super::upload::FileHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    AddFiles(Vec<FileHandle>),
    RemoveFile(usize),
    Submit,
    Cancel,
    BackToUpload,
    SelectTab(String),
    ExportReport,
    /// Ask to clear the server-side history; nothing is sent until confirmed.
    ClearHistory,
    ConfirmClearHistory,
    CancelClearHistory,
    DismissNotice,
}

/// What the shell must do after a dispatch.
#[must_use]
pub enum Dispatch {
    /// State changed synchronously; nothing else to run.
    Done,
    /// The action was refused (busy, validation, unknown tab). Any notice is
    /// already set on the presenter.
    Rejected,
    /// Send the analysis request and pass the completion to `finish_submit`.
    Analyze(SubmitTicket),
    /// Run `export_report` with the platform capture and sink.
    Export,
    /// Send the clear-history request and pass the completion to
    /// `finish_clear_history`.
    ClearHistory(ClearTicket),
    /// The dismissed notice asked for a fresh page (web only).
    Reload,
}

impl DashboardPresenter {
    pub fn dispatch(&mut self, action: UiAction) -> Dispatch {
        debug!(?action, "dispatch");
        match action {
            UiAction::AddFiles(files) => {
                self.add_files(files);
                Dispatch::Done
            }
            UiAction::RemoveFile(index) => {
                if self.remove_file(index) {
                    Dispatch::Done
                } else {
                    Dispatch::Rejected
                }
            }
            UiAction::Submit => match self.begin_submit() {
                Ok(ticket) => Dispatch::Analyze(ticket),
                Err(_) => Dispatch::Rejected,
            },
            UiAction::Cancel => {
                self.cancel();
                Dispatch::Done
            }
            UiAction::BackToUpload => {
                self.show_upload();
                Dispatch::Done
            }
            UiAction::SelectTab(id) => {
                if self.select_tab(&id) {
                    Dispatch::Done
                } else {
                    Dispatch::Rejected
                }
            }
            UiAction::ExportReport => {
                if self.is_busy() {
                    Dispatch::Rejected
                } else {
                    Dispatch::Export
                }
            }
            UiAction::ClearHistory => {
                if self.request_clear_history() {
                    Dispatch::Done
                } else {
                    Dispatch::Rejected
                }
            }
            UiAction::ConfirmClearHistory => {
                if !self.is_confirming_clear() {
                    return Dispatch::Rejected;
                }
                match self.begin_clear_history() {
                    Ok(ticket) => Dispatch::ClearHistory(ticket),
                    Err(_) => Dispatch::Rejected,
                }
            }
            UiAction::CancelClearHistory => {
                self.cancel_clear_history();
                Dispatch::Done
            }
            UiAction::DismissNotice => {
                if self.dismiss_notice() {
                    Dispatch::Reload
                } else {
                    Dispatch::Done
                }
            }
        }
    }
}
