//! Dashboard presenter: owns the session state and runs the upload, render,
//! export and clear-history flows.
//!
//! Async work is split into `begin_*` (synchronous, takes the busy guard),
//! a ticket that performs the request without borrowing the presenter, and
//! `finish_*` which applies the outcome. The Dioxus shell keeps the presenter
//! in a signal and only writes to it before and after the await.

use api::{AnalysisBackend, AnalysisResult, ApiError, UploadFile};
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::core::busy::{BusyFlag, BusyGuard};
use crate::core::config::DashboardConfig;
use crate::report::{self, ChartCapture, ExportError, ReportSink};

use super::render::{render_dashboard, RenderedDashboard};
use super::tabs::TabState;
use super::upload::{AddReport, FileHandle, UploadQueue};
use super::widgets::WidgetRegistry;
use super::{Notice, UploadError, View};

/// An analysis request that has passed validation and holds the busy flag.
#[must_use = "a ticket holds the busy flag until sent or dropped"]
pub struct SubmitTicket {
    files: Vec<UploadFile>,
    registration: AbortRegistration,
    guard: BusyGuard,
}

impl SubmitTicket {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Run the request. Aborting through the presenter resolves it as
    /// `ApiError::Cancelled`.
    pub async fn send(self, backend: &dyn AnalysisBackend) -> SubmitCompletion {
        let SubmitTicket {
            files,
            registration,
            guard,
        } = self;
        let outcome = Abortable::new(backend.analyze(files), registration)
            .await
            .unwrap_or(Err(ApiError::Cancelled));
        SubmitCompletion { outcome, guard }
    }
}

pub struct SubmitCompletion {
    outcome: Result<AnalysisResult, ApiError>,
    guard: BusyGuard,
}

#[must_use = "a ticket holds the busy flag until sent or dropped"]
pub struct ClearTicket {
    guard: BusyGuard,
}

impl ClearTicket {
    pub async fn send(self, backend: &dyn AnalysisBackend) -> ClearCompletion {
        let outcome = backend.clear_history().await;
        ClearCompletion {
            outcome,
            guard: self.guard,
        }
    }
}

pub struct ClearCompletion {
    outcome: Result<String, ApiError>,
    guard: BusyGuard,
}

pub struct DashboardPresenter {
    config: DashboardConfig,
    queue: UploadQueue,
    analysis: Option<AnalysisResult>,
    rendered: RenderedDashboard,
    widgets: WidgetRegistry,
    tabs: TabState,
    view: View,
    busy: BusyFlag,
    inflight: Option<AbortHandle>,
    notice: Option<Notice>,
    confirming_clear: bool,
}

impl DashboardPresenter {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            queue: UploadQueue::default(),
            analysis: None,
            rendered: RenderedDashboard::default(),
            widgets: WidgetRegistry::new(),
            tabs: TabState::default(),
            view: View::Upload,
            busy: BusyFlag::new(),
            inflight: None,
            notice: None,
            confirming_clear: false,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn rendered(&self) -> &RenderedDashboard {
        &self.rendered
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn tabs(&self) -> &TabState {
        &self.tabs
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn is_submitting(&self) -> bool {
        self.inflight.is_some()
    }

    /// Drop the current notice. Returns whether it asked for a reload.
    pub fn dismiss_notice(&mut self) -> bool {
        self.notice
            .take()
            .is_some_and(|notice| notice.reload_on_dismiss)
    }

    // ---- upload ----

    pub fn add_files(&mut self, files: Vec<FileHandle>) -> AddReport {
        let report = self.queue.add_files(files, &self.config);
        if !report.rejected.is_empty() {
            self.notice = Some(Notice::warning(format!(
                "Unsupported file type skipped: {}",
                report.rejected.join(", ")
            )));
        } else if !report.duplicates.is_empty() {
            self.notice = Some(Notice::warning(format!(
                "Already queued: {}",
                report.duplicates.join(", ")
            )));
        }
        report
    }

    pub fn remove_file(&mut self, index: usize) -> bool {
        self.queue.remove_file(index).is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.busy.is_busy() && self.queue.meets_minimum(&self.config)
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket, UploadError> {
        // Surfaced inline by the disabled submit button, not as a notice.
        if !self.queue.meets_minimum(&self.config) {
            return Err(UploadError::Validation {
                required: self.config.min_files.max(1),
                queued: self.queue.len(),
            });
        }
        let guard = self.busy.try_acquire().ok_or(UploadError::Busy)?;
        let (handle, registration) = AbortHandle::new_pair();
        self.inflight = Some(handle);
        self.notice = None;

        let files = self.queue.to_upload();
        info!(files = files.len(), "submitting files for analysis");
        Ok(SubmitTicket {
            files,
            registration,
            guard,
        })
    }

    pub fn finish_submit(&mut self, completion: SubmitCompletion) -> Result<(), UploadError> {
        let SubmitCompletion { outcome, guard } = completion;
        self.inflight = None;
        let applied = match outcome {
            Ok(result) => {
                info!("analysis finished");
                self.populate_dashboard(result);
                Ok(())
            }
            Err(ApiError::Cancelled) => {
                info!("analysis cancelled");
                Err(UploadError::Api(ApiError::Cancelled))
            }
            Err(err) => {
                warn!(error = %err, "analysis failed");
                self.notice = Some(Notice::error(err.user_message()));
                Err(UploadError::Api(err))
            }
        };
        drop(guard);
        applied
    }

    pub async fn submit(&mut self, backend: &dyn AnalysisBackend) -> Result<(), UploadError> {
        let ticket = self.begin_submit()?;
        let completion = ticket.send(backend).await;
        self.finish_submit(completion)
    }

    /// Abort the in-flight analysis request, if any.
    pub fn cancel(&mut self) -> bool {
        match self.inflight.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn show_upload(&mut self) {
        self.cancel();
        self.view = View::Upload;
    }

    // ---- render ----

    /// Replace whatever is on screen with `result`.
    pub fn populate_dashboard(&mut self, result: AnalysisResult) {
        self.rendered = render_dashboard(&result, &mut self.widgets, &mut self.tabs);
        self.analysis = Some(result);
        self.view = View::Dashboard;
    }

    pub fn select_tab(&mut self, id: &str) -> bool {
        self.tabs.select(id)
    }

    // ---- export ----

    /// Build the PDF for the current dashboard and hand it to `sink`. Returns
    /// the report filename.
    pub fn export_report(
        &mut self,
        capture: &mut dyn ChartCapture,
        sink: &mut dyn ReportSink,
        now: OffsetDateTime,
    ) -> Result<String, ExportError> {
        let outcome = self.run_export(capture, sink, now);
        self.notice = Some(match &outcome {
            Ok(message) => Notice::info(message.clone()),
            Err(err) => Notice::error(err.to_string()),
        });
        outcome.map(|_| report::report_filename(&self.config.report_prefix, now))
    }

    fn run_export(
        &mut self,
        capture: &mut dyn ChartCapture,
        sink: &mut dyn ReportSink,
        now: OffsetDateTime,
    ) -> Result<String, ExportError> {
        if self.analysis.is_none() {
            return Err(ExportError::NothingToExport);
        }
        let _guard = self.busy.try_acquire().ok_or(ExportError::Busy)?;

        let bytes = report::build_report(&self.rendered, &mut self.widgets, capture, now)?;
        let filename = report::report_filename(&self.config.report_prefix, now);
        let delivered = sink.deliver(&filename, report::PDF_MIME, bytes)?;
        Ok(match delivered {
            Some(path) => format!("Report saved to {path}"),
            None => format!("Report download started ({filename})"),
        })
    }

    // ---- clear history ----

    /// Waiting for the user to confirm the destructive clear.
    pub fn is_confirming_clear(&self) -> bool {
        self.confirming_clear
    }

    /// Ask for confirmation before clearing. Refused while busy.
    pub fn request_clear_history(&mut self) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        self.confirming_clear = true;
        true
    }

    pub fn cancel_clear_history(&mut self) -> bool {
        std::mem::take(&mut self.confirming_clear)
    }

    pub fn begin_clear_history(&mut self) -> Result<ClearTicket, UploadError> {
        let guard = self.busy.try_acquire().ok_or(UploadError::Busy)?;
        self.confirming_clear = false;
        Ok(ClearTicket { guard })
    }

    /// Apply the clear-history outcome. On success the session starts over.
    pub fn finish_clear_history(&mut self, completion: ClearCompletion) -> Result<String, UploadError> {
        let ClearCompletion { outcome, guard } = completion;
        drop(guard);
        match outcome {
            Ok(message) => {
                info!(%message, "history cleared");
                self.reset_session();
                self.notice = Some(Notice::info(message.clone()).then_reload());
                Ok(message)
            }
            Err(err) => {
                warn!(error = %err, "clear history failed");
                self.notice = Some(Notice::error(err.user_message()));
                Err(UploadError::Api(err))
            }
        }
    }

    pub async fn clear_history(&mut self, backend: &dyn AnalysisBackend) -> Result<String, UploadError> {
        let ticket = self.begin_clear_history()?;
        let completion = ticket.send(backend).await;
        self.finish_clear_history(completion)
    }

    fn reset_session(&mut self) {
        self.cancel();
        self.queue.clear();
        self.analysis = None;
        self.widgets.clear();
        self.tabs.reset(Vec::new());
        self.rendered = RenderedDashboard::default();
        self.view = View::Upload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RasterImage;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    struct FakeBackend {
        analysis: RefCell<Option<Result<AnalysisResult, ApiError>>>,
        clear: Result<String, ApiError>,
        calls: Cell<usize>,
        last_files: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        fn returning(outcome: Result<AnalysisResult, ApiError>) -> Self {
            Self {
                analysis: RefCell::new(Some(outcome)),
                clear: Ok("History cleared".into()),
                calls: Cell::new(0),
                last_files: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl AnalysisBackend for FakeBackend {
        async fn analyze(&self, files: Vec<UploadFile>) -> Result<AnalysisResult, ApiError> {
            self.calls.set(self.calls.get() + 1);
            *self.last_files.borrow_mut() = files.into_iter().map(|f| f.name).collect();
            self.analysis
                .borrow_mut()
                .take()
                .unwrap_or(Err(ApiError::Transport("no response queued".into())))
        }

        async fn clear_history(&self) -> Result<String, ApiError> {
            self.clear.clone()
        }
    }

    struct BlankCapture;

    impl ChartCapture for BlankCapture {
        fn capture(&mut self, _: &str, width: u32, height: u32) -> Result<RasterImage, ExportError> {
            Ok(RasterImage {
                width,
                height,
                rgb: vec![255; (width * height * 3) as usize],
            })
        }
    }

    #[derive(Default)]
    struct MemorySink {
        files: Vec<(String, Vec<u8>)>,
    }

    impl ReportSink for MemorySink {
        fn deliver(
            &mut self,
            filename: &str,
            _mime: &str,
            bytes: Vec<u8>,
        ) -> Result<Option<String>, ExportError> {
            self.files.push((filename.to_string(), bytes));
            Ok(None)
        }
    }

    fn sample() -> AnalysisResult {
        serde_json::from_value(serde_json::json!({
            "kpis": { "total_tips": 42, "roi": -3.5 },
            "charts": {
                "roi_by_tipster": {
                    "labels": ["A", "B"],
                    "datasets": [{ "label": "ROI", "data": [10, -5] }]
                }
            },
            "tables": {
                "tipster_summary": [
                    { "tipster": "A", "tips": 20, "winners": 5, "strike_rate": 25.0,
                      "profit": 12.5, "roi": 10.0 }
                ]
            }
        }))
        .unwrap()
    }

    fn presenter_with_file() -> DashboardPresenter {
        let mut presenter = DashboardPresenter::new(DashboardConfig::default());
        presenter.add_files(vec![FileHandle::new("tips.csv", b"a,b\n".to_vec())]);
        presenter
    }

    fn now() -> OffsetDateTime {
        time::macros::datetime!(2024-03-09 14:05:07 UTC)
    }

    #[test]
    fn successful_submit_shows_dashboard() {
        let mut presenter = presenter_with_file();
        let backend = FakeBackend::returning(Ok(sample()));
        block_on(presenter.submit(&backend)).unwrap();
        assert_eq!(presenter.view(), View::Dashboard);
        assert_eq!(presenter.rendered().kpis[0].caption(), "Total Tips: 42");
        assert!(presenter.widgets().contains("chart-roi-by-tipster"));
        assert!(presenter.tabs().is_active("performance"));
        assert_eq!(*backend.last_files.borrow(), vec!["tips.csv"]);
        assert!(!presenter.is_busy());
    }

    #[test]
    fn server_error_surfaces_detail_and_clears_busy() {
        let mut presenter = presenter_with_file();
        let backend = FakeBackend::returning(Err(ApiError::Server {
            status: 422,
            message: "Missing column: odds".into(),
        }));
        let err = block_on(presenter.submit(&backend)).unwrap_err();
        assert!(matches!(err, UploadError::Api(ApiError::Server { status: 422, .. })));
        assert_eq!(presenter.view(), View::Upload);
        assert_eq!(presenter.notice().unwrap().message, "Missing column: odds");
        assert!(!presenter.is_busy());
    }

    #[test]
    fn transport_error_uses_generic_message() {
        let mut presenter = presenter_with_file();
        let backend = FakeBackend::returning(Err(ApiError::Transport("refused".into())));
        let _ = block_on(presenter.submit(&backend));
        assert_eq!(presenter.notice().unwrap().message, api::GENERIC_FAILURE);
    }

    #[test]
    fn empty_queue_fails_validation_without_request() {
        let mut presenter = DashboardPresenter::new(DashboardConfig::default());
        let backend = FakeBackend::returning(Ok(sample()));
        let err = block_on(presenter.submit(&backend)).unwrap_err();
        assert_eq!(
            err,
            UploadError::Validation {
                required: 1,
                queued: 0
            }
        );
        assert_eq!(backend.calls.get(), 0);
        assert!(presenter.notice().is_none());
    }

    #[test]
    fn second_submit_while_busy_is_rejected() {
        let mut presenter = presenter_with_file();
        let ticket = presenter.begin_submit().unwrap();
        assert!(presenter.is_busy());
        assert!(!presenter.can_submit());
        assert!(matches!(presenter.begin_submit(), Err(UploadError::Busy)));
        drop(ticket);
        assert!(!presenter.is_busy());
    }

    #[test]
    fn cancel_leaves_view_and_data_untouched() {
        let mut presenter = presenter_with_file();
        let backend = FakeBackend::returning(Ok(sample()));
        let ticket = presenter.begin_submit().unwrap();
        assert!(presenter.cancel());
        let completion = block_on(ticket.send(&backend));
        let err = presenter.finish_submit(completion).unwrap_err();
        assert_eq!(err, UploadError::Api(ApiError::Cancelled));
        assert_eq!(presenter.view(), View::Upload);
        assert!(presenter.analysis().is_none());
        assert!(presenter.notice().is_none());
        assert!(!presenter.is_busy());
    }

    #[test]
    fn resubmitting_replaces_widgets() {
        let mut presenter = presenter_with_file();
        block_on(presenter.submit(&FakeBackend::returning(Ok(sample())))).unwrap();
        let first = presenter.widgets().get("chart-roi-by-tipster").unwrap().instance;
        let live = presenter.widgets().len();
        block_on(presenter.submit(&FakeBackend::returning(Ok(sample())))).unwrap();
        let second = presenter.widgets().get("chart-roi-by-tipster").unwrap().instance;
        assert_ne!(first, second);
        assert_eq!(presenter.widgets().len(), live);
        assert_eq!(presenter.widgets().disposed_count(), live as u64);
    }

    #[test]
    fn export_before_analysis_sets_notice_without_download() {
        let mut presenter = DashboardPresenter::new(DashboardConfig::default());
        let mut sink = MemorySink::default();
        let err = presenter
            .export_report(&mut BlankCapture, &mut sink, now())
            .unwrap_err();
        assert_eq!(err, ExportError::NothingToExport);
        assert!(sink.files.is_empty());
        assert_eq!(
            presenter.notice().map(|notice| notice.level),
            Some(crate::dashboard::NoticeLevel::Error)
        );
    }

    #[test]
    fn export_delivers_timestamped_pdf() {
        let mut presenter = presenter_with_file();
        block_on(presenter.submit(&FakeBackend::returning(Ok(sample())))).unwrap();
        let mut sink = MemorySink::default();
        let filename = presenter
            .export_report(&mut BlankCapture, &mut sink, now())
            .unwrap();
        assert_eq!(filename, "paddock-report-20240309_140507.pdf");
        assert_eq!(sink.files.len(), 1);
        assert!(sink.files[0].1.starts_with(b"%PDF-"));
        assert!(!presenter.is_busy());
    }

    #[test]
    fn clear_history_resets_session() {
        let mut presenter = presenter_with_file();
        let backend = FakeBackend::returning(Ok(sample()));
        block_on(presenter.submit(&backend)).unwrap();
        let message = block_on(presenter.clear_history(&backend)).unwrap();
        assert_eq!(message, "History cleared");
        assert_eq!(presenter.view(), View::Upload);
        assert!(presenter.queue().is_empty());
        assert!(presenter.widgets().is_empty());
        assert!(presenter.analysis().is_none());
        assert_eq!(presenter.notice().unwrap().message, "History cleared");
        assert!(presenter.dismiss_notice());
        assert!(presenter.notice().is_none());
    }

    #[test]
    fn failed_clear_keeps_session_and_never_reloads() {
        let mut presenter = presenter_with_file();
        let mut backend = FakeBackend::returning(Ok(sample()));
        block_on(presenter.submit(&backend)).unwrap();
        backend.clear = Err(ApiError::Server {
            status: 500,
            message: "Could not clear database: locked".into(),
        });
        assert!(block_on(presenter.clear_history(&backend)).is_err());
        assert!(presenter.analysis().is_some());
        assert_eq!(presenter.view(), View::Dashboard);
        assert!(!presenter.dismiss_notice());
    }

    #[test]
    fn rejected_files_raise_a_warning() {
        let mut presenter = DashboardPresenter::new(DashboardConfig::default());
        let report = presenter.add_files(vec![FileHandle::new("notes.pdf", Vec::new())]);
        assert_eq!(report.rejected, vec!["notes.pdf"]);
        assert!(presenter.notice().unwrap().message.contains("notes.pdf"));
    }
}
