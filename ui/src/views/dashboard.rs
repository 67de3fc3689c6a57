use std::rc::Rc;

use api::HttpBackend;
use dioxus::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use crate::components::{
    AppNavbar, KpiGrid, NoticeBanner, SectionPanel, SectionTabs, UploadPanel,
};
use crate::core::config::DashboardConfig;
use crate::core::platform::{self, Platform};
use crate::dashboard::{DashboardPresenter, Dispatch, UiAction, View};
use crate::report::{PlatformSink, ResvgCapture};
use crate::t;

/// Session state owned above the language-keyed subtree. A locale switch
/// remounts the views but keeps this presenter.
#[derive(Clone, Copy)]
pub struct DashboardSession(pub Signal<DashboardPresenter>);

/// Create the session and provide it to everything below. Launchers call
/// this in their root component.
pub fn use_dashboard_session(config: DashboardConfig) -> DashboardSession {
    let presenter = use_signal(move || DashboardPresenter::new(config));
    use_context_provider(|| DashboardSession(presenter))
}

/// The provided session presenter, or a fresh one when no launcher set it up.
fn session_presenter(config: &DashboardConfig) -> Signal<DashboardPresenter> {
    try_consume_context::<DashboardSession>()
        .map(|session| session.0)
        .unwrap_or_else(|| Signal::new(DashboardPresenter::new(config.clone())))
}

/// Handle shared with child components: the presenter signal plus the
/// backend the async effects talk to.
#[derive(Clone)]
pub struct DashboardShell {
    pub presenter: Signal<DashboardPresenter>,
    backend: Rc<HttpBackend>,
}

impl DashboardShell {
    /// Dispatch `action` and run whatever effect it asks for.
    pub fn send(&self, action: UiAction) {
        let mut presenter = self.presenter;
        let effect = presenter.write().dispatch(action);
        match effect {
            Dispatch::Done => {}
            Dispatch::Rejected => debug!("action rejected"),
            Dispatch::Analyze(ticket) => {
                let backend = self.backend.clone();
                platform::spawn_future(async move {
                    let completion = ticket.send(backend.as_ref()).await;
                    let _ = presenter.write().finish_submit(completion);
                });
            }
            Dispatch::Export => {
                let mut capture = ResvgCapture::default();
                let mut sink = PlatformSink;
                let _ = presenter.write().export_report(
                    &mut capture,
                    &mut sink,
                    OffsetDateTime::now_utc(),
                );
            }
            Dispatch::ClearHistory(ticket) => {
                let backend = self.backend.clone();
                platform::spawn_future(async move {
                    let completion = ticket.send(backend.as_ref()).await;
                    let _ = presenter.write().finish_clear_history(completion);
                });
            }
            Dispatch::Reload => {
                if Platform::current() == Platform::Web {
                    platform::reload_page();
                }
            }
        }
    }
}

#[component]
pub fn Dashboard() -> Element {
    let config = try_use_context::<DashboardConfig>().unwrap_or_default();
    let backend = use_hook(|| Rc::new(HttpBackend::new(config.api_base.clone())));
    let presenter = use_hook(|| session_presenter(&config));
    let shell = use_context_provider(|| DashboardShell {
        presenter,
        backend: backend.clone(),
    });

    let (view, busy, confirming) = {
        let state = presenter.read();
        (state.view(), state.is_busy(), state.is_confirming_clear())
    };

    let clear_shell = shell.clone();
    let confirm_shell = shell.clone();
    let keep_shell = shell.clone();

    rsx! {
        AppNavbar {
            button {
                r#type: "button",
                class: "button button--ghost",
                disabled: busy || confirming,
                onclick: move |_| clear_shell.send(UiAction::ClearHistory),
                {t!("nav-clear-history")}
            }
        }

        main { class: "page page-dashboard",
            NoticeBanner {}
            if confirming {
                div { class: "confirm", role: "alertdialog",
                    p { class: "confirm__message", {t!("clear-confirm-message")} }
                    div { class: "confirm__actions",
                        button {
                            r#type: "button",
                            class: "button button--danger",
                            onclick: move |_| confirm_shell.send(UiAction::ConfirmClearHistory),
                            {t!("clear-confirm-yes")}
                        }
                        button {
                            r#type: "button",
                            class: "button",
                            onclick: move |_| keep_shell.send(UiAction::CancelClearHistory),
                            {t!("clear-confirm-no")}
                        }
                    }
                }
            }
            {match view {
                View::Upload => rsx! { UploadPanel {} },
                View::Dashboard => rsx! { ResultsView {} },
            }}
        }
    }
}

#[component]
fn ResultsView() -> Element {
    let shell = use_context::<DashboardShell>();
    let presenter = shell.presenter;
    let state = presenter.read();
    let rendered = state.rendered();
    let busy = state.is_busy();

    let back_shell = shell.clone();
    let export_shell = shell.clone();

    rsx! {
        section { class: "results",
            div { class: "results__header",
                h1 { {t!("dashboard-title")} }
                div { class: "results__actions",
                    button {
                        r#type: "button",
                        class: "button",
                        onclick: move |_| back_shell.send(UiAction::BackToUpload),
                        {t!("dashboard-back")}
                    }
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy,
                        onclick: move |_| export_shell.send(UiAction::ExportReport),
                        {t!("dashboard-export")}
                    }
                }
            }

            if !rendered.kpis.is_empty() {
                KpiGrid { cards: rendered.kpis.clone() }
            }

            if rendered.sections.is_empty() {
                p { class: "results__empty", {t!("dashboard-empty")} }
            } else {
                SectionTabs {}
                for section in rendered.sections.iter().filter(|s| state.tabs().is_active(s.id)) {
                    SectionPanel { key: "{section.id}", section: section.clone() }
                }
            }
        }
    }
}
