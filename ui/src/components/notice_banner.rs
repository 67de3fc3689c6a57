use dioxus::prelude::*;

use crate::dashboard::UiAction;
use crate::t;
use crate::views::DashboardShell;

#[component]
pub fn NoticeBanner() -> Element {
    let shell = use_context::<DashboardShell>();
    let notice = shell.presenter.read().notice().cloned();

    let Some(notice) = notice else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "notice {notice.level.css_modifier()}",
            role: "alert",
            p { class: "notice__message", "{notice.message}" }
            button {
                r#type: "button",
                class: "button button--ghost notice__dismiss",
                onclick: move |_| shell.send(UiAction::DismissNotice),
                {t!("notice-dismiss")}
            }
        }
    }
}
