use std::sync::Arc;

use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;

use crate::core::config::FileKind;
use crate::dashboard::{FileHandle, UiAction};
use crate::t;
use crate::views::DashboardShell;

/// Desktop file engines report full paths; only the file name is queued.
fn display_name(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

async fn read_files(files: Option<Arc<dyn FileEngine>>) -> Vec<FileHandle> {
    let Some(engine) = files else {
        return Vec::new();
    };
    let mut picked = Vec::new();
    for path in engine.files() {
        if let Some(bytes) = engine.read_file(&path).await {
            picked.push(FileHandle::new(display_name(&path), bytes));
        }
    }
    picked
}

#[component]
pub fn UploadPanel() -> Element {
    let shell = use_context::<DashboardShell>();
    let mut dragging = use_signal(|| false);

    let state = shell.presenter.read();
    let accept = FileKind::accept_attr(&state.config().accepted);
    let files: Vec<(usize, String, String)> = state
        .queue()
        .files()
        .iter()
        .enumerate()
        .map(|(idx, file)| (idx, file.name.clone(), file.size_label()))
        .collect();
    let count = files.len();
    let can_submit = state.can_submit();
    let submitting = state.is_submitting();
    drop(state);

    let pick_shell = shell.clone();
    let on_pick = move |evt: FormEvent| {
        let shell = pick_shell.clone();
        async move {
            let picked = read_files(evt.files()).await;
            if !picked.is_empty() {
                shell.send(UiAction::AddFiles(picked));
            }
        }
    };

    let drop_shell = shell.clone();
    let on_drop = move |evt: DragEvent| {
        evt.prevent_default();
        dragging.set(false);
        let shell = drop_shell.clone();
        async move {
            let picked = read_files(evt.files()).await;
            if !picked.is_empty() {
                shell.send(UiAction::AddFiles(picked));
            }
        }
    };

    let submit_shell = shell.clone();
    let cancel_shell = shell.clone();

    let dropzone_class = if dragging() {
        "upload__dropzone upload__dropzone--active"
    } else {
        "upload__dropzone"
    };

    rsx! {
        section { class: "upload",
            h1 { {t!("upload-title")} }
            p { class: "upload__intro", {t!("upload-intro")} }

            div {
                class: "{dropzone_class}",
                ondragover: move |evt: DragEvent| {
                    evt.prevent_default();
                    dragging.set(true);
                },
                ondragleave: move |_| dragging.set(false),
                ondrop: on_drop,
                label { class: "button button--accent upload__choose",
                    {t!("upload-choose")}
                    input {
                        r#type: "file",
                        class: "visually-hidden",
                        multiple: true,
                        accept: "{accept}",
                        onchange: on_pick,
                    }
                }
                span { class: "upload__hint", {t!("upload-drop-hint")} }
            }

            if files.is_empty() {
                p { class: "upload__empty", {t!("upload-queue-empty")} }
            } else {
                p { class: "upload__count", {t!("upload-queued", count = count)} }
                ul { class: "upload__queue",
                    for (idx, name, size) in files {
                        li { key: "{name}", class: "upload__file",
                            span { class: "upload__file-name", "{name}" }
                            span { class: "upload__file-size", "{size}" }
                            button {
                                r#type: "button",
                                class: "button button--ghost upload__remove",
                                disabled: submitting,
                                onclick: {
                                    let shell = shell.clone();
                                    move |_| shell.send(UiAction::RemoveFile(idx))
                                },
                                {t!("upload-remove")}
                            }
                        }
                    }
                }
            }

            if submitting {
                div { class: "upload__progress",
                    span { class: "spinner", aria_hidden: "true" }
                    span { {t!("upload-working")} }
                    button {
                        r#type: "button",
                        class: "button",
                        onclick: move |_| cancel_shell.send(UiAction::Cancel),
                        {t!("upload-cancel")}
                    }
                }
            } else {
                button {
                    r#type: "button",
                    class: "button button--primary upload__submit",
                    disabled: !can_submit,
                    onclick: move |_| submit_shell.send(UiAction::Submit),
                    {t!("upload-submit")}
                }
            }
        }
    }
}
