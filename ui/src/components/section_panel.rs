use dioxus::prelude::*;

use crate::charts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::dashboard::render::{RenderedSection, SlotState};
use crate::dashboard::table::TableModel;
use crate::dashboard::widgets::WidgetBody;
use crate::dashboard::UiAction;
use crate::t;
use crate::views::DashboardShell;

#[component]
pub fn SectionTabs() -> Element {
    let shell = use_context::<DashboardShell>();
    let tabs: Vec<(&'static str, &'static str, bool)> = {
        let state = shell.presenter.read();
        state
            .tabs()
            .tabs()
            .iter()
            .map(|tab| (tab.id, tab.title, state.tabs().is_active(tab.id)))
            .collect()
    };

    rsx! {
        nav { class: "section-tabs", role: "tablist",
            for (id, title, active) in tabs {
                button {
                    key: "{id}",
                    r#type: "button",
                    role: "tab",
                    class: if active { "section-tabs__tab section-tabs__tab--active" } else { "section-tabs__tab" },
                    aria_selected: "{active}",
                    onclick: {
                        let shell = shell.clone();
                        move |_| shell.send(UiAction::SelectTab(id.to_string()))
                    },
                    "{title}"
                }
            }
        }
    }
}

/// Slots of the active section: a live widget or the "no data" placeholder.
#[component]
pub fn SectionPanel(section: RenderedSection) -> Element {
    let shell = use_context::<DashboardShell>();
    let state = shell.presenter.read();

    rsx! {
        section {
            class: "section-panel",
            id: "section-{section.id}",
            role: "tabpanel",
            for slot in section.slots.iter() {
                article { key: "{slot.target_id}", class: "widget", id: "{slot.target_id}",
                    h3 { class: "widget__title", "{slot.title}" }
                    {match (&slot.state, state.widgets().get(slot.target_id)) {
                        (SlotState::Widget, Some(widget)) => match &widget.body {
                            WidgetBody::Chart(chart) => {
                                let svg = chart.svg(DEFAULT_WIDTH, DEFAULT_HEIGHT);
                                rsx! {
                                    div {
                                        class: "widget__chart chart--{chart.model.kind.css_modifier()}",
                                        dangerous_inner_html: "{svg}",
                                    }
                                }
                            }
                            WidgetBody::Table(table) => rsx! { TableView { table: table.clone() } },
                        },
                        _ => rsx! {
                            p { class: "widget__placeholder", {t!("dashboard-no-data")} }
                        },
                    }}
                }
            }
        }
    }
}

#[component]
fn TableView(table: TableModel) -> Element {
    rsx! {
        div { class: "widget__table",
            table { class: "data-table",
                thead {
                    tr {
                        for (col, header) in table.headers.iter().enumerate() {
                            th {
                                class: if table.numeric.get(col).copied().unwrap_or(false) { "data-table__num" },
                                "{header}"
                            }
                        }
                    }
                }
                tbody {
                    for row in table.rows.iter() {
                        tr {
                            for (col, cell) in row.iter().enumerate() {
                                td {
                                    class: if table.numeric.get(col).copied().unwrap_or(false) { "data-table__num" },
                                    "{cell}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
