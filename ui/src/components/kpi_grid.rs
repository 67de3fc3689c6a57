use dioxus::prelude::*;

use crate::dashboard::kpi::KpiCard;
use crate::t;

#[component]
pub fn KpiGrid(cards: Vec<KpiCard>) -> Element {
    rsx! {
        section { class: "kpi-grid",
            h2 { class: "visually-hidden", {t!("kpi-heading")} }
            for card in cards {
                article {
                    key: "{card.key}",
                    class: "kpi-card {card.tone.css_modifier()}",
                    title: "{card.caption()}",
                    span { class: "kpi-card__icon", aria_hidden: "true", "{card.icon}" }
                    span { class: "kpi-card__label", "{card.label}" }
                    strong { class: "kpi-card__value", "{card.value}" }
                }
            }
        }
    }
}
