use dioxus::prelude::*;

use ui::core::platform;
use ui::views::{use_dashboard_session, Dashboard};
use ui::DashboardConfig;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Dashboard {},
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // The web build talks to the origin that served the page.
    let config = use_hook(|| DashboardConfig::default().with_api_base(platform::default_api_base()));
    use_context_provider(|| config.clone());
    use_dashboard_session(config);

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    rsx! {
        document::Title { "Paddock" }
        document::Style { "{ui::THEME_CSS}" }

        // Keyed by language so every localized string re-renders on change.
        div {
            key: "{lang_code()}",
            Router::<Route> {}
        }
    }
}
