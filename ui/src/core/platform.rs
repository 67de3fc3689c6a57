//! Platform detection helpers and small pieces of per-target glue.

use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Web,
    Desktop,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Web
        } else {
            Self::Desktop
        }
    }
}

/// Origin of the analysis service when the launcher does not override it.
///
/// The web build talks to the origin that served the page; the desktop build
/// assumes a locally running service.
pub fn default_api_base() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        crate::core::config::DashboardConfig::default().api_base
    }
}

/// Run a local future on the root scope, so it survives a remount of the
/// component that started it.
pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    if dioxus::prelude::spawn_forever(future).is_none() {
        tracing::warn!("no runtime to spawn on");
    }
}

/// Full page reload after the server history is cleared. Desktop sessions reset
/// in place instead.
pub fn reload_page() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            window.location().reload().ok();
        }
    }
}
