//! Section tabs with a single active entry.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabState {
    tabs: Vec<Tab>,
    active: Option<usize>,
}

impl TabState {
    /// Replace the tab set; the first tab becomes active.
    pub fn reset(&mut self, tabs: Vec<Tab>) {
        self.active = if tabs.is_empty() { None } else { Some(0) };
        self.tabs = tabs;
    }

    /// Activate `id`. Unknown ids leave the current selection untouched.
    pub fn select(&mut self, id: &str) -> bool {
        match self.tabs.iter().position(|tab| tab.id == id) {
            Some(idx) => {
                self.active = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active.and_then(|idx| self.tabs.get(idx))
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active().map(|tab| tab.id == id).unwrap_or(false)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_count(&self) -> usize {
        self.tabs.iter().filter(|tab| self.is_active(tab.id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs() -> Vec<Tab> {
        vec![
            Tab {
                id: "performance",
                title: "Performance",
            },
            Tab {
                id: "trends",
                title: "Trends",
            },
            Tab {
                id: "tables",
                title: "Tables",
            },
        ]
    }

    #[test]
    fn first_tab_is_active_after_reset() {
        let mut state = TabState::default();
        state.reset(tabs());
        assert!(state.is_active("performance"));
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn exactly_one_active_after_any_selection() {
        let mut state = TabState::default();
        state.reset(tabs());
        for id in ["trends", "tables", "nope", "performance", "trends"] {
            state.select(id);
            assert_eq!(state.active_count(), 1, "after selecting {id}");
        }
        assert!(state.is_active("trends"));
    }

    #[test]
    fn unknown_tab_keeps_selection() {
        let mut state = TabState::default();
        state.reset(tabs());
        state.select("tables");
        assert!(!state.select("missing"));
        assert!(state.is_active("tables"));
    }

    #[test]
    fn empty_tab_set_has_no_active_tab() {
        let mut state = TabState::default();
        state.reset(Vec::new());
        assert!(state.active().is_none());
        assert_eq!(state.active_count(), 0);
    }
}
