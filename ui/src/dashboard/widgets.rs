//! Live chart/table instances keyed by their DOM target id.

use std::collections::BTreeMap;

use tracing::debug;

use crate::charts::{render_svg, ChartModel, ChartTheme};

use super::table::TableModel;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartWidget {
    pub model: ChartModel,
    pub theme: ChartTheme,
}

impl ChartWidget {
    pub fn svg(&self, width: u32, height: u32) -> String {
        render_svg(&self.model, self.theme, width, height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetBody {
    Chart(ChartWidget),
    Table(TableModel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub instance: u64,
    pub target_id: &'static str,
    pub title: &'static str,
    pub body: WidgetBody,
    disposed: bool,
}

impl Widget {
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

/// At most one live widget per target id. Inserting over an occupied id
/// disposes the previous occupant before the new one becomes visible.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    live: BTreeMap<&'static str, Widget>,
    next_instance: u64,
    disposed: u64,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a widget for `target_id`, replacing any current one. Returns the
    /// disposed predecessor.
    pub fn set(
        &mut self,
        target_id: &'static str,
        title: &'static str,
        body: WidgetBody,
    ) -> Option<Widget> {
        self.next_instance += 1;
        let widget = Widget {
            instance: self.next_instance,
            target_id,
            title,
            body,
            disposed: false,
        };
        self.live.insert(target_id, widget).map(|mut old| {
            old.dispose();
            self.disposed += 1;
            debug!(target_id, instance = old.instance, "replaced widget");
            old
        })
    }

    pub fn get(&self, target_id: &str) -> Option<&Widget> {
        self.live.get(target_id)
    }

    pub fn get_mut(&mut self, target_id: &str) -> Option<&mut Widget> {
        self.live.get_mut(target_id)
    }

    pub fn contains(&self, target_id: &str) -> bool {
        self.live.contains_key(target_id)
    }

    /// Dispose every live widget.
    pub fn clear(&mut self) -> usize {
        let count = self.live.len();
        for (_, mut widget) in std::mem::take(&mut self.live) {
            widget.dispose();
        }
        self.disposed += count as u64;
        count
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Total widgets disposed over the registry's lifetime.
    pub fn disposed_count(&self) -> u64 {
        self.disposed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.live.values()
    }
}
