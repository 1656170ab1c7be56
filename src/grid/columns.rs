use serde::Serialize;

/// One column: what it is called and how a row turns into a cell
pub struct ColumnDescriptor<R> {
    pub key: &'static str,
    pub label: &'static str,
    pub render: fn(&R) -> String,
    /// Ordering key for in-page sorting; the rendered cell unless set
    pub sort_key: fn(&R) -> String,
    pub sortable: bool,
    pub hideable: bool,
}

impl<R> ColumnDescriptor<R> {
    pub fn new(key: &'static str, label: &'static str, render: fn(&R) -> String) -> Self {
        Self {
            key,
            label,
            render,
            sort_key: render,
            sortable: false,
            hideable: true,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sortable by a key other than the displayed text (dates, amounts)
    pub fn sorted_by(mut self, sort_key: fn(&R) -> String) -> Self {
        self.sortable = true;
        self.sort_key = sort_key;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn cell(&self, row: &R) -> String {
        (self.render)(row)
    }
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            label: self.label,
            render: self.render,
            sort_key: self.sort_key,
            sortable: self.sortable,
            hideable: self.hideable,
        }
    }
}

impl<R> std::fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Edit,
    Delete,
    Cancel,
    Details,
}

/// Row-level action, kept apart from the columns
pub struct ActionDescriptor<R> {
    pub kind: ActionKind,
    pub label: &'static str,
    pub enabled: fn(&R) -> bool,
}

impl<R> ActionDescriptor<R> {
    pub fn new(kind: ActionKind, label: &'static str) -> Self {
        Self {
            kind,
            label,
            enabled: always_enabled::<R>,
        }
    }

    pub fn enabled_when(mut self, enabled: fn(&R) -> bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self, row: &R) -> bool {
        (self.enabled)(row)
    }
}

fn always_enabled<R>(_: &R) -> bool {
    true
}

impl<R> Clone for ActionDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            label: self.label,
            enabled: self.enabled,
        }
    }
}

impl<R> std::fmt::Debug for ActionDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .finish()
    }
}
