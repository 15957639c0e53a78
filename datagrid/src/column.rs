use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::{ConfigError, Row, resolve_path};

/// A custom cell renderer. Its output is used verbatim as the cell content.
pub type CellRenderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// A plain-text accessor used for export (CSV) and hover text.
///
/// Custom renderers may produce markup; the accessor states the text the cell stands for, so
/// exporters never need to inspect rendered output.
pub type TextAccessor<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// One column of the grid.
///
/// `key` is a dot-separated field path into the row (`"owner.email"`).
pub struct ColumnDef<R> {
    pub key: String,
    pub label: String,
    pub render: Option<CellRenderer<R>>,
    pub text: Option<TextAccessor<R>>,
    pub visible: bool,
    /// Display position among all columns.
    pub order: usize,
    pub width: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub sortable: bool,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            render: self.render.clone(),
            text: self.text.clone(),
            visible: self.visible,
            order: self.order,
            width: self.width,
            min_width: self.min_width,
            max_width: self.max_width,
            sortable: self.sortable,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("visible", &self.visible)
            .field("order", &self.order)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

impl<R> ColumnDef<R> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            render: None,
            text: None,
            visible: true,
            order: usize::MAX,
            width: None,
            min_width: None,
            max_width: None,
            sortable: true,
        }
    }

    pub fn with_render(mut self, render: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn with_text(mut self, text: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.text = Some(Arc::new(text));
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_width_bounds(mut self, min_width: Option<f64>, max_width: Option<f64>) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    fn clamp_width(&self, width: f64) -> f64 {
        let mut w = width;
        if let Some(min) = self.min_width {
            w = w.max(min);
        }
        if let Some(max) = self.max_width {
            w = w.min(max);
        }
        w
    }
}

impl<R: Row> ColumnDef<R> {
    /// The cell content: the custom renderer's output, or the value at `key`.
    pub fn display(&self, row: &R) -> String {
        match &self.render {
            Some(render) => render(row),
            None => resolve_path(row, &self.key),
        }
    }

    /// The plain text the cell stands for: the text accessor's output, or the value at `key`.
    pub fn plain_text(&self, row: &R) -> String {
        match &self.text {
            Some(text) => text(row),
            None => resolve_path(row, &self.key),
        }
    }
}

/// The column state of one grid.
///
/// Holds exactly one column per key. Visible columns carry `order` values `0..V` in display
/// order; hidden columns follow with `V..N`, and keep their slot in [`ColumnSet::all`] so they
/// reappear where they were. Only the setters on this type mutate column state, and none of them
/// affect what data is fetched.
pub struct ColumnSet<R> {
    initial: Vec<ColumnDef<R>>,
    columns: Vec<ColumnDef<R>>,
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSet")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<R> ColumnSet<R> {
    /// Builds the column state from caller configuration.
    ///
    /// Columns are ordered by their `order` value (ties and unset orders keep declaration
    /// order), then renumbered.
    pub fn new(columns: impl IntoIterator<Item = ColumnDef<R>>) -> Result<Self, ConfigError> {
        let mut columns: Vec<ColumnDef<R>> = columns.into_iter().collect();
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].iter().any(|prev| prev.key == c.key) {
                gwarn!(key = %c.key, "duplicate column key");
                return Err(ConfigError::DuplicateColumn(c.key.clone()));
            }
            if let (Some(min), Some(max)) = (c.min_width, c.max_width) {
                if min > max {
                    return Err(ConfigError::InvalidWidthBounds {
                        key: c.key.clone(),
                        min,
                        max,
                    });
                }
            }
        }
        columns.sort_by_key(|c| c.order);
        for c in &mut columns {
            if let Some(w) = c.width {
                c.width = Some(c.clamp_width(w));
            }
        }
        renumber(&mut columns);
        Ok(Self {
            initial: columns.clone(),
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDef<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut ColumnDef<R>> {
        self.columns.iter_mut().find(|c| c.key == key)
    }

    /// All columns in layout order, hidden ones in their slots.
    pub fn all(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    /// Visible columns in display order. The index in the returned list is the column's
    /// rendered position.
    pub fn visible(&self) -> Vec<&ColumnDef<R>> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    pub fn visible_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.key.clone())
            .collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }

    fn visible_count(&self) -> usize {
        self.columns.iter().filter(|c| c.visible).count()
    }

    /// Shows or hides a column. The last visible column cannot be hidden.
    ///
    /// Returns the column's visibility after the call, or `None` for an unknown key.
    pub fn set_visibility(&mut self, key: &str, visible: bool) -> Option<bool> {
        let last_visible = self.visible_count() == 1;
        let column = self.get_mut(key)?;
        if !visible && column.visible && last_visible {
            return Some(true);
        }
        column.visible = visible;
        renumber(&mut self.columns);
        Some(visible)
    }

    pub fn toggle_visibility(&mut self, key: &str) -> Option<bool> {
        let visible = self.get(key)?.visible;
        self.set_visibility(key, !visible)
    }

    /// Moves a column to `position` in the layout order (clamped to the last position).
    pub fn move_column(&mut self, key: &str, position: usize) -> bool {
        let Some(from) = self.columns.iter().position(|c| c.key == key) else {
            return false;
        };
        let column = self.columns.remove(from);
        let to = position.min(self.columns.len());
        self.columns.insert(to, column);
        renumber(&mut self.columns);
        true
    }

    /// Sets a column's width, clamped to its min/max bounds.
    ///
    /// Returns the applied width. Non-finite or non-positive widths are ignored.
    pub fn resize(&mut self, key: &str, width: f64) -> Option<f64> {
        if !(width.is_finite() && width > 0.0) {
            return None;
        }
        let column = self.get_mut(key)?;
        let applied = column.clamp_width(width);
        column.width = Some(applied);
        Some(applied)
    }

    /// Makes exactly the listed columns visible (saved-view application).
    ///
    /// Unknown keys are ignored. When none of the keys is known the state is left unchanged and
    /// `false` is returned.
    pub fn apply_visible_keys<S: AsRef<str>>(&mut self, keys: &[S]) -> bool {
        let wanted = |k: &str| keys.iter().any(|s| s.as_ref() == k);
        if !self.columns.iter().any(|c| wanted(&c.key)) {
            return false;
        }
        for c in &mut self.columns {
            c.visible = wanted(&c.key);
        }
        renumber(&mut self.columns);
        true
    }

    /// Restores the configuration the set was created with.
    pub fn reset(&mut self) {
        self.columns = self.initial.clone();
    }
}

/// Numbers visible columns `0..V` in layout order, then hidden ones `V..N`.
fn renumber<R>(columns: &mut [ColumnDef<R>]) {
    let visible = columns.iter().filter(|c| c.visible).count();
    let (mut shown, mut hidden) = (0, visible);
    for c in columns {
        let next = if c.visible { &mut shown } else { &mut hidden };
        c.order = *next;
        *next += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Item;

    fn set() -> ColumnSet<Item> {
        ColumnSet::new(vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("email", "Email").with_order(0),
            ColumnDef::new("age", "Age")
                .with_width(500.0)
                .with_width_bounds(Some(40.0), Some(120.0)),
        ])
        .unwrap()
    }

    #[test]
    fn orders_densely() {
        let s = set();
        assert_eq!(s.keys(), vec!["email", "name", "age"]);
        let orders: Vec<usize> = s.all().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(s.get("age").unwrap().width, Some(120.0));
    }

    #[test]
    fn rejects_duplicates_and_bad_bounds() {
        let err = ColumnSet::<Item>::new(vec![ColumnDef::new("a", "A"), ColumnDef::new("a", "B")])
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateColumn("a".into()));

        let err = ColumnSet::<Item>::new(vec![
            ColumnDef::new("a", "A").with_width_bounds(Some(200.0), Some(100.0)),
        ]);
        assert!(matches!(err, Err(ConfigError::InvalidWidthBounds { .. })));
    }

    #[test]
    fn visibility_keeps_one_column() {
        let mut s = set();
        assert_eq!(s.toggle_visibility("email"), Some(false));
        assert_eq!(s.toggle_visibility("name"), Some(false));
        assert_eq!(s.toggle_visibility("age"), Some(true));
        assert_eq!(s.visible_keys(), vec!["age"]);
        assert_eq!(s.toggle_visibility("nope"), None);
        assert_eq!(s.toggle_visibility("email"), Some(true));
        assert_eq!(s.visible_keys(), vec!["email", "age"]);
    }

    #[test]
    fn move_resize_reset() {
        let mut s = set();
        assert!(s.move_column("age", 0));
        assert_eq!(s.keys(), vec!["age", "email", "name"]);
        assert!(s.move_column("age", 99));
        assert_eq!(s.keys(), vec!["email", "name", "age"]);
        assert!(!s.move_column("nope", 0));

        assert_eq!(s.resize("age", 10.0), Some(40.0));
        assert_eq!(s.resize("name", 230.0), Some(230.0));
        assert_eq!(s.resize("name", f64::NAN), None);

        s.set_visibility("email", false);
        s.reset();
        assert_eq!(s.keys(), vec!["email", "name", "age"]);
        assert_eq!(s.visible_keys().len(), 3);
        assert_eq!(s.get("name").unwrap().width, None);
    }

    #[test]
    fn visible_orders_stay_dense() {
        let mut s = set();
        let orders = |s: &ColumnSet<Item>| -> Vec<usize> {
            s.visible().iter().map(|c| c.order).collect()
        };

        s.set_visibility("email", false);
        assert_eq!(s.visible_keys(), vec!["name", "age"]);
        assert_eq!(orders(&s), vec![0, 1]);
        assert_eq!(s.get("email").unwrap().order, 2);

        s.set_visibility("email", true);
        assert_eq!(s.visible_keys(), vec!["email", "name", "age"]);
        assert_eq!(orders(&s), vec![0, 1, 2]);

        s.set_visibility("name", false);
        assert!(s.move_column("age", 0));
        assert_eq!(s.visible_keys(), vec!["age", "email"]);
        assert_eq!(orders(&s), vec![0, 1]);

        assert!(s.apply_visible_keys(&["name"]));
        assert_eq!(orders(&s), vec![0]);
        assert_eq!(s.get("name").unwrap().order, 0);
    }

    #[test]
    fn applies_saved_visibility() {
        let mut s = set();
        assert!(s.apply_visible_keys(&["age", "ghost"]));
        assert_eq!(s.visible_keys(), vec!["age"]);
        assert!(!s.apply_visible_keys(&["ghost"]));
        assert_eq!(s.visible_keys(), vec!["age"]);
    }
}
