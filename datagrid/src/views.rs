use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::{ValidationErrors, ViewError};

pub type ViewId = u64;

pub const MAX_VIEW_NAME_LEN: usize = 64;

/// A named, persisted preset of visible columns for one entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedView {
    pub id: ViewId,
    /// The kind of record the grid shows (`"users"`, `"invoices"`, …).
    pub entity_type: String,
    pub name: String,
    /// Visible column keys.
    pub columns: Vec<String>,
    pub is_default: bool,
}

/// The contents of the create/edit view form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewDraft {
    pub name: String,
    pub columns: Vec<String>,
    pub is_default: bool,
}

impl ViewDraft {
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            is_default: false,
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Validates the form against the grid's columns and the entity's existing views.
    ///
    /// `editing` is the view being edited, which may keep its own name.
    pub fn validate<S: AsRef<str>>(
        &self,
        known_columns: &[S],
        existing: &[SavedView],
        editing: Option<ViewId>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = self.check(existing, editing);
        for (i, key) in self.columns.iter().enumerate() {
            if !known_columns.iter().any(|k| k.as_ref() == key) {
                errors.columns.push(format!("unknown column `{key}`"));
            } else if self.columns[..i].contains(key) {
                errors.columns.push(format!("column `{key}` listed twice"));
            }
        }
        errors.into_result()
    }

    /// Checks that do not need the column configuration.
    fn check(&self, existing: &[SavedView], editing: Option<ViewId>) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        let name = self.name.trim();
        if name.is_empty() {
            errors.name.push("name is required".to_string());
        } else if name.chars().count() > MAX_VIEW_NAME_LEN {
            errors
                .name
                .push(format!("name must be at most {MAX_VIEW_NAME_LEN} characters"));
        } else {
            let lower = name.to_lowercase();
            let taken = existing
                .iter()
                .filter(|v| Some(v.id) != editing)
                .any(|v| v.name.trim().to_lowercase() == lower);
            if taken {
                errors
                    .name
                    .push(format!("a view named `{name}` already exists"));
            }
        }
        if self.columns.is_empty() {
            errors
                .columns
                .push("select at least one column".to_string());
        }
        errors
    }
}

/// Persistence for saved views.
///
/// Implementations typically call a REST API; [`MemoryViewStore`] keeps views in memory. Every
/// operation is scoped to an entity type, and at most one view per entity type is the default.
pub trait ViewStore {
    fn list(&self, entity_type: &str) -> Result<Vec<SavedView>, ViewError>;

    fn create(&mut self, entity_type: &str, draft: ViewDraft) -> Result<SavedView, ViewError>;

    fn update(&mut self, id: ViewId, draft: ViewDraft) -> Result<SavedView, ViewError>;

    fn delete(&mut self, id: ViewId) -> Result<(), ViewError>;

    /// Makes `id` the default view of `entity_type`, or clears the default with `None`.
    fn set_default(&mut self, entity_type: &str, id: Option<ViewId>) -> Result<(), ViewError>;

    fn default_view(&self, entity_type: &str) -> Result<Option<SavedView>, ViewError> {
        Ok(self.list(entity_type)?.into_iter().find(|v| v.is_default))
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryViewStore {
    next_id: ViewId,
    views: Vec<SavedView>,
}

impl MemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn of_entity(&self, entity_type: &str) -> Vec<SavedView> {
        self.views
            .iter()
            .filter(|v| v.entity_type == entity_type)
            .cloned()
            .collect()
    }

    fn mark_default(&mut self, entity_type: &str, id: Option<ViewId>) {
        for v in self.views.iter_mut().filter(|v| v.entity_type == entity_type) {
            v.is_default = Some(v.id) == id;
        }
    }
}

impl ViewStore for MemoryViewStore {
    fn list(&self, entity_type: &str) -> Result<Vec<SavedView>, ViewError> {
        Ok(self.of_entity(entity_type))
    }

    fn create(&mut self, entity_type: &str, draft: ViewDraft) -> Result<SavedView, ViewError> {
        draft
            .check(&self.of_entity(entity_type), None)
            .into_result()?;
        self.next_id += 1;
        let view = SavedView {
            id: self.next_id,
            entity_type: entity_type.to_string(),
            name: draft.name.trim().to_string(),
            columns: draft.columns,
            is_default: false,
        };
        gdebug!(id = view.id, entity_type, "saved view created");
        self.views.push(view);
        if draft.is_default {
            self.mark_default(entity_type, Some(self.next_id));
        }
        let id = self.next_id;
        self.views
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(ViewError::NotFound(id))
    }

    fn update(&mut self, id: ViewId, draft: ViewDraft) -> Result<SavedView, ViewError> {
        let entity_type = self
            .views
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.entity_type.clone())
            .ok_or(ViewError::NotFound(id))?;
        draft
            .check(&self.of_entity(&entity_type), Some(id))
            .into_result()?;
        if draft.is_default {
            self.mark_default(&entity_type, Some(id));
        }
        let view = self
            .views
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(ViewError::NotFound(id))?;
        view.name = draft.name.trim().to_string();
        view.columns = draft.columns;
        Ok(view.clone())
    }

    fn delete(&mut self, id: ViewId) -> Result<(), ViewError> {
        let Some(pos) = self.views.iter().position(|v| v.id == id) else {
            gwarn!(id, "delete of unknown saved view");
            return Err(ViewError::NotFound(id));
        };
        self.views.remove(pos);
        Ok(())
    }

    fn set_default(&mut self, entity_type: &str, id: Option<ViewId>) -> Result<(), ViewError> {
        if let Some(id) = id {
            if !self
                .views
                .iter()
                .any(|v| v.id == id && v.entity_type == entity_type)
            {
                return Err(ViewError::NotFound(id));
            }
        }
        self.mark_default(entity_type, id);
        Ok(())
    }
}
