use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

/// A caller contract violation. These are programming errors and are not recoverable at runtime.
#[derive(Clone, Debug, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("row height must be a positive finite number, got {0}")]
    InvalidRowHeight(f64),

    #[error("viewport height must be a non-negative finite number, got {0}")]
    InvalidViewportHeight(f64),

    #[error("page size must be at least 1")]
    InvalidPageSize,

    #[error("duplicate column key: {0}")]
    DuplicateColumn(String),

    #[error("column `{key}` has min width {min} greater than max width {max}")]
    InvalidWidthBounds { key: String, min: f64, max: f64 },
}

/// A failure reported by a remote collaborator (page fetch, delete).
///
/// Recoverable: the grid renders it with a retry affordance and keeps its local state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rejected by server: {0}")]
    Validation(String),
}

impl FetchError {
    /// The message shown in the inline error panel.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(m) | Self::Validation(m) => m,
        }
    }
}

/// Per-field validation messages for a saved-view form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationErrors {
    pub name: Vec<String>,
    pub columns: Vec<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.columns.is_empty()
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in [("name", &self.name), ("columns", &self.columns)] {
            for m in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {m}")?;
            }
        }
        Ok(())
    }
}

impl core::error::Error for ValidationErrors {}

/// A saved-view store failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("saved view {0} not found")]
    NotFound(u64),

    #[error("invalid saved view: {0}")]
    Validation(ValidationErrors),

    #[error("network error: {0}")]
    Network(String),
}

impl From<ValidationErrors> for ViewError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}
