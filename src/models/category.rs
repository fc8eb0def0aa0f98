//! Category model
//!
//! Categories label expenses and drive the per-category totals. Each one
//! carries a display color used by summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Color assigned when none is given
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

/// An expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Display color as `#RRGGBB`
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

impl Category {
    /// Create a new category with the default color
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: default_color(),
        }
    }

    /// Create a new category with a specific color
    pub fn with_color(name: impl Into<String>, color: impl Into<String>) -> Self {
        let mut category = Self::new(name);
        category.color = color.into();
        category
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

fn is_hex_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => {
                write!(f, "Category color must look like #RRGGBB, got '{}'", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
