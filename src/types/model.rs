//! Model registry entries.

use crate::catalog::categorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content type a model produces or consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Text,
    Image,
    Video,
    Audio,
    Unknown,
}

impl ModelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One entry of the model catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub display_name: String,
    pub category: ModelCategory,
}

impl ModelDescriptor {
    /// Build a descriptor, deriving the category from the display name and
    /// then the identifier.
    ///
    /// Registry ids are often opaque, so the human-facing name is tried first.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let id = id.into();
        let display_name = display_name.into();
        let category = match categorize(&display_name) {
            ModelCategory::Unknown => categorize(&id),
            known => known,
        };
        Self {
            id,
            display_name,
            category,
        }
    }
}
