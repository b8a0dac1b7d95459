//! Text template domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored text template with `{key}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Row id assigned by the store
    pub id: i64,
    pub name: String,
    /// Template body, e.g. `"{book} {chapter}:{verse}"`
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a template. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub content: String,
}

impl NewTemplate {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}
