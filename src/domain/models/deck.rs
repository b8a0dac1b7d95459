//! Slide deck domain models.
//!
//! A [`BuildRequest`] is laid out into a [`Deck`], which a deck writer then
//! turns into a presentation file. The outcome is reported as a
//! [`BuildResult`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title used when a build request does not carry one.
pub const DEFAULT_TITLE: &str = "Default Title";

/// A single slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub heading: String,
    /// Body paragraphs, one per line of output
    #[serde(default)]
    pub body: Vec<String>,
}

impl Slide {
    pub fn title(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: Vec::new(),
        }
    }

    pub fn is_title(&self) -> bool {
        self.body.is_empty()
    }
}

/// An ordered set of slides with a deck title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub slides: Vec<Slide>,
}

/// Layout options for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Estimated line budget per content slide. 0 puts each item on its own slide.
    #[serde(default)]
    pub max_lines_per_slide: usize,
    /// Characters per line used when estimating wrapped lines
    #[serde(default = "default_chars_per_line")]
    pub chars_per_line: usize,
}

const fn default_chars_per_line() -> usize {
    60
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_lines_per_slide: 0,
            chars_per_line: default_chars_per_line(),
        }
    }
}

/// Input for a deck build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// Items to place on content slides. Strings are used verbatim.
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    /// Overrides for the configured layout options
    #[serde(default)]
    pub options: Option<BuildOptions>,
}

impl BuildRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data = items
            .into_iter()
            .map(|s| serde_json::Value::String(s.into()))
            .collect();
        self
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Text for each data item.
    pub fn item_texts(&self) -> Vec<String> {
        self.data
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

/// Whether a build succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStatus {
    Success,
    Error,
}

/// Outcome of a deck build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub processed: BuildStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BuildResult {
    pub fn success(output_path: PathBuf, slide_count: usize) -> Self {
        Self {
            processed: BuildStatus::Success,
            output_path: Some(output_path),
            slide_count: Some(slide_count),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            processed: BuildStatus::Error,
            output_path: None,
            slide_count: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.processed == BuildStatus::Success
    }
}
