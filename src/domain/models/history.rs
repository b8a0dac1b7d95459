//! Build history records.
//!
//! Every build attempt leaves one record, whether it produced a file or
//! failed before or during writing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::deck::{BuildRequest, BuildResult, BuildStatus};

/// A stored build attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: i64,
    pub status: BuildStatus,
    pub title: String,
    /// Bible source the build was generated for, if any
    pub source_id: Option<i64>,
    /// The request as submitted, options included
    pub request: BuildRequest,
    pub output_path: Option<PathBuf>,
    pub slide_count: Option<usize>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to store a build attempt.
#[derive(Debug, Clone)]
pub struct NewBuildRecord {
    pub status: BuildStatus,
    pub title: String,
    pub source_id: Option<i64>,
    pub request: BuildRequest,
    pub output_path: Option<PathBuf>,
    pub slide_count: Option<usize>,
    pub error: Option<String>,
}

impl NewBuildRecord {
    /// Record of a build that ran, successfully or not.
    pub fn from_result(request: &BuildRequest, source_id: Option<i64>, result: &BuildResult) -> Self {
        Self {
            status: result.processed,
            title: request.title_or_default().to_string(),
            source_id,
            request: request.clone(),
            output_path: result.output_path.clone(),
            slide_count: result.slide_count,
            error: result.error.clone(),
        }
    }

    /// Record of a build abandoned before any deck was written.
    pub fn failed(request: &BuildRequest, source_id: Option<i64>, error: impl Into<String>) -> Self {
        Self::from_result(request, source_id, &BuildResult::failure(error))
    }
}
