//! Deck layout and presentation file output.
//!
//! A deck is a title slide followed by content slides
//! filled with the request's items. Lines are estimated from character
//! counts, so packing is approximate.
//!
//! Output files never replace each other: a title whose file already
//! exists gets a numbered name (`Title-2.pptx`, `Title-3.pptx`, ...).
//! When a history repository is attached, every attempt is recorded.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::adapters::deck::writer_for;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    BuildOptions, BuildRecord, BuildRequest, BuildResult, Deck, NewBuildRecord, OutputConfig, Slide,
};
use crate::domain::ports::{BuildHistoryRepository, DeckWriter};

/// Numbered names tried before giving up on a title.
const MAX_NAME_ATTEMPTS: usize = 10_000;

/// Estimated rendered lines for a text: explicit newlines plus wrapped
/// lines at `chars_per_line`, never less than one.
pub fn estimate_lines(text: &str, chars_per_line: usize) -> usize {
    let newlines = text.matches('\n').count();
    let wrapped = text.chars().count().div_ceil(chars_per_line.max(1));
    (newlines + wrapped).max(1)
}

/// File stem derived from a deck title: letters, digits, `-` and `_` are
/// kept, whitespace becomes `_`, everything else is dropped.
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    if stem.is_empty() {
        "deck".to_string()
    } else {
        stem
    }
}

/// Create `dir/stem.ext`, or the first free `dir/stem-N.ext`.
///
/// `create_new` makes the check and the creation one step, so concurrent
/// builds with the same title always end up with distinct files.
pub fn create_unique_file(dir: &Path, stem: &str, extension: &str) -> io::Result<(PathBuf, File)> {
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let name = if attempt == 1 {
            format!("{stem}.{extension}")
        } else {
            format!("{stem}-{attempt}.{extension}")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free file name for {stem}.{extension} in {}", dir.display()),
    ))
}

fn write_new_file(dir: &Path, stem: &str, extension: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let (path, mut file) = create_unique_file(dir, stem, extension)?;
    if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }
    Ok(path)
}

/// Lays out decks and writes them through a [`DeckWriter`].
pub struct BuildService {
    writer: Arc<dyn DeckWriter>,
    output_dir: PathBuf,
    default_options: BuildOptions,
    history: Option<Arc<dyn BuildHistoryRepository>>,
}

impl BuildService {
    pub fn new(writer: Arc<dyn DeckWriter>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            output_dir: output_dir.into(),
            default_options: BuildOptions::default(),
            history: None,
        }
    }

    /// Record every build attempt in `history`.
    pub fn with_history(mut self, history: Arc<dyn BuildHistoryRepository>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(writer_for(config.format), &config.dir).with_options(BuildOptions {
            max_lines_per_slide: config.max_lines_per_slide,
            chars_per_line: config.chars_per_line,
        })
    }

    /// Layout options used when a request carries none.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Arrange a request into slides.
    pub fn layout(&self, request: &BuildRequest) -> Deck {
        let title = request.title_or_default().to_string();
        let options = request.options.unwrap_or(self.default_options);

        let mut slides = vec![Slide::title(title.clone())];
        let mut body: Vec<String> = Vec::new();
        let mut used_lines = 0;

        for item in request.item_texts() {
            let lines = estimate_lines(&item, options.chars_per_line);
            let full = options.max_lines_per_slide == 0 || used_lines + lines > options.max_lines_per_slide;
            if !body.is_empty() && full {
                slides.push(Slide { heading: title.clone(), body: std::mem::take(&mut body) });
                used_lines = 0;
            }
            used_lines += lines;
            body.push(item);
        }
        if !body.is_empty() {
            slides.push(Slide { heading: title.clone(), body });
        }

        Deck { title, slides }
    }

    /// Lay out and write a deck to a new file. Returns the file's path.
    #[instrument(skip(self, request), fields(title = %request.title_or_default()), err)]
    pub async fn build_deck(&self, request: &BuildRequest) -> DomainResult<(PathBuf, usize)> {
        let deck = self.layout(request);
        let slide_count = deck.slides.len();

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let writer = Arc::clone(&self.writer);
        let dir = self.output_dir.clone();
        let path = tokio::task::spawn_blocking(move || -> DomainResult<PathBuf> {
            let bytes = writer.encode(&deck)?;
            Ok(write_new_file(&dir, &file_stem(&deck.title), writer.extension(), &bytes)?)
        })
        .await
        .map_err(|e| DomainError::OutputError(format!("deck writer task failed: {e}")))??;

        info!(path = %path.display(), slide_count, "deck written");
        Ok((path, slide_count))
    }

    /// Build a deck and report the outcome instead of failing.
    pub async fn process_build_data(&self, request: &BuildRequest) -> BuildResult {
        self.process_for_source(request, None).await
    }

    /// [`process_build_data`](Self::process_build_data) for a build
    /// generated from a bible source; the source id goes into the history.
    pub async fn process_for_source(&self, request: &BuildRequest, source_id: Option<i64>) -> BuildResult {
        let result = match self.build_deck(request).await {
            Ok((path, slide_count)) => BuildResult::success(path, slide_count),
            Err(e) => {
                warn!(error = %e, "deck build failed");
                BuildResult::failure(e.to_string())
            }
        };
        self.record(NewBuildRecord::from_result(request, source_id, &result)).await;
        result
    }

    /// Record an attempt that failed before a deck could be built.
    pub async fn record_failure(&self, request: &BuildRequest, source_id: Option<i64>, error: &str) {
        self.record(NewBuildRecord::failed(request, source_id, error)).await;
    }

    /// History failures are logged and never fail the build itself.
    async fn record(&self, record: NewBuildRecord) {
        let Some(history) = &self.history else {
            return;
        };
        if let Err(e) = history.record(&record).await {
            warn!(error = %e, title = %record.title, "failed to record build history");
        }
    }

    /// Recorded attempts, newest first. Empty without a history repository.
    pub async fn history(&self) -> DomainResult<Vec<BuildRecord>> {
        match &self.history {
            Some(history) => history.list().await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn find_record(&self, id: i64) -> DomainResult<Option<BuildRecord>> {
        match &self.history {
            Some(history) => history.get(id).await,
            None => Ok(None),
        }
    }

    pub async fn delete_record(&self, id: i64) -> DomainResult<()> {
        match &self.history {
            Some(history) => history.delete(id).await,
            None => Err(DomainError::BuildRecordNotFound(id)),
        }
    }
}
