//! Cleanup of protobuf-generated markdown pages.
//!
//! `protoc-gen-doc` output occasionally carries two artifacts that break the
//! rendered site: a level-3 heading whose first word is repeated at the start
//! of the next line, and heading markers indented with stray whitespace.
//! [`normalize`] fixes both in memory; [`normalize_file`] applies it to a file
//! in place and only writes when something changed.

mod normalize;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use protonav_shared::{ProtonavError, Result};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// What a single correction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionKind {
    /// The word of the preceding `###` heading was removed from this line.
    DuplicateHeading { heading: String },
    /// Whitespace before a `##`+ marker was removed.
    HeadingIndent,
}

/// A change made to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// 1-based line number.
    pub line: usize,
    pub kind: CorrectionKind,
    pub before: String,
    pub after: String,
}

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The normalized document.
    pub content: String,
    /// Every correction applied, in scan order.
    pub corrections: Vec<Correction>,
}

impl Normalized {
    /// Whether any line was changed.
    pub fn changed(&self) -> bool {
        !self.corrections.is_empty()
    }
}

/// Result of normalizing a file on disk.
#[derive(Debug, Clone)]
pub struct NormalizeReport {
    pub path: PathBuf,
    pub corrections: Vec<Correction>,
}

impl NormalizeReport {
    /// Whether the file was rewritten.
    pub fn written(&self) -> bool {
        !self.corrections.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Normalize markdown text.
pub fn normalize(content: &str) -> Normalized {
    normalize::run(content)
}

/// Normalize a markdown file in place.
///
/// The file is only rewritten when at least one correction was made. Read and
/// write failures are returned to the caller.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn normalize_file(path: &Path) -> Result<NormalizeReport> {
    let content = std::fs::read_to_string(path).map_err(|e| ProtonavError::io(path, e))?;
    let normalized = normalize(&content);

    for c in &normalized.corrections {
        debug!(line = c.line, before = %c.before, after = %c.after, "corrected line");
    }

    if normalized.changed() {
        std::fs::write(path, &normalized.content).map_err(|e| ProtonavError::io(path, e))?;
        info!(corrections = normalized.corrections.len(), "normalized file");
    } else {
        info!("no changes needed");
    }

    Ok(NormalizeReport {
        path: path.to_path_buf(),
        corrections: normalized.corrections,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
