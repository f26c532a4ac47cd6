mod lcs;
mod patience;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::format::{unified_diff_text_with_options, UnifiedDiffOptions};
use crate::hunk::{make_hunks, Hunk};
use crate::Error;

pub use lcs::lcs;
pub use patience::diff;

/// The relationship of a single line to the two compared sequences.
///
/// The enum is closed and exhaustively matched by every consumer, so a
/// line can never carry an unrenderable tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffType {
    /// The line exists only in the source sequence.
    Delete,
    /// The line exists in both sequences.
    Equal,
    /// The line exists only in the destination sequence.
    Insert,
}

/// A single line of a diff, tagged with its [`DiffType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffLine {
    pub text: String,
    pub kind: DiffType,
}

impl DiffLine {
    pub fn new(text: impl Into<String>, kind: DiffType) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// The base Differ struct that orchestrates the diffing process: it owns
/// the two texts plus the rendering configuration, and exposes the diff as
/// tagged lines, hunks, or unified text.
pub struct Differ {
    old: String,
    new: String,
    precontext: usize,
    postcontext: usize,
    src_header: Option<String>,
    dst_header: Option<String>,
}

impl Differ {
    /// Create a new Differ over the old and new content with the default
    /// context window (3 lines on each side) and no headers.
    pub fn new(old: &str, new: &str) -> Self {
        Self {
            old: old.to_string(),
            new: new.to_string(),
            precontext: 3,
            postcontext: 3,
            src_header: None,
            dst_header: None,
        }
    }

    /// Create a new Differ from the contents of two files.
    pub fn from_files(old: impl AsRef<Path>, new: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(
            &read_input(old.as_ref())?,
            &read_input(new.as_ref())?,
        ))
    }

    /// Set the number of unchanged lines kept before each change in
    /// unified output.
    pub fn precontext(mut self, lines: usize) -> Self {
        self.precontext = lines;
        self
    }

    /// Set the number of unchanged lines kept after each change in
    /// unified output.
    pub fn postcontext(mut self, lines: usize) -> Self {
        self.postcontext = lines;
        self
    }

    /// Set both context sizes at once.
    pub fn context(self, lines: usize) -> Self {
        self.precontext(lines).postcontext(lines)
    }

    /// Set the `---`/`+++` header names for unified output.
    pub fn headers(mut self, src: impl Into<String>, dst: impl Into<String>) -> Self {
        self.src_header = Some(src.into());
        self.dst_header = Some(dst.into());
        self
    }

    /// Compute the patience diff of the two texts as tagged lines.
    pub fn diff(&self) -> Vec<DiffLine> {
        let old_lines: Vec<&str> = self.old.lines().collect();
        let new_lines: Vec<&str> = self.new.lines().collect();
        let diffs = diff(&old_lines, &new_lines);
        debug!(
            old = old_lines.len(),
            new = new_lines.len(),
            diff = diffs.len(),
            "computed patience diff"
        );
        diffs
    }

    /// Group the diff into unified hunks using the configured context
    /// window.
    pub fn hunks(&self) -> Vec<Hunk> {
        make_hunks(&self.diff(), self.precontext, self.postcontext)
    }

    /// Render the diff as unified text using the configured context window
    /// and headers.
    pub fn unified(&self) -> String {
        let options = UnifiedDiffOptions {
            precontext: self.precontext,
            postcontext: self.postcontext,
            src_header: self.src_header.clone(),
            dst_header: self.dst_header.clone(),
        };
        unified_diff_text_with_options(&self.diff(), &options)
    }
}

fn read_input(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}
