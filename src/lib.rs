//! Line-level diffing with the Patience algorithm.
//!
//! The diff anchors on lines that occur exactly once in both inputs,
//! which keeps frequently repeated lines (blank lines, closing braces)
//! from producing misleading alignments. The result is a flat sequence of
//! tagged [`DiffLine`]s that can be rendered as plain text, filtered down
//! to either side, or grouped into unified-diff [`Hunk`]s.
//!
//! ```
//! use patiencediff::{diff_text, Differ};
//!
//! let differ = Differ::new("the\nquick\nfox", "the\nslow\nfox");
//! assert_eq!(diff_text(&differ.diff()), " the\n-quick\n+slow\n fox");
//! ```

use thiserror::Error;

pub mod differ;
mod format;
mod hunk;

// Re-export the public surface for convenience
pub use differ::{diff, lcs, DiffLine, DiffType, Differ};
pub use format::{
    destination_text, diff_text, source_text, unified_diff_text,
    unified_diff_text_with_options, UnifiedDiffOptions,
};
pub use hunk::{make_hunks, Hunk};

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}
