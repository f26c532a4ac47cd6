use std::fmt;

use crate::hunk::make_hunks;
use crate::{DiffLine, DiffType};

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiffType::Delete => write!(f, "-{}", self.text),
            DiffType::Insert => write!(f, "+{}", self.text),
            // An unchanged empty line renders with no padding prefix.
            DiffType::Equal if self.text.is_empty() => Ok(()),
            DiffType::Equal => write!(f, " {}", self.text),
        }
    }
}

fn join_lines<'a>(lines: impl Iterator<Item = &'a DiffLine>) -> String {
    lines
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a diff as plain text: every line prefixed with `' '`, `'+'`,
/// or `'-'`, joined by newlines.
pub fn diff_text(diffs: &[DiffLine]) -> String {
    join_lines(diffs.iter())
}

/// Renders the source side of a diff: equalities and deletions only.
pub fn source_text(diffs: &[DiffLine]) -> String {
    join_lines(diffs.iter().filter(|l| l.kind != DiffType::Insert))
}

/// Renders the destination side of a diff: equalities and insertions only.
pub fn destination_text(diffs: &[DiffLine]) -> String {
    join_lines(diffs.iter().filter(|l| l.kind != DiffType::Delete))
}

/// Configuration for unified output.
#[derive(Clone, Debug)]
pub struct UnifiedDiffOptions {
    /// Unchanged lines kept before each change.
    pub precontext: usize,
    /// Unchanged lines kept after each change.
    pub postcontext: usize,
    /// Name rendered on the `---` header line, if any.
    pub src_header: Option<String>,
    /// Name rendered on the `+++` header line, if any.
    pub dst_header: Option<String>,
}

impl Default for UnifiedDiffOptions {
    fn default() -> Self {
        Self {
            precontext: 3,
            postcontext: 3,
            src_header: None,
            dst_header: None,
        }
    }
}

/// Renders a diff as unified text with the default options.
pub fn unified_diff_text(diffs: &[DiffLine]) -> String {
    unified_diff_text_with_options(diffs, &UnifiedDiffOptions::default())
}

/// Renders a diff as unified text: optional `---`/`+++` headers followed
/// by `@@`-headered hunks. A diff without modified lines renders as the
/// empty string, headers included.
pub fn unified_diff_text_with_options(diffs: &[DiffLine], options: &UnifiedDiffOptions) -> String {
    let hunks = make_hunks(diffs, options.precontext, options.postcontext);
    if hunks.is_empty() {
        return String::new();
    }

    let mut parts = Vec::with_capacity(hunks.len() + 2);
    if let Some(src) = &options.src_header {
        parts.push(format!("--- {}", src));
    }
    if let Some(dst) = &options.dst_header {
        parts.push(format!("+++ {}", dst));
    }
    parts.extend(hunks.iter().map(ToString::to_string));
    parts.join("\n")
}
