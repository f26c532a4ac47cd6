use std::cmp::min;
use std::fmt;

use tracing::debug;

use crate::{DiffLine, DiffType};

/// A contiguous subsection of a diff: context lines plus at least one
/// change, with 1-indexed source/destination line numbers.
///
/// `src_start`/`dst_start` are `0` only when the hunk contains no source
/// (respectively destination) lines at all, which can happen for diffs
/// consisting purely of insertions or purely of deletions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hunk {
    pub lines: Vec<DiffLine>,
    pub src_start: usize,
    pub src_lines: usize,
    pub dst_start: usize,
    pub dst_lines: usize,
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@",
            self.src_start, self.src_lines, self.dst_start, self.dst_lines
        )?;
        for line in &self.lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

/// A maximal run of diff lines that are either all `Equal` or all
/// changes. A `Delete` line and an adjacent `Insert` line share a block.
/// Line-number starts stay unset until the block acquires a line on that
/// side; they become the numeric sentinel only on a finished [`Hunk`].
#[derive(Default)]
struct Block {
    lines: Vec<DiffLine>,
    src_start: Option<usize>,
    src_lines: usize,
    dst_start: Option<usize>,
    dst_lines: usize,
}

impl Block {
    fn accepts(&self, kind: DiffType) -> bool {
        match self.lines.first() {
            None => true,
            Some(first) => {
                first.kind == kind
                    || (first.kind != DiffType::Equal && kind != DiffType::Equal)
            }
        }
    }

    fn src_start(&self) -> usize {
        self.src_start.unwrap_or(0)
    }

    fn dst_start(&self) -> usize {
        self.dst_start.unwrap_or(0)
    }
}

struct HunkBuilder {
    hunks: Vec<Hunk>,
    precontext: usize,
    postcontext: usize,
}

impl HunkBuilder {
    fn push_block(&mut self, block: Block, last_block: bool) {
        if block.lines[0].kind == DiffType::Equal {
            self.push_unmodified(block, last_block);
        } else {
            self.push_modified(block);
        }
    }

    fn push_modified(&mut self, block: Block) {
        match self.hunks.last_mut() {
            Some(hunk) => {
                hunk.lines.extend(block.lines);
                hunk.src_lines += block.src_lines;
                hunk.dst_lines += block.dst_lines;
            }
            None => self.hunks.push(Hunk {
                src_start: block.src_start(),
                src_lines: block.src_lines,
                dst_start: block.dst_start(),
                dst_lines: block.dst_lines,
                lines: block.lines,
            }),
        }
    }

    fn push_unmodified(&mut self, block: Block, last_block: bool) {
        if self.hunks.is_empty() {
            // Look-ahead context for the upcoming change; anything before
            // the window is dropped.
            self.open_hunk_with_tail(&block, min(self.precontext, block.lines.len()));
            return;
        }

        let cap = if last_block {
            self.postcontext
        } else {
            self.precontext + self.postcontext
        };

        let fold = block.lines.len() <= cap;
        {
            let last = self.hunks.len() - 1;
            let current = &mut self.hunks[last];
            if fold {
                // Cheaper to keep a short unchanged run inside the hunk
                // than to split it.
                current.src_lines += block.lines.len();
                current.dst_lines += block.lines.len();
                current.lines.extend_from_slice(&block.lines);
            } else {
                // The head of the block closes the current hunk.
                current.src_lines += self.postcontext;
                current.dst_lines += self.postcontext;
                current
                    .lines
                    .extend_from_slice(&block.lines[..self.postcontext]);
            }

            // Back-fill starts for hunks that began with pure insertions
            // or deletions and had no line number on this side yet.
            if current.src_start == 0 {
                current.src_start = block.src_start();
            }
            if current.dst_start == 0 {
                current.dst_start = block.dst_start();
            }
        }

        if !fold && !last_block {
            self.open_hunk_with_tail(&block, self.precontext);
        }
    }

    fn open_hunk_with_tail(&mut self, block: &Block, context: usize) {
        let skip = block.lines.len() - context;
        self.hunks.push(Hunk {
            lines: block.lines[skip..].to_vec(),
            src_start: skip + block.src_start(),
            src_lines: context,
            dst_start: skip + block.dst_start(),
            dst_lines: context,
        });
    }
}

/// Groups a flat diff into unified hunks.
///
/// `precontext` and `postcontext` bound how many unchanged lines are kept
/// before and after each change. Two changes separated by an unchanged run
/// no longer than `precontext + postcontext` share a hunk; the final
/// unchanged run is capped at `postcontext` alone, since no look-ahead
/// context is needed past the last change. A diff without modified lines
/// produces no hunks.
pub fn make_hunks(diffs: &[DiffLine], precontext: usize, postcontext: usize) -> Vec<Hunk> {
    if diffs.is_empty() {
        return Vec::new();
    }

    let mut builder = HunkBuilder {
        hunks: Vec::new(),
        precontext,
        postcontext,
    };

    // Scan once, aggregating blocks of modified and unmodified lines and
    // flushing each finished block into the builder. The running counters
    // are 1-indexed line numbers: the source side advances on Equal and
    // Delete, the destination side on Equal and Insert.
    let mut block = Block::default();
    let mut modified_lines = 0usize;
    let mut src_line = 0usize;
    let mut dst_line = 0usize;
    for line in diffs {
        if !block.accepts(line.kind) {
            builder.push_block(block, false);
            block = Block::default();
        }
        block.lines.push(line.clone());

        match line.kind {
            DiffType::Delete => {
                src_line += 1;
                block.src_lines += 1;
                modified_lines += 1;
            }
            DiffType::Insert => {
                dst_line += 1;
                block.dst_lines += 1;
                modified_lines += 1;
            }
            DiffType::Equal => {
                src_line += 1;
                dst_line += 1;
                block.src_lines += 1;
                block.dst_lines += 1;
            }
        }

        if block.src_start.is_none() && line.kind != DiffType::Insert {
            block.src_start = Some(src_line);
        }
        if block.dst_start.is_none() && line.kind != DiffType::Delete {
            block.dst_start = Some(dst_line);
        }
    }
    builder.push_block(block, true);

    if modified_lines == 0 {
        return Vec::new();
    }

    debug!(hunks = builder.hunks.len(), "grouped diff into hunks");
    builder.hunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e() -> DiffLine {
        DiffLine::new("e", DiffType::Equal)
    }

    fn i() -> DiffLine {
        DiffLine::new("i", DiffType::Insert)
    }

    fn d() -> DiffLine {
        DiffLine::new("d", DiffType::Delete)
    }

    fn hunk(
        lines: Vec<DiffLine>,
        src_start: usize,
        src_lines: usize,
        dst_start: usize,
        dst_lines: usize,
    ) -> Hunk {
        Hunk {
            lines,
            src_start,
            src_lines,
            dst_start,
            dst_lines,
        }
    }

    #[test]
    fn test_empty_diff() {
        assert_eq!(make_hunks(&[], 2, 2), vec![]);
    }

    #[test]
    fn test_all_equalities() {
        assert_eq!(make_hunks(&[e(), e(), e(), e()], 2, 2), vec![]);
    }

    #[test]
    fn test_all_modifications() {
        assert_eq!(
            make_hunks(&[i(), i(), i(), i(), d(), d(), d(), d()], 2, 2),
            vec![hunk(vec![i(), i(), i(), i(), d(), d(), d(), d()], 1, 4, 1, 4)]
        );
    }

    #[test]
    fn test_deletions_only() {
        assert_eq!(
            make_hunks(&[d(), d(), d(), d()], 2, 2),
            vec![hunk(vec![d(), d(), d(), d()], 1, 4, 0, 0)]
        );
    }

    #[test]
    fn test_insertions_only() {
        assert_eq!(
            make_hunks(&[i(), i(), i(), i()], 2, 2),
            vec![hunk(vec![i(), i(), i(), i()], 0, 0, 1, 4)]
        );
    }

    #[test]
    fn test_deletions_and_equalities_only() {
        assert_eq!(
            make_hunks(&[d(), d(), e(), e(), e()], 2, 2),
            vec![hunk(vec![d(), d(), e(), e()], 1, 4, 1, 2)]
        );
    }

    #[test]
    fn test_insertions_and_equalities_only() {
        assert_eq!(
            make_hunks(&[i(), i(), e(), e(), e()], 2, 2),
            vec![hunk(vec![i(), i(), e(), e()], 1, 2, 1, 4)]
        );
    }

    #[test]
    fn test_dst_start_back_fill() {
        // The first hunk has no destination lines until its trailing
        // context arrives.
        assert_eq!(
            make_hunks(
                &[d(), d(), e(), e(), e(), e(), e(), e(), e(), d(), d()],
                3,
                3
            ),
            vec![
                hunk(vec![d(), d(), e(), e(), e()], 1, 5, 1, 3),
                hunk(vec![e(), e(), e(), d(), d()], 7, 5, 5, 3),
            ]
        );
    }

    #[test]
    fn test_src_start_back_fill() {
        assert_eq!(
            make_hunks(
                &[i(), i(), e(), e(), e(), e(), e(), e(), e(), i(), i()],
                3,
                3
            ),
            vec![
                hunk(vec![i(), i(), e(), e(), e()], 1, 3, 1, 5),
                hunk(vec![e(), e(), e(), i(), i()], 5, 3, 7, 5),
            ]
        );
    }

    #[test]
    fn test_equal_blocks_longer_than_context_split_hunks() {
        assert_eq!(
            make_hunks(
                &[
                    e(),
                    e(),
                    e(),
                    d(),
                    i(),
                    i(),
                    e(),
                    e(),
                    e(),
                    e(),
                    e(),
                    d(),
                    i(),
                    e(),
                    e(),
                    e()
                ],
                2,
                2
            ),
            vec![
                hunk(vec![e(), e(), d(), i(), i(), e(), e()], 2, 5, 2, 6),
                hunk(vec![e(), e(), d(), i(), e(), e()], 8, 5, 9, 5),
            ]
        );
    }

    #[test]
    fn test_equal_blocks_shorter_than_context_merge_hunks() {
        assert_eq!(
            make_hunks(&[e(), d(), i(), e(), d(), i(), e()], 2, 2),
            vec![hunk(vec![e(), d(), i(), e(), d(), i(), e()], 1, 5, 1, 5)]
        );
    }

    #[test]
    fn test_maximum_equal_block_size_within_a_hunk() {
        // Exactly precontext + postcontext unchanged lines still fold in.
        assert_eq!(
            make_hunks(&[d(), i(), e(), e(), e(), e(), d(), i()], 2, 2),
            vec![hunk(vec![d(), i(), e(), e(), e(), e(), d(), i()], 1, 6, 1, 6)]
        );
    }

    #[test]
    fn test_multiple_modified_blocks_within_a_hunk() {
        assert_eq!(
            make_hunks(
                &[
                    d(),
                    i(),
                    e(),
                    e(),
                    e(),
                    e(),
                    d(),
                    d(),
                    i(),
                    e(),
                    e(),
                    e(),
                    d(),
                    i(),
                    e(),
                    e(),
                    e(),
                    e(),
                    e(),
                    d(),
                    i(),
                    e(),
                    e(),
                    e()
                ],
                2,
                2
            ),
            vec![
                hunk(
                    vec![
                        d(),
                        i(),
                        e(),
                        e(),
                        e(),
                        e(),
                        d(),
                        d(),
                        i(),
                        e(),
                        e(),
                        e(),
                        d(),
                        i(),
                        e(),
                        e()
                    ],
                    1,
                    13,
                    1,
                    12
                ),
                hunk(vec![e(), e(), d(), i(), e(), e()], 15, 5, 14, 5),
            ]
        );
    }

    #[test]
    fn test_differing_pre_and_post_contexts() {
        assert_eq!(
            make_hunks(
                &[
                    d(),
                    i(),
                    e(),
                    e(),
                    e(),
                    e(),
                    d(),
                    d(),
                    i(),
                    e(),
                    e(),
                    e(),
                    d(),
                    d(),
                    i(),
                    e(),
                    e(),
                    e(),
                    e(),
                    e(),
                    d(),
                    i(),
                    e(),
                    e(),
                    e()
                ],
                2,
                1
            ),
            vec![
                hunk(vec![d(), i(), e()], 1, 2, 1, 2),
                hunk(
                    vec![e(), e(), d(), d(), i(), e(), e(), e(), d(), d(), i(), e()],
                    4,
                    10,
                    4,
                    8
                ),
                hunk(vec![e(), e(), d(), i(), e()], 16, 4, 14, 4),
            ]
        );
    }

    #[test]
    fn test_no_context() {
        assert_eq!(
            make_hunks(&[d(), i(), e(), e(), e(), e(), d(), i(), e(), e(), e()], 0, 0),
            vec![
                hunk(vec![d(), i()], 1, 1, 1, 1),
                hunk(vec![d(), i()], 6, 1, 6, 1),
            ]
        );
    }

    #[test]
    fn test_equal_block_head_and_tail_content() {
        let line = |text: &str, kind| DiffLine::new(text, kind);
        let diffs = vec![
            line("1", DiffType::Equal),
            line("2", DiffType::Equal),
            line("3", DiffType::Equal),
            line("4", DiffType::Delete),
            line("5", DiffType::Insert),
            line("6", DiffType::Insert),
            line("7", DiffType::Equal),
            line("8", DiffType::Equal),
            line("9", DiffType::Equal),
            line("10", DiffType::Equal),
            line("11", DiffType::Equal),
            line("12", DiffType::Delete),
            line("13", DiffType::Insert),
            line("14", DiffType::Equal),
            line("15", DiffType::Equal),
            line("16", DiffType::Equal),
        ];

        assert_eq!(
            make_hunks(&diffs, 2, 2),
            vec![
                hunk(
                    vec![
                        line("2", DiffType::Equal),
                        line("3", DiffType::Equal),
                        line("4", DiffType::Delete),
                        line("5", DiffType::Insert),
                        line("6", DiffType::Insert),
                        line("7", DiffType::Equal),
                        line("8", DiffType::Equal),
                    ],
                    2,
                    5,
                    2,
                    6
                ),
                hunk(
                    vec![
                        line("10", DiffType::Equal),
                        line("11", DiffType::Equal),
                        line("12", DiffType::Delete),
                        line("13", DiffType::Insert),
                        line("14", DiffType::Equal),
                        line("15", DiffType::Equal),
                    ],
                    8,
                    5,
                    9,
                    5
                ),
            ]
        );
    }

    #[test]
    fn test_hunk_display() {
        let h = hunk(
            vec![
                DiffLine::new("ctx", DiffType::Equal),
                DiffLine::new("old", DiffType::Delete),
                DiffLine::new("new", DiffType::Insert),
            ],
            3,
            2,
            3,
            2,
        );
        assert_eq!(h.to_string(), "@@ -3,2 +3,2 @@\n ctx\n-old\n+new");
    }
}
