use std::collections::HashMap;

use super::lcs::lcs;
use super::{DiffLine, DiffType};

/// Pending work for the diff loop. Tasks are pushed in reverse output
/// order, so popping them yields diff lines front to back.
enum Task<'a> {
    /// Compare a pair of line ranges.
    Ranges(&'a [&'a str], &'a [&'a str]),
    /// Append a run of lines with a fixed tag.
    Emit(&'a [&'a str], DiffType),
}

/// Computes the patience diff of two line slices.
///
/// The result interleaves `Delete`, `Equal`, and `Insert` lines such that
/// the `Equal`+`Delete` lines reproduce `a` and the `Equal`+`Insert` lines
/// reproduce `b`, in order. Sub-problems are processed on an explicit work
/// stack, so arbitrarily nested inputs cannot exhaust the call stack.
pub fn diff<'a>(a: &'a [&'a str], b: &'a [&'a str]) -> Vec<DiffLine> {
    let mut diffs = Vec::new();
    let mut tasks = vec![Task::Ranges(a, b)];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Emit(lines, kind) => push_lines(&mut diffs, lines, kind),
            Task::Ranges(a, b) => compare(a, b, &mut diffs, &mut tasks),
        }
    }
    diffs
}

/// One step of the patience algorithm over the ranges `a` and `b`. Emits
/// directly onto `diffs` where the output is already determined and queues
/// narrowed sub-ranges otherwise.
fn compare<'a>(
    a: &'a [&'a str],
    b: &'a [&'a str],
    diffs: &mut Vec<DiffLine>,
    tasks: &mut Vec<Task<'a>>,
) {
    if a.is_empty() && b.is_empty() {
        return;
    }
    if a.is_empty() {
        push_lines(diffs, b, DiffType::Insert);
        return;
    }
    if b.is_empty() {
        push_lines(diffs, a, DiffType::Delete);
        return;
    }

    // Equal run at the head.
    let head = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    if head > 0 {
        push_lines(diffs, &a[..head], DiffType::Equal);
        tasks.push(Task::Ranges(&a[head..], &b[head..]));
        return;
    }

    // Equal run at the tail.
    let tail = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    if tail > 0 {
        tasks.push(Task::Emit(&a[a.len() - tail..], DiffType::Equal));
        tasks.push(Task::Ranges(&a[..a.len() - tail], &b[..b.len() - tail]));
        return;
    }

    // Anchor on lines that occur exactly once in each range. Anchoring
    // only on such lines avoids false alignments on frequently repeated
    // content like blank lines and closing braces.
    let (unique_a, indices_a) = unique_lines(a);
    let (unique_b, indices_b) = unique_lines(b);
    let anchors = lcs(&unique_a, &unique_b);

    // No trustworthy alignment point: the whole range is a replacement.
    if anchors.is_empty() {
        push_lines(diffs, a, DiffType::Delete);
        push_lines(diffs, b, DiffType::Insert);
        return;
    }

    // Queue the gap before each anchor, the anchor itself, and the gap
    // after the last anchor, back to front.
    let (last_a, last_b) = anchors[anchors.len() - 1];
    tasks.push(Task::Ranges(
        &a[indices_a[last_a] + 1..],
        &b[indices_b[last_b] + 1..],
    ));
    for k in (0..anchors.len()).rev() {
        let (ai, bj) = (indices_a[anchors[k].0], indices_b[anchors[k].1]);
        let (ga, gb) = match k {
            0 => (0, 0),
            _ => (
                indices_a[anchors[k - 1].0] + 1,
                indices_b[anchors[k - 1].1] + 1,
            ),
        };
        tasks.push(Task::Emit(&a[ai..=ai], DiffType::Equal));
        tasks.push(Task::Ranges(&a[ga..ai], &b[gb..bj]));
    }
}

fn push_lines(diffs: &mut Vec<DiffLine>, lines: &[&str], kind: DiffType) {
    diffs.extend(lines.iter().map(|l| DiffLine::new(*l, kind)));
}

/// Returns the lines occurring exactly once in `lines`, in order, together
/// with their original indices.
fn unique_lines<'a>(lines: &[&'a str]) -> (Vec<&'a str>, Vec<usize>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &line in lines {
        *counts.entry(line).or_insert(0) += 1;
    }

    let mut elements = Vec::new();
    let mut indices = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if counts[line] == 1 {
            elements.push(*line);
            indices.push(i);
        }
    }
    (elements, indices)
}
