/*!
 * Compact unified diffs between original and cleaned cue content.
 *
 * Zero context lines and no `---`/`+++` header: the output only holds
 * `@@ -a,b +c,d @@` hunk markers followed by `-` and `+` lines.
 */

/// Kind of edit covering a range of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// An edit over `before[old_start..old_end]` and `after[new_start..new_end]`
#[derive(Debug, Clone, Copy)]
struct Edit {
    kind: EditKind,
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
}

/// Build the hunk-only unified diff of two texts, line by line.
/// Returns an empty string when the line sequences are identical.
pub fn build_unified_diff(before: &str, after: &str) -> String {
    let old_lines: Vec<&str> = before.lines().collect();
    let new_lines: Vec<&str> = after.lines().collect();

    let mut output: Vec<String> = Vec::new();
    for edit in edits(&old_lines, &new_lines) {
        if edit.kind == EditKind::Equal {
            continue;
        }

        output.push(format!(
            "@@ -{} +{} @@",
            format_range(edit.old_start, edit.old_end),
            format_range(edit.new_start, edit.new_end)
        ));

        if matches!(edit.kind, EditKind::Replace | EditKind::Delete) {
            output.extend(old_lines[edit.old_start..edit.old_end].iter().map(|l| format!("-{}", l)));
        }
        if matches!(edit.kind, EditKind::Replace | EditKind::Insert) {
            output.extend(new_lines[edit.new_start..edit.new_end].iter().map(|l| format!("+{}", l)));
        }
    }

    output.join("\n")
}

/// Hunk range as `start,length`, with a lone `start` for single lines and
/// the line before the gap for empty ranges
fn format_range(start: usize, end: usize) -> String {
    let length = end - start;
    match length {
        1 => format!("{}", start + 1),
        0 => format!("{},0", start),
        _ => format!("{},{}", start + 1, length),
    }
}

/// Turn the matching blocks of two line sequences into an edit script
fn edits(old: &[&str], new: &[&str]) -> Vec<Edit> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);

    for (block_old, block_new, size) in matching_blocks(old, new) {
        let kind = match (i < block_old, j < block_new) {
            (true, true) => Some(EditKind::Replace),
            (true, false) => Some(EditKind::Delete),
            (false, true) => Some(EditKind::Insert),
            (false, false) => None,
        };
        if let Some(kind) = kind {
            result.push(Edit { kind, old_start: i, old_end: block_old, new_start: j, new_end: block_new });
        }

        if size > 0 {
            result.push(Edit {
                kind: EditKind::Equal,
                old_start: block_old,
                old_end: block_old + size,
                new_start: block_new,
                new_end: block_new + size,
            });
        }

        i = block_old + size;
        j = block_new + size;
    }

    result
}

/// Matching blocks `(old_index, new_index, size)` found by recursively
/// taking the longest common run, ending with a zero-size sentinel
fn matching_blocks(old: &[&str], new: &[&str]) -> Vec<(usize, usize, usize)> {
    let mut pending = vec![(0, old.len(), 0, new.len())];
    let mut blocks = Vec::new();

    while let Some((old_lo, old_hi, new_lo, new_hi)) = pending.pop() {
        let (i, j, size) = longest_match(old, new, old_lo, old_hi, new_lo, new_hi);
        if size == 0 {
            continue;
        }
        blocks.push((i, j, size));
        if old_lo < i && new_lo < j {
            pending.push((old_lo, i, new_lo, j));
        }
        if i + size < old_hi && j + size < new_hi {
            pending.push((i + size, old_hi, j + size, new_hi));
        }
    }
    blocks.sort_unstable();

    // Adjacent blocks collapse into one
    let mut merged: Vec<(usize, usize, usize)> = Vec::with_capacity(blocks.len() + 1);
    for (i, j, size) in blocks {
        match merged.last_mut() {
            Some(last) if last.0 + last.2 == i && last.1 + last.2 == j => last.2 += size,
            _ => merged.push((i, j, size)),
        }
    }
    merged.push((old.len(), new.len(), 0));
    merged
}

/// Longest run of equal lines inside the given windows; ties go to the
/// earliest run in `old`, then in `new`
fn longest_match(
    old: &[&str],
    new: &[&str],
    old_lo: usize,
    old_hi: usize,
    new_lo: usize,
    new_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (old_lo, new_lo, 0);
    // run_lengths[j] = length of the equal run ending at (i - 1, j)
    let mut run_lengths = vec![0usize; new_hi + 1];

    for i in old_lo..old_hi {
        let mut next = vec![0usize; new_hi + 1];
        for j in new_lo..new_hi {
            if old[i] != new[j] {
                continue;
            }
            let k = if j > new_lo { run_lengths[j - 1] + 1 } else { 1 };
            next[j] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        run_lengths = next;
    }

    (best_i, best_j, best_size)
}
