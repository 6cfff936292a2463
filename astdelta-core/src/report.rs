//! Line-oriented view of a difference list.
//!
//! Maps each difference's byte range onto the lines of the text it belongs
//! to (removals onto the first text, additions onto the second) and groups
//! the touched lines, widened by a few lines of context, into blocks ready
//! for display.

use serde::Serialize;

use crate::differ::Difference;

/// 1-based line containing `offset`. Offsets past the end map to the line
/// after the last line break.
pub fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    bytecount::count(&text.as_bytes()[..end], b'\n') + 1
}

/// Which input a block was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Before,
    After,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub number: usize,
    pub text: String,
    /// True when a difference touches this line; false for context.
    pub changed: bool,
}

/// Consecutive lines of one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayBlock {
    pub side: Side,
    pub lines: Vec<DisplayLine>,
}

impl DisplayBlock {
    pub fn first_line(&self) -> usize {
        self.lines.first().map_or(0, |l| l.number)
    }

    pub fn last_line(&self) -> usize {
        self.lines.last().map_or(0, |l| l.number)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub removals: Vec<DisplayBlock>,
    pub additions: Vec<DisplayBlock>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty()
    }

    /// Whether lines were skipped between two consecutive blocks of one side.
    pub fn is_gap_between(previous: &DisplayBlock, next: &DisplayBlock) -> bool {
        next.first_line() > previous.last_line() + 1
    }
}

/// Build the display report for a difference list.
pub fn build(before: &str, after: &str, differences: &[Difference], context: usize) -> Report {
    Report {
        removals: blocks(
            Side::Before,
            before,
            differences.iter().filter(|d| d.is_removal()),
            context,
        ),
        additions: blocks(
            Side::After,
            after,
            differences.iter().filter(|d| d.is_addition()),
            context,
        ),
    }
}

fn blocks<'a>(
    side: Side,
    text: &str,
    differences: impl Iterator<Item = &'a Difference>,
    context: usize,
) -> Vec<DisplayBlock> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }
    let last_line = lines.len();

    let mut changed = vec![false; last_line];
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for difference in differences {
        let first = line_of(text, difference.start_offset).min(last_line);
        // end offsets are exclusive
        let end = difference.end_offset.saturating_sub(1).max(difference.start_offset);
        let last = line_of(text, end).min(last_line);

        for flag in &mut changed[first - 1..last] {
            *flag = true;
        }
        ranges.push((first.saturating_sub(context).max(1), (last + context).min(last_line)));
    }

    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(current) if start <= current.1 => current.1 = current.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    merged
        .into_iter()
        .map(|(start, end)| DisplayBlock {
            side,
            lines: (start..=end)
                .map(|number| DisplayLine {
                    number,
                    text: lines[number - 1].to_string(),
                    changed: changed[number - 1],
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::DifferenceKind;

    fn diff(kind: DifferenceKind, start: usize, end: usize) -> Difference {
        Difference {
            kind,
            start_offset: start,
            end_offset: end,
            node_kind: "x".to_string(),
            description: None,
        }
    }

    fn numbers(block: &DisplayBlock) -> Vec<usize> {
        block.lines.iter().map(|l| l.number).collect()
    }

    #[test]
    fn test_line_of() {
        let text = "a\nbb\nccc";
        assert_eq!(line_of(text, 0), 1);
        assert_eq!(line_of(text, 1), 1);
        assert_eq!(line_of(text, 2), 2);
        assert_eq!(line_of(text, 5), 3);
        assert_eq!(line_of(text, 100), 3);
        assert_eq!(line_of("", 0), 1);
    }

    #[test]
    fn test_sides_use_their_own_text() {
        let before = "one\ntwo\n";
        let after = "uno\ndos\ntres\n";
        let diffs = vec![
            diff(DifferenceKind::Removal, 4, 7),
            diff(DifferenceKind::Addition, 8, 12),
        ];
        let report = build(before, after, &diffs, 0);

        assert_eq!(report.removals.len(), 1);
        assert_eq!(report.removals[0].side, Side::Before);
        assert_eq!(report.removals[0].lines[0].text, "two");
        assert!(report.removals[0].lines[0].changed);

        assert_eq!(report.additions.len(), 1);
        assert_eq!(report.additions[0].lines[0].text, "tres");
        assert_eq!(report.additions[0].first_line(), 3);
    }

    #[test]
    fn test_end_offset_is_exclusive() {
        // "a\n" ends exactly at the line break; line 2 must stay untouched
        let report = build("a\nb\n", "", &[diff(DifferenceKind::Removal, 0, 2)], 0);
        assert_eq!(numbers(&report.removals[0]), vec![1]);
    }

    #[test]
    fn test_context_and_merging() {
        let text = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
        let offset = |line: usize| text.match_indices('\n').nth(line - 2).map_or(0, |(i, _)| i + 1);
        let diffs = vec![
            diff(DifferenceKind::Removal, offset(2), offset(2) + 1),
            diff(DifferenceKind::Removal, offset(4), offset(4) + 1),
            diff(DifferenceKind::Removal, offset(9), offset(9) + 1),
        ];
        let report = build(text, "", &diffs, 1);

        assert_eq!(report.removals.len(), 2);
        assert_eq!(numbers(&report.removals[0]), vec![1, 2, 3, 4, 5]);
        assert_eq!(numbers(&report.removals[1]), vec![8, 9, 10]);

        let changed: Vec<usize> = report.removals[0]
            .lines
            .iter()
            .filter(|l| l.changed)
            .map(|l| l.number)
            .collect();
        assert_eq!(changed, vec![2, 4]);
        assert!(Report::is_gap_between(&report.removals[0], &report.removals[1]));
    }

    #[test]
    fn test_adjacent_blocks_have_no_gap() {
        let text = "a\nb\n";
        let report = build(
            text,
            "",
            &[
                diff(DifferenceKind::Removal, 0, 1),
                diff(DifferenceKind::Removal, 2, 3),
            ],
            0,
        );
        assert_eq!(report.removals.len(), 2);
        assert!(!Report::is_gap_between(&report.removals[0], &report.removals[1]));
    }

    #[test]
    fn test_empty() {
        assert!(build("x", "y", &[], 3).is_empty());
        assert!(build("", "", &[diff(DifferenceKind::Addition, 0, 0)], 3).is_empty());
    }
}
