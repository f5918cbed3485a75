//! Selection-range algebra: validation, consolidation, and copy/paste
//! resolution over ordered collections of [`Range`]s.
//!
//! These operations are pure so selection behavior stays testable without a
//! DOM. The interaction layer in `grid` feeds them click and key events.

use crate::range::{CellCoord, PasteTarget, Range};

/// Selectability predicate for a row or column index.
pub type SelectPredicate<'a> = &'a dyn Fn(u32) -> bool;

/// Modifier keys active during a mouse click.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickModifiers {
    pub shift: bool,
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub ctrl_or_meta: bool,
}

/// The selection pieces consulted when resolving a cut/copy/paste target.
#[derive(Debug, Clone, Copy)]
pub struct SelectionSnapshot<'a> {
    pub arrow_selection: Option<Range>,
    pub ranges: &'a [Range],
    pub focused: Option<CellCoord>,
}

/// Collect the maximal runs of consecutive selectable indices in
/// `start..=end`, in ascending order.
fn selectable_segments(start: u32, end: u32, can_select: SelectPredicate) -> Vec<(u32, u32)> {
    let mut segments = Vec::new();
    let mut run_start: Option<u32> = None;
    for idx in start..=end {
        if can_select(idx) {
            if run_start.is_none() {
                run_start = Some(idx);
            }
        } else if let Some(s) = run_start.take() {
            segments.push((s, idx - 1));
        }
    }
    if let Some(s) = run_start {
        segments.push((s, end));
    }
    segments
}

/// Shrink each range to its selectable sub-ranges.
///
/// Rows and columns are filtered independently through their predicates and
/// split into maximal selectable segments; the output contains the cross
/// product of the surviving row and column segments. A range with no
/// selectable rows (or columns) is dropped entirely. With no predicates this
/// is the identity.
pub fn validate_ranges(
    ranges: &[Range],
    can_select_row: Option<SelectPredicate>,
    can_select_column: Option<SelectPredicate>,
) -> Vec<Range> {
    if can_select_row.is_none() && can_select_column.is_none() {
        return ranges.to_vec();
    }

    let mut validated = Vec::new();
    for range in ranges {
        let row_segments = match can_select_row {
            Some(pred) => selectable_segments(range.row_start, range.row_end, pred),
            None => vec![(range.row_start, range.row_end)],
        };
        let column_segments = match can_select_column {
            Some(pred) => selectable_segments(range.column_start, range.column_end, pred),
            None => vec![(range.column_start, range.column_end)],
        };
        for &(row_start, row_end) in &row_segments {
            for &(column_start, column_end) in &column_segments {
                validated.push(Range {
                    row_start,
                    row_end,
                    column_start,
                    column_end,
                });
            }
        }
    }
    validated
}

/// Merge row-band ranges into a minimal set of disjoint, non-adjacent bands.
///
/// Only meaningful in row-selection mode, where every range spans the full
/// column width. Ranges are sorted by `row_start` and greedily merged while
/// the next band starts at or before one row past the pending band's end.
pub fn consolidate_row_ranges(ranges: &[Range]) -> Vec<Range> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| r.row_start);

    let mut consolidated: Vec<Range> = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(mut pending) = iter.next() else {
        return Vec::new();
    };
    for range in iter {
        if range.row_start > pending.row_end.saturating_add(1) {
            consolidated.push(pending);
            pending = range;
        } else {
            pending.row_end = pending.row_end.max(range.row_end);
        }
    }
    consolidated.push(pending);
    consolidated
}

/// Drop every range fully contained by another range in the set.
///
/// Exact duplicates keep their first occurrence, so consolidation is
/// idempotent and a selection can never eliminate itself. O(n²), which is
/// fine: selections are human-sized.
pub fn consolidate_contained_ranges(ranges: &[Range]) -> Vec<Range> {
    ranges
        .iter()
        .enumerate()
        .filter(|&(idx, range)| {
            !ranges.iter().enumerate().any(|(other_idx, other)| {
                other_idx != idx
                    && other.contains_range(range)
                    && (other != range || other_idx < idx)
            })
        })
        .map(|(_, range)| *range)
        .collect()
}

/// Resolve the ranges a cut/copy operation reads from.
///
/// Precedence: the keyboard arrow selection wins outright; otherwise the
/// stored mouse selection; otherwise a singleton synthesized from the focused
/// cell. The last returned range is the single-range copy source.
pub fn resolve_copy_ranges(snapshot: &SelectionSnapshot) -> Vec<Range> {
    if let Some(arrow) = snapshot.arrow_selection {
        return vec![arrow];
    }
    if !snapshot.ranges.is_empty() {
        return snapshot.ranges.to_vec();
    }
    snapshot.focused.map(Range::cell).into_iter().collect()
}

/// Resolve the destination rectangles a paste writes into.
///
/// Same precedence as [`resolve_copy_ranges`], except a destination
/// synthesized from the focused cell is open-ended so a tabular paste can
/// grow to fit one tile of the source.
pub fn resolve_paste_targets(snapshot: &SelectionSnapshot) -> Vec<PasteTarget> {
    if let Some(arrow) = snapshot.arrow_selection {
        return vec![PasteTarget::from_range(&arrow)];
    }
    if !snapshot.ranges.is_empty() {
        return snapshot.ranges.iter().map(PasteTarget::from_range).collect();
    }
    snapshot
        .focused
        .map(PasteTarget::grow_from)
        .into_iter()
        .collect()
}

/// Apply a click in row-selection mode, returning the updated range set.
///
/// Ctrl/Cmd toggles the clicked row in or out of the selection, shift
/// stretches the last range toward the clicked row, and a plain click
/// replaces the selection with the clicked row.
pub fn apply_row_click(
    ranges: &[Range],
    row: u32,
    column_count: u32,
    allow_multi_select: bool,
    modifiers: &ClickModifiers,
) -> Vec<Range> {
    let clicked = Range::rows(row, row, column_count);
    if !allow_multi_select {
        return vec![clicked];
    }

    if modifiers.ctrl_or_meta {
        let mut next = ranges.to_vec();
        if let Some(idx) = next.iter().position(|r| r.contains_row(row)) {
            let Some(existing) = next.get(idx).copied() else {
                return next;
            };
            let old_end = existing.row_end;
            if existing.row_start == existing.row_end || row == existing.row_start {
                // Single row, or truncating at the head leaves nothing.
                next.remove(idx);
            } else if let Some(r) = next.get_mut(idx) {
                r.row_end = row - 1;
            }
            if row < old_end {
                next.push(Range::rows(row + 1, old_end, column_count));
            }
        } else {
            next.push(clicked);
        }
        return next;
    }

    if modifiers.shift && !ranges.is_empty() {
        let mut next = ranges.to_vec();
        if let Some(last) = next.last_mut() {
            if last.contains_row(row) {
                last.row_start = row;
            } else {
                last.row_start = last.row_start.min(row);
                last.row_end = last.row_end.max(row);
            }
        }
        return next;
    }

    vec![clicked]
}

/// Apply a click in range-selection mode.
///
/// Shift anchors a rectangle at the previously focused cell; ctrl appends a
/// one-cell range; a plain click clears the selection. Returns the updated
/// range set and the new focus (None when focus is unchanged).
pub fn apply_range_click(
    ranges: &[Range],
    clicked: CellCoord,
    focused: Option<CellCoord>,
    allow_multi_select: bool,
    modifiers: &ClickModifiers,
) -> (Vec<Range>, Option<CellCoord>) {
    if modifiers.shift {
        let anchor = focused.unwrap_or(clicked);
        return (vec![Range::between(clicked, anchor)], None);
    }

    let next = if allow_multi_select && modifiers.ctrl_or_meta {
        let mut next = ranges.to_vec();
        next.push(Range::cell(clicked));
        next
    } else {
        Vec::new()
    };
    (next, Some(clicked))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn row_band(start: u32, end: u32) -> Range {
        Range::rows(start, end, 8)
    }

    #[test]
    fn test_validate_without_predicates_is_identity() {
        let ranges = vec![Range::new(0, 4, 1, 3)];
        assert_eq!(validate_ranges(&ranges, None, None), ranges);
    }

    #[test]
    fn test_validate_splits_around_unselectable_row() {
        let ranges = vec![Range::new(0, 4, 0, 2)];
        let pred = |row: u32| row != 2;
        let validated = validate_ranges(&ranges, Some(&pred), None);
        assert_eq!(
            validated,
            vec![Range::new(0, 1, 0, 2), Range::new(3, 4, 0, 2)]
        );
    }

    #[test]
    fn test_validate_drops_fully_unselectable_range() {
        let ranges = vec![Range::new(2, 3, 0, 0)];
        let pred = |row: u32| !(2..=3).contains(&row);
        assert!(validate_ranges(&ranges, Some(&pred), None).is_empty());
    }

    #[test]
    fn test_validate_crosses_row_and_column_segments() {
        let ranges = vec![Range::new(0, 2, 0, 2)];
        let row_pred = |row: u32| row != 1;
        let col_pred = |col: u32| col != 1;
        let validated = validate_ranges(&ranges, Some(&row_pred), Some(&col_pred));
        assert_eq!(
            validated,
            vec![
                Range::new(0, 0, 0, 0),
                Range::new(0, 0, 2, 2),
                Range::new(2, 2, 0, 0),
                Range::new(2, 2, 2, 2),
            ]
        );
    }

    #[test]
    fn test_consolidate_row_ranges_merges_adjacent() {
        let ranges = vec![row_band(1, 3), row_band(4, 4), row_band(6, 7)];
        let merged = consolidate_row_ranges(&ranges);
        assert_eq!(merged, vec![row_band(1, 4), row_band(6, 7)]);
    }

    #[test]
    fn test_consolidate_row_ranges_unsorted_overlap() {
        let ranges = vec![row_band(6, 9), row_band(0, 2), row_band(2, 5)];
        let merged = consolidate_row_ranges(&ranges);
        assert_eq!(merged, vec![row_band(0, 5), row_band(6, 9)]);
    }

    #[test]
    fn test_consolidate_contained_drops_subset() {
        let a = Range::new(0, 5, 0, 5);
        let b = Range::new(1, 2, 1, 2);
        assert_eq!(consolidate_contained_ranges(&[a, b]), vec![a]);
    }

    #[test]
    fn test_consolidate_contained_is_idempotent() {
        let ranges = vec![
            Range::new(0, 5, 0, 5),
            Range::new(1, 2, 1, 2),
            Range::new(4, 8, 0, 2),
            Range::new(4, 8, 0, 2),
        ];
        let once = consolidate_contained_ranges(&ranges);
        let twice = consolidate_contained_ranges(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_consolidate_contained_keeps_one_duplicate() {
        let r = Range::new(1, 2, 1, 2);
        assert_eq!(consolidate_contained_ranges(&[r, r]), vec![r]);
    }

    #[test]
    fn test_resolve_arrow_selection_wins() {
        let stored = vec![Range::new(0, 3, 0, 3)];
        let arrow = Range::new(5, 6, 1, 2);
        let snapshot = SelectionSnapshot {
            arrow_selection: Some(arrow),
            ranges: &stored,
            focused: Some(CellCoord::new(0, 0)),
        };
        assert_eq!(resolve_copy_ranges(&snapshot), vec![arrow]);
        assert_eq!(
            resolve_paste_targets(&snapshot),
            vec![PasteTarget::from_range(&arrow)]
        );
    }

    #[test]
    fn test_resolve_focused_cell_copy_is_closed() {
        let snapshot = SelectionSnapshot {
            arrow_selection: None,
            ranges: &[],
            focused: Some(CellCoord::new(3, 2)),
        };
        assert_eq!(
            resolve_copy_ranges(&snapshot),
            vec![Range::new(3, 3, 2, 2)]
        );
    }

    #[test]
    fn test_resolve_focused_cell_paste_grows() {
        let snapshot = SelectionSnapshot {
            arrow_selection: None,
            ranges: &[],
            focused: Some(CellCoord::new(3, 2)),
        };
        let targets = resolve_paste_targets(&snapshot);
        assert_eq!(targets, vec![PasteTarget::grow_from(CellCoord::new(3, 2))]);
        assert_eq!(targets[0].row_end, None);
        assert_eq!(targets[0].column_end, None);
    }

    #[test]
    fn test_resolve_nothing_selected_nothing_focused() {
        let snapshot = SelectionSnapshot {
            arrow_selection: None,
            ranges: &[],
            focused: None,
        };
        assert!(resolve_copy_ranges(&snapshot).is_empty());
        assert!(resolve_paste_targets(&snapshot).is_empty());
    }

    #[test]
    fn test_ctrl_click_adds_row() {
        let ranges = vec![row_band(0, 1)];
        let next = apply_row_click(&ranges, 4, 8, true, &ClickModifiers {
            shift: false,
            ctrl_or_meta: true,
        });
        assert_eq!(next, vec![row_band(0, 1), row_band(4, 4)]);
    }

    #[test]
    fn test_ctrl_click_removes_single_row() {
        let ranges = vec![row_band(3, 3)];
        let next = apply_row_click(&ranges, 3, 8, true, &ClickModifiers {
            shift: false,
            ctrl_or_meta: true,
        });
        assert!(next.is_empty());
    }

    #[test]
    fn test_ctrl_click_splits_multi_row_range() {
        let ranges = vec![row_band(2, 8)];
        let next = apply_row_click(&ranges, 5, 8, true, &ClickModifiers {
            shift: false,
            ctrl_or_meta: true,
        });
        // Row 5 is deselected; the band splits around it.
        assert_eq!(next, vec![row_band(2, 4), row_band(6, 8)]);
    }

    #[test]
    fn test_ctrl_click_at_range_head() {
        let ranges = vec![row_band(5, 8)];
        let next = apply_row_click(&ranges, 5, 8, true, &ClickModifiers {
            shift: false,
            ctrl_or_meta: true,
        });
        assert_eq!(next, vec![row_band(6, 8)]);
    }

    #[test]
    fn test_shift_click_extends_last_range() {
        let ranges = vec![row_band(0, 0), row_band(4, 5)];
        let next = apply_row_click(&ranges, 9, 8, true, &ClickModifiers {
            shift: true,
            ctrl_or_meta: false,
        });
        assert_eq!(next, vec![row_band(0, 0), row_band(4, 9)]);
    }

    #[test]
    fn test_shift_click_inside_contracts_start() {
        let ranges = vec![row_band(2, 9)];
        let next = apply_row_click(&ranges, 6, 8, true, &ClickModifiers {
            shift: true,
            ctrl_or_meta: false,
        });
        assert_eq!(next, vec![row_band(6, 9)]);
    }

    #[test]
    fn test_plain_click_replaces_selection() {
        let ranges = vec![row_band(0, 5)];
        let next = apply_row_click(&ranges, 2, 8, true, &ClickModifiers::default());
        assert_eq!(next, vec![row_band(2, 2)]);
    }

    #[test]
    fn test_range_shift_click_anchors_at_focus() {
        let (next, focus) = apply_range_click(
            &[],
            CellCoord::new(4, 5),
            Some(CellCoord::new(1, 2)),
            true,
            &ClickModifiers {
                shift: true,
                ctrl_or_meta: false,
            },
        );
        assert_eq!(next, vec![Range::new(1, 4, 2, 5)]);
        assert_eq!(focus, None);
    }

    #[test]
    fn test_range_plain_click_clears_and_moves_focus() {
        let ranges = vec![Range::new(0, 2, 0, 2)];
        let (next, focus) =
            apply_range_click(&ranges, CellCoord::new(7, 1), None, true, &ClickModifiers::default());
        assert!(next.is_empty());
        assert_eq!(focus, Some(CellCoord::new(7, 1)));
    }

    #[test]
    fn test_range_ctrl_click_appends_cell() {
        let ranges = vec![Range::new(0, 2, 0, 2)];
        let (next, focus) = apply_range_click(
            &ranges,
            CellCoord::new(7, 1),
            Some(CellCoord::new(0, 0)),
            true,
            &ClickModifiers {
                shift: false,
                ctrl_or_meta: true,
            },
        );
        assert_eq!(next.len(), 2);
        assert_eq!(next[1], Range::cell(CellCoord::new(7, 1)));
        assert_eq!(focus, Some(CellCoord::new(7, 1)));
    }
}
