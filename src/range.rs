//! Rectangular selection ranges and cell coordinates.

use serde::{Deserialize, Serialize};

/// A focused cell position, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellCoord {
    pub row: u32,
    pub column: u32,
}

impl CellCoord {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// A rectangular selection of cells, inclusive on all sides.
///
/// Always normalized: `row_start <= row_end` and `column_start <= column_end`.
/// The constructors normalize, so a range built from any two corners is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub row_start: u32,
    pub row_end: u32,
    pub column_start: u32,
    pub column_end: u32,
}

impl Range {
    /// Create a range from two opposite corners (any order).
    pub fn between(a: CellCoord, b: CellCoord) -> Self {
        Self {
            row_start: a.row.min(b.row),
            row_end: a.row.max(b.row),
            column_start: a.column.min(b.column),
            column_end: a.column.max(b.column),
        }
    }

    /// Create a normalized range from explicit bounds.
    pub fn new(row_start: u32, row_end: u32, column_start: u32, column_end: u32) -> Self {
        Self {
            row_start: row_start.min(row_end),
            row_end: row_start.max(row_end),
            column_start: column_start.min(column_end),
            column_end: column_start.max(column_end),
        }
    }

    /// A single-cell range.
    pub fn cell(coord: CellCoord) -> Self {
        Self {
            row_start: coord.row,
            row_end: coord.row,
            column_start: coord.column,
            column_end: coord.column,
        }
    }

    /// A whole-row band spanning `column_count` columns.
    pub fn rows(row_start: u32, row_end: u32, column_count: u32) -> Self {
        Self {
            row_start: row_start.min(row_end),
            row_end: row_start.max(row_end),
            column_start: 0,
            column_end: column_count.saturating_sub(1),
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.row_start == self.row_end && self.column_start == self.column_end
    }

    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.row_start && row <= self.row_end
    }

    pub fn contains_cell(&self, row: u32, column: u32) -> bool {
        self.contains_row(row) && column >= self.column_start && column <= self.column_end
    }

    /// Whether `self` fully contains `other` (equality counts as containment).
    pub fn contains_range(&self, other: &Range) -> bool {
        self.row_start <= other.row_start
            && self.row_end >= other.row_end
            && self.column_start <= other.column_start
            && self.column_end >= other.column_end
    }

    pub fn row_count(&self) -> u32 {
        self.row_end - self.row_start + 1
    }

    pub fn column_count(&self) -> u32 {
        self.column_end - self.column_start + 1
    }
}

/// A paste destination rectangle.
///
/// `row_end`/`column_end` of `None` mean "grow to fit exactly one source
/// tile": the destination extends as far as a single copy of the pasted block
/// needs, with no duplication beyond that. Only ever produced transiently
/// while resolving a paste; stored selection state never holds open bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteTarget {
    pub row_start: u32,
    pub row_end: Option<u32>,
    pub column_start: u32,
    pub column_end: Option<u32>,
}

impl PasteTarget {
    /// A closed destination covering exactly `range`.
    pub fn from_range(range: &Range) -> Self {
        Self {
            row_start: range.row_start,
            row_end: Some(range.row_end),
            column_start: range.column_start,
            column_end: Some(range.column_end),
        }
    }

    /// An open destination anchored at a single cell, sized by the source.
    pub fn grow_from(coord: CellCoord) -> Self {
        Self {
            row_start: coord.row,
            row_end: None,
            column_start: coord.column,
            column_end: None,
        }
    }

    /// Last destination row when the source block spans `source_rows` rows.
    pub fn last_row(&self, source_rows: u32) -> u32 {
        match self.row_end {
            Some(end) => end,
            None => self.row_start + source_rows.saturating_sub(1),
        }
    }

    /// Last destination column when the source block spans `source_columns` columns.
    pub fn last_column(&self, source_columns: u32) -> u32 {
        match self.column_end {
            Some(end) => end,
            None => self.column_start + source_columns.saturating_sub(1),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_between_normalizes() {
        let r = Range::between(CellCoord::new(5, 3), CellCoord::new(1, 7));
        assert_eq!(r, Range::new(1, 5, 3, 7));
    }

    #[test]
    fn test_containment() {
        let outer = Range::new(0, 5, 0, 5);
        let inner = Range::new(1, 2, 1, 2);
        assert!(outer.contains_range(&inner));
        assert!(!inner.contains_range(&outer));
        assert!(outer.contains_range(&outer));
    }

    #[test]
    fn test_single_cell() {
        assert!(Range::cell(CellCoord::new(2, 2)).is_single_cell());
        assert!(!Range::new(2, 3, 2, 2).is_single_cell());
    }

    #[test]
    fn test_paste_target_bounds() {
        let open = PasteTarget::grow_from(CellCoord::new(4, 2));
        assert_eq!(open.last_row(3), 6);
        assert_eq!(open.last_column(2), 3);

        let closed = PasteTarget::from_range(&Range::new(0, 9, 0, 1));
        assert_eq!(closed.last_row(3), 9);
        assert_eq!(closed.last_column(5), 1);
    }

    #[test]
    fn test_row_band() {
        let r = Range::rows(7, 4, 10);
        assert_eq!(r, Range::new(4, 7, 0, 9));
        assert_eq!(r.column_count(), 10);
    }
}
