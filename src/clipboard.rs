//! Clipboard codec: dual-format payload construction for cut/copy and
//! write-plan computation for paste.
//!
//! Copy produces the same pair Google Sheets does — an HTML `<table>` on
//! `text/html` and a tab/CRLF-delimited block on `text/plain`. Paste turns a
//! parsed source table plus the destination rectangles into a flat list of
//! [`CellWrite`] operations, duplicating the source block across larger
//! destinations (tiling). All of this is pure; the interaction layer applies
//! the writes through cell handles or embedder callbacks.

use quick_xml::escape::escape;

use crate::range::PasteTarget;

const HTML_PREFIX: &str = "<html><body><table><tbody><tr>";
const HTML_SUFFIX: &str = "</tr></tbody></table></body></html>";

/// The two clipboard flavors written on cut/copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    /// `text/html`: one `<tr>` per selection row, one `<td>` per cell.
    pub html: String,
    /// `text/plain`: tab-separated values, CRLF row breaks, trailing tab.
    pub text: String,
}

/// A single cell write produced by a paste plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub row: u32,
    pub column: u32,
    pub text: String,
    /// Whether this write is part of a paste touching more than one cell.
    pub in_multi_cell_paste: bool,
}

/// Build the copy/cut payload from cell values in row-major order.
///
/// Row boundaries are detected by index modulo `column_count`. Values are
/// entity-escaped in the HTML flavor so markup-looking cell content survives
/// a round trip.
pub fn build_payload(values: &[String], column_count: u32) -> ClipboardPayload {
    let column_count = column_count.max(1) as usize;
    let mut html = String::with_capacity(HTML_PREFIX.len() + HTML_SUFFIX.len() + values.len() * 16);
    html.push_str(HTML_PREFIX);
    let mut text = String::with_capacity(values.len() * 8);

    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            if idx % column_count == 0 {
                html.push_str("</tr><tr>");
                text.push_str("\r\n");
            } else {
                text.push('\t');
            }
        }
        html.push_str("<td>");
        html.push_str(&escape(value));
        html.push_str("</td>");
        text.push_str(value);
    }
    if !values.is_empty() {
        text.push('\t');
    }
    html.push_str(HTML_SUFFIX);

    ClipboardPayload { html, text }
}

/// Tile a parsed source table across the destination rectangles.
///
/// Each source cell lands at `(row_start + source_row, column_start +
/// source_column)` and is then repeated at source-block strides while it
/// stays within the destination bound, so a destination that is not an even
/// multiple of the source receives truncated tiles cell by cell. An open
/// destination bound (`None`) sizes itself to exactly one source tile.
#[allow(clippy::cast_possible_truncation)]
pub fn plan_table_paste(targets: &[PasteTarget], source: &[Vec<String>]) -> Vec<CellWrite> {
    let mut writes = Vec::new();
    let source_rows = source.len() as u32;
    if source_rows == 0 {
        return writes;
    }

    for target in targets {
        let last_row = target.last_row(source_rows);
        for (source_row, row_cells) in source.iter().enumerate() {
            let source_columns = row_cells.len() as u32;
            let in_multi_cell_paste = source.len() > 1 || row_cells.len() > 1;
            let last_column = target.last_column(source_columns);
            for (source_column, text) in row_cells.iter().enumerate() {
                let mut row = target.row_start + source_row as u32;
                while row <= last_row {
                    let mut column = target.column_start + source_column as u32;
                    while column <= last_column {
                        writes.push(CellWrite {
                            row,
                            column,
                            text: text.clone(),
                            in_multi_cell_paste,
                        });
                        column += source_columns;
                    }
                    row += source_rows;
                }
            }
        }
    }
    writes
}

/// Blit one string into every cell of every destination rectangle.
///
/// Used for plain-text paste and for Delete/Backspace clearing. Open bounds
/// collapse to the single anchor cell. Always flagged as a multi-cell paste.
pub fn plan_text_blit(targets: &[PasteTarget], text: &str) -> Vec<CellWrite> {
    let mut writes = Vec::new();
    for target in targets {
        let last_row = target.last_row(1);
        let last_column = target.last_column(1);
        for row in target.row_start..=last_row {
            for column in target.column_start..=last_column {
                writes.push(CellWrite {
                    row,
                    column,
                    text: text.to_string(),
                    in_multi_cell_paste: true,
                });
            }
        }
    }
    writes
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
    use crate::html_table::parse_clipboard_table;
    use crate::range::{CellCoord, Range};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_payload_two_by_two() {
        let payload = build_payload(&strings(&["A", "B", "C", "D"]), 2);
        assert_eq!(payload.text, "A\tB\r\nC\tD\t");
        assert_eq!(
            payload.html,
            "<html><body><table><tbody><tr><td>A</td><td>B</td></tr><tr><td>C</td><td>D</td></tr></tbody></table></body></html>"
        );
    }

    #[test]
    fn test_payload_single_cell() {
        let payload = build_payload(&strings(&["only"]), 1);
        assert_eq!(payload.text, "only\t");
        assert_eq!(
            payload.html,
            "<html><body><table><tbody><tr><td>only</td></tr></tbody></table></body></html>"
        );
    }

    #[test]
    fn test_payload_escapes_markup() {
        let payload = build_payload(&strings(&["a<b&c"]), 1);
        assert!(payload.html.contains("<td>a&lt;b&amp;c</td>"));
        // Plain text stays raw.
        assert_eq!(payload.text, "a<b&c\t");
    }

    #[test]
    fn test_round_trip_tiles_into_larger_selection() {
        let payload = build_payload(&strings(&["A", "B", "C", "D"]), 2);
        let source = parse_clipboard_table(&payload.html).unwrap();
        assert_eq!(source, vec![strings(&["A", "B"]), strings(&["C", "D"])]);

        // Paste the 2x2 block into rows 0-4, columns 0-5.
        let target = PasteTarget::from_range(&Range::new(0, 4, 0, 5));
        let writes = plan_table_paste(&[target], &source);

        let mut grid = vec![vec![String::new(); 6]; 5];
        for w in &writes {
            assert!(w.in_multi_cell_paste);
            grid[w.row as usize][w.column as usize] = w.text.clone();
        }
        for row in 0..5usize {
            for column in 0..6usize {
                let expected = match (row % 2, column % 2) {
                    (0, 0) => "A",
                    (0, 1) => "B",
                    (1, 0) => "C",
                    _ => "D",
                };
                assert_eq!(grid[row][column], expected, "cell ({row},{column})");
            }
        }
        // Row 2 restarts the tile: A B again, not a continuation.
        assert_eq!(grid[2][0], "A");
        assert_eq!(grid[2][1], "B");
    }

    #[test]
    fn test_open_bounds_paste_exactly_one_tile() {
        let source = vec![strings(&["A", "B"]), strings(&["C", "D"])];
        let target = PasteTarget::grow_from(CellCoord::new(3, 1));
        let writes = plan_table_paste(&[target], &source);
        assert_eq!(writes.len(), 4);
        let at = |row: u32, column: u32| {
            writes
                .iter()
                .find(|w| w.row == row && w.column == column)
                .map(|w| w.text.as_str())
        };
        assert_eq!(at(3, 1), Some("A"));
        assert_eq!(at(3, 2), Some("B"));
        assert_eq!(at(4, 1), Some("C"));
        assert_eq!(at(4, 2), Some("D"));
    }

    #[test]
    fn test_partial_tile_truncates_per_cell() {
        // Two-column source into a three-column destination: the second tile
        // only has room for its first column.
        let source = vec![strings(&["A", "B"])];
        let target = PasteTarget::from_range(&Range::new(0, 0, 0, 2));
        let writes = plan_table_paste(&[target], &source);
        let mut row = vec![String::new(); 3];
        for w in &writes {
            row[w.column as usize] = w.text.clone();
        }
        assert_eq!(row, strings(&["A", "B", "A"]));
    }

    #[test]
    fn test_single_cell_source_is_not_multi() {
        let source = vec![strings(&["x"])];
        let target = PasteTarget::grow_from(CellCoord::new(0, 0));
        let writes = plan_table_paste(&[target], &source);
        assert_eq!(writes.len(), 1);
        assert!(!writes[0].in_multi_cell_paste);
    }

    #[test]
    fn test_blit_fills_every_target() {
        let targets = vec![
            PasteTarget::from_range(&Range::new(0, 1, 0, 0)),
            PasteTarget::from_range(&Range::new(4, 4, 2, 3)),
        ];
        let writes = plan_text_blit(&targets, "zap");
        assert_eq!(writes.len(), 4);
        assert!(writes.iter().all(|w| w.text == "zap" && w.in_multi_cell_paste));
    }

    #[test]
    fn test_blit_open_bounds_hit_single_cell() {
        let writes = plan_text_blit(&[PasteTarget::grow_from(CellCoord::new(2, 2))], "v");
        assert_eq!(writes.len(), 1);
        assert_eq!((writes[0].row, writes[0].column), (2, 2));
    }
}
