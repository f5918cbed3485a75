//! Clipboard HTML table extraction.
//!
//! Pasted `text/html` payloads (Google Sheets, Excel, this grid's own copies)
//! carry cell data as a `<table><tbody><tr><td>` structure wrapped in
//! arbitrary markup. This module pulls the first table out of such a payload
//! with a lenient reader; anything unparseable simply yields `None` so the
//! caller can fall back to `text/plain`.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Extract the first `<table>` in `html` as rows of cell text.
///
/// `<tbody>` is optional: browser DOM parsers synthesize one around bare
/// `<tr>` children, so serialized payloads may or may not carry it. Cell text
/// is the concatenation of all text inside the `<td>`, entities unescaped.
///
/// Returns `None` for markup with no table, a table with no rows, or any
/// parse error — all of which mean "treat the paste as plain text".
pub fn parse_clipboard_table(html: &str) -> Option<Vec<Vec<String>>> {
    let mut reader = Reader::from_str(html);
    // Clipboard HTML is browser-grade, not well-formed XML.
    reader.check_end_names(false);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut in_table = false;
    let mut table_depth = 0u32;
    let mut current_row: Option<Vec<String>> = None;
    let mut current_cell: Option<String> = None;

    loop {
        match reader.read_event() {
            // Tag names are matched case-insensitively; HTML serializers
            // disagree on casing.
            Ok(Event::Start(ref e)) => match e.local_name().as_ref().to_ascii_lowercase().as_slice()
            {
                b"table" => {
                    if in_table {
                        table_depth += 1;
                    } else {
                        in_table = true;
                    }
                }
                b"tr" if in_table && table_depth == 0 => {
                    current_row = Some(Vec::new());
                }
                b"td" if current_row.is_some() => {
                    current_cell = Some(String::new());
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref().to_ascii_lowercase().as_slice() {
                b"table" if in_table => {
                    if table_depth > 0 {
                        table_depth -= 1;
                    } else {
                        // Only the first table counts.
                        break;
                    }
                }
                b"tr" if table_depth == 0 => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                b"td" if table_depth == 0 => {
                    if let (Some(row), Some(cell)) = (current_row.as_mut(), current_cell.take()) {
                        row.push(cell);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref().eq_ignore_ascii_case(b"td") && table_depth == 0 {
                    if let Some(row) = current_row.as_mut() {
                        row.push(String::new());
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(cell) = current_cell.as_mut() {
                    match e.unescape() {
                        Ok(text) => cell.push_str(&text),
                        Err(_) => return None,
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(cell) = current_cell.as_mut() {
                    cell.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => return None,
            Ok(_) => {}
        }
    }

    if !in_table || rows.is_empty() {
        return None;
    }
    Some(rows)
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

    #[test]
    fn test_parse_simple_table() {
        let html =
            "<html><body><table><tbody><tr><td>A</td><td>B</td></tr><tr><td>C</td><td>D</td></tr></tbody></table></body></html>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["A", "B"], vec!["C", "D"]]);
    }

    #[test]
    fn test_parse_table_without_tbody() {
        let html = "<table><tr><td>1</td><td>2</td></tr></table>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_nested_markup_inside_cell() {
        let html = "<table><tbody><tr><td><span style=\"font-weight:bold\">hello</span> world</td></tr></tbody></table>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["hello world"]]);
    }

    #[test]
    fn test_entities_unescaped() {
        let html = "<table><tbody><tr><td>a &lt; b &amp; c</td></tr></tbody></table>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["a < b & c"]]);
    }

    #[test]
    fn test_empty_cell_element() {
        let html = "<table><tbody><tr><td/><td>x</td></tr></tbody></table>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["", "x"]]);
    }

    #[test]
    fn test_uppercase_tags() {
        let html = "<TABLE><TBODY><TR><TD>X</TD></TR></TBODY></TABLE>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["X"]]);
    }

    #[test]
    fn test_no_table_yields_none() {
        assert_eq!(parse_clipboard_table("<div>just text</div>"), None);
        assert_eq!(parse_clipboard_table("plain words"), None);
    }

    #[test]
    fn test_empty_table_yields_none() {
        assert_eq!(parse_clipboard_table("<table></table>"), None);
    }

    #[test]
    fn test_only_first_table_is_read() {
        let html = "<table><tr><td>first</td></tr></table><table><tr><td>second</td></tr></table>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["first"]]);
    }

    #[test]
    fn test_ragged_rows_preserved() {
        let html =
            "<table><tbody><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></tbody></table>";
        let rows = parse_clipboard_table(html).unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c"]]);
    }
}
