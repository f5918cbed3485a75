//! Cut/copy/paste tests through the full controller: payload building,
//! precedence, tiling, and the plain-text fallback.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{grid, range_select_options, MockHost, ScriptedCell};
use gridview::grid::PasteDisposition;
use gridview::navigation::{KeyInput, NavKey};
use gridview::range::CellCoord;
use gridview::selection::ClickModifiers;
use std::cell::RefCell;
use std::rc::Rc;

const PLAIN: ClickModifiers = ClickModifiers {
    shift: false,
    ctrl_or_meta: false,
};
const SHIFT: ClickModifiers = ClickModifiers {
    shift: true,
    ctrl_or_meta: false,
};

fn select_rect(
    controller: &mut gridview::GridController,
    host: &mut MockHost,
    from: (u32, u32),
    to: (u32, u32),
) {
    controller.handle_cell_click(from.0, from.1, &PLAIN, host);
    controller.handle_cell_click(to.0, to.1, &SHIFT, host);
}

#[test]
fn test_copy_builds_dual_payload_from_host_values() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    host.values.insert((0, 0), "A".to_string());
    host.values.insert((0, 1), "B".to_string());
    host.values.insert((1, 0), "C".to_string());
    host.values.insert((1, 1), "D".to_string());
    select_rect(&mut controller, &mut host, (0, 0), (1, 1));

    let payload = controller.handle_cut_copy(false, &mut host).unwrap();
    assert_eq!(payload.text, "A\tB\r\nC\tD\t");
    assert_eq!(
        payload.html,
        "<html><body><table><tbody><tr><td>A</td><td>B</td></tr><tr><td>C</td><td>D</td></tr></tbody></table></body></html>"
    );
    assert_eq!(host.copy_calls.len(), 4);
    assert!(host.cut_calls.is_empty());
}

#[test]
fn test_copy_prefers_cell_handle_values() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    host.values.insert((0, 0), "host".to_string());
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);

    let value = Rc::new(RefCell::new("handle".to_string()));
    controller.begin_render_pass();
    controller.register_cell(0, "c0", Box::new(ScriptedCell::with_value(&value)));

    let payload = controller.handle_cut_copy(false, &mut host).unwrap();
    assert_eq!(payload.text, "handle\t");
    assert!(host.copy_calls.is_empty());
}

#[test]
fn test_cut_clears_values_through_handles() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    select_rect(&mut controller, &mut host, (0, 0), (0, 1));

    let a = Rc::new(RefCell::new("A".to_string()));
    let b = Rc::new(RefCell::new("B".to_string()));
    controller.begin_render_pass();
    controller.register_cell(0, "c0", Box::new(ScriptedCell::with_value(&a)));
    controller.register_cell(0, "c1", Box::new(ScriptedCell::with_value(&b)));

    let payload = controller.handle_cut_copy(true, &mut host).unwrap();
    assert_eq!(payload.text, "A\tB\t");
    assert_eq!(*a.borrow(), "");
    assert_eq!(*b.borrow(), "");
}

#[test]
fn test_copy_uses_last_selected_range() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    host.values.insert((5, 2), "last".to_string());
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);
    controller.handle_cell_click(1, 1, &SHIFT, &mut host);
    controller.handle_cell_click(
        5,
        2,
        &ClickModifiers {
            shift: false,
            ctrl_or_meta: true,
        },
        &mut host,
    );

    let payload = controller.handle_cut_copy(false, &mut host).unwrap();
    assert_eq!(payload.text, "last\t");
}

#[test]
fn test_arrow_selection_beats_stored_selection() {
    let mut controller = grid(range_select_options(), 10, 6);
    let mut host = MockHost::new();
    host.values.insert((5, 0), "stored".to_string());
    host.values.insert((3, 3), "anchor".to_string());
    host.values.insert((3, 4), "edge".to_string());
    let ctrl = ClickModifiers {
        shift: false,
        ctrl_or_meta: true,
    };
    controller.handle_cell_click(5, 0, &ctrl, &mut host);
    controller.handle_cell_click(3, 3, &ctrl, &mut host);
    assert_eq!(controller.selection_ranges().len(), 2);
    controller.handle_key(
        &KeyInput {
            key: NavKey::ArrowRight,
            shift: true,
            ctrl_or_meta: false,
            code: "ArrowRight".to_string(),
        },
        &mut host,
    );
    assert!(controller.arrow_selection().is_some());

    let payload = controller.handle_cut_copy(false, &mut host).unwrap();
    assert_eq!(payload.text, "anchor\tedge\t");
}

#[test]
fn test_copy_with_no_selection_and_no_focus_is_noop() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    assert!(controller.handle_cut_copy(false, &mut host).is_none());
}

#[test]
fn test_paste_table_tiles_across_selection() {
    let mut controller = grid(range_select_options(), 10, 6);
    let mut host = MockHost::new();
    select_rect(&mut controller, &mut host, (0, 0), (4, 5));

    let html = "<html><body><table><tbody><tr><td>A</td><td>B</td></tr><tr><td>C</td><td>D</td></tr></tbody></table></body></html>";
    let disposition = controller.handle_paste(Some(html), None, true, &mut host);
    assert_eq!(disposition, PasteDisposition::Suppress);

    // 5 rows x 6 columns, every cell written once.
    assert_eq!(host.paste_calls.len(), 30);
    let cell = |row: u32, column: u32| {
        host.paste_calls
            .iter()
            .find(|c| c.row == row && c.column == column)
            .map(|c| c.text.as_str())
            .unwrap()
    };
    assert_eq!(cell(0, 0), "A");
    assert_eq!(cell(0, 5), "B");
    assert_eq!(cell(1, 2), "C");
    // The tile restarts at row 2.
    assert_eq!(cell(2, 0), "A");
    assert_eq!(cell(2, 1), "B");
    assert_eq!(cell(4, 4), "A");
    assert!(host.paste_calls.iter().all(|c| c.in_multi_cell_paste));
}

#[test]
fn test_paste_into_focused_cell_grows_one_tile() {
    let mut controller = grid(range_select_options(), 10, 6);
    let mut host = MockHost::new();
    controller.handle_cell_click(2, 1, &PLAIN, &mut host);

    let html = "<table><tbody><tr><td>A</td><td>B</td></tr><tr><td>C</td><td>D</td></tr></tbody></table>";
    controller.handle_paste(Some(html), None, true, &mut host);

    assert_eq!(host.paste_calls.len(), 4);
    let coords: Vec<(u32, u32)> = host.paste_calls.iter().map(|c| (c.row, c.column)).collect();
    assert!(coords.contains(&(2, 1)));
    assert!(coords.contains(&(3, 2)));
}

#[test]
fn test_paste_writes_through_handles_when_available() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);

    let value = Rc::new(RefCell::new(String::new()));
    controller.begin_render_pass();
    controller.register_cell(0, "c0", Box::new(ScriptedCell::with_value(&value)));

    let html = "<table><tbody><tr><td>wrote</td></tr></tbody></table>";
    controller.handle_paste(Some(html), None, true, &mut host);
    assert_eq!(*value.borrow(), "wrote");
    assert!(host.paste_calls.is_empty());
}

#[test]
fn test_plain_text_blits_into_every_selected_cell() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    select_rect(&mut controller, &mut host, (1, 1), (2, 2));

    let disposition = controller.handle_paste(None, Some("zap"), true, &mut host);
    assert_eq!(disposition, PasteDisposition::Suppress);
    assert_eq!(host.paste_calls.len(), 4);
    assert!(host
        .paste_calls
        .iter()
        .all(|c| c.text == "zap" && c.in_multi_cell_paste));
}

#[test]
fn test_unparseable_html_falls_back_to_text() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);

    let disposition =
        controller.handle_paste(Some("<div>no table"), Some("fallback"), true, &mut host);
    assert_eq!(disposition, PasteDisposition::Suppress);
    assert_eq!(host.paste_calls.len(), 1);
    assert_eq!(host.paste_calls[0].text, "fallback");
}

#[test]
fn test_paste_outside_grid_without_table_passes_through() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);

    let disposition = controller.handle_paste(None, Some("text"), false, &mut host);
    assert_eq!(disposition, PasteDisposition::PassThrough);
    assert!(host.paste_calls.is_empty());
}

#[test]
fn test_paste_outside_grid_with_table_is_still_handled() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);

    let html = "<table><tbody><tr><td>v</td></tr></tbody></table>";
    let disposition = controller.handle_paste(Some(html), None, false, &mut host);
    assert_eq!(disposition, PasteDisposition::Suppress);
    assert_eq!(host.paste_calls.len(), 1);
}

#[test]
fn test_empty_clipboard_is_noop() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);

    let disposition = controller.handle_paste(None, Some(""), true, &mut host);
    assert_eq!(disposition, PasteDisposition::Suppress);
    assert!(host.paste_calls.is_empty());
}

#[test]
fn test_paste_skips_rows_beyond_data() {
    let mut controller = grid(range_select_options(), 3, 4);
    let mut host = MockHost::new();
    controller.handle_cell_click(2, 0, &PLAIN, &mut host);

    // Two source rows anchored at the last data row: the second row of the
    // tile falls outside the data and is dropped silently.
    let html = "<table><tbody><tr><td>a</td></tr><tr><td>b</td></tr></tbody></table>";
    controller.handle_paste(Some(html), None, true, &mut host);
    assert_eq!(host.paste_calls.len(), 1);
    assert_eq!((host.paste_calls[0].row, host.paste_calls[0].column), (2, 0));
    assert_eq!(host.paste_calls[0].text, "a");
}

#[test]
fn test_focused_cell_copy_has_no_growth() {
    let mut controller = grid(range_select_options(), 10, 4);
    let mut host = MockHost::new();
    host.values.insert((4, 3), "x".to_string());
    controller.handle_cell_click(4, 3, &PLAIN, &mut host);
    assert_eq!(controller.focused_cell(), Some(CellCoord::new(4, 3)));

    let payload = controller.handle_cut_copy(false, &mut host).unwrap();
    // A single focused cell copies as a 1x1 table, no grow-to-fit sentinel.
    assert_eq!(payload.text, "x\t");
    assert_eq!(host.copy_calls, vec![(4, 3)]);
}
