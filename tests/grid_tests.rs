//! Grid-level tests: configuration, column resize, frozen columns, and the
//! per-frame cell handle lifecycle.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid, range_select_options, MockHost, ScriptedCell};
use gridview::columns::{parse_children, ColumnSpec, GridChild};
use gridview::error::GridError;
use gridview::grid::{GridController, GridOptions};
use gridview::selection::ClickModifiers;
use std::cell::RefCell;
use std::rc::Rc;

const PLAIN: ClickModifiers = ClickModifiers {
    shift: false,
    ctrl_or_meta: false,
};

#[test]
fn test_options_parse_from_camel_case_json() {
    let options: GridOptions = serde_json::from_str(
        r#"{"allowRowSelect": true, "allowMultiSelect": true, "frozenLeadingColumns": 2}"#,
    )
    .unwrap();
    assert!(options.allow_row_select);
    assert!(options.allow_multi_select);
    assert!(!options.allow_range_select);
    assert_eq!(options.frozen_leading_columns, 2);
}

#[test]
fn test_grouped_columns_flatten_in_order() {
    let json = r#"[
        {"type": "column", "columnKey": "id", "width": 60.0},
        {"type": "columnGroup", "key": "totals", "header": "Totals", "columns": [
            {"columnKey": "net", "width": 90.0},
            {"columnKey": "gross", "width": 90.0}
        ]},
        {"type": "column", "columnKey": "notes", "width": 200.0, "flexGrow": true}
    ]"#;
    let children = parse_children(json).unwrap();
    let mut controller = GridController::new(GridOptions::default());
    controller.set_children(&children).unwrap();

    let keys: Vec<&str> = controller
        .columns()
        .iter()
        .map(|c| c.column_key.as_str())
        .collect();
    assert_eq!(keys, vec!["id", "net", "gross", "notes"]);

    let groups = controller.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].header.as_deref(), Some("Totals"));
    assert_eq!(groups[0].width, 180.0);
}

#[test]
fn test_unknown_child_kind_fails_fast() {
    let json = r#"[{"type": "toolbar", "columnKey": "x", "width": 10.0}]"#;
    assert!(matches!(parse_children(json), Err(GridError::Config(_))));
}

#[test]
fn test_duplicate_keys_fail_fast() {
    let children = vec![
        GridChild::Column(ColumnSpec {
            column_key: "dup".to_string(),
            width: 10.0,
            header: None,
            is_resizable: false,
            flex_grow: false,
        }),
        GridChild::Column(ColumnSpec {
            column_key: "dup".to_string(),
            width: 20.0,
            header: None,
            is_resizable: false,
            flex_grow: false,
        }),
    ];
    let mut controller = GridController::new(GridOptions::default());
    assert!(matches!(
        controller.set_children(&children),
        Err(GridError::Config(_))
    ));
}

#[test]
fn test_resize_drag_reports_new_width() {
    let mut controller = grid(range_select_options(), 5, 3);
    let mut host = MockHost::new();

    controller.handle_resize_mouse_enter("c1");
    assert_eq!(controller.resize_hover(), Some("c1"));

    controller.begin_resize_drag("c1", 100.0, 250.0);
    assert!(controller.is_resizing());
    // Hover changes are ignored while dragging.
    controller.handle_resize_mouse_enter("c2");
    assert_eq!(controller.resize_hover(), Some("c1"));

    controller.end_resize_drag(280.0, &mut host);
    assert!(!controller.is_resizing());
    assert_eq!(host.resize_calls, vec![(130.0, "c1".to_string())]);

    // The snap marker is consumed exactly once.
    assert_eq!(controller.take_recent_drag_end().as_deref(), Some("c1"));
    assert_eq!(controller.take_recent_drag_end(), None);
}

#[test]
fn test_resize_collapsing_drag_is_abandoned() {
    let mut controller = grid(range_select_options(), 5, 3);
    let mut host = MockHost::new();
    controller.begin_resize_drag("c0", 50.0, 300.0);
    controller.end_resize_drag(200.0, &mut host);
    assert!(host.resize_calls.is_empty());
    // The drag still ended; the handle still snaps back.
    assert_eq!(controller.take_recent_drag_end().as_deref(), Some("c0"));
}

#[test]
fn test_frozen_leading_columns() {
    let options = GridOptions {
        allow_range_select: true,
        frozen_leading_columns: 2,
        ..GridOptions::default()
    };
    let controller = grid(options, 5, 4);
    assert!(controller.is_frozen_column(0));
    assert!(controller.is_frozen_column(1));
    assert!(!controller.is_frozen_column(2));
    assert_eq!(controller.frozen_width(), 200.0);
}

#[test]
fn test_render_pass_invalidates_stale_handles() {
    let mut controller = grid(range_select_options(), 5, 3);
    let mut host = MockHost::new();
    host.values.insert((0, 0), "from-host".to_string());
    controller.handle_cell_click(0, 0, &PLAIN, &mut host);

    let value = Rc::new(RefCell::new("from-handle".to_string()));
    controller.begin_render_pass();
    controller.register_cell(0, "c0", Box::new(ScriptedCell::with_value(&value)));
    let payload = controller.handle_cut_copy(false, &mut host).unwrap();
    assert_eq!(payload.text, "from-handle\t");

    // A new render pass without re-registration drops the handle; reads fall
    // back to the embedder callback.
    controller.begin_render_pass();
    let payload = controller.handle_cut_copy(false, &mut host).unwrap();
    assert_eq!(payload.text, "from-host\t");
}

#[test]
fn test_double_click_and_hover_forwarding() {
    let mut controller = grid(range_select_options(), 5, 3);
    let mut host = MockHost::new();
    controller.handle_cell_double_click(2, 1, &mut host);
    controller.handle_cell_hover(3, 0, &mut host);
    assert_eq!(host.double_clicks, vec![(2, 1)]);
    assert_eq!(host.hovers, vec![(3, 0)]);

    // Out-of-range columns are ignored silently.
    controller.handle_cell_double_click(2, 9, &mut host);
    assert_eq!(host.double_clicks.len(), 1);
}

#[test]
fn test_selected_and_focused_queries() {
    let mut controller = grid(range_select_options(), 5, 3);
    let mut host = MockHost::new();
    controller.handle_cell_click(1, 1, &PLAIN, &mut host);
    controller.handle_cell_click(
        2,
        2,
        &ClickModifiers {
            shift: true,
            ctrl_or_meta: false,
        },
        &mut host,
    );
    assert!(controller.is_cell_selected(1, 1));
    assert!(controller.is_cell_selected(2, 2));
    assert!(!controller.is_cell_selected(3, 0));
    assert!(controller.is_cell_focused(1, 1));
    assert!(!controller.is_cell_focused(2, 2));
}
