//! Common test utilities: a recording mock host, scripted cell handles, and
//! a small grid builder.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gridview::cells::{CellCaps, CellHandle};
use gridview::columns::{ColumnSpec, GridChild};
use gridview::grid::{GridController, GridOptions};
use gridview::hooks::{CellContext, ClickResponse, GridHost};
use gridview::navigation::KeyInput;
use gridview::range::{CellCoord, Range};

/// One recorded paste/clear write that went through the host callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteCall {
    pub row: u32,
    pub column: u32,
    pub column_key: String,
    pub text: String,
    pub in_multi_cell_paste: bool,
}

/// A recorded focus request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusCall {
    pub target: Option<(u32, u32, String)>,
    pub seeded: bool,
}

/// Recording implementation of the embedder callback surface.
pub struct MockHost {
    pub click_response: ClickResponse,
    pub claim_focus: bool,
    pub veto_keys: bool,
    pub unselectable_rows: Vec<u32>,
    pub unselectable_columns: Vec<u32>,
    /// Values served to cut/copy when a cell has no handle, keyed by
    /// (row, column).
    pub values: HashMap<(u32, u32), String>,

    pub clicks: Vec<(u32, u32)>,
    pub double_clicks: Vec<(u32, u32)>,
    pub hovers: Vec<(u32, u32)>,
    pub focus_calls: Vec<FocusCall>,
    pub cut_calls: Vec<(u32, u32)>,
    pub copy_calls: Vec<(u32, u32)>,
    pub paste_calls: Vec<PasteCall>,
    pub selection_events: Vec<Vec<Range>>,
    pub resize_calls: Vec<(f32, String)>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            click_response: ClickResponse::Pass,
            claim_focus: false,
            veto_keys: false,
            unselectable_rows: Vec::new(),
            unselectable_columns: Vec::new(),
            values: HashMap::new(),
            clicks: Vec::new(),
            double_clicks: Vec::new(),
            hovers: Vec::new(),
            focus_calls: Vec::new(),
            cut_calls: Vec::new(),
            copy_calls: Vec::new(),
            paste_calls: Vec::new(),
            selection_events: Vec::new(),
            resize_calls: Vec::new(),
        }
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest selection reported through `onSelectionChange`.
    pub fn last_selection(&self) -> &[Range] {
        self.selection_events
            .last()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl GridHost for MockHost {
    fn on_cell_click(&mut self, ctx: &CellContext) -> ClickResponse {
        self.clicks.push((ctx.row_index, ctx.column_index));
        self.click_response
    }

    fn on_cell_double_click(&mut self, ctx: &CellContext) {
        self.double_clicks.push((ctx.row_index, ctx.column_index));
    }

    fn on_cell_hover(&mut self, ctx: &CellContext) {
        self.hovers.push((ctx.row_index, ctx.column_index));
    }

    fn should_handle_key_event(&self, _input: &KeyInput) -> bool {
        !self.veto_keys
    }

    fn on_cell_focus(
        &mut self,
        target: Option<(CellCoord, &str)>,
        seed: Option<&KeyInput>,
    ) -> bool {
        let claim = self.claim_focus && target.is_some();
        self.focus_calls.push(FocusCall {
            target: target.map(|(c, key)| (c.row, c.column, key.to_string())),
            seeded: seed.is_some(),
        });
        claim
    }

    fn on_cell_cut(&mut self, ctx: &CellContext) -> String {
        self.cut_calls.push((ctx.row_index, ctx.column_index));
        self.values
            .get(&(ctx.row_index, ctx.column_index))
            .cloned()
            .unwrap_or_default()
    }

    fn on_cell_copy(&mut self, ctx: &CellContext) -> String {
        self.copy_calls.push((ctx.row_index, ctx.column_index));
        self.values
            .get(&(ctx.row_index, ctx.column_index))
            .cloned()
            .unwrap_or_default()
    }

    fn on_cell_paste(&mut self, ctx: &CellContext, text: &str, in_multi_cell_paste: bool) {
        self.paste_calls.push(PasteCall {
            row: ctx.row_index,
            column: ctx.column_index,
            column_key: ctx.column_key.to_string(),
            text: text.to_string(),
            in_multi_cell_paste,
        });
    }

    fn can_select_row(&self, row: u32) -> bool {
        !self.unselectable_rows.contains(&row)
    }

    fn can_select_column(&self, column: u32) -> bool {
        !self.unselectable_columns.contains(&column)
    }

    fn on_selection_change(&mut self, ranges: &[Range]) {
        self.selection_events.push(ranges.to_vec());
    }

    fn on_column_resize_end(&mut self, new_width: f32, column_key: &str) {
        self.resize_calls.push((new_width, column_key.to_string()));
    }
}

/// Interaction log shared between a test and its cell handles.
#[derive(Debug, Default)]
pub struct CellLog {
    pub claims: u32,
    pub releases: u32,
}

/// A scripted cell handle backed by a shared value slot.
pub struct ScriptedCell {
    pub value: Rc<RefCell<String>>,
    pub caps: CellCaps,
    pub log: Rc<RefCell<CellLog>>,
}

impl ScriptedCell {
    pub fn with_value(value: &Rc<RefCell<String>>) -> Self {
        Self {
            value: Rc::clone(value),
            caps: CellCaps {
                get_value: true,
                set_value: true,
                clear_value: true,
                claim_focus: true,
                release_focus: true,
            },
            log: Rc::new(RefCell::new(CellLog::default())),
        }
    }
}

impl CellHandle for ScriptedCell {
    fn caps(&self) -> CellCaps {
        self.caps
    }

    fn get_value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&mut self, text: &str, _in_multi_cell_paste: bool) {
        *self.value.borrow_mut() = text.to_string();
    }

    fn clear_value(&mut self) {
        self.value.borrow_mut().clear();
    }

    fn claim_focus(&mut self) {
        self.log.borrow_mut().claims += 1;
    }

    fn release_focus(&mut self) {
        self.log.borrow_mut().releases += 1;
    }
}

/// Build a controller with `column_count` columns keyed c0..cN and
/// `row_count` rows.
pub fn grid(options: GridOptions, row_count: u32, column_count: u32) -> GridController {
    let children: Vec<GridChild> = (0..column_count)
        .map(|i| {
            GridChild::Column(ColumnSpec {
                column_key: format!("c{i}"),
                width: 100.0,
                header: None,
                is_resizable: true,
                flex_grow: false,
            })
        })
        .collect();
    let mut controller = GridController::new(options);
    controller.set_children(&children).unwrap();
    controller.set_row_count(row_count);
    controller
}

pub fn row_select_options() -> GridOptions {
    GridOptions {
        allow_row_select: true,
        allow_multi_select: true,
        ..GridOptions::default()
    }
}

pub fn range_select_options() -> GridOptions {
    GridOptions {
        allow_range_select: true,
        allow_multi_select: true,
        ..GridOptions::default()
    }
}
