//! Top-level interaction state for the grid widget.
//!
//! `GridController` owns everything that changes in response to user input:
//! selection ranges, the navigation state machine, the per-frame cell handle
//! registry, and column resize bookkeeping. It is pure Rust with no DOM
//! dependencies; the wasm shell in `widget` feeds it events and carries its
//! effects back across the JS boundary.

mod clipboard;
mod events;
mod scroll;

pub use clipboard::PasteDisposition;

use serde::{Deserialize, Serialize};

use crate::cells::{CellHandle, CellRegistry};
use crate::columns::{self, ColumnInfo, GridChild, GroupInfo};
use crate::error::Result;
use crate::navigation::{GridDims, NavState};
use crate::range::{CellCoord, Range};

/// Behavior switches supplied by the embedder.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Clicks select whole rows (full column width).
    pub allow_row_select: bool,
    /// Clicks select rectangular cell ranges.
    pub allow_range_select: bool,
    /// Ctrl/shift clicks accumulate multiple ranges.
    pub allow_multi_select: bool,
    /// Leading columns pinned to the left edge.
    pub frozen_leading_columns: u32,
}

/// An in-progress column resize drag.
#[derive(Debug, Clone)]
pub struct ResizeDrag {
    pub drag_column: String,
    pub drag_start: f32,
    pub orig_width: f32,
}

/// The grid's interaction state.
pub struct GridController {
    pub(crate) options: GridOptions,
    pub(crate) columns: Vec<ColumnInfo>,
    pub(crate) groups: Vec<GroupInfo>,
    pub(crate) row_count: u32,
    pub(crate) nav: NavState,
    pub(crate) selection_ranges: Vec<Range>,
    pub(crate) registry: CellRegistry,
    pub(crate) resize_hover: Option<String>,
    pub(crate) resize_drag: Option<ResizeDrag>,
    pub(crate) recent_drag_end: Option<String>,
    pub(crate) recent_scroll: bool,
}

impl GridController {
    pub fn new(options: GridOptions) -> Self {
        Self {
            options,
            columns: Vec::new(),
            groups: Vec::new(),
            row_count: 0,
            nav: NavState::default(),
            selection_ranges: Vec::new(),
            registry: CellRegistry::new(),
            resize_hover: None,
            resize_drag: None,
            recent_drag_end: None,
            recent_scroll: false,
        }
    }

    /// Recompute column layout from declared children. Fails fast on
    /// malformed configuration (unknown child kinds are rejected during
    /// deserialization, duplicate keys here).
    pub fn set_children(&mut self, children: &[GridChild]) -> Result<()> {
        self.columns = columns::column_info(children)?;
        self.groups = columns::group_info(children);
        Ok(())
    }

    pub fn set_row_count(&mut self, row_count: u32) {
        self.row_count = row_count;
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn groups(&self) -> &[GroupInfo] {
        &self.groups
    }

    pub fn selection_ranges(&self) -> &[Range] {
        &self.selection_ranges
    }

    pub fn focused_cell(&self) -> Option<CellCoord> {
        self.nav.focused
    }

    pub fn edit_mode(&self) -> bool {
        self.nav.edit_mode
    }

    pub fn arrow_selection(&self) -> Option<Range> {
        self.nav.arrow_selection
    }

    pub fn dims(&self) -> GridDims {
        #[allow(clippy::cast_possible_truncation)]
        let column_count = self.columns.len() as u32;
        GridDims {
            row_count: self.row_count,
            column_count,
        }
    }

    /// Combined width of the frozen leading columns.
    pub fn frozen_width(&self) -> f32 {
        columns::frozen_width(&self.columns, self.options.frozen_leading_columns)
    }

    pub fn is_frozen_column(&self, column: u32) -> bool {
        column < self.options.frozen_leading_columns
    }

    /// Start a render pass: every cell handle from the previous frame is
    /// dropped and must be re-registered as cells mount.
    pub fn begin_render_pass(&mut self) {
        self.registry.begin_frame();
    }

    /// Register a live cell handle for the current frame.
    pub fn register_cell(&mut self, row: u32, column_key: &str, handle: Box<dyn CellHandle>) {
        self.registry.register(row, column_key, handle);
    }

    pub fn column_key(&self, column: u32) -> Option<&str> {
        self.columns
            .get(column as usize)
            .map(|c| c.column_key.as_str())
    }

    /// Whether the cell is inside any stored or arrow selection.
    pub fn is_cell_selected(&self, row: u32, column: u32) -> bool {
        self.selection_ranges
            .iter()
            .chain(self.nav.arrow_selection.as_ref())
            .any(|range| range.contains_cell(row, column))
    }

    pub fn is_cell_focused(&self, row: u32, column: u32) -> bool {
        self.nav.focused == Some(CellCoord::new(row, column))
    }

    // ---- Column resize bookkeeping ----

    pub fn handle_resize_mouse_enter(&mut self, column_key: &str) {
        if self.resize_drag.is_none() {
            self.resize_hover = Some(column_key.to_string());
        }
    }

    pub fn handle_resize_mouse_leave(&mut self, column_key: &str) {
        if self.resize_drag.is_none() && self.resize_hover.as_deref() == Some(column_key) {
            self.resize_hover = None;
        }
    }

    pub fn resize_hover(&self) -> Option<&str> {
        self.resize_hover.as_deref()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize_drag.is_some()
    }

    pub fn begin_resize_drag(&mut self, column_key: &str, orig_width: f32, start_x: f32) {
        self.resize_drag = Some(ResizeDrag {
            drag_column: column_key.to_string(),
            drag_start: start_x,
            orig_width,
        });
    }

    /// Finish a resize drag, notifying the embedder when the new width is
    /// positive. The drag column is remembered until the next frame so the
    /// drag handle can snap back instead of floating where the drag ended.
    pub fn end_resize_drag(&mut self, end_x: f32, host: &mut dyn crate::hooks::GridHost) {
        let Some(drag) = self.resize_drag.take() else {
            return;
        };
        if let Some(new_width) =
            columns::resize_end_width(drag.orig_width, drag.drag_start, end_x)
        {
            host.on_column_resize_end(new_width, &drag.drag_column);
        }
        self.recent_drag_end = Some(drag.drag_column);
    }

    /// Consume the post-drag snap marker on the next frame.
    pub fn take_recent_drag_end(&mut self) -> Option<String> {
        self.recent_drag_end.take()
    }
}
