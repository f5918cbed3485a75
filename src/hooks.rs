//! The embedder callback surface.
//!
//! The grid owns no cell data. Values, editors, and row records live in the
//! embedding application, reached through the [`GridHost`] trait. Every
//! method has a no-op default so embedders implement only what they use; row
//! data itself stays on the embedder's side of the boundary (the JS bridge
//! attaches `rowData` from `rowGetter` before forwarding a callback).

use crate::navigation::KeyInput;
use crate::range::{CellCoord, Range};

/// Identifies the cell a callback concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellContext<'a> {
    pub row_index: u32,
    pub column_index: u32,
    pub column_key: &'a str,
}

/// Embedder's answer to a cell click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResponse {
    /// Drop the event entirely: no selection or focus side effects.
    Ignore,
    /// Claim not granted; the default selection logic still runs.
    Pass,
    /// Focus claimed: the cell enters edit mode.
    Claim,
}

/// Callbacks consumed from the embedding application.
pub trait GridHost {
    fn on_cell_click(&mut self, _ctx: &CellContext) -> ClickResponse {
        ClickResponse::Pass
    }

    fn on_cell_double_click(&mut self, _ctx: &CellContext) {}

    fn on_cell_hover(&mut self, _ctx: &CellContext) {}

    /// Veto hook consulted before any key handling runs.
    fn should_handle_key_event(&self, _input: &KeyInput) -> bool {
        true
    }

    /// Focus request. `target` of `None` signals "release focus" (surfaced to
    /// JS as row/column indices of `-1`). `seed` carries the keystroke that
    /// triggered the request so an editor can be pre-filled. Returns whether
    /// the embedder claimed the focus.
    fn on_cell_focus(
        &mut self,
        _target: Option<(CellCoord, &str)>,
        _seed: Option<&KeyInput>,
    ) -> bool {
        false
    }

    /// Produce (and clear) a cell's value during cut, for cells with no
    /// direct value accessor.
    fn on_cell_cut(&mut self, _ctx: &CellContext) -> String {
        String::new()
    }

    /// Produce a cell's value during copy, for cells with no direct value
    /// accessor.
    fn on_cell_copy(&mut self, _ctx: &CellContext) -> String {
        String::new()
    }

    /// Write a pasted value into a cell with no direct value accessor.
    fn on_cell_paste(&mut self, _ctx: &CellContext, _text: &str, _in_multi_cell_paste: bool) {}

    fn can_select_row(&self, _row: u32) -> bool {
        true
    }

    fn can_select_column(&self, _column: u32) -> bool {
        true
    }

    fn on_selection_change(&mut self, _ranges: &[Range]) {}

    fn on_column_resize_end(&mut self, _new_width: f32, _column_key: &str) {}
}

/// A host that accepts every default. Handy for tests and headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl GridHost for NullHost {}
