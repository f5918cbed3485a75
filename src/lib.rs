//! gridview - virtualized data-grid widget core for the web
//!
//! The interaction engine of a spreadsheet-like data grid, compiled to
//! WebAssembly:
//! - Selection-range algebra (validation, consolidation, copy/paste
//!   resolution) over multi-range row and cell selections
//! - Keyboard navigation state machine (arrows/tab/enter/escape, edit-mode
//!   transitions, shift+arrow range growth)
//! - HTML-table-aware clipboard: Google-Sheets-compatible copy payloads and
//!   tiling paste semantics
//! - Resizable and frozen leading columns, declarative column groups
//!
//! Rendering is the embedder's job: the widget tracks which cells are
//! selected and focused, and the embedding renderer reads that state back
//! while registering live cell handles each render pass.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridWidget } from 'gridview';
//! await init();
//! const grid = new GridWidget(rootElement, { allowRangeSelect: true }, {
//!   rowGetter: ({ index }) => rows[index],
//!   onCellPaste: ({ rowIndex, columnKey, text }) => { ... },
//! });
//! grid.setColumns(columns);
//! grid.setRowCount(rows.length);
//! ```

// Core interaction modules
pub mod cells;
pub mod clipboard;
pub mod columns;
pub mod error;
pub mod grid;
pub mod hooks;
pub mod html_table;
pub mod navigation;
pub mod range;
pub mod selection;

// Browser shell (wasm only)
#[cfg(target_arch = "wasm32")]
pub mod widget;

use wasm_bindgen::prelude::*;

pub use grid::{GridController, GridOptions};
pub use range::{CellCoord, Range};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
