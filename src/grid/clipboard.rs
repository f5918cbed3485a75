//! Cut, copy, and paste orchestration for `GridController`.
//!
//! Everything here runs synchronously inside the triggering clipboard event:
//! browsers only guarantee `DataTransfer` access during the event tick, so
//! cell iteration and parsing must never be deferred.

use super::GridController;
use crate::cells::CellRegistry;
use crate::clipboard::{build_payload, plan_table_paste, plan_text_blit, CellWrite, ClipboardPayload};
use crate::columns::ColumnInfo;
use crate::hooks::{CellContext, GridHost};
use crate::html_table::parse_clipboard_table;
use crate::selection::{resolve_copy_ranges, resolve_paste_targets, SelectionSnapshot};

/// What the caller should do with the browser's default paste action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteDisposition {
    /// The grid handled the paste; suppress the default action.
    Suppress,
    /// Not the grid's paste; leave the default action alone.
    PassThrough,
}

impl GridController {
    fn selection_snapshot(&self) -> SelectionSnapshot<'_> {
        SelectionSnapshot {
            arrow_selection: self.nav.arrow_selection,
            ranges: &self.selection_ranges,
            focused: self.nav.focused,
        }
    }

    /// Serialize the active selection for cut or copy.
    ///
    /// Returns `None` when there is nothing to copy (no selection and no
    /// focus), in which case the event should not be touched. Cutting also
    /// clears each cell's value through its handle where the handle supports
    /// it; cells without a handle are cleared by the embedder inside its
    /// `on_cell_cut`.
    pub fn handle_cut_copy(
        &mut self,
        is_cut: bool,
        host: &mut dyn GridHost,
    ) -> Option<ClipboardPayload> {
        let range = resolve_copy_ranges(&self.selection_snapshot()).pop()?;

        let mut values = Vec::with_capacity((range.row_count() * range.column_count()) as usize);
        for row in range.row_start..=range.row_end {
            for column in range.column_start..=range.column_end {
                let Some(column_key) = self.column_key(column).map(str::to_string) else {
                    // Selection reaching past the declared columns copies as
                    // blanks rather than tearing the rectangle.
                    values.push(String::new());
                    continue;
                };

                let handle_caps = self
                    .registry
                    .get(row, &column_key)
                    .map(|handle| handle.caps());
                let value = match handle_caps {
                    Some(caps) if caps.get_value => self
                        .registry
                        .get(row, &column_key)
                        .map(|handle| handle.get_value())
                        .unwrap_or_default(),
                    _ => {
                        let ctx = CellContext {
                            row_index: row,
                            column_index: column,
                            column_key: &column_key,
                        };
                        if is_cut {
                            host.on_cell_cut(&ctx)
                        } else {
                            host.on_cell_copy(&ctx)
                        }
                    }
                };
                if is_cut {
                    if let Some(handle) = self.registry.get_mut(row, &column_key) {
                        if handle.caps().clear_value {
                            handle.clear_value();
                        }
                    }
                }
                values.push(value);
            }
        }

        Some(build_payload(&values, range.column_count()))
    }

    /// Apply a paste. `html`/`text` are the clipboard flavors (if present);
    /// `within_grid` is the externally supplied "is this event inside my
    /// grid" predicate result.
    ///
    /// A parsed table is tiled across every destination rectangle. Without a
    /// table the plain text is blitted into every destination cell — but only
    /// when the paste target is confirmed to be inside the grid, otherwise
    /// the default action proceeds untouched.
    pub fn handle_paste(
        &mut self,
        html: Option<&str>,
        text: Option<&str>,
        within_grid: bool,
        host: &mut dyn GridHost,
    ) -> PasteDisposition {
        self.recent_scroll = false;

        if let Some(source) = html.and_then(parse_clipboard_table) {
            let targets = resolve_paste_targets(&self.selection_snapshot());
            let writes = plan_table_paste(&targets, &source);
            self.apply_writes(&writes, host);
            return PasteDisposition::Suppress;
        }

        if !within_grid {
            return PasteDisposition::PassThrough;
        }

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            let targets = resolve_paste_targets(&self.selection_snapshot());
            let writes = plan_text_blit(&targets, text);
            self.apply_writes(&writes, host);
        }
        PasteDisposition::Suppress
    }

    fn apply_writes(&mut self, writes: &[CellWrite], host: &mut dyn GridHost) {
        apply_cell_writes(writes, &self.columns, self.row_count, &mut self.registry, host);
    }
}

/// Execute a write plan through the capability fallback order: the cell's
/// own `set_value` when the handle supports it, else the embedder's paste
/// callback. Writes landing outside the data or the declared columns are
/// skipped silently.
pub(crate) fn apply_cell_writes(
    writes: &[CellWrite],
    columns: &[ColumnInfo],
    row_count: u32,
    registry: &mut CellRegistry,
    host: &mut dyn GridHost,
) {
    for write in writes {
        if write.row >= row_count {
            continue;
        }
        let Some(column_key) = columns
            .get(write.column as usize)
            .map(|c| c.column_key.as_str())
        else {
            continue;
        };

        let wrote = match registry.get_mut(write.row, column_key) {
            Some(handle) if handle.caps().set_value => {
                handle.set_value(&write.text, write.in_multi_cell_paste);
                true
            }
            _ => false,
        };
        if !wrote {
            host.on_cell_paste(
                &CellContext {
                    row_index: write.row,
                    column_index: write.column,
                    column_key,
                },
                &write.text,
                write.in_multi_cell_paste,
            );
        }
    }
}
