//! Click and keyboard event handling for `GridController`.

use super::GridController;
use crate::cells::CellRegistry;
use crate::columns::ColumnInfo;
use crate::hooks::{CellContext, ClickResponse, GridHost};
use crate::navigation::{self, KeyDisposition, KeyInput, NavHost};
use crate::range::{CellCoord, PasteTarget, Range};
use crate::selection::{
    apply_range_click, apply_row_click, consolidate_contained_ranges, consolidate_row_ranges,
    validate_ranges, ClickModifiers,
};

impl GridController {
    /// Handle a cell click: embedder claim, selection editing per the active
    /// selection mode, validation/consolidation, and change notification.
    pub fn handle_cell_click(
        &mut self,
        row: u32,
        column: u32,
        modifiers: &ClickModifiers,
        host: &mut dyn GridHost,
    ) {
        if row >= self.row_count {
            return;
        }
        let Some(column_key) = self.column_key(column).map(str::to_string) else {
            return;
        };

        let mut claimed_focus = false;
        if !modifiers.shift {
            let response = host.on_cell_click(&CellContext {
                row_index: row,
                column_index: column,
                column_key: &column_key,
            });
            match response {
                ClickResponse::Ignore => return,
                ClickResponse::Claim => {
                    claimed_focus = true;
                    if let Some(handle) = self.registry.get_mut(row, &column_key) {
                        if handle.caps().claim_focus {
                            handle.claim_focus();
                        }
                    }
                }
                ClickResponse::Pass => {}
            }
        }

        let mut focused = self.nav.focused;
        let mut ranges = self.selection_ranges.clone();
        if self.options.allow_row_select {
            let column_count = self.dims().column_count;
            ranges = apply_row_click(
                &self.selection_ranges,
                row,
                column_count,
                self.options.allow_multi_select,
                modifiers,
            );
        } else if self.options.allow_range_select {
            let (next, new_focus) = apply_range_click(
                &self.selection_ranges,
                CellCoord::new(row, column),
                self.nav.focused,
                self.options.allow_multi_select,
                modifiers,
            );
            ranges = next;
            if let Some(f) = new_focus {
                focused = Some(f);
            }
        }

        let ranges = self.validate_with_host(&ranges, host);
        let ranges = if self.options.allow_row_select {
            consolidate_row_ranges(&ranges)
        } else {
            consolidate_contained_ranges(&ranges)
        };
        host.on_selection_change(&ranges);

        self.recent_scroll = false;
        self.selection_ranges = ranges;
        self.nav.arrow_selection = None;
        self.nav.focused = focused;
        self.nav.edit_mode = claimed_focus;
    }

    pub fn handle_cell_double_click(&mut self, row: u32, column: u32, host: &mut dyn GridHost) {
        if row >= self.row_count {
            return;
        }
        let Some(column_key) = self.column_key(column).map(str::to_string) else {
            return;
        };
        self.recent_scroll = false;
        host.on_cell_double_click(&CellContext {
            row_index: row,
            column_index: column,
            column_key: &column_key,
        });
    }

    pub fn handle_cell_hover(&mut self, row: u32, column: u32, host: &mut dyn GridHost) {
        if row >= self.row_count {
            return;
        }
        let Some(column_key) = self.column_key(column).map(str::to_string) else {
            return;
        };
        host.on_cell_hover(&CellContext {
            row_index: row,
            column_index: column,
            column_key: &column_key,
        });
    }

    /// Feed a key event through the navigation state machine.
    pub fn handle_key(&mut self, input: &KeyInput, host: &mut dyn GridHost) -> KeyDisposition {
        if !host.should_handle_key_event(input) {
            return KeyDisposition::NotHandled;
        }

        let dims = self.dims();
        let mut adapter = ControllerNavHost {
            registry: &mut self.registry,
            columns: &self.columns,
            row_count: self.row_count,
            host,
        };
        let disposition = navigation::handle_key(
            &mut self.nav,
            &mut self.selection_ranges,
            input,
            &dims,
            &mut adapter,
        );
        if disposition == KeyDisposition::Handled {
            self.recent_scroll = false;
        }
        disposition
    }

    pub(crate) fn validate_with_host(
        &self,
        ranges: &[Range],
        host: &dyn GridHost,
    ) -> Vec<Range> {
        let row_pred = |row: u32| host.can_select_row(row);
        let column_pred = |column: u32| host.can_select_column(column);
        validate_ranges(ranges, Some(&row_pred), Some(&column_pred))
    }
}

/// Adapts the controller's registry and host into the navigation seam.
struct ControllerNavHost<'a> {
    registry: &'a mut CellRegistry,
    columns: &'a [ColumnInfo],
    row_count: u32,
    host: &'a mut dyn GridHost,
}

impl ControllerNavHost<'_> {
    fn column_key(&self, column: u32) -> Option<&str> {
        self.columns
            .get(column as usize)
            .map(|c| c.column_key.as_str())
    }
}

impl NavHost for ControllerNavHost<'_> {
    fn focus_cell(
        &mut self,
        previous: Option<CellCoord>,
        target: Option<CellCoord>,
        seed: Option<&KeyInput>,
    ) -> bool {
        // The embedder's focus handling often rebuilds cell state in a way
        // that bypasses the cell's own save-on-blur, so the previous cell is
        // told to release explicitly.
        if let Some(prev) = previous {
            if let Some(key) = self.column_key(prev.column).map(str::to_string) {
                if let Some(handle) = self.registry.get_mut(prev.row, &key) {
                    if handle.caps().release_focus {
                        handle.release_focus();
                    }
                }
            }
        }

        match target {
            Some(coord) => match self.column_key(coord.column) {
                Some(key) => {
                    let key = key.to_string();
                    self.host.on_cell_focus(Some((coord, key.as_str())), seed)
                }
                None => false,
            },
            None => self.host.on_cell_focus(None, seed),
        }
    }

    fn clear_cells(&mut self, targets: &[PasteTarget]) {
        let writes = crate::clipboard::plan_text_blit(targets, "");
        super::clipboard::apply_cell_writes(
            &writes,
            self.columns,
            self.row_count,
            self.registry,
            self.host,
        );
    }

    fn validate_arrow_range(&self, range: Range) -> Option<Range> {
        let row_pred = |row: u32| self.host.can_select_row(row);
        let column_pred = |column: u32| self.host.can_select_column(column);
        validate_ranges(&[range], Some(&row_pred), Some(&column_pred))
            .into_iter()
            .next()
    }
}
