//! Scroll-into-view policy.
//!
//! The grid never scrolls itself; it tells the virtualization layer which
//! cell to keep visible. A recent manual scroll suppresses focus-driven
//! scrolling so the grid does not fight the user's own scrolling.

use super::GridController;
use crate::range::CellCoord;

impl GridController {
    /// Record that the user scrolled; cleared by the next click, key, or
    /// paste interaction.
    pub fn note_scroll(&mut self) {
        self.recent_scroll = true;
    }

    pub fn recently_scrolled(&self) -> bool {
        self.recent_scroll
    }

    /// The cell the viewport should keep in view, unless the embedder gave
    /// an explicit target.
    ///
    /// With an arrow selection active, the target is the selection's active
    /// edge — on each axis, the edge on the far side of the focused anchor.
    /// Otherwise the focused cell, unless a recent manual scroll should not
    /// be overridden.
    pub fn scroll_target(&self, explicit: Option<CellCoord>) -> Option<CellCoord> {
        if explicit.is_some() {
            return explicit;
        }

        if let Some(arrow) = self.nav.arrow_selection {
            let anchor = self
                .nav
                .focused
                .unwrap_or(CellCoord::new(arrow.row_end, arrow.column_end));
            let row = if arrow.row_start < anchor.row {
                arrow.row_start
            } else {
                arrow.row_end
            };
            let column = if arrow.column_start < anchor.column {
                arrow.column_start
            } else {
                arrow.column_end
            };
            return Some(CellCoord::new(row, column));
        }

        if self.recent_scroll {
            return None;
        }
        self.nav.focused
    }
}
