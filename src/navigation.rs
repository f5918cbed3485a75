//! Keyboard navigation state machine.
//!
//! Consumes key events and produces the next focus/edit/arrow-selection
//! state, routing side effects (focus claims, cell clears) through the
//! [`NavHost`] trait so the machine stays pure and testable.

use crate::range::{CellCoord, PasteTarget, Range};
use crate::selection::{resolve_paste_targets, SelectionSnapshot};

/// Keys the state machine reacts to. Anything printable maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    ArrowLeft,
    ArrowRight,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    Other,
}

impl NavKey {
    /// Map a DOM `KeyboardEvent.code` value. `None` for keys the grid never
    /// handles (function keys, modifiers, media keys, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            "Tab" => Some(Self::Tab),
            "Enter" => Some(Self::Enter),
            "Escape" => Some(Self::Escape),
            "Backspace" => Some(Self::Backspace),
            "Delete" => Some(Self::Delete),
            _ if is_printable_code(code) => Some(Self::Other),
            _ => None,
        }
    }
}

/// Whether a `KeyboardEvent.code` produces text in a cell editor.
fn is_printable_code(code: &str) -> bool {
    code.starts_with("Key")
        || code.starts_with("Digit")
        || matches!(
            code,
            "Space"
                | "Backquote"
                | "Backslash"
                | "BracketLeft"
                | "BracketRight"
                | "Comma"
                | "Equal"
                | "Minus"
                | "Period"
                | "Quote"
                | "Semicolon"
                | "Slash"
        )
}

/// A key event as seen by the state machine.
#[derive(Debug, Clone)]
pub struct KeyInput {
    pub key: NavKey,
    pub shift: bool,
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub ctrl_or_meta: bool,
    /// Raw `KeyboardEvent.code`, forwarded to the embedder so an editor can
    /// be seeded with the triggering keystroke.
    pub code: String,
}

/// Grid dimensions the machine clamps against.
#[derive(Debug, Clone, Copy)]
pub struct GridDims {
    pub row_count: u32,
    pub column_count: u32,
}

/// Navigation state: focused cell, edit-mode flag, keyboard selection.
#[derive(Debug, Clone, Default)]
pub struct NavState {
    pub focused: Option<CellCoord>,
    pub edit_mode: bool,
    pub arrow_selection: Option<Range>,
}

/// Whether the grid consumed the key (and the default action is suppressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    NotHandled,
    Handled,
}

/// Collaborators the state machine needs from the surrounding grid.
pub trait NavHost {
    /// Release focus on `previous` (if any) and request focus at `target`.
    /// `target` of `None` is a pure release. `seed` carries the triggering
    /// keystroke for printable keys so the embedder can pre-fill an editor.
    /// Returns whether the embedder claimed the focus.
    fn focus_cell(
        &mut self,
        previous: Option<CellCoord>,
        target: Option<CellCoord>,
        seed: Option<&KeyInput>,
    ) -> bool;

    /// Write an empty string into every cell of the given destinations.
    fn clear_cells(&mut self, targets: &[PasteTarget]);

    /// Shrink an arrow-selection rectangle against the selectability
    /// predicates; `None` when nothing selectable remains.
    fn validate_arrow_range(&self, range: Range) -> Option<Range>;
}

/// Feed one key event through the state machine.
///
/// `ranges` is the stored mouse selection, cleared by Enter/Escape and by
/// entering edit mode. Returns whether the event was consumed.
pub fn handle_key<H: NavHost>(
    state: &mut NavState,
    ranges: &mut Vec<Range>,
    input: &KeyInput,
    dims: &GridDims,
    host: &mut H,
) -> KeyDisposition {
    let Some(focus) = state.focused else {
        return KeyDisposition::NotHandled;
    };
    if dims.row_count == 0 || dims.column_count == 0 {
        return KeyDisposition::NotHandled;
    }

    let focus_row = i64::from(focus.row);
    let focus_column = i64::from(focus.column);
    let row_count = i64::from(dims.row_count);
    let column_count = i64::from(dims.column_count);

    // The cell the movement starts from. With shift held over an existing
    // arrow selection, movement continues from the edge opposite the anchor.
    let mut row = focus_row;
    let mut column = focus_column;
    if input.shift {
        if let Some(arrow) = state.arrow_selection {
            row = if focus_row > i64::from(arrow.row_start) {
                i64::from(arrow.row_start)
            } else {
                i64::from(arrow.row_end)
            };
            column = if focus_column > i64::from(arrow.column_start) {
                i64::from(arrow.column_start)
            } else {
                i64::from(arrow.column_end)
            };
        }
    }

    match input.key {
        NavKey::ArrowDown => {
            state.edit_mode = false;
            row += 1;
        }
        NavKey::ArrowUp => {
            state.edit_mode = false;
            row -= 1;
        }
        NavKey::ArrowLeft => {
            // Left arrow wraps to the end of the previous row.
            if column > 0 {
                column -= 1;
            } else {
                column = column_count - 1;
                row -= 1;
            }
        }
        NavKey::Tab | NavKey::ArrowRight => {
            // Both move right and wrap to the next row; Tab also leaves
            // edit mode.
            if input.key == NavKey::Tab {
                state.edit_mode = false;
            }
            if column < column_count - 1 {
                column += 1;
            } else {
                column = 0;
                row += 1;
            }
        }
        NavKey::Enter => {
            // Enter toggles cell focus mode and clears any selections.
            let target = coord(row, column);
            if !state.edit_mode && host.focus_cell(state.focused, target, None) {
                state.edit_mode = true;
            } else {
                state.edit_mode = false;
                if row < row_count - 1 {
                    row += 1;
                }
            }
            ranges.clear();
        }
        NavKey::Escape => {
            state.edit_mode = false;
            ranges.clear();
        }
        NavKey::Backspace | NavKey::Delete => {
            if input.key == NavKey::Backspace && state.edit_mode && ranges.is_empty() {
                // Let the in-cell editor handle plain backspace.
                return KeyDisposition::NotHandled;
            }
            state.edit_mode = false;
            let targets = resolve_paste_targets(&SelectionSnapshot {
                arrow_selection: state.arrow_selection,
                ranges: ranges.as_slice(),
                focused: state.focused,
            });
            host.clear_cells(&targets);
        }
        NavKey::Other => {
            if input.ctrl_or_meta {
                // Probably an app-level shortcut not meant for the grid.
                return KeyDisposition::NotHandled;
            }

            // Any text key forces edit mode and clears selections.
            let mut disposition = KeyDisposition::NotHandled;
            if !state.edit_mode {
                host.focus_cell(state.focused, coord(row, column), Some(input));
                state.edit_mode = true;
                disposition = KeyDisposition::Handled;
            }
            ranges.clear();
            return disposition;
        }
    }

    if !state.edit_mode && row >= 0 && row < row_count && column >= 0 && column < column_count {
        // Release focus before moving it.
        host.focus_cell(state.focused, None, None);

        if input.shift {
            let anchor = CellCoord::new(focus.row, focus.column);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let next = Range::between(anchor, CellCoord::new(row as u32, column as u32));
            // A single-cell arrow selection is indistinguishable from plain
            // focus movement and is not allowed.
            state.arrow_selection = if next.is_single_cell() {
                None
            } else {
                host.validate_arrow_range(next)
            };
        } else {
            state.arrow_selection = None;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                state.focused = Some(CellCoord::new(row as u32, column as u32));
            }
        }
        return KeyDisposition::Handled;
    }

    KeyDisposition::NotHandled
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coord(row: i64, column: i64) -> Option<CellCoord> {
    if row < 0 || column < 0 {
        return None;
    }
    Some(CellCoord::new(row as u32, column as u32))
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
    use test_case::test_case;

    #[derive(Default)]
    struct RecordingHost {
        claim_next: bool,
        focus_calls: Vec<(Option<CellCoord>, Option<CellCoord>, bool)>,
        cleared: Vec<PasteTarget>,
    }

    impl NavHost for RecordingHost {
        fn focus_cell(
            &mut self,
            previous: Option<CellCoord>,
            target: Option<CellCoord>,
            seed: Option<&KeyInput>,
        ) -> bool {
            self.focus_calls.push((previous, target, seed.is_some()));
            self.claim_next && target.is_some()
        }

        fn clear_cells(&mut self, targets: &[PasteTarget]) {
            self.cleared.extend_from_slice(targets);
        }

        fn validate_arrow_range(&self, range: Range) -> Option<Range> {
            Some(range)
        }
    }

    fn key(k: NavKey) -> KeyInput {
        KeyInput {
            key: k,
            shift: false,
            ctrl_or_meta: false,
            code: String::new(),
        }
    }

    fn shift_key(k: NavKey) -> KeyInput {
        KeyInput {
            key: k,
            shift: true,
            ctrl_or_meta: false,
            code: String::new(),
        }
    }

    fn dims() -> GridDims {
        GridDims {
            row_count: 10,
            column_count: 5,
        }
    }

    fn focused_state(row: u32, column: u32) -> NavState {
        NavState {
            focused: Some(CellCoord::new(row, column)),
            edit_mode: false,
            arrow_selection: None,
        }
    }

    #[test]
    fn test_from_code_mapping() {
        assert_eq!(NavKey::from_code("ArrowDown"), Some(NavKey::ArrowDown));
        assert_eq!(NavKey::from_code("KeyQ"), Some(NavKey::Other));
        assert_eq!(NavKey::from_code("Digit7"), Some(NavKey::Other));
        assert_eq!(NavKey::from_code("Space"), Some(NavKey::Other));
        assert_eq!(NavKey::from_code("Semicolon"), Some(NavKey::Other));
        assert_eq!(NavKey::from_code("F5"), None);
        assert_eq!(NavKey::from_code("ShiftLeft"), None);
        assert_eq!(NavKey::from_code("PageDown"), None);
    }

    #[test]
    fn test_no_focus_means_not_handled() {
        let mut state = NavState::default();
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        let disposition = handle_key(
            &mut state,
            &mut ranges,
            &key(NavKey::ArrowDown),
            &dims(),
            &mut host,
        );
        assert_eq!(disposition, KeyDisposition::NotHandled);
        assert!(host.focus_calls.is_empty());
    }

    #[test_case(NavKey::ArrowDown, 3, 2, 4, 2; "down")]
    #[test_case(NavKey::ArrowUp, 3, 2, 2, 2; "up")]
    #[test_case(NavKey::ArrowLeft, 3, 2, 3, 1; "left")]
    #[test_case(NavKey::ArrowRight, 3, 2, 3, 3; "right")]
    fn test_arrow_moves_focus(k: NavKey, row: u32, col: u32, want_row: u32, want_col: u32) {
        let mut state = focused_state(row, col);
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        let disposition = handle_key(&mut state, &mut ranges, &key(k), &dims(), &mut host);
        assert_eq!(disposition, KeyDisposition::Handled);
        assert_eq!(state.focused, Some(CellCoord::new(want_row, want_col)));
    }

    #[test]
    fn test_left_wraps_to_previous_row() {
        let mut state = focused_state(3, 0);
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(&mut state, &mut ranges, &key(NavKey::ArrowLeft), &dims(), &mut host);
        assert_eq!(state.focused, Some(CellCoord::new(2, 4)));
    }

    #[test]
    fn test_right_wraps_to_next_row() {
        let mut state = focused_state(3, 4);
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(&mut state, &mut ranges, &key(NavKey::ArrowRight), &dims(), &mut host);
        assert_eq!(state.focused, Some(CellCoord::new(4, 0)));
    }

    #[test]
    fn test_up_at_first_row_is_ignored() {
        let mut state = focused_state(0, 2);
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        let disposition =
            handle_key(&mut state, &mut ranges, &key(NavKey::ArrowUp), &dims(), &mut host);
        assert_eq!(disposition, KeyDisposition::NotHandled);
        assert_eq!(state.focused, Some(CellCoord::new(0, 2)));
    }

    #[test]
    fn test_shift_arrow_builds_multi_cell_selection() {
        let mut state = focused_state(0, 0);
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(
            &mut state,
            &mut ranges,
            &shift_key(NavKey::ArrowRight),
            &dims(),
            &mut host,
        );
        // (0,0)-(0,1) is a genuine two-cell span.
        assert_eq!(state.arrow_selection, Some(Range::new(0, 0, 0, 1)));
        // The anchor does not move.
        assert_eq!(state.focused, Some(CellCoord::new(0, 0)));
    }

    #[test]
    fn test_shift_arrow_back_to_anchor_collapses() {
        let mut state = focused_state(0, 0);
        state.arrow_selection = Some(Range::new(0, 0, 0, 1));
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(
            &mut state,
            &mut ranges,
            &shift_key(NavKey::ArrowLeft),
            &dims(),
            &mut host,
        );
        // Contracting onto the anchor would leave a single cell, which is
        // disallowed for arrow selections.
        assert_eq!(state.arrow_selection, None);
    }

    #[test]
    fn test_shift_arrow_extends_from_far_edge() {
        let mut state = focused_state(2, 2);
        state.arrow_selection = Some(Range::new(2, 4, 2, 2));
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(
            &mut state,
            &mut ranges,
            &shift_key(NavKey::ArrowDown),
            &dims(),
            &mut host,
        );
        assert_eq!(state.arrow_selection, Some(Range::new(2, 5, 2, 2)));
    }

    #[test]
    fn test_plain_arrow_clears_arrow_selection() {
        let mut state = focused_state(2, 2);
        state.arrow_selection = Some(Range::new(2, 4, 2, 2));
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(&mut state, &mut ranges, &key(NavKey::ArrowDown), &dims(), &mut host);
        assert_eq!(state.arrow_selection, None);
        assert_eq!(state.focused, Some(CellCoord::new(3, 2)));
    }

    #[test]
    fn test_enter_claims_focus_and_enters_edit_mode() {
        let mut state = focused_state(1, 1);
        let mut ranges = vec![Range::new(0, 2, 0, 2)];
        let mut host = RecordingHost {
            claim_next: true,
            ..RecordingHost::default()
        };
        handle_key(&mut state, &mut ranges, &key(NavKey::Enter), &dims(), &mut host);
        assert!(state.edit_mode);
        assert!(ranges.is_empty());
        assert_eq!(state.focused, Some(CellCoord::new(1, 1)));
    }

    #[test]
    fn test_enter_unclaimed_moves_down() {
        let mut state = focused_state(1, 1);
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(&mut state, &mut ranges, &key(NavKey::Enter), &dims(), &mut host);
        assert!(!state.edit_mode);
        assert_eq!(state.focused, Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn test_enter_in_edit_mode_exits_and_moves_down() {
        let mut state = focused_state(1, 1);
        state.edit_mode = true;
        let mut ranges = Vec::new();
        let mut host = RecordingHost {
            claim_next: true,
            ..RecordingHost::default()
        };
        handle_key(&mut state, &mut ranges, &key(NavKey::Enter), &dims(), &mut host);
        assert!(!state.edit_mode);
        assert_eq!(state.focused, Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn test_enter_clamped_at_last_row() {
        let mut state = focused_state(9, 1);
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(&mut state, &mut ranges, &key(NavKey::Enter), &dims(), &mut host);
        assert_eq!(state.focused, Some(CellCoord::new(9, 1)));
    }

    #[test]
    fn test_escape_clears_edit_and_selection() {
        let mut state = focused_state(1, 1);
        state.edit_mode = true;
        state.arrow_selection = Some(Range::new(1, 2, 1, 2));
        let mut ranges = vec![Range::new(0, 3, 0, 3)];
        let mut host = RecordingHost::default();
        let disposition =
            handle_key(&mut state, &mut ranges, &key(NavKey::Escape), &dims(), &mut host);
        assert_eq!(disposition, KeyDisposition::Handled);
        assert!(!state.edit_mode);
        assert!(ranges.is_empty());
        assert_eq!(state.arrow_selection, None);
    }

    #[test]
    fn test_backspace_in_edit_mode_without_selection_falls_through() {
        let mut state = focused_state(1, 1);
        state.edit_mode = true;
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        let disposition = handle_key(
            &mut state,
            &mut ranges,
            &key(NavKey::Backspace),
            &dims(),
            &mut host,
        );
        assert_eq!(disposition, KeyDisposition::NotHandled);
        assert!(state.edit_mode);
        assert!(host.cleared.is_empty());
    }

    #[test]
    fn test_delete_clears_selected_cells() {
        let mut state = focused_state(1, 1);
        let mut ranges = vec![Range::new(0, 1, 0, 1)];
        let mut host = RecordingHost::default();
        handle_key(&mut state, &mut ranges, &key(NavKey::Delete), &dims(), &mut host);
        assert_eq!(host.cleared, vec![PasteTarget::from_range(&Range::new(0, 1, 0, 1))]);
        assert!(!state.edit_mode);
    }

    #[test]
    fn test_printable_key_enters_edit_mode_once() {
        let mut state = focused_state(1, 1);
        let mut ranges = vec![Range::new(0, 3, 0, 3)];
        let mut host = RecordingHost::default();
        let input = KeyInput {
            key: NavKey::Other,
            shift: false,
            ctrl_or_meta: false,
            code: "KeyQ".to_string(),
        };
        let disposition = handle_key(&mut state, &mut ranges, &input, &dims(), &mut host);
        assert_eq!(disposition, KeyDisposition::Handled);
        assert!(state.edit_mode);
        assert!(ranges.is_empty());
        // Exactly one focus request, seeded with the keystroke.
        assert_eq!(host.focus_calls.len(), 1);
        assert!(host.focus_calls[0].2);
    }

    #[test]
    fn test_ctrl_printable_is_ignored() {
        let mut state = focused_state(1, 1);
        let mut ranges = vec![Range::new(0, 3, 0, 3)];
        let mut host = RecordingHost::default();
        let input = KeyInput {
            key: NavKey::Other,
            shift: false,
            ctrl_or_meta: true,
            code: "KeyC".to_string(),
        };
        let disposition = handle_key(&mut state, &mut ranges, &input, &dims(), &mut host);
        assert_eq!(disposition, KeyDisposition::NotHandled);
        assert!(!state.edit_mode);
        assert_eq!(ranges.len(), 1);
        assert!(host.focus_calls.is_empty());
    }

    #[test]
    fn test_tab_leaves_edit_mode_and_moves_right() {
        let mut state = focused_state(1, 1);
        state.edit_mode = true;
        let mut ranges = Vec::new();
        let mut host = RecordingHost::default();
        handle_key(&mut state, &mut ranges, &key(NavKey::Tab), &dims(), &mut host);
        assert!(!state.edit_mode);
        assert_eq!(state.focused, Some(CellCoord::new(1, 2)));
    }
}
