//! Rendered-cell handles and the per-frame handle registry.
//!
//! A rendered cell may expose value and focus operations directly; which of
//! them it supports is declared up front as a [`CellCaps`] descriptor rather
//! than probed ad hoc at call time. Anything a cell does not support falls
//! back to the embedder-level callback.
//!
//! Handles are only valid for the rendered frame that produced them: the
//! registry is cleared at the start of every render pass and repopulated as
//! cells mount, so stale handles from a previous virtualization window can
//! never be invoked.

use std::collections::HashMap;

/// Which of the optional per-cell operations a handle supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellCaps {
    pub get_value: bool,
    pub set_value: bool,
    pub clear_value: bool,
    pub claim_focus: bool,
    pub release_focus: bool,
}

/// A live handle to a rendered cell.
///
/// Callers must consult [`CellHandle::caps`] before invoking an operation;
/// unsupported operations are expected to be no-ops.
pub trait CellHandle {
    fn caps(&self) -> CellCaps;

    fn get_value(&self) -> String {
        String::new()
    }

    fn set_value(&mut self, _text: &str, _in_multi_cell_paste: bool) {}

    fn clear_value(&mut self) {}

    fn claim_focus(&mut self) {}

    fn release_focus(&mut self) {}
}

/// Registry of live cell handles keyed by `(row, columnKey)`.
///
/// The column key (not the column index) is the stable half of the key, so
/// cell identity survives column reordering and virtualization remounts.
#[derive(Default)]
pub struct CellRegistry {
    cells: HashMap<(u32, String), Box<dyn CellHandle>>,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    /// Drop every handle from the previous frame. Must be called before the
    /// embedder re-registers cells for a new render pass.
    pub fn begin_frame(&mut self) {
        self.cells.clear();
    }

    /// Register a handle for the current frame, replacing any earlier handle
    /// for the same cell.
    pub fn register(&mut self, row: u32, column_key: &str, handle: Box<dyn CellHandle>) {
        self.cells.insert((row, column_key.to_string()), handle);
    }

    pub fn get(&self, row: u32, column_key: &str) -> Option<&dyn CellHandle> {
        self.cells
            .get(&(row, column_key.to_string()))
            .map(|h| h.as_ref())
    }

    pub fn get_mut(&mut self, row: u32, column_key: &str) -> Option<&mut Box<dyn CellHandle>> {
        self.cells.get_mut(&(row, column_key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct ValueCell {
        value: Rc<RefCell<String>>,
    }

    impl CellHandle for ValueCell {
        fn caps(&self) -> CellCaps {
            CellCaps {
                get_value: true,
                set_value: true,
                clear_value: true,
                ..CellCaps::default()
            }
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
    }

    #[test]
    fn test_register_and_lookup() {
        let value = Rc::new(RefCell::new("hi".to_string()));
        let mut registry = CellRegistry::new();
        registry.register(2, "name", Box::new(ValueCell { value: Rc::clone(&value) }));

        let handle = registry.get(2, "name").unwrap();
        assert!(handle.caps().get_value);
        assert_eq!(handle.get_value(), "hi");
        assert!(registry.get(2, "other").is_none());
        assert!(registry.get(3, "name").is_none());
    }

    #[test]
    fn test_begin_frame_invalidates_handles() {
        let value = Rc::new(RefCell::new(String::new()));
        let mut registry = CellRegistry::new();
        registry.register(0, "a", Box::new(ValueCell { value }));
        assert_eq!(registry.len(), 1);
        registry.begin_frame();
        assert!(registry.is_empty());
        assert!(registry.get(0, "a").is_none());
    }

    #[test]
    fn test_set_value_through_registry() {
        let value = Rc::new(RefCell::new(String::new()));
        let mut registry = CellRegistry::new();
        registry.register(1, "a", Box::new(ValueCell { value: Rc::clone(&value) }));
        if let Some(handle) = registry.get_mut(1, "a") {
            handle.set_value("pasted", true);
        }
        assert_eq!(*value.borrow(), "pasted");
    }
}
