//! WASM-exported grid widget shell.
//!
//! `GridWidget` wires the pure `GridController` to the page: document-level
//! key and clipboard listeners, a callback bridge to the embedder's JS
//! functions, and duck-typed JS cell handles converted into explicit
//! capability descriptors at registration time.
//!
//! The embedding renderer drives the widget: it reports clicks/hovers on the
//! cells it mounted, registers cell handles each render pass, and reads
//! selection/focus state back to style its cells.

mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{ClipboardEvent, Element, KeyboardEvent};

use crate::cells::{CellCaps, CellHandle};
use crate::columns::GridChild;
use crate::grid::{GridController, GridOptions, PasteDisposition};
use crate::hooks::{CellContext, ClickResponse, GridHost};
use crate::navigation::{KeyDisposition, KeyInput, NavKey};
use crate::range::CellCoord;
use crate::selection::ClickModifiers;

/// `onCellClick` return value meaning "ignore this event entirely" — no
/// selection or focus side effects, unlike a plain `false`.
pub const SKIP_CELL_CLICK: &str = "skip";

struct SharedState {
    controller: GridController,
    host: JsHost,
    children: Vec<GridChild>,
}

/// The main widget struct exported to JavaScript.
#[wasm_bindgen]
pub struct GridWidget {
    state: Rc<RefCell<SharedState>>,
    root: Element,
    key_closure: Option<Closure<dyn FnMut(KeyboardEvent)>>,
    clipboard_closures: Vec<Closure<dyn FnMut(ClipboardEvent)>>,
}

#[wasm_bindgen]
impl GridWidget {
    /// Create a widget rooted at `root` (the element owning the grid's
    /// rendered cells). `options` is a camelCase `GridOptions` object;
    /// `callbacks` is an object of embedder functions — `rowGetter` is
    /// required, everything else optional.
    #[wasm_bindgen(constructor)]
    pub fn new(root: Element, options: JsValue, callbacks: JsValue) -> Result<GridWidget, JsValue> {
        console_error_panic_hook::set_once();

        let options: GridOptions = if options.is_undefined() || options.is_null() {
            GridOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from_str(&format!("invalid grid options: {e}")))?
        };
        let host = JsHost::new(&callbacks)?;

        let state = Rc::new(RefCell::new(SharedState {
            controller: GridController::new(options),
            host,
            children: Vec::new(),
        }));

        let mut widget = GridWidget {
            state,
            root,
            key_closure: None,
            clipboard_closures: Vec::new(),
        };
        widget.attach_listeners();
        Ok(widget)
    }

    /// Declare columns and column groups. Fails fast on malformed children.
    #[wasm_bindgen(js_name = "setColumns")]
    pub fn set_columns(&mut self, children: JsValue) -> Result<(), JsValue> {
        let children: Vec<GridChild> = serde_wasm_bindgen::from_value(children)
            .map_err(|e| JsValue::from_str(&format!("invalid grid children: {e}")))?;
        let mut s = self.state.borrow_mut();
        s.controller.set_children(&children)?;
        s.children = children;
        Ok(())
    }

    #[wasm_bindgen(js_name = "setRowCount")]
    pub fn set_row_count(&mut self, row_count: u32) {
        self.state.borrow_mut().controller.set_row_count(row_count);
    }

    /// Start a render pass: all cell handles from the previous frame are
    /// invalidated and must be re-registered as cells mount.
    #[wasm_bindgen(js_name = "beginRenderPass")]
    pub fn begin_render_pass(&mut self) {
        self.state.borrow_mut().controller.begin_render_pass();
    }

    /// Register a rendered cell's handle. The handle may expose any of
    /// `getValue`, `setValue`, `clearValue`, `claimFocus`, `releaseFocus`;
    /// each is probed once here.
    #[wasm_bindgen(js_name = "registerCell")]
    pub fn register_cell(&mut self, row: u32, column_key: &str, handle: JsValue) {
        let handle = JsCellHandle::new(&handle);
        self.state
            .borrow_mut()
            .controller
            .register_cell(row, column_key, Box::new(handle));
    }

    #[wasm_bindgen(js_name = "handleCellClick")]
    pub fn handle_cell_click(&mut self, row: u32, column: u32, shift: bool, ctrl_or_meta: bool) {
        let mut s = self.state.borrow_mut();
        let SharedState {
            controller, host, ..
        } = &mut *s;
        controller.handle_cell_click(
            row,
            column,
            &ClickModifiers {
                shift,
                ctrl_or_meta,
            },
            host,
        );
    }

    #[wasm_bindgen(js_name = "handleCellDoubleClick")]
    pub fn handle_cell_double_click(&mut self, row: u32, column: u32) {
        let mut s = self.state.borrow_mut();
        let SharedState {
            controller, host, ..
        } = &mut *s;
        controller.handle_cell_double_click(row, column, host);
    }

    #[wasm_bindgen(js_name = "handleCellHover")]
    pub fn handle_cell_hover(&mut self, row: u32, column: u32) {
        let mut s = self.state.borrow_mut();
        let SharedState {
            controller, host, ..
        } = &mut *s;
        controller.handle_cell_hover(row, column, host);
    }

    /// Report a user scroll so focus-driven scrolling backs off briefly.
    #[wasm_bindgen(js_name = "noteScroll")]
    pub fn note_scroll(&mut self) {
        self.state.borrow_mut().controller.note_scroll();
    }

    /// The cell to keep in view, as `[row, column]`, or `undefined`.
    #[wasm_bindgen(js_name = "scrollTarget")]
    pub fn scroll_target(&self) -> Option<Vec<u32>> {
        self.state
            .borrow()
            .controller
            .scroll_target(None)
            .map(|c| vec![c.row, c.column])
    }

    /// Current selection ranges (camelCase objects).
    #[wasm_bindgen(js_name = "selectionRanges")]
    pub fn selection_ranges(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.borrow().controller.selection_ranges().to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Focused cell as `[row, column]`, or `undefined` when nothing focused.
    #[wasm_bindgen(js_name = "focusedCell")]
    pub fn focused_cell(&self) -> Option<Vec<u32>> {
        self.state
            .borrow()
            .controller
            .focused_cell()
            .map(|c| vec![c.row, c.column])
    }

    #[wasm_bindgen(js_name = "editMode")]
    pub fn edit_mode(&self) -> bool {
        self.state.borrow().controller.edit_mode()
    }

    #[wasm_bindgen(js_name = "isCellSelected")]
    pub fn is_cell_selected(&self, row: u32, column: u32) -> bool {
        self.state.borrow().controller.is_cell_selected(row, column)
    }

    #[wasm_bindgen(js_name = "isCellFocused")]
    pub fn is_cell_focused(&self, row: u32, column: u32) -> bool {
        self.state.borrow().controller.is_cell_focused(row, column)
    }

    /// Effective column widths for the given available grid width.
    #[wasm_bindgen(js_name = "layoutWidths")]
    pub fn layout_widths(&self, available_width: f32) -> Vec<f32> {
        let s = self.state.borrow();
        crate::columns::layout_widths(&s.children, available_width)
    }

    /// Derived group header records.
    pub fn groups(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.borrow().controller.groups().to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "frozenWidth")]
    pub fn frozen_width(&self) -> f32 {
        self.state.borrow().controller.frozen_width()
    }

    #[wasm_bindgen(js_name = "isFrozenColumn")]
    pub fn is_frozen_column(&self, column: u32) -> bool {
        self.state.borrow().controller.is_frozen_column(column)
    }

    // ---- Column resize ----

    #[wasm_bindgen(js_name = "resizeMouseEnter")]
    pub fn resize_mouse_enter(&mut self, column_key: &str) {
        self.state
            .borrow_mut()
            .controller
            .handle_resize_mouse_enter(column_key);
    }

    #[wasm_bindgen(js_name = "resizeMouseLeave")]
    pub fn resize_mouse_leave(&mut self, column_key: &str) {
        self.state
            .borrow_mut()
            .controller
            .handle_resize_mouse_leave(column_key);
    }

    #[wasm_bindgen(js_name = "resizeHover")]
    pub fn resize_hover(&self) -> Option<String> {
        self.state
            .borrow()
            .controller
            .resize_hover()
            .map(str::to_string)
    }

    #[wasm_bindgen(js_name = "isResizing")]
    pub fn is_resizing(&self) -> bool {
        self.state.borrow().controller.is_resizing()
    }

    #[wasm_bindgen(js_name = "beginResizeDrag")]
    pub fn begin_resize_drag(&mut self, column_key: &str, orig_width: f32, start_x: f32) {
        self.state
            .borrow_mut()
            .controller
            .begin_resize_drag(column_key, orig_width, start_x);
    }

    #[wasm_bindgen(js_name = "endResizeDrag")]
    pub fn end_resize_drag(&mut self, end_x: f32) {
        let mut s = self.state.borrow_mut();
        let SharedState {
            controller, host, ..
        } = &mut *s;
        controller.end_resize_drag(end_x, host);
    }

    /// The column whose drag just ended, consumed once so the resize handle
    /// can snap back on the next frame.
    #[wasm_bindgen(js_name = "takeRecentDragEnd")]
    pub fn take_recent_drag_end(&mut self) -> Option<String> {
        self.state.borrow_mut().controller.take_recent_drag_end()
    }
}

impl GridWidget {
    fn attach_listeners(&mut self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Keyboard: document-level, filtered to events aimed at the grid
        // (or the body, where keys land when nothing has DOM focus).
        {
            let state = Rc::clone(&self.state);
            let root = self.root.clone();
            let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                if dom::is_undo_redo(&event) {
                    return;
                }
                let target = event.target();
                if !dom::target_is_descendant(target.clone(), &root)
                    && !dom::target_is_body(target)
                {
                    return;
                }
                let Some(key) = NavKey::from_code(&event.code()) else {
                    return;
                };
                let input = KeyInput {
                    key,
                    shift: event.shift_key(),
                    ctrl_or_meta: event.ctrl_key() || event.meta_key(),
                    code: event.code(),
                };
                let mut s = state.borrow_mut();
                let SharedState {
                    controller, host, ..
                } = &mut *s;
                if controller.handle_key(&input, host) == KeyDisposition::Handled {
                    event.prevent_default();
                    event.stop_propagation();
                }
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                .ok();
            self.key_closure = Some(closure);
        }

        for &is_cut in &[true, false] {
            let state = Rc::clone(&self.state);
            let root = self.root.clone();
            let closure = Closure::wrap(Box::new(move |event: ClipboardEvent| {
                let target = event.target();
                let descendant = dom::target_is_descendant(target.clone(), &root);
                let allowed = match dom::target_element(target) {
                    // Inside the grid, contenteditable regions also keep
                    // their native cut/copy; outside, only real inputs do.
                    Some(el) => !dom::is_input(&el, descendant),
                    None => true,
                };
                if !allowed {
                    return;
                }
                let Some(data) = event.clipboard_data() else {
                    return;
                };
                let mut s = state.borrow_mut();
                let SharedState {
                    controller, host, ..
                } = &mut *s;
                if let Some(payload) = controller.handle_cut_copy(is_cut, host) {
                    // The payload was built manually; the browser must not
                    // run its own handling on top.
                    event.prevent_default();
                    let _ = data.set_data("text/html", &payload.html);
                    let _ = data.set_data("text/plain", &payload.text);
                }
            }) as Box<dyn FnMut(ClipboardEvent)>);
            let event_name = if is_cut { "cut" } else { "copy" };
            document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
                .ok();
            self.clipboard_closures.push(closure);
        }

        // Paste
        {
            let state = Rc::clone(&self.state);
            let root = self.root.clone();
            let closure = Closure::wrap(Box::new(move |event: ClipboardEvent| {
                let Some(data) = event.clipboard_data() else {
                    return;
                };
                let html = data.get_data("text/html").ok().filter(|s| !s.is_empty());
                let text = data.get_data("text/plain").ok();
                let target = event.target();
                let within_grid = dom::target_is_descendant(target.clone(), &root)
                    || dom::target_element(target)
                        .map(|el| !dom::is_input(&el, true))
                        .unwrap_or(true);
                let mut s = state.borrow_mut();
                let SharedState {
                    controller, host, ..
                } = &mut *s;
                let disposition =
                    controller.handle_paste(html.as_deref(), text.as_deref(), within_grid, host);
                if disposition == PasteDisposition::Suppress {
                    event.prevent_default();
                    event.stop_propagation();
                }
            }) as Box<dyn FnMut(ClipboardEvent)>);
            document
                .add_event_listener_with_callback("paste", closure.as_ref().unchecked_ref())
                .ok();
            self.clipboard_closures.push(closure);
        }
    }
}

// ============================================================================
// JS callback bridge
// ============================================================================

/// Embedder callbacks resolved once at construction.
struct JsHost {
    row_getter: Function,
    on_cell_click: Option<Function>,
    on_cell_double_click: Option<Function>,
    on_cell_hover: Option<Function>,
    on_cell_focus: Option<Function>,
    on_cell_cut: Option<Function>,
    on_cell_copy: Option<Function>,
    on_cell_paste: Option<Function>,
    can_select_row: Option<Function>,
    can_select_column: Option<Function>,
    on_selection_change: Option<Function>,
    on_column_resize_end: Option<Function>,
    should_handle_key_event: Option<Function>,
}

fn callback(obj: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

impl JsHost {
    fn new(callbacks: &JsValue) -> Result<Self, JsValue> {
        let row_getter = callback(callbacks, "rowGetter")
            .ok_or_else(|| JsValue::from(crate::error::GridError::Callback(
                "rowGetter is required".to_string(),
            )))?;
        Ok(Self {
            row_getter,
            on_cell_click: callback(callbacks, "onCellClick"),
            on_cell_double_click: callback(callbacks, "onCellDoubleClick"),
            on_cell_hover: callback(callbacks, "onCellHover"),
            on_cell_focus: callback(callbacks, "onCellFocus"),
            on_cell_cut: callback(callbacks, "onCellCut"),
            on_cell_copy: callback(callbacks, "onCellCopy"),
            on_cell_paste: callback(callbacks, "onCellPaste"),
            can_select_row: callback(callbacks, "canSelectRow"),
            can_select_column: callback(callbacks, "canSelectColumn"),
            on_selection_change: callback(callbacks, "onSelectionChange"),
            on_column_resize_end: callback(callbacks, "onColumnResizeEndCallback"),
            should_handle_key_event: callback(callbacks, "shouldHandleKeyEvent"),
        })
    }

    fn row_data(&self, row_index: u32) -> JsValue {
        let arg = Object::new();
        let _ = Reflect::set(&arg, &"index".into(), &JsValue::from_f64(f64::from(row_index)));
        self.row_getter
            .call1(&JsValue::NULL, &arg)
            .unwrap_or(JsValue::UNDEFINED)
    }

    /// Standard cell callback params: rowIndex/columnIndex/columnKey/rowData.
    fn cell_params(&self, ctx: &CellContext) -> Object {
        let params = Object::new();
        let _ = Reflect::set(
            &params,
            &"rowIndex".into(),
            &JsValue::from_f64(f64::from(ctx.row_index)),
        );
        let _ = Reflect::set(
            &params,
            &"columnIndex".into(),
            &JsValue::from_f64(f64::from(ctx.column_index)),
        );
        let _ = Reflect::set(&params, &"columnKey".into(), &JsValue::from_str(ctx.column_key));
        let _ = Reflect::set(&params, &"rowData".into(), &self.row_data(ctx.row_index));
        params
    }

    fn key_params(input: &KeyInput) -> Object {
        let params = Object::new();
        let _ = Reflect::set(&params, &"code".into(), &JsValue::from_str(&input.code));
        let _ = Reflect::set(&params, &"shiftKey".into(), &JsValue::from_bool(input.shift));
        let _ = Reflect::set(
            &params,
            &"ctrlOrMetaKey".into(),
            &JsValue::from_bool(input.ctrl_or_meta),
        );
        params
    }

    fn missing(&self, name: &str) {
        // A feature needing this callback is active without it: caller bug.
        web_sys::console::error_1(&JsValue::from_str(&format!(
            "gridview: required callback {name} is missing"
        )));
    }
}

impl GridHost for JsHost {
    fn on_cell_click(&mut self, ctx: &CellContext) -> ClickResponse {
        let Some(f) = &self.on_cell_click else {
            return ClickResponse::Pass;
        };
        let result = f
            .call1(&JsValue::NULL, &self.cell_params(ctx))
            .unwrap_or(JsValue::FALSE);
        if result.as_string().as_deref() == Some(SKIP_CELL_CLICK) {
            return ClickResponse::Ignore;
        }
        if result.is_truthy() {
            ClickResponse::Claim
        } else {
            ClickResponse::Pass
        }
    }

    fn on_cell_double_click(&mut self, ctx: &CellContext) {
        if let Some(f) = &self.on_cell_double_click {
            let _ = f.call1(&JsValue::NULL, &self.cell_params(ctx));
        }
    }

    fn on_cell_hover(&mut self, ctx: &CellContext) {
        if let Some(f) = &self.on_cell_hover {
            let _ = f.call1(&JsValue::NULL, &self.cell_params(ctx));
        }
    }

    fn should_handle_key_event(&self, input: &KeyInput) -> bool {
        let Some(f) = &self.should_handle_key_event else {
            return true;
        };
        f.call1(&JsValue::NULL, &Self::key_params(input))
            .map(|v| v.is_truthy())
            .unwrap_or(true)
    }

    fn on_cell_focus(
        &mut self,
        target: Option<(CellCoord, &str)>,
        seed: Option<&KeyInput>,
    ) -> bool {
        let Some(f) = &self.on_cell_focus else {
            return false;
        };
        let params = Object::new();
        match target {
            Some((coord, column_key)) => {
                let _ = Reflect::set(
                    &params,
                    &"rowIndex".into(),
                    &JsValue::from_f64(f64::from(coord.row)),
                );
                let _ = Reflect::set(
                    &params,
                    &"columnIndex".into(),
                    &JsValue::from_f64(f64::from(coord.column)),
                );
                let _ = Reflect::set(&params, &"columnKey".into(), &JsValue::from_str(column_key));
                let _ = Reflect::set(&params, &"rowData".into(), &self.row_data(coord.row));
            }
            None => {
                // -1 indices signal "release focus".
                let _ = Reflect::set(&params, &"rowIndex".into(), &JsValue::from_f64(-1.0));
                let _ = Reflect::set(&params, &"columnIndex".into(), &JsValue::from_f64(-1.0));
                let _ = Reflect::set(&params, &"columnKey".into(), &JsValue::NULL);
            }
        }
        if let Some(seed) = seed {
            let _ = Reflect::set(&params, &"evt".into(), &Self::key_params(seed));
        }
        f.call1(&JsValue::NULL, &params)
            .map(|v| v.is_truthy())
            .unwrap_or(false)
    }

    fn on_cell_cut(&mut self, ctx: &CellContext) -> String {
        let Some(f) = &self.on_cell_cut else {
            self.missing("onCellCut");
            return String::new();
        };
        f.call1(&JsValue::NULL, &self.cell_params(ctx))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn on_cell_copy(&mut self, ctx: &CellContext) -> String {
        let Some(f) = &self.on_cell_copy else {
            self.missing("onCellCopy");
            return String::new();
        };
        f.call1(&JsValue::NULL, &self.cell_params(ctx))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn on_cell_paste(&mut self, ctx: &CellContext, text: &str, in_multi_cell_paste: bool) {
        let Some(f) = &self.on_cell_paste else {
            self.missing("onCellPaste");
            return;
        };
        let params = self.cell_params(ctx);
        let _ = Reflect::set(&params, &"text".into(), &JsValue::from_str(text));
        let _ = Reflect::set(
            &params,
            &"inMultiCellPaste".into(),
            &JsValue::from_bool(in_multi_cell_paste),
        );
        let _ = f.call1(&JsValue::NULL, &params);
    }

    fn can_select_row(&self, row: u32) -> bool {
        let Some(f) = &self.can_select_row else {
            return true;
        };
        f.call1(&JsValue::NULL, &JsValue::from_f64(f64::from(row)))
            .map(|v| v.is_truthy())
            .unwrap_or(true)
    }

    fn can_select_column(&self, column: u32) -> bool {
        let Some(f) = &self.can_select_column else {
            return true;
        };
        f.call1(&JsValue::NULL, &JsValue::from_f64(f64::from(column)))
            .map(|v| v.is_truthy())
            .unwrap_or(true)
    }

    fn on_selection_change(&mut self, ranges: &[crate::range::Range]) {
        if let Some(f) = &self.on_selection_change {
            if let Ok(value) = serde_wasm_bindgen::to_value(&ranges.to_vec()) {
                let _ = f.call1(&JsValue::NULL, &value);
            }
        }
    }

    fn on_column_resize_end(&mut self, new_width: f32, column_key: &str) {
        if let Some(f) = &self.on_column_resize_end {
            let _ = f.call2(
                &JsValue::NULL,
                &JsValue::from_f64(f64::from(new_width)),
                &JsValue::from_str(column_key),
            );
        }
    }
}

// ============================================================================
// JS cell handles
// ============================================================================

/// A duck-typed JS cell handle with its capabilities resolved up front.
struct JsCellHandle {
    target: JsValue,
    get_value: Option<Function>,
    set_value: Option<Function>,
    clear_value: Option<Function>,
    claim_focus: Option<Function>,
    release_focus: Option<Function>,
}

impl JsCellHandle {
    fn new(handle: &JsValue) -> Self {
        Self {
            target: handle.clone(),
            get_value: callback(handle, "getValue"),
            set_value: callback(handle, "setValue"),
            clear_value: callback(handle, "clearValue"),
            claim_focus: callback(handle, "claimFocus"),
            release_focus: callback(handle, "releaseFocus"),
        }
    }
}

impl CellHandle for JsCellHandle {
    fn caps(&self) -> CellCaps {
        CellCaps {
            get_value: self.get_value.is_some(),
            set_value: self.set_value.is_some(),
            clear_value: self.clear_value.is_some(),
            claim_focus: self.claim_focus.is_some(),
            release_focus: self.release_focus.is_some(),
        }
    }

    fn get_value(&self) -> String {
        self.get_value
            .as_ref()
            .and_then(|f| f.call0(&self.target).ok())
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn set_value(&mut self, text: &str, in_multi_cell_paste: bool) {
        if let Some(f) = &self.set_value {
            let _ = f.call2(
                &self.target,
                &JsValue::from_str(text),
                &JsValue::from_bool(in_multi_cell_paste),
            );
        }
    }

    fn clear_value(&mut self) {
        if let Some(f) = &self.clear_value {
            let _ = f.call0(&self.target);
        }
    }

    fn claim_focus(&mut self) {
        if let Some(f) = &self.claim_focus {
            let _ = f.call0(&self.target);
        }
    }

    fn release_focus(&mut self) {
        if let Some(f) = &self.release_focus {
            let _ = f.call0(&self.target);
        }
    }
}
