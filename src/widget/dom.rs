//! DOM event-target predicates for the grid's document-level listeners.
//!
//! Key and clipboard events are subscribed on the document, so each event
//! must be checked against the grid's own surface before it is handled:
//! events aimed at unrelated inputs, contenteditable regions, or menu items
//! belong to someone else.

use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, KeyboardEvent, Node};

/// Whether the element is an input-like or editable target.
pub(crate) fn is_input(element: &Element, or_editable: bool) -> bool {
    let tag = element.tag_name().to_uppercase();
    if tag == "INPUT" || tag == "TEXTAREA" {
        return true;
    }
    if element.get_attribute("role").as_deref() == Some("menuitem") {
        return true;
    }
    if or_editable {
        if let Some(editable) = element.get_attribute("contenteditable") {
            return editable != "inherit" && editable != "false";
        }
    }
    false
}

/// Whether `target` is the grid root or one of its descendants.
pub(crate) fn target_is_descendant(target: Option<EventTarget>, root: &Element) -> bool {
    let Some(node) = target.and_then(|t| t.dyn_into::<Node>().ok()) else {
        return false;
    };
    let mut current = Some(node);
    while let Some(node) = current {
        if node.is_same_node(Some(root.as_ref())) {
            return true;
        }
        current = node.parent_node();
    }
    false
}

/// The event target as an `Element`, if it is one.
pub(crate) fn target_element(target: Option<EventTarget>) -> Option<Element> {
    target.and_then(|t| t.dyn_into::<Element>().ok())
}

/// Whether the event target is the document body (key events land there when
/// nothing inside the grid has DOM focus).
pub(crate) fn target_is_body(target: Option<EventTarget>) -> bool {
    let Some(element) = target_element(target) else {
        return false;
    };
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .is_some_and(|body| element.is_same_node(Some(body.as_ref())))
}

pub(crate) fn is_mac() -> bool {
    web_sys::window()
        .map(|w| w.navigator().platform().unwrap_or_default())
        .is_some_and(|p| p.to_uppercase().contains("MAC"))
}

/// Undo/redo chords are application-level and never the grid's to handle:
/// meta-Z (and shift-meta-Z) on a Mac, ctrl-Z / ctrl-Y elsewhere.
pub(crate) fn is_undo_redo(event: &KeyboardEvent) -> bool {
    let code = event.code();
    if is_mac() {
        event.meta_key() && code == "KeyZ"
    } else {
        event.ctrl_key() && (code == "KeyZ" || code == "KeyY")
    }
}
