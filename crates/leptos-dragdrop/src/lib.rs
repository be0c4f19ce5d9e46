//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.
//! Generic over the drop target so a board can key targets by column.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals<T: Copy + PartialEq + Send + Sync + 'static> {
    /// Item currently being dragged
    pub dragging_id: RwSignal<Option<u32>>,
    /// Target under the pointer while dragging
    pub drop_target: RwSignal<Option<T>>,
    /// Set briefly after a drag so the trailing click can be ignored
    pub drag_just_ended: RwSignal<bool>,
    /// Pending item id (mousedown but not yet dragging)
    pub pending_id: RwSignal<Option<u32>>,
    /// Start position for movement detection
    pub start: RwSignal<(i32, i32)>,
}

impl<T: Copy + PartialEq + Send + Sync + 'static> DndSignals<T> {
    /// Is this item being dragged (tracked)
    pub fn is_dragging(&self, item_id: u32) -> bool {
        self.dragging_id.get() == Some(item_id)
    }

    /// Is any drag in progress (tracked)
    pub fn is_active(&self) -> bool {
        self.dragging_id.get().is_some()
    }

    /// Is the pointer over this target during a drag (tracked)
    pub fn is_over(&self, target: T) -> bool {
        self.drop_target.get() == Some(target)
    }
}

pub fn create_dnd_signals<T: Copy + PartialEq + Send + Sync + 'static>() -> DndSignals<T> {
    DndSignals {
        dragging_id: RwSignal::new(None),
        drop_target: RwSignal::new(None),
        drag_just_ended: RwSignal::new(false),
        pending_id: RwSignal::new(None),
        start: RwSignal::new((0, 0)),
    }
}

/// Has the pointer moved far enough from `start` to count as a drag
pub fn exceeds_threshold(start: (i32, i32), now: (i32, i32)) -> bool {
    let dx = (now.0 - start.0).abs();
    let dy = (now.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

/// End drag operation
pub fn end_drag<T: Copy + PartialEq + Send + Sync + 'static>(dnd: &DndSignals<T>) {
    dnd.dragging_id.set(None);
    dnd.drop_target.set(None);
    dnd.pending_id.set(None);
    dnd.drag_just_ended.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = Closure::<dyn FnMut()>::new(move || {
            clear.try_set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown<T: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<T>,
    item_id: u32,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Form controls keep their own mouse behaviour
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlSelectElement>().is_some() { return; }
        }
        dnd.pending_id.set(Some(item_id));
        dnd.start.set((ev.client_x(), ev.client_y()));
    }
}

/// Create mouseenter handler for a drop target
pub fn make_on_target_mouseenter<T: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<T>,
    target: T,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id.get_untracked().is_some() {
            dnd.drop_target.set(Some(target));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave<T: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<T>,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id.get_untracked().is_some() {
            dnd.drop_target.set(None);
        }
    }
}

/// Document-level listeners; removed from the document when dropped
pub struct GlobalListeners {
    mousemove: Closure<dyn FnMut(web_sys::MouseEvent)>,
    mouseup: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl Drop for GlobalListeners {
    fn drop(&mut self) {
        let Some(doc) = web_sys::window().and_then(|win| win.document()) else {
            return;
        };
        let _ = doc.remove_event_listener_with_callback("mousemove", self.mousemove.as_ref().unchecked_ref());
        let _ = doc.remove_event_listener_with_callback("mouseup", self.mouseup.as_ref().unchecked_ref());
    }
}

/// Bind global mousemove (drag start detection) and mouseup (drop detection).
///
/// Keep the returned value alive for as long as the drag area is mounted.
pub fn bind_global_handlers<T, F>(dnd: DndSignals<T>, on_drop: F) -> GlobalListeners
where
    T: Copy + PartialEq + Send + Sync + 'static,
    F: Fn(u32, T) + 'static,
{
    let mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(pending) = dnd.pending_id.try_get_untracked() else { return };
        let Some(dragging) = dnd.dragging_id.try_get_untracked() else { return };

        // Pending drag that has not started yet
        if pending.is_some() && dragging.is_none() {
            let start = dnd.start.get_untracked();
            if exceeds_threshold(start, (ev.client_x(), ev.client_y())) {
                dnd.dragging_id.set(pending);
            }
        }
    });

    let mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let Some(dragging_id) = dnd.dragging_id.try_get_untracked() else { return };
        let drop_target = dnd.drop_target.get_untracked();

        dnd.pending_id.set(None);

        if let (Some(dragged), Some(target)) = (dragging_id, drop_target) {
            end_drag(&dnd);
            on_drop(dragged, target);
        } else {
            // Not dragging - click event will fire naturally on the element
            end_drag(&dnd);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref());
        let _ = doc.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref());
    }

    GlobalListeners { mousemove, mouseup }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_jitter_is_not_a_drag() {
        assert!(!exceeds_threshold((100, 100), (103, 97)));
        assert!(!exceeds_threshold((100, 100), (105, 105)));
    }

    #[test]
    fn test_movement_past_threshold_starts_drag() {
        assert!(exceeds_threshold((100, 100), (106, 100)));
        assert!(exceeds_threshold((100, 100), (100, 94)));
    }
}
