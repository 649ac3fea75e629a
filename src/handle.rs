//! Shared handle for wiring a [`CanvasController`] into Slint callbacks.
//!
//! # Example
//!
//! ```ignore
//! use slint_node_canvas::{EditorHandle, Reaction, SceneModels};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let editor = EditorHandle::new();
//!     let w = window.as_weak();
//!
//!     editor.on_reaction(move |reaction| {
//!         if let Some(w) = w.upgrade() {
//!             match reaction {
//!                 Reaction::ContextMenu(req) => w.invoke_show_menu(req.screen.x, req.screen.y),
//!                 _ => w.invoke_refresh(),
//!             }
//!         }
//!     });
//!
//!     window.on_pointer_event(editor.pointer_callback());
//!     window.on_key_pressed(editor.key_callback());
//!     window.on_scrolled(editor.scroll_callback());
//!     window.on_focus_lost(editor.focus_lost_callback());
//!     window.on_toolbar_clicked(editor.toolbar_callback());
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::commands::{ContextMenuAction, ToolbarCommand};
use crate::config::{ConfigError, EditorConfig};
use crate::controller::{CanvasController, ContextMenuRequest, KeyCommand, PointerEvent, Reaction};
use crate::node::NodeId;
use crate::scene::SceneSnapshot;
use crate::viewport::Point;
use slint::SharedString;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

type ReactionListener = Rc<RefCell<Option<Box<dyn Fn(Reaction)>>>>;

/// Cheaply clonable, UI-thread-only handle to a [`CanvasController`].
///
/// Every callback factory clones the handle's internals, so one handle can
/// feed any number of Slint callbacks. Reactions other than
/// [`Reaction::Ignored`] are forwarded to the listener registered with
/// [`on_reaction`](Self::on_reaction) after the controller borrow ends, so
/// the listener may use the handle again.
#[derive(Clone)]
pub struct EditorHandle {
    controller: Rc<RefCell<CanvasController>>,
    listener: ReactionListener,
    last_menu: Rc<RefCell<Option<ContextMenuRequest>>>,
}

impl Default for EditorHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHandle {
    pub fn new() -> Self {
        Self::from_controller(CanvasController::new())
    }

    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_controller(CanvasController::with_config(config)?))
    }

    pub fn from_controller(controller: CanvasController) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            listener: Rc::new(RefCell::new(None)),
            last_menu: Rc::new(RefCell::new(None)),
        }
    }

    /// Register the function that receives reactions from callbacks.
    pub fn on_reaction(&self, listener: impl Fn(Reaction) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn borrow(&self) -> Ref<'_, CanvasController> {
        self.controller.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, CanvasController> {
        self.controller.borrow_mut()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.controller.borrow().snapshot()
    }

    /// The most recent context menu request, kept until an action is applied.
    pub fn last_context_menu(&self) -> Option<ContextMenuRequest> {
        *self.last_menu.borrow()
    }

    /// Run `f` on the controller and forward its reaction.
    fn dispatch(&self, f: impl FnOnce(&mut CanvasController) -> Reaction) -> Reaction {
        let reaction = f(&mut self.controller.borrow_mut());
        Self::forward(&self.listener, &self.last_menu, reaction);
        reaction
    }

    fn forward(
        listener: &ReactionListener,
        last_menu: &Rc<RefCell<Option<ContextMenuRequest>>>,
        reaction: Reaction,
    ) {
        if let Reaction::ContextMenu(request) = reaction {
            *last_menu.borrow_mut() = Some(request);
        }
        if reaction == Reaction::Ignored {
            return;
        }
        if let Some(listener) = listener.borrow().as_ref() {
            listener(reaction);
        }
    }

    // === Direct handlers ===

    pub fn handle_pointer(&self, event: PointerEvent) -> Reaction {
        self.dispatch(|ctrl| ctrl.handle_pointer(event))
    }

    pub fn handle_key(&self, key: KeyCommand) -> Reaction {
        self.dispatch(|ctrl| ctrl.handle_key(key))
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.controller.borrow_mut().set_viewport_size(width, height);
    }

    /// Run a toolbar command. Returns the created node for `AddNode`.
    pub fn apply_toolbar(&self, command: ToolbarCommand) -> Option<NodeId> {
        let created = command.apply(&mut self.controller.borrow_mut());
        Self::forward(&self.listener, &self.last_menu, Reaction::Redraw);
        created
    }

    /// Apply a context menu action to the last menu request.
    ///
    /// Returns [`Reaction::Ignored`] if no menu was requested.
    pub fn apply_context_action(&self, action: ContextMenuAction) -> Reaction {
        let Some(request) = self.last_menu.borrow_mut().take() else {
            return Reaction::Ignored;
        };
        self.dispatch(|ctrl| ctrl.apply_context_action(action, &request))
    }

    // === Callback factories ===

    /// Returns a callback that feeds pointer events to the controller.
    pub fn pointer_callback(&self) -> impl Fn(PointerEvent) -> Reaction {
        let handle = self.clone();
        move |event| handle.handle_pointer(event)
    }

    /// Returns a callback for key events carrying Slint key text.
    ///
    /// The callback returns `true` if the key was understood, so the UI can
    /// decide whether to accept the event.
    pub fn key_callback(&self) -> impl Fn(SharedString) -> bool {
        let handle = self.clone();
        move |text| match KeyCommand::from_text(text.as_str()) {
            Some(key) => {
                handle.handle_key(key);
                true
            }
            None => false,
        }
    }

    /// Returns a callback for wheel events: `(x, y, delta)` in screen space.
    pub fn scroll_callback(&self) -> impl Fn(f32, f32, f32) -> bool {
        let handle = self.clone();
        move |x, y, delta| {
            handle
                .handle_pointer(PointerEvent::Wheel {
                    position: Point::new(x, y),
                    delta,
                })
                .needs_redraw()
        }
    }

    /// Returns a callback that aborts the current interaction.
    pub fn focus_lost_callback(&self) -> impl Fn() {
        let handle = self.clone();
        move || {
            handle.handle_pointer(PointerEvent::Cancelled);
        }
    }

    /// Returns a callback for toolbar buttons by index into
    /// [`ToolbarCommand::ALL`].
    pub fn toolbar_callback(&self) -> impl Fn(i32) {
        let handle = self.clone();
        move |index| {
            let command = usize::try_from(index)
                .ok()
                .and_then(|i| ToolbarCommand::ALL.get(i).copied());
            if let Some(command) = command {
                handle.apply_toolbar(command);
            }
        }
    }

    /// Returns a callback for context menu entries by index into
    /// [`ContextMenuAction::ALL`].
    pub fn context_menu_callback(&self) -> impl Fn(i32) {
        let handle = self.clone();
        move |index| {
            if let Some(action) = ContextMenuAction::from_index(index) {
                handle.apply_context_action(action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Modifiers, PointerButton};
    use crate::node::NodeKind;
    use slint::platform::Key;

    #[test]
    fn test_callbacks_share_controller() {
        let handle = EditorHandle::new();
        let add = handle.toolbar_callback();
        add(1);
        add(1);
        assert_eq!(handle.borrow().graph().node_count(), 2);
        assert!(handle
            .borrow()
            .graph()
            .nodes()
            .all(|n| n.kind == NodeKind::Process));

        // Out of range index is ignored
        add(42);
        assert_eq!(handle.borrow().graph().node_count(), 2);
    }

    #[test]
    fn test_listener_receives_non_ignored_reactions() {
        let handle = EditorHandle::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        handle.on_reaction({
            let seen = seen.clone();
            move |r| seen.borrow_mut().push(r)
        });

        let scroll = handle.scroll_callback();
        assert!(scroll(10.0, 10.0, 1.0));
        // Moving the pointer while idle changes nothing
        handle.handle_pointer(PointerEvent::Moved { position: Point::new(1.0, 1.0) });

        assert_eq!(seen.borrow().as_slice(), &[Reaction::Redraw]);
    }

    #[test]
    fn test_listener_can_reenter_handle() {
        let handle = EditorHandle::new();
        let counts = Rc::new(RefCell::new(Vec::new()));
        handle.on_reaction({
            let handle = handle.clone();
            let counts = counts.clone();
            move |_| counts.borrow_mut().push(handle.snapshot().nodes.len())
        });
        handle.apply_toolbar(ToolbarCommand::AddNode(NodeKind::Input));
        assert_eq!(counts.borrow().as_slice(), &[1]);
    }

    #[test]
    fn test_key_callback() {
        let handle = EditorHandle::new();
        let key = handle.key_callback();
        assert!(key("g".into()));
        assert!(!handle.borrow().grid_visible());
        assert!(key(SharedString::from(Key::Escape)));
        assert!(!key("z".into()));
    }

    #[test]
    fn test_context_menu_round_trip() {
        let handle = EditorHandle::new();
        assert_eq!(handle.apply_context_action(ContextMenuAction::AddNode), Reaction::Ignored);

        handle.handle_pointer(PointerEvent::Pressed {
            button: PointerButton::Secondary,
            position: Point::new(40.0, 30.0),
            modifiers: Modifiers::NONE,
        });
        assert!(handle.last_context_menu().is_some());

        let menu = handle.context_menu_callback();
        menu(0);
        assert!(handle.last_context_menu().is_none());
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.nodes[0].position, Point::new(40.0, 30.0));
    }

    #[test]
    fn test_focus_lost_cancels_drag() {
        let handle = EditorHandle::new();
        handle.borrow_mut().add_node_at(NodeKind::Input, Point::ZERO);
        handle.handle_pointer(PointerEvent::Pressed {
            button: PointerButton::Primary,
            position: Point::new(156.0, 65.0),
            modifiers: Modifiers::NONE,
        });
        assert!(handle.borrow().pending_connection().is_some());

        (handle.focus_lost_callback())();
        assert!(handle.borrow().pending_connection().is_none());
        assert_eq!(handle.borrow().graph().connection_count(), 0);
    }
}
