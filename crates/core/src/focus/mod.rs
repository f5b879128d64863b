//! Tracks which object is hovered, focused or being dragged.
//!
//! The tracker only stores [`ObjectId`]s. Objects that registered themselves
//! keep a weak link back to it and clear their id when they are dropped, so
//! the tracker never points at a destroyed object.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::object::ObjectId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    pub hovered: Option<ObjectId>,
    pub focused: Option<ObjectId>,
    pub dragging: Option<ObjectId>,
}

impl FocusState {
    fn clear_object(&mut self, id: ObjectId) {
        for slot in [&mut self.hovered, &mut self.focused, &mut self.dragging] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }
}

/// Link an object keeps to the tracker it is registered with.
pub type FocusLink = Weak<RefCell<FocusState>>;

#[derive(Debug, Default, Clone)]
pub struct FocusTracker {
    state: Rc<RefCell<FocusState>>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&self) -> FocusLink {
        Rc::downgrade(&self.state)
    }

    pub fn state(&self) -> FocusState {
        *self.state.borrow()
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.state.borrow().hovered
    }

    pub fn focused(&self) -> Option<ObjectId> {
        self.state.borrow().focused
    }

    pub fn dragging(&self) -> Option<ObjectId> {
        self.state.borrow().dragging
    }

    pub fn set_hovered(&self, id: Option<ObjectId>) {
        self.state.borrow_mut().hovered = id;
    }

    pub fn set_focused(&self, id: Option<ObjectId>) {
        self.state.borrow_mut().focused = id;
    }

    pub fn set_dragging(&self, id: Option<ObjectId>) {
        self.state.borrow_mut().dragging = id;
    }

    pub fn clear(&self) {
        *self.state.borrow_mut() = FocusState::default();
    }

    /// Forgets `id` in every slot.
    pub fn clear_object(&self, id: ObjectId) {
        self.state.borrow_mut().clear_object(id);
    }
}

/// Called from an object's `Drop`.
pub(crate) fn release(link: &FocusLink, id: ObjectId) {
    if let Some(state) = link.upgrade() {
        if let Ok(mut state) = state.try_borrow_mut() {
            state.clear_object(id);
        }
    }
}
