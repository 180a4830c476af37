//! Event routing from pointer and focus input to page elements
//!
//! Bridges raw input (pointer moved, pointer left the window, focus changed)
//! to element-level events.
//!
//! # Architecture
//!
//! ```text
//! Host input (pointer at x/y in viewport space)
//!     ↓
//! EventRouter (hit testing, hover tracking)
//!     ↓
//! Element events (POINTER_ENTER, POINTER_LEAVE, FOCUS, BLUR)
//!     ↓
//! Page listeners → orchestrator
//! ```
//!
//! Pointer coordinates are given in viewport space. The router keeps the last
//! pointer position so hover can be re-evaluated after a scroll moves content
//! under a stationary pointer.

use folio_core::events::event_types;
use folio_core::{EventType, Point};
use indexmap::IndexSet;

use crate::tree::{ElementId, PageTree};
use crate::viewport::Viewport;

/// Tracks hover and focus state
///
/// Maintains state for:
/// - Current pointer position (viewport space), if the pointer is inside
/// - Currently hovered elements (for enter/leave detection)
/// - Focused element
#[derive(Default)]
pub struct EventRouter {
    pointer: Option<Point>,

    /// Elements under the pointer, in document order
    hovered: IndexSet<ElementId>,

    focused: Option<ElementId>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer
    }

    pub fn is_hovered(&self, element: ElementId) -> bool {
        self.hovered.contains(&element)
    }

    pub fn hovered(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.hovered.iter().copied()
    }

    /// Set focus to an element (or None to clear focus)
    ///
    /// Emits BLUR to the previously focused element before FOCUS to the new
    /// one. Re-focusing the focused element emits nothing.
    pub fn set_focus(&mut self, element: Option<ElementId>) -> Vec<(ElementId, EventType)> {
        let mut events = Vec::new();
        if self.focused == element {
            return events;
        }

        if let Some(old) = self.focused {
            events.push((old, event_types::BLUR));
        }
        if let Some(new) = element {
            events.push((new, event_types::FOCUS));
        }

        self.focused = element;
        events
    }

    // =========================================================================
    // Pointer Events
    // =========================================================================

    /// Handle pointer move
    ///
    /// Updates hover state and returns POINTER_LEAVE events for elements no
    /// longer under the pointer, followed by POINTER_ENTER for newly hovered
    /// ones. Leaves are reported innermost first, enters outermost first.
    pub fn on_pointer_move(
        &mut self,
        tree: &PageTree,
        viewport: &Viewport,
        x: f32,
        y: f32,
    ) -> Vec<(ElementId, EventType)> {
        self.pointer = Some(Point::new(x, y));
        self.update_hover(tree, viewport)
    }

    /// Handle the pointer leaving the page
    ///
    /// Emits POINTER_LEAVE to all currently hovered elements.
    pub fn on_pointer_leave(&mut self) -> Vec<(ElementId, EventType)> {
        self.pointer = None;
        let events = self
            .hovered
            .iter()
            .rev()
            .map(|&element| (element, event_types::POINTER_LEAVE))
            .collect();
        self.hovered.clear();
        events
    }

    /// Re-run hit testing at the last pointer position
    ///
    /// Called after scrolling: the pointer stays put in viewport space while
    /// the content moves underneath it.
    pub fn refresh_hover(
        &mut self,
        tree: &PageTree,
        viewport: &Viewport,
    ) -> Vec<(ElementId, EventType)> {
        if self.pointer.is_none() && self.hovered.is_empty() {
            return Vec::new();
        }
        self.update_hover(tree, viewport)
    }

    fn update_hover(
        &mut self,
        tree: &PageTree,
        viewport: &Viewport,
    ) -> Vec<(ElementId, EventType)> {
        let current: IndexSet<ElementId> = match self.pointer {
            Some(p) => tree
                .hit_test_all(p.x, viewport.to_document_y(p.y))
                .into_iter()
                .collect(),
            None => IndexSet::new(),
        };

        let mut events = Vec::new();

        // Elements that were hovered but no longer are -> POINTER_LEAVE
        for &element in self.hovered.iter().rev() {
            if !current.contains(&element) {
                events.push((element, event_types::POINTER_LEAVE));
            }
        }

        // Elements that are newly hovered -> POINTER_ENTER
        for &element in current.iter() {
            if !self.hovered.contains(&element) {
                events.push((element, event_types::POINTER_ENTER));
            }
        }

        self.hovered = current;
        events
    }
}
