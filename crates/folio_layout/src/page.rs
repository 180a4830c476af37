//! Page host
//!
//! `Page` owns the realized tree, the viewport, the observer registry and
//! the pointer listener registry. Input methods (`scroll_to`, `pointer_move`,
//! `focus` ...) return the [`PageSignal`]s produced for registered observers
//! and listeners. Events on elements with no listener are dropped here.

use folio_core::events::event_types;
use folio_core::EventType;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::event_router::EventRouter;
use crate::tree::{ElementId, PageTree};
use crate::viewport::{Crossing, ObserverId, Viewport, ViewportObserver};

new_key_type! {
    pub struct ListenerId;
}

/// Which pointer interaction a listener follows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// POINTER_ENTER / POINTER_LEAVE
    Hover,
    /// FOCUS / BLUR
    Focus,
}

impl Interaction {
    /// Whether `event` belongs to this interaction, and if so whether it is
    /// the forward half (enter/focus)
    pub fn classify(self, event: EventType) -> Option<bool> {
        match (self, event) {
            (Interaction::Hover, event_types::POINTER_ENTER) => Some(true),
            (Interaction::Hover, event_types::POINTER_LEAVE) => Some(false),
            (Interaction::Focus, event_types::FOCUS) => Some(true),
            (Interaction::Focus, event_types::BLUR) => Some(false),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Listener {
    element: ElementId,
    interaction: Interaction,
}

/// An event for a registered observer or listener
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSignal {
    Crossing {
        observer: ObserverId,
        element: ElementId,
        crossing: Crossing,
    },
    Pointer {
        listener: ListenerId,
        element: ElementId,
        event: EventType,
    },
}

impl PageSignal {
    pub fn element(&self) -> ElementId {
        match *self {
            PageSignal::Crossing { element, .. } | PageSignal::Pointer { element, .. } => element,
        }
    }
}

pub struct Page {
    tree: PageTree,
    viewport: Viewport,
    observers: ViewportObserver,
    router: EventRouter,
    listeners: SlotMap<ListenerId, Listener>,
}

impl Page {
    /// Host `tree` in a viewport of the given size
    pub fn new(tree: PageTree, viewport_width: f32, viewport_height: f32) -> Self {
        let mut viewport = Viewport::new(viewport_width, viewport_height);
        viewport.set_document_height(tree.document_height());
        Self {
            tree,
            viewport,
            observers: ViewportObserver::new(),
            router: EventRouter::new(),
            listeners: SlotMap::with_key(),
        }
    }

    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut PageTree {
        &mut self.tree
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    pub fn observe(&mut self, element: ElementId, threshold: f32) -> ObserverId {
        self.observers.observe(element, threshold)
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.observers.unobserve(id)
    }

    pub fn listen(&mut self, element: ElementId, interaction: Interaction) -> ListenerId {
        self.listeners.insert(Listener {
            element,
            interaction,
        })
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn active_observers(&self) -> usize {
        self.observers.len()
    }

    pub fn active_listeners(&self) -> usize {
        self.listeners.len()
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn scroll_to(&mut self, y: f32) -> Vec<PageSignal> {
        if !self.viewport.scroll_to(y) {
            return Vec::new();
        }
        self.refresh()
    }

    pub fn scroll_by(&mut self, dy: f32) -> Vec<PageSignal> {
        self.scroll_to(self.viewport.scroll_y() + dy)
    }

    /// Pointer moved to `(x, y)` in viewport space
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Vec<PageSignal> {
        let events = self.router.on_pointer_move(&self.tree, &self.viewport, x, y);
        self.route(events)
    }

    pub fn pointer_leave(&mut self) -> Vec<PageSignal> {
        let events = self.router.on_pointer_leave();
        self.route(events)
    }

    /// Move focus to `element`, or clear it
    pub fn focus(&mut self, element: Option<ElementId>) -> Vec<PageSignal> {
        let events = self.router.set_focus(element);
        self.route(events)
    }

    /// Re-evaluate observers and hover at the current scroll offset
    ///
    /// Reports `Enter` for observations registered since the last refresh
    /// that are already past their line.
    pub fn refresh(&mut self) -> Vec<PageSignal> {
        let mut signals: Vec<PageSignal> = self
            .observers
            .update(&self.viewport, &self.tree)
            .into_iter()
            .filter_map(|(observer, crossing)| {
                self.observers
                    .element(observer)
                    .map(|element| PageSignal::Crossing {
                        observer,
                        element,
                        crossing,
                    })
            })
            .collect();

        let events = self.router.refresh_hover(&self.tree, &self.viewport);
        signals.extend(self.route(events));
        signals
    }

    /// Fan element events out to matching listeners
    fn route(&self, events: Vec<(ElementId, EventType)>) -> Vec<PageSignal> {
        let mut signals = Vec::new();
        for (element, event) in events {
            trace!(event = event_types::name(event), ?element, "element event");
            for (listener, entry) in self.listeners.iter() {
                if entry.element == element && entry.interaction.classify(event).is_some() {
                    signals.push(PageSignal::Pointer {
                        listener,
                        element,
                        event,
                    });
                }
            }
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::tree::node;

    fn page() -> Page {
        let root = node(Role::Page)
            .w_full()
            .child(node(Role::Hero).h(900.0))
            .child(
                node(Role::Services)
                    .child(node(Role::ServiceCard).h(300.0))
                    .child(node(Role::ServiceCard).h(300.0)),
            )
            .child(node(Role::Contact).child(node(Role::ContactField).label("email").h(40.0)));
        Page::new(PageTree::build(root, 1280.0).unwrap(), 1280.0, 800.0)
    }

    #[test]
    fn test_bindings_are_counted() {
        let mut page = page();
        let card = page.tree().first(Role::ServiceCard).unwrap();

        let o = page.observe(card, 0.8);
        let l = page.listen(card, Interaction::Hover);
        assert_eq!(page.active_observers(), 1);
        assert_eq!(page.active_listeners(), 1);

        assert!(page.unobserve(o));
        assert!(page.unlisten(l));
        assert!(!page.unlisten(l));
        assert_eq!(page.active_observers(), 0);
        assert_eq!(page.active_listeners(), 0);
    }

    #[test]
    fn test_scroll_emits_crossings() {
        let mut page = page();
        let cards = page.tree().query_role(Role::ServiceCard);
        let first = page.observe(cards[0], 0.8);
        let second = page.observe(cards[1], 0.8);

        // Card tops at 900 and 1200; line at 640 before scrolling
        assert!(page.refresh().is_empty());

        let signals = page.scroll_to(300.0);
        assert_eq!(
            signals,
            vec![PageSignal::Crossing {
                observer: first,
                element: cards[0],
                crossing: Crossing::Enter,
            }]
        );

        let signals = page.scroll_by(300.0);
        assert_eq!(signals.len(), 1);
        assert!(matches!(signals[0], PageSignal::Crossing { observer, .. } if observer == second));

        // Same offset again: nothing changes
        assert!(page.scroll_to(600.0).is_empty());
    }

    #[test]
    fn test_pointer_signals_only_for_listeners() {
        let mut page = page();
        let card = page.tree().first(Role::ServiceCard).unwrap();
        let listener = page.listen(card, Interaction::Hover);

        page.scroll_to(500.0);
        // Document y 1000 is inside the first card (900..1200)
        let signals = page.pointer_move(10.0, 500.0);
        assert_eq!(
            signals,
            vec![PageSignal::Pointer {
                listener,
                element: card,
                event: event_types::POINTER_ENTER,
            }]
        );

        let signals = page.pointer_leave();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].element(), card);
    }

    #[test]
    fn test_focus_listener() {
        let mut page = page();
        let field = page.tree().find_label("email").unwrap();
        let hover = page.listen(field, Interaction::Hover);
        let focus = page.listen(field, Interaction::Focus);

        let signals = page.focus(Some(field));
        assert_eq!(
            signals,
            vec![PageSignal::Pointer {
                listener: focus,
                element: field,
                event: event_types::FOCUS,
            }]
        );
        let reached_hover = signals.iter().any(|s| {
            matches!(s, PageSignal::Pointer { listener, .. } if *listener == hover)
        });
        assert!(!reached_hover);

        let signals = page.focus(None);
        assert_eq!(signals.len(), 1);
    }
}
