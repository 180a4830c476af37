//! Viewport and threshold observation
//!
//! The viewport is a window of fixed size sliding vertically over the
//! document. A `ViewportObserver` watches elements against a trigger line
//! placed at a fraction of the viewport height, measured from the viewport
//! top. An element counts as *inside* once its top edge has scrolled up to or
//! past that line: a threshold of `0.8` fires when the element's top reaches
//! 80% of the way down the viewport.

use folio_core::Rect;
use slotmap::{new_key_type, SlotMap};

use crate::tree::{ElementId, PageTree};

new_key_type! {
    pub struct ObserverId;
}

/// Scrollable viewport over the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    scroll_y: f32,
    document_height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
            document_height: height,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    /// Update the scrollable extent, re-clamping the current offset
    pub fn set_document_height(&mut self, height: f32) {
        self.document_height = height.max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    /// Largest valid scroll offset
    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.height).max(0.0)
    }

    /// Scroll to an absolute offset. Returns true if the offset changed.
    pub fn scroll_to(&mut self, y: f32) -> bool {
        let clamped = if y.is_finite() {
            y.clamp(0.0, self.max_scroll())
        } else {
            self.scroll_y
        };
        let changed = clamped != self.scroll_y;
        self.scroll_y = clamped;
        changed
    }

    pub fn scroll_by(&mut self, dy: f32) -> bool {
        self.scroll_to(self.scroll_y + dy)
    }

    /// Whether the offset is at the bottom of the document
    pub fn at_end(&self) -> bool {
        self.scroll_y >= self.max_scroll()
    }

    /// Visible region in document space
    pub fn visible_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }

    /// Document-space y of the trigger line for `threshold`
    pub fn trigger_line(&self, threshold: f32) -> f32 {
        self.scroll_y + threshold * self.height
    }

    /// Convert a viewport-space y to document space
    pub fn to_document_y(&self, y: f32) -> f32 {
        y + self.scroll_y
    }
}

/// Direction of a threshold crossing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    /// The element's top moved up past the trigger line
    Enter,
    /// The element's top moved back below the trigger line
    Exit,
}

#[derive(Clone, Copy, Debug)]
struct Observation {
    element: ElementId,
    threshold: f32,
    inside: bool,
}

/// Registry of threshold observations with inside/outside memory
///
/// New observations start *outside*. The first [`update`](Self::update)
/// after registering reports `Enter` for elements that are already past
/// their line.
#[derive(Default)]
pub struct ViewportObserver {
    observations: SlotMap<ObserverId, Observation>,
}

impl ViewportObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, element: ElementId, threshold: f32) -> ObserverId {
        self.observations.insert(Observation {
            element,
            threshold,
            inside: false,
        })
    }

    /// Stop observing. Returns false if the observer was already released.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.observations.remove(id).is_some()
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.observations.contains_key(id)
    }

    pub fn element(&self, id: ObserverId) -> Option<ElementId> {
        self.observations.get(id).map(|o| o.element)
    }

    pub fn is_inside(&self, id: ObserverId) -> Option<bool> {
        self.observations.get(id).map(|o| o.inside)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Re-evaluate every observation and report the ones that crossed
    ///
    /// Observations whose element no longer exists never fire.
    pub fn update(&mut self, viewport: &Viewport, tree: &PageTree) -> Vec<(ObserverId, Crossing)> {
        let mut crossings = Vec::new();

        for (id, observation) in self.observations.iter_mut() {
            let Some(element) = tree.get(observation.element) else {
                continue;
            };
            let inside = element.bounds().top() <= viewport.trigger_line(observation.threshold);
            if inside != observation.inside {
                observation.inside = inside;
                crossings.push((
                    id,
                    if inside {
                        Crossing::Enter
                    } else {
                        Crossing::Exit
                    },
                ));
            }
        }

        crossings
    }
}
