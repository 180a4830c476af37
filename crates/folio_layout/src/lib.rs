//! Folio Layout
//!
//! The page host and the animation orchestrator that drives it.
//!
//! # Features
//!
//! - **Page Tree**: role-tagged elements laid out with Taffy flexbox
//! - **Viewport**: scroll offset plus threshold observers that report
//!   crossings of a trigger line
//! - **Event Router**: hover enter/leave hit testing and focus/blur
//! - **Page**: owns every observer and listener binding and turns input into
//!   [`PageSignal`]s
//! - **Rules**: declarative transitions targeted by role
//! - **Orchestrator**: binds rules on mount, runs them per frame and releases
//!   every binding on teardown

pub mod event_router;
pub mod orchestrator;
pub mod page;
pub mod role;
pub mod rule;
pub mod tree;
pub mod viewport;

pub use event_router::EventRouter;
pub use orchestrator::{Orchestrator, TargetState};
pub use page::{Interaction, ListenerId, Page, PageSignal};
pub use role::{Role, UnknownRole};
pub use rule::{Observe, Rule, Trigger};
pub use tree::{node, Element, ElementId, NodeBuilder, PageTree};
pub use viewport::{Crossing, ObserverId, Viewport, ViewportObserver};
