//! Folio Core
//!
//! Foundational types shared by the Folio crates:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` in document coordinates
//! - **Visual State**: the concrete per-element transform/opacity record that
//!   animations write into
//! - **Events**: pointer and focus event type constants
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Rect, VisualState};
//!
//! let card = Rect::new(0.0, 900.0, 320.0, 240.0);
//! assert!(card.contains_xy(10.0, 1000.0));
//!
//! let hidden = VisualState::IDENTITY.with_opacity(0.0);
//! assert_eq!(hidden.scale, 1.0);
//! ```

pub mod events;
pub mod geometry;
pub mod visual;

pub use events::{event_types, EventType};
pub use geometry::{Point, Rect, Size};
pub use visual::VisualState;
