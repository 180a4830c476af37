//! Folio Animation
//!
//! The tween engine behind the page orchestrator.
//!
//! # Features
//!
//! - **Easing**: named curves, parsed from GSAP-style names (`"power3.out"`)
//! - **Tweens**: fixed-duration interpolation with delay, yoyo repeat and
//!   reversal from the current value
//! - **Stagger**: start offsets spread across a set of targets
//! - **Counters**: whole-number count-up text for stat figures
//! - **Scheduler**: one frame clock for every tween, with self-releasing
//!   `AnimatedTween` bindings

pub mod counter;
pub mod easing;
pub mod scheduler;
pub mod stagger;
pub mod tween;
pub mod values;

pub use counter::CounterText;
pub use easing::{Easing, UnknownEasing};
pub use scheduler::{AnimatedTween, AnimationScheduler, SchedulerHandle, TweenId};
pub use stagger::{Stagger, StaggerFrom};
pub use tween::{Repeat, SpanEnd, Tween, TweenPhase};
pub use values::{Interpolate, VisualProps};
