//! Animation scheduler
//!
//! Owns every active tween and advances them once per frame. Tweens are
//! registered implicitly through [`AnimatedTween`], which removes its tween
//! again when dropped. Dropping the owner of a set of `AnimatedTween`s
//! therefore cancels the whole set.
//!
//! The scheduler is single-threaded: the host event loop calls `tick_by()`
//! with its frame delta between input events.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::tween::{SpanEnd, Tween, TweenPhase};
use crate::values::VisualProps;

new_key_type! {
    /// Handle to a registered tween
    pub struct TweenId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    tweens: SlotMap<TweenId, Tween>,
}

/// The animation scheduler that ticks all registered tweens
///
/// Usually owned by the orchestrator and shared with bindings via
/// [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                tweens: SlotMap::with_key(),
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Tick all tweens by the frame delta
    ///
    /// Returns true if any tween is still active (needs another tick).
    pub fn tick_by(&self, dt_ms: f32) -> bool {
        let mut inner = self.inner.borrow_mut();
        for (_, tween) in inner.tweens.iter_mut() {
            tween.tick(dt_ms);
        }

        // NOTE: finished tweens stay registered until their owner drops them,
        // so a settled rule can still be reversed later.
        inner.tweens.iter().any(|(_, t)| t.is_playing())
    }

    /// Check if any tweens are still active
    pub fn has_active_animations(&self) -> bool {
        self.inner.borrow().tweens.iter().any(|(_, t)| t.is_playing())
    }

    /// Number of registered tweens (playing or not)
    pub fn tween_count(&self) -> usize {
        self.inner.borrow().tweens.len()
    }

}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// Handed to components that need to register tweens. It won't keep the
/// scheduler alive, and every operation is a no-op once it is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a tween and return its ID
    pub fn register_tween(&self, tween: Tween) -> Option<TweenId> {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().tweens.insert(tween))
    }

    /// Current interpolated value of a tween
    pub fn sample(&self, id: TweenId) -> Option<VisualProps> {
        self.with_tween(id, |t| t.sample())
    }

    /// Read a tween if it exists
    pub fn with_tween<F, R>(&self, id: TweenId, f: F) -> Option<R>
    where
        F: FnOnce(&Tween) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().tweens.get(id).map(f))
    }

    /// Modify a tween if it exists
    pub fn with_tween_mut<F, R>(&self, id: TweenId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Tween) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow_mut().tweens.get_mut(id).map(f))
    }

    /// Remove a tween
    pub fn remove_tween(&self, id: TweenId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().tweens.remove(id);
        }
    }
}

// ============================================================================
// Animated Tween
// ============================================================================

/// A tween that registers itself with the scheduler and is removed on drop
///
/// # Example
///
/// ```
/// use folio_animation::{AnimatedTween, AnimationScheduler, Tween, VisualProps};
///
/// let scheduler = AnimationScheduler::new();
/// let mut fade = AnimatedTween::new(
///     scheduler.handle(),
///     Tween::new(
///         VisualProps::new().with_opacity(0.0),
///         VisualProps::new().with_opacity(1.0),
///         400,
///     ),
/// );
/// fade.start();
/// scheduler.tick_by(200.0);
/// assert!(fade.sample().opacity.unwrap() > 0.0);
///
/// drop(fade);
/// assert_eq!(scheduler.tween_count(), 0);
/// ```
pub struct AnimatedTween {
    handle: SchedulerHandle,
    tween_id: Option<TweenId>,
    /// Last known value, returned if the scheduler is gone
    fallback: VisualProps,
}

impl AnimatedTween {
    /// Register `tween` with the scheduler behind `handle`
    pub fn new(handle: SchedulerHandle, tween: Tween) -> Self {
        let fallback = tween.sample();
        let tween_id = handle.register_tween(tween);
        Self {
            handle,
            tween_id,
            fallback,
        }
    }

    /// Start the full span from its start endpoint
    pub fn start(&mut self) {
        if let Some(id) = self.tween_id {
            self.handle.with_tween_mut(id, Tween::start);
        }
    }

    /// Head toward a span endpoint from the current value
    pub fn play_toward(&mut self, target: SpanEnd, delay_ms: u32) {
        if let Some(id) = self.tween_id {
            self.handle
                .with_tween_mut(id, |t| t.play_toward(target, delay_ms));
        }
    }

    /// Current interpolated value
    pub fn sample(&self) -> VisualProps {
        self.tween_id
            .and_then(|id| self.handle.sample(id))
            .unwrap_or(self.fallback)
    }

    pub fn phase(&self) -> TweenPhase {
        self.tween_id
            .and_then(|id| self.handle.with_tween(id, |t| t.phase()))
            .unwrap_or(TweenPhase::Finished)
    }

    pub fn is_playing(&self) -> bool {
        self.tween_id
            .and_then(|id| self.handle.with_tween(id, |t| t.is_playing()))
            .unwrap_or(false)
    }

    /// Finished, or gone along with the scheduler
    pub fn is_finished(&self) -> bool {
        self.phase() == TweenPhase::Finished
    }
}

impl Drop for AnimatedTween {
    fn drop(&mut self) {
        if let Some(id) = self.tween_id.take() {
            self.handle.remove_tween(id);
        }
    }
}
