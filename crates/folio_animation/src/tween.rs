//! Tweens
//!
//! A `Tween` interpolates a `VisualProps` set between two span endpoints
//! (`start` and `end`) over a fixed duration with an easing curve.
//!
//! Playback happens in *legs*. The first leg runs `start → end`. Calling
//! [`Tween::play_toward`] mid-flight samples the current interpolated value and
//! begins a new leg from it, so a reversal never snaps back to an endpoint.
//! A leg's duration is proportional to the span distance it covers: reversing
//! at 30% of the way in takes 30% of the full duration to get back.
//!
//! Ambient tweens use [`Repeat::Yoyo`], which alternates direction every
//! iteration for a fixed count or forever.

use crate::easing::Easing;
use crate::values::{Interpolate, VisualProps};

/// Repeat behavior once a leg completes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    /// Play once and finish
    #[default]
    Once,
    /// Reverse direction on every iteration. `None` repeats forever.
    Yoyo { iterations: Option<u32> },
}

impl Repeat {
    /// Infinite back-and-forth oscillation
    pub fn forever() -> Self {
        Repeat::Yoyo { iterations: None }
    }
}

/// Playback phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenPhase {
    /// Constructed, never started
    Idle,
    /// Waiting out its start delay
    Delayed,
    Playing,
    Finished,
}

/// Which span endpoint a leg is heading toward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanEnd {
    Start,
    End,
}

impl SpanEnd {
    fn position(self) -> f32 {
        match self {
            SpanEnd::Start => 0.0,
            SpanEnd::End => 1.0,
        }
    }
}

/// One leg of playback
#[derive(Clone, Copy, Debug)]
struct Leg {
    from: VisualProps,
    to: VisualProps,
    /// Span position (0 = start, 1 = end) at the beginning of the leg
    from_pos: f32,
    /// Span position at the end of the leg
    to_pos: f32,
    duration_ms: f32,
}

#[derive(Clone, Debug)]
pub struct Tween {
    start: VisualProps,
    end: VisualProps,
    duration_ms: f32,
    easing: Easing,
    delay_ms: f32,
    repeat: Repeat,

    leg: Leg,
    phase: TweenPhase,
    /// Time spent playing the current leg (excludes delay)
    elapsed_ms: f32,
    delay_remaining_ms: f32,
    /// Completed yoyo iterations
    iteration: u32,
    /// Whether the current yoyo iteration runs end → start
    reversed: bool,
}

impl Tween {
    /// Create a tween from `start` to `end` over `duration_ms`
    pub fn new(start: VisualProps, end: VisualProps, duration_ms: u32) -> Self {
        let duration_ms = duration_ms as f32;
        Self {
            start,
            end,
            duration_ms,
            easing: Easing::Linear,
            delay_ms: 0.0,
            repeat: Repeat::Once,
            leg: Leg {
                from: start,
                to: end,
                from_pos: 0.0,
                to_pos: 1.0,
                duration_ms,
            },
            phase: TweenPhase::Idle,
            elapsed_ms: 0.0,
            delay_remaining_ms: 0.0,
            iteration: 0,
            reversed: false,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Delay applied by `start()`
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms as f32;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Start (or restart) the full `start → end` leg, honoring the delay
    pub fn start(&mut self) {
        self.leg = Leg {
            from: self.start,
            to: self.end,
            from_pos: 0.0,
            to_pos: 1.0,
            duration_ms: self.duration_ms,
        };
        self.iteration = 0;
        self.reversed = false;
        self.begin_leg(self.delay_ms);
    }

    /// Head toward a span endpoint from wherever the tween currently is.
    ///
    /// The current interpolated value becomes the new leg's origin. `delay_ms`
    /// postpones the leg. Yoyo repetition is dropped: the leg plays once.
    pub fn play_toward(&mut self, target: SpanEnd, delay_ms: u32) {
        let current = self.sample();
        let from_pos = self.position();
        let to_pos = target.position();
        let to = match target {
            SpanEnd::Start => self.start,
            SpanEnd::End => self.end,
        };

        self.repeat = Repeat::Once;
        self.reversed = false;
        self.leg = Leg {
            from: current,
            to,
            from_pos,
            to_pos,
            duration_ms: self.duration_ms * (to_pos - from_pos).abs(),
        };
        self.begin_leg(delay_ms as f32);
    }

    fn begin_leg(&mut self, delay_ms: f32) {
        self.elapsed_ms = 0.0;
        self.delay_remaining_ms = delay_ms.max(0.0);
        self.phase = if self.delay_remaining_ms > 0.0 {
            TweenPhase::Delayed
        } else {
            TweenPhase::Playing
        };
        // A zero-length leg completes without waiting for a tick
        if self.phase == TweenPhase::Playing && self.leg.duration_ms <= 0.0 {
            self.phase = TweenPhase::Finished;
        }
    }

    /// Advance by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        let mut dt = dt_ms.max(0.0);

        match self.phase {
            TweenPhase::Idle | TweenPhase::Finished => return,
            TweenPhase::Delayed => {
                self.delay_remaining_ms -= dt;
                if self.delay_remaining_ms > 0.0 {
                    return;
                }
                // Carry the overshoot into the leg
                dt = -self.delay_remaining_ms;
                self.delay_remaining_ms = 0.0;
                self.phase = TweenPhase::Playing;
            }
            TweenPhase::Playing => {}
        }

        let duration = self.leg.duration_ms;
        if duration <= 0.0 {
            self.phase = TweenPhase::Finished;
            return;
        }

        self.elapsed_ms += dt;
        if self.elapsed_ms < duration {
            return;
        }

        match self.repeat {
            Repeat::Once => {
                self.elapsed_ms = duration;
                self.phase = TweenPhase::Finished;
            }
            Repeat::Yoyo { iterations } => {
                let cycles = (self.elapsed_ms / duration).floor() as u32;
                let completed = self.iteration.saturating_add(cycles);
                match iterations {
                    Some(limit) if completed >= limit.max(1) => {
                        let last = limit.max(1) - 1;
                        self.iteration = limit.max(1);
                        self.reversed = last % 2 == 1;
                        self.elapsed_ms = duration;
                        self.phase = TweenPhase::Finished;
                    }
                    _ => {
                        self.iteration = completed;
                        if cycles % 2 == 1 {
                            self.reversed = !self.reversed;
                        }
                        self.elapsed_ms -= cycles as f32 * duration;
                    }
                }
            }
        }
    }

    /// Linear progress through the current leg (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        match self.phase {
            TweenPhase::Idle | TweenPhase::Delayed => 0.0,
            TweenPhase::Finished => 1.0,
            TweenPhase::Playing => {
                if self.leg.duration_ms <= 0.0 {
                    1.0
                } else {
                    (self.elapsed_ms / self.leg.duration_ms).clamp(0.0, 1.0)
                }
            }
        }
    }

    /// Position along the span in linear time (0 = start, 1 = end)
    pub fn position(&self) -> f32 {
        let local = if self.reversed {
            1.0 - self.progress()
        } else {
            self.progress()
        };
        self.leg.from_pos + (self.leg.to_pos - self.leg.from_pos) * local
    }

    /// Current interpolated value
    pub fn sample(&self) -> VisualProps {
        let linear = self.progress();
        if linear <= 0.0 && !self.reversed {
            return self.leg.from;
        }
        if linear >= 1.0 && !self.reversed {
            return self.leg.to;
        }
        let local = if self.reversed { 1.0 - linear } else { linear };
        self.leg.from.lerp(&self.leg.to, self.easing.apply(local))
    }

    pub fn phase(&self) -> TweenPhase {
        self.phase
    }

    /// Playing or waiting out a delay
    pub fn is_playing(&self) -> bool {
        matches!(self.phase, TweenPhase::Delayed | TweenPhase::Playing)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TweenPhase::Finished
    }

    /// Whether the current yoyo iteration runs end → start
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Completed yoyo iterations
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Duration of the leg currently playing
    pub fn leg_duration_ms(&self) -> f32 {
        self.leg.duration_ms
    }

    pub fn span(&self) -> (VisualProps, VisualProps) {
        (self.start, self.end)
    }
}
