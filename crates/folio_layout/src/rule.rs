//! Declarative animation rules
//!
//! A `Rule` says "animate every element with role R from state A to state B
//! when trigger T fires". Rules are plain data: they are built once, can be
//! serialized for inspection, and are interpreted by the
//! [`Orchestrator`](crate::orchestrator::Orchestrator).

use folio_animation::{Easing, Stagger, VisualProps};
use serde::{Deserialize, Serialize};

use crate::page::Interaction;
use crate::role::Role;

/// Which element a viewport trigger watches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observe {
    /// Every target is observed on its own
    Each,
    /// The first element with this role drives the whole target set
    Container(Role),
}

/// What starts (and reverses) a rule
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Plays once when the rule is bound
    Immediate,
    /// Plays forward when the observed top edge crosses `threshold` of the
    /// viewport height, and backward when it crosses back
    Viewport { threshold: f32, observe: Observe },
    /// Forward on enter/focus, backward on leave/blur
    Pointer { interaction: Interaction },
    /// Loops back and forth until teardown
    Ambient,
}

impl Trigger {
    /// Per-target viewport trigger
    pub fn viewport(threshold: f32) -> Self {
        Trigger::Viewport {
            threshold,
            observe: Observe::Each,
        }
    }

    /// Viewport trigger driven by a container's crossing
    pub fn viewport_container(threshold: f32, container: Role) -> Self {
        Trigger::Viewport {
            threshold,
            observe: Observe::Container(container),
        }
    }

    pub fn hover() -> Self {
        Trigger::Pointer {
            interaction: Interaction::Hover,
        }
    }

    pub fn focus() -> Self {
        Trigger::Pointer {
            interaction: Interaction::Focus,
        }
    }

    /// Whether the reverse condition plays the transition backward
    pub fn is_reversible(&self) -> bool {
        matches!(self, Trigger::Viewport { .. } | Trigger::Pointer { .. })
    }
}

/// A declarative visual transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub target: Role,
    #[serde(default)]
    pub from: VisualProps,
    #[serde(default)]
    pub to: VisualProps,
    pub duration_ms: u32,
    /// Extra delay before the forward transition starts from rest
    #[serde(default, skip_serializing_if = "is_zero")]
    pub delay_ms: u32,
    #[serde(default)]
    pub easing: Easing,
    pub trigger: Trigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<Stagger>,
    /// Count stat figures up from zero alongside the transition
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub counter: bool,
}

impl Rule {
    /// A rule for `target` that fires immediately and animates nothing yet
    pub fn new(name: impl Into<String>, target: Role) -> Self {
        Self {
            name: name.into(),
            target,
            from: VisualProps::default(),
            to: VisualProps::default(),
            duration_ms: 600,
            delay_ms: 0,
            easing: Easing::default(),
            trigger: Trigger::Immediate,
            stagger: None,
            counter: false,
        }
    }

    pub fn from(mut self, from: VisualProps) -> Self {
        self.from = from;
        self
    }

    pub fn to(mut self, to: VisualProps) -> Self {
        self.to = to;
        self
    }

    pub fn duration(mut self, ms: u32) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn delay(mut self, ms: u32) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Animate counter progress from zero to the terminal figure
    pub fn counter(mut self) -> Self {
        self.counter = true;
        self.from.count = Some(0.0);
        self.to.count = Some(1.0);
        self
    }

    /// Multiply the duration, delay and stagger spread by `factor`
    pub fn scaled(mut self, factor: f32) -> Self {
        let scale = |ms: u32| (ms as f32 * factor.max(0.0)).round() as u32;
        self.duration_ms = scale(self.duration_ms);
        self.delay_ms = scale(self.delay_ms);
        if let Some(stagger) = self.stagger.as_mut() {
            stagger.spread_ms = scale(stagger.spread_ms);
        }
        self
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self.trigger, Trigger::Ambient)
    }
}

fn is_zero(ms: &u32) -> bool {
    *ms == 0
}
