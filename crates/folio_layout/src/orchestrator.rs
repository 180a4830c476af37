//! Scroll-reactive animation orchestrator
//!
//! The orchestrator binds a list of [`Rule`]s to a [`Page`]. `initialize`
//! resolves each rule's targets by role, creates one tween per target and
//! registers the viewport observers and pointer listeners the rule's trigger
//! needs. Every binding lives in this one mount context. `teardown` releases
//! all of them and drops every tween, after which the page is never written
//! again.
//!
//! # Per-target states
//!
//! ```text
//!          forward               finished
//!   Idle ───────────▶ Entering ───────────▶ Settled
//!    ▲                 │    ▲                  │
//!    │        reverse  │    │ forward          │ reverse
//!    │ finished        ▼    │                  │
//!    └──────────────  Leaving ◀────────────────┘
//! ```
//!
//! A flip while a transition is in flight resamples the current value and
//! plays toward the opposite endpoint, so nothing ever snaps. Ambient rules
//! sit in `Oscillating` until teardown.
//!
//! # Example
//!
//! ```
//! use folio_animation::VisualProps;
//! use folio_layout::{node, Orchestrator, Page, PageTree, Role, Rule, Trigger};
//!
//! let tree = PageTree::build(
//!     node(Role::Page)
//!         .w_full()
//!         .child(node(Role::Hero).h(900.0))
//!         .child(node(Role::ServiceCard).h(300.0)),
//!     1280.0,
//! )
//! .unwrap();
//! let mut page = Page::new(tree, 1280.0, 800.0);
//!
//! let mut orchestrator = Orchestrator::new(vec![Rule::new("reveal", Role::ServiceCard)
//!     .from(VisualProps::new().with_opacity(0.0))
//!     .to(VisualProps::new().with_opacity(1.0))
//!     .trigger(Trigger::viewport(0.8))]);
//!
//! orchestrator.initialize(&mut page);
//! for signal in page.scroll_to(400.0) {
//!     orchestrator.dispatch(&mut page, signal);
//! }
//! for _ in 0..60 {
//!     orchestrator.frame(&mut page, 16.0);
//! }
//!
//! let card = page.tree().first(Role::ServiceCard).unwrap();
//! assert_eq!(page.tree().composed_visual(card).unwrap().opacity, 1.0);
//!
//! orchestrator.teardown(&mut page);
//! assert_eq!(page.active_observers(), 0);
//! ```

use folio_animation::{AnimatedTween, AnimationScheduler, Repeat, SpanEnd, Tween, VisualProps};
use folio_core::VisualState;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::page::{Interaction, ListenerId, Page, PageSignal};
use crate::rule::{Observe, Rule, Trigger};
use crate::tree::ElementId;
use crate::viewport::{Crossing, ObserverId};

/// Animation state of one bound target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    /// At the `from` state, waiting for the forward condition
    Idle,
    /// Playing toward `to` (possibly still in its stagger delay)
    Entering,
    /// At the `to` state
    Settled,
    /// Playing back toward `from`
    Leaving,
    /// Ambient loop
    Oscillating,
}

struct BoundTarget {
    element: ElementId,
    tween: AnimatedTween,
    state: TargetState,
    /// Rule delay plus stagger offset, applied when entering from `Idle`
    delay_ms: u32,
    observer: Option<ObserverId>,
    listener: Option<ListenerId>,
}

struct BoundRule {
    /// Index into `Orchestrator::rules`
    rule: usize,
    targets: Vec<BoundTarget>,
    /// Container observer driving every target at once
    observer: Option<ObserverId>,
}

#[derive(Clone, Copy, Debug)]
enum ObserverBinding {
    /// Drives every target of a bound rule
    Rule(usize),
    /// Drives one target of a bound rule
    Target(usize, usize),
}

pub struct Orchestrator {
    rules: Vec<Rule>,
    scheduler: AnimationScheduler,
    bound: Vec<BoundRule>,
    observers: FxHashMap<ObserverId, ObserverBinding>,
    listeners: FxHashMap<ListenerId, (usize, usize, Interaction)>,
    mounted: bool,
}

impl Orchestrator {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            scheduler: AnimationScheduler::new(),
            bound: Vec::new(),
            observers: FxHashMap::default(),
            listeners: FxHashMap::default(),
            mounted: false,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Bind every rule to its targets on `page`
    ///
    /// Calling this again before [`teardown`](Self::teardown) does nothing.
    /// Targets that are already past their viewport threshold start entering
    /// right away.
    pub fn initialize(&mut self, page: &mut Page) {
        if self.mounted {
            debug!("orchestrator already mounted, initialize ignored");
            return;
        }
        self.mounted = true;

        for (rule_index, rule) in self.rules.iter().enumerate() {
            let elements = page.tree().query_role(rule.target);
            if elements.is_empty() {
                debug!(rule = %rule.name, role = %rule.target, "no targets, rule skipped");
                continue;
            }

            let container = match rule.trigger {
                Trigger::Viewport {
                    observe: Observe::Container(role),
                    ..
                } => match page.tree().first(role) {
                    Some(container) => Some(container),
                    None => {
                        debug!(rule = %rule.name, container = %role, "no container, rule skipped");
                        continue;
                    }
                },
                _ => None,
            };

            let bound_index = self.bound.len();
            let offsets = match rule.stagger {
                Some(stagger) => stagger.offsets(elements.len()),
                None => vec![0; elements.len()],
            };

            let mut targets = Vec::with_capacity(elements.len());
            for (element, offset) in elements.into_iter().zip(offsets) {
                let delay_ms = rule.delay_ms.saturating_add(offset);
                let (mut from, mut to) =
                    VisualProps::resolve(&rule.from, &rule.to, &VisualState::IDENTITY);
                let counts = page
                    .tree()
                    .get(element)
                    .is_some_and(|e| e.counter().is_some());
                if !counts {
                    from.count = None;
                    to.count = None;
                }

                let mut tween = Tween::new(from, to, rule.duration_ms).easing(rule.easing);
                if rule.is_ambient() {
                    tween = tween.repeat(Repeat::forever()).delay(delay_ms);
                }

                targets.push(BoundTarget {
                    element,
                    tween: AnimatedTween::new(self.scheduler.handle(), tween),
                    state: TargetState::Idle,
                    delay_ms,
                    observer: None,
                    listener: None,
                });
            }

            let mut observer = None;
            match rule.trigger {
                Trigger::Immediate => {
                    for target in &mut targets {
                        target.tween.play_toward(SpanEnd::End, target.delay_ms);
                        target.state = TargetState::Entering;
                    }
                }
                Trigger::Ambient => {
                    for target in &mut targets {
                        target.tween.start();
                        target.state = TargetState::Oscillating;
                    }
                }
                Trigger::Viewport { threshold, .. } => match container {
                    Some(container) => {
                        let id = page.observe(container, threshold);
                        self.observers.insert(id, ObserverBinding::Rule(bound_index));
                        observer = Some(id);
                    }
                    None => {
                        for (i, target) in targets.iter_mut().enumerate() {
                            let id = page.observe(target.element, threshold);
                            self.observers
                                .insert(id, ObserverBinding::Target(bound_index, i));
                            target.observer = Some(id);
                        }
                    }
                },
                Trigger::Pointer { interaction } => {
                    for (i, target) in targets.iter_mut().enumerate() {
                        let id = page.listen(target.element, interaction);
                        self.listeners.insert(id, (bound_index, i, interaction));
                        target.listener = Some(id);
                    }
                }
            }

            debug!(
                rule = %rule.name,
                role = %rule.target,
                targets = targets.len(),
                "rule bound"
            );
            self.bound.push(BoundRule {
                rule: rule_index,
                targets,
                observer,
            });
        }

        self.write_initial(page);

        info!(
            rules = self.bound.len(),
            tweens = self.scheduler.tween_count(),
            observers = page.active_observers(),
            listeners = page.active_listeners(),
            "orchestrator mounted"
        );

        for signal in page.refresh() {
            self.dispatch(page, signal);
        }
    }

    /// Advance every tween by `dt_ms` and write the results into the page
    ///
    /// Returns true while anything is still animating.
    pub fn frame(&mut self, page: &mut Page, dt_ms: f32) -> bool {
        if !self.mounted {
            return false;
        }

        self.scheduler.tick_by(dt_ms);
        self.write_active(page);
        self.settle();
        self.scheduler.has_active_animations()
    }

    /// Route a page signal to the rule that owns its observer or listener
    ///
    /// Signals for bindings this orchestrator doesn't own (or has released)
    /// are ignored.
    pub fn dispatch(&mut self, page: &mut Page, signal: PageSignal) {
        if !self.mounted {
            return;
        }

        match signal {
            PageSignal::Crossing {
                observer, crossing, ..
            } => {
                let forward = crossing == Crossing::Enter;
                match self.observers.get(&observer).copied() {
                    Some(ObserverBinding::Rule(b)) => {
                        for t in 0..self.bound[b].targets.len() {
                            self.drive(page, b, t, forward);
                        }
                    }
                    Some(ObserverBinding::Target(b, t)) => self.drive(page, b, t, forward),
                    None => trace!(?observer, "crossing for unknown observer ignored"),
                }
            }
            PageSignal::Pointer {
                listener, event, ..
            } => {
                let Some(&(b, t, interaction)) = self.listeners.get(&listener) else {
                    trace!(?listener, "event for unknown listener ignored");
                    return;
                };
                if let Some(forward) = interaction.classify(event) {
                    self.drive(page, b, t, forward);
                }
            }
        }
    }

    /// Release every binding created by `initialize`
    ///
    /// Cancels all tweens. The page keeps whatever state was last written.
    /// Safe to call more than once.
    pub fn teardown(&mut self, page: &mut Page) {
        if !self.mounted {
            debug!("orchestrator not mounted, teardown ignored");
            return;
        }

        let mut observers = 0usize;
        let mut listeners = 0usize;
        for bound in self.bound.drain(..) {
            let target_observers = bound.targets.iter().filter_map(|t| t.observer);
            for id in bound.observer.into_iter().chain(target_observers) {
                if page.unobserve(id) {
                    observers += 1;
                }
            }
            for id in bound.targets.iter().filter_map(|t| t.listener) {
                if page.unlisten(id) {
                    listeners += 1;
                }
            }
            // Tweens are removed from the scheduler as the targets drop
        }

        self.observers.clear();
        self.listeners.clear();
        self.mounted = false;

        info!(
            observers,
            listeners,
            tweens = self.scheduler.tween_count(),
            "orchestrator torn down"
        );
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// State of `element` under the rule named `rule`
    pub fn target_state(&self, rule: &str, element: ElementId) -> Option<TargetState> {
        self.bound_rule(rule)?
            .targets
            .iter()
            .find(|t| t.element == element)
            .map(|t| t.state)
    }

    /// States of every target of the rule named `rule`, in document order
    pub fn rule_states(&self, rule: &str) -> Vec<(ElementId, TargetState)> {
        self.bound_rule(rule)
            .map(|b| b.targets.iter().map(|t| (t.element, t.state)).collect())
            .unwrap_or_default()
    }

    /// Names of the rules that found targets on mount
    pub fn bound_rules(&self) -> SmallVec<[&str; 16]> {
        self.bound
            .iter()
            .map(|b| self.rules[b.rule].name.as_str())
            .collect()
    }

    /// Number of tweens registered with the scheduler
    pub fn active_tweens(&self) -> usize {
        self.scheduler.tween_count()
    }

    /// Whether any tween is playing or waiting out a delay
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations()
    }

    /// Whether any triggered target is entering or leaving
    ///
    /// Unlike [`is_animating`](Self::is_animating) this ignores ambient loops,
    /// which never finish.
    pub fn is_transitioning(&self) -> bool {
        self.bound.iter().flat_map(|b| &b.targets).any(|t| {
            matches!(t.state, TargetState::Entering | TargetState::Leaving)
        })
    }

    fn bound_rule(&self, name: &str) -> Option<&BoundRule> {
        self.bound.iter().find(|b| self.rules[b.rule].name == name)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn drive(&mut self, page: &mut Page, bound: usize, index: usize, forward: bool) {
        let rule = &self.rules[self.bound[bound].rule];
        let Some(target) = self.bound[bound].targets.get_mut(index) else {
            return;
        };

        let next = match (forward, target.state) {
            (true, TargetState::Idle) => {
                target.tween.play_toward(SpanEnd::End, target.delay_ms);
                TargetState::Entering
            }
            (true, TargetState::Leaving) => {
                target.tween.play_toward(SpanEnd::End, 0);
                TargetState::Entering
            }
            (false, TargetState::Entering | TargetState::Settled) => {
                target.tween.play_toward(SpanEnd::Start, 0);
                TargetState::Leaving
            }
            _ => return,
        };

        debug!(
            rule = %rule.name,
            element = ?target.element,
            from = ?target.state,
            to = ?next,
            "rule transition"
        );
        target.state = next;
        write_target(page, rule, target);
    }

    /// Write the starting sample of every target
    ///
    /// Pointer rules go first so that an entrance rule sharing a property
    /// with them has its `from` state win.
    fn write_initial(&self, page: &mut Page) {
        let (pointer, others): (Vec<&BoundRule>, Vec<&BoundRule>) = self
            .bound
            .iter()
            .partition(|b| matches!(self.rules[b.rule].trigger, Trigger::Pointer { .. }));
        for bound in pointer.into_iter().chain(others) {
            let rule = &self.rules[bound.rule];
            for target in &bound.targets {
                write_target(page, rule, target);
            }
        }
    }

    /// Write the samples of targets that are in motion
    ///
    /// Targets at rest are left alone so they don't overwrite properties
    /// another rule is animating on the same element.
    fn write_active(&self, page: &mut Page) {
        for bound in &self.bound {
            let rule = &self.rules[bound.rule];
            for target in &bound.targets {
                if matches!(
                    target.state,
                    TargetState::Entering | TargetState::Leaving | TargetState::Oscillating
                ) {
                    write_target(page, rule, target);
                }
            }
        }
    }

    /// Finish transitions whose tween has completed
    fn settle(&mut self) {
        for bound in &mut self.bound {
            let rule = &self.rules[bound.rule];
            for target in &mut bound.targets {
                let next = match target.state {
                    TargetState::Entering if target.tween.is_finished() => TargetState::Settled,
                    TargetState::Leaving if target.tween.is_finished() => TargetState::Idle,
                    _ => continue,
                };
                debug!(
                    rule = %rule.name,
                    element = ?target.element,
                    from = ?target.state,
                    to = ?next,
                    "rule transition"
                );
                target.state = next;
            }
        }
    }
}

fn write_target(page: &mut Page, rule: &Rule, target: &BoundTarget) {
    let sample = target.tween.sample();
    let tree = page.tree_mut();
    if rule.is_ambient() {
        tree.set_ambient(target.element, sample.over(&VisualState::IDENTITY));
    } else if let Some(visual) = tree.visual_mut(target.element) {
        sample.apply_to(visual);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::tree::{node, PageTree};
    use folio_animation::{Easing, Stagger};
    use folio_core::event_types;

    fn page() -> Page {
        let root = node(Role::Page)
            .w_full()
            .child(
                node(Role::Hero)
                    .h(900.0)
                    .child(node(Role::HeroTitle).h(80.0))
                    .child(node(Role::HeroSubtitle).h(40.0)),
            )
            .child(
                node(Role::Services)
                    .gap(20.0)
                    .children((0..3).map(|_| node(Role::ServiceCard).h(300.0))),
            )
            .child(
                node(Role::Stats)
                    .row()
                    .child(node(Role::StatCounter).counter("98%").w(200.0))
                    .child(node(Role::StatCounter).counter("Always").w(200.0)),
            )
            .child(
                node(Role::Contact)
                    .row()
                    .child(node(Role::SocialButton).w(48.0).h(48.0))
                    .child(node(Role::SocialButton).w(48.0).h(48.0)),
            )
            .child(node(Role::About).h(1200.0));
        Page::new(PageTree::build(root, 1280.0).unwrap(), 1280.0, 800.0)
    }

    fn fade_in(name: &str, role: Role) -> Rule {
        Rule::new(name, role)
            .from(VisualProps::new().with_opacity(0.0).with_translate_y(60.0))
            .to(VisualProps::new().with_opacity(1.0).with_translate_y(0.0))
            .duration(400)
    }

    fn run(orchestrator: &mut Orchestrator, page: &mut Page, ms: f32) {
        let frames = (ms / 16.0).ceil() as usize;
        for _ in 0..frames {
            orchestrator.frame(page, 16.0);
        }
    }

    fn scroll(orchestrator: &mut Orchestrator, page: &mut Page, y: f32) {
        for signal in page.scroll_to(y) {
            orchestrator.dispatch(page, signal);
        }
    }

    #[test]
    fn test_immediate_rules_play_on_initialize() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("title", Role::HeroTitle),
            fade_in("subtitle", Role::HeroSubtitle).duration(200),
        ]);
        orchestrator.initialize(&mut page);

        let title = page.tree().first(Role::HeroTitle).unwrap();
        assert_eq!(page.tree().get(title).unwrap().visual().opacity, 0.0);
        assert_eq!(orchestrator.target_state("title", title), Some(TargetState::Entering));

        run(&mut orchestrator, &mut page, 400.0);
        assert_eq!(orchestrator.target_state("title", title), Some(TargetState::Settled));
        assert_eq!(page.tree().get(title).unwrap().visual().opacity, 1.0);
        assert!(!orchestrator.is_animating());
    }

    #[test]
    fn test_viewport_enter_and_leave() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("cards", Role::ServiceCard).trigger(Trigger::viewport(0.8))
        ]);
        orchestrator.initialize(&mut page);
        let cards = page.tree().query_role(Role::ServiceCard);

        // Hidden until scrolled into view
        assert_eq!(page.tree().get(cards[0]).unwrap().visual().opacity, 0.0);
        assert_eq!(orchestrator.target_state("cards", cards[0]), Some(TargetState::Idle));

        // First card top at 900, line at 400 + 640
        scroll(&mut orchestrator, &mut page, 400.0);
        assert_eq!(orchestrator.target_state("cards", cards[0]), Some(TargetState::Entering));
        assert_eq!(orchestrator.target_state("cards", cards[1]), Some(TargetState::Idle));

        run(&mut orchestrator, &mut page, 400.0);
        assert_eq!(orchestrator.target_state("cards", cards[0]), Some(TargetState::Settled));
        assert_eq!(page.tree().get(cards[0]).unwrap().visual().opacity, 1.0);

        scroll(&mut orchestrator, &mut page, 0.0);
        assert_eq!(orchestrator.target_state("cards", cards[0]), Some(TargetState::Leaving));
        run(&mut orchestrator, &mut page, 400.0);
        assert_eq!(orchestrator.target_state("cards", cards[0]), Some(TargetState::Idle));
        assert_eq!(page.tree().get(cards[0]).unwrap().visual().opacity, 0.0);
    }

    #[test]
    fn test_reentry_resumes_from_current_value() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("cards", Role::ServiceCard).trigger(Trigger::viewport(0.8))
        ]);
        orchestrator.initialize(&mut page);
        let card = page.tree().first(Role::ServiceCard).unwrap();

        scroll(&mut orchestrator, &mut page, 400.0);
        run(&mut orchestrator, &mut page, 160.0);
        let partial = page.tree().get(card).unwrap().visual().opacity;
        assert!(partial > 0.0 && partial < 1.0);

        // Leave mid-flight: no snap
        scroll(&mut orchestrator, &mut page, 0.0);
        assert_eq!(page.tree().get(card).unwrap().visual().opacity, partial);
        orchestrator.frame(&mut page, 16.0);
        let receding = page.tree().get(card).unwrap().visual().opacity;
        assert!(receding < partial);

        // Come back before the leave completes
        scroll(&mut orchestrator, &mut page, 400.0);
        assert_eq!(orchestrator.target_state("cards", card), Some(TargetState::Entering));
        assert_eq!(page.tree().get(card).unwrap().visual().opacity, receding);
        orchestrator.frame(&mut page, 16.0);
        assert!(page.tree().get(card).unwrap().visual().opacity > receding);
    }

    #[test]
    fn test_container_trigger_staggers_the_set() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![fade_in("cards", Role::ServiceCard)
            .trigger(Trigger::viewport_container(0.8, Role::Services))
            .stagger(Stagger::new(200))]);
        orchestrator.initialize(&mut page);
        assert_eq!(page.active_observers(), 1);

        let cards = page.tree().query_role(Role::ServiceCard);
        scroll(&mut orchestrator, &mut page, 400.0);
        assert!(cards
            .iter()
            .all(|&c| orchestrator.target_state("cards", c) == Some(TargetState::Entering)));

        // 100ms in: first card moving, last still waiting out its delay
        run(&mut orchestrator, &mut page, 100.0);
        assert!(page.tree().get(cards[0]).unwrap().visual().opacity > 0.0);
        assert_eq!(page.tree().get(cards[2]).unwrap().visual().opacity, 0.0);

        // The whole set settles within duration + spread
        run(&mut orchestrator, &mut page, 520.0);
        assert!(orchestrator
            .rule_states("cards")
            .iter()
            .all(|&(_, s)| s == TargetState::Settled));
    }

    #[test]
    fn test_hover_reverses_mid_flight() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![Rule::new("social", Role::SocialButton)
            .to(VisualProps::new().with_scale(1.2).with_rotation(8.0))
            .duration(300)
            .easing(Easing::BackOut)
            .trigger(Trigger::hover())]);
        orchestrator.initialize(&mut page);
        assert_eq!(page.active_listeners(), 2);

        let buttons = page.tree().query_role(Role::SocialButton);
        let bounds = page.tree().get(buttons[0]).unwrap().bounds();
        let y = bounds.center().y;
        for signal in page.scroll_to(y - 400.0) {
            orchestrator.dispatch(&mut page, signal);
        }
        let viewport_y = y - page.viewport().scroll_y();
        for signal in page.pointer_move(bounds.center().x, viewport_y) {
            orchestrator.dispatch(&mut page, signal);
        }
        assert_eq!(orchestrator.target_state("social", buttons[0]), Some(TargetState::Entering));
        assert_eq!(orchestrator.target_state("social", buttons[1]), Some(TargetState::Idle));

        run(&mut orchestrator, &mut page, 100.0);
        let in_flight = page.tree().get(buttons[0]).unwrap().visual();
        assert!(in_flight.scale > 1.0);

        for signal in page.pointer_leave() {
            orchestrator.dispatch(&mut page, signal);
        }
        assert_eq!(orchestrator.target_state("social", buttons[0]), Some(TargetState::Leaving));
        let at_leave = page.tree().get(buttons[0]).unwrap().visual();
        assert!((at_leave.scale - in_flight.scale).abs() < 1e-6);
        assert!((at_leave.rotation - in_flight.rotation).abs() < 1e-6);

        run(&mut orchestrator, &mut page, 300.0);
        assert_eq!(orchestrator.target_state("social", buttons[0]), Some(TargetState::Idle));
        assert_eq!(page.tree().get(buttons[0]).unwrap().visual().scale, 1.0);
    }

    #[test]
    fn test_counters_settle_on_literal_text() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![Rule::new("stats", Role::StatCounter)
            .duration(500)
            .easing(Easing::BackOut)
            .counter()]);
        orchestrator.initialize(&mut page);

        let stats = page.tree().query_role(Role::StatCounter);
        assert_eq!(page.tree().displayed_text(stats[0]).as_deref(), Some("0%"));
        assert_eq!(page.tree().displayed_text(stats[1]).as_deref(), Some("Always"));

        for _ in 0..40 {
            orchestrator.frame(&mut page, 16.0);
            let text = page.tree().displayed_text(stats[0]).unwrap();
            let value: u64 = text.trim_end_matches('%').parse().unwrap();
            assert!(value <= 98, "{text}");
        }
        assert_eq!(page.tree().displayed_text(stats[0]).as_deref(), Some("98%"));
        assert_eq!(page.tree().displayed_text(stats[1]).as_deref(), Some("Always"));
    }

    #[test]
    fn test_ambient_composes_with_triggered_state() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            Rule::new("pop", Role::SocialButton)
                .to(VisualProps::new().with_scale(1.2))
                .duration(100)
                .trigger(Trigger::focus()),
            Rule::new("float", Role::SocialButton)
                .from(VisualProps::new().with_translate_y(0.0).with_scale(1.0))
                .to(VisualProps::new().with_translate_y(-6.0).with_scale(1.05))
                .duration(1000)
                .easing(Easing::SineInOut)
                .trigger(Trigger::Ambient),
        ]);
        orchestrator.initialize(&mut page);
        let button = page.tree().first(Role::SocialButton).unwrap();
        assert_eq!(orchestrator.target_state("float", button), Some(TargetState::Oscillating));

        for signal in page.focus(Some(button)) {
            orchestrator.dispatch(&mut page, signal);
        }
        run(&mut orchestrator, &mut page, 500.0);

        let element = page.tree().get(button).unwrap();
        assert_eq!(element.visual().scale, 1.2);
        assert!(element.ambient().translate_y < 0.0);

        let composed = page.tree().composed_visual(button).unwrap();
        assert!((composed.scale - 1.2 * element.ambient().scale).abs() < 1e-5);
        assert_eq!(composed.translate_y, element.ambient().translate_y);

        // Ambient never finishes
        run(&mut orchestrator, &mut page, 5000.0);
        assert!(orchestrator.is_animating());
        assert!(!orchestrator.is_transitioning());
        assert_eq!(orchestrator.target_state("float", button), Some(TargetState::Oscillating));
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("cards", Role::ServiceCard).trigger(Trigger::viewport(0.8)),
            fade_in("services", Role::Services).trigger(Trigger::viewport(0.8)),
            Rule::new("social", Role::SocialButton)
                .to(VisualProps::new().with_scale(1.1))
                .trigger(Trigger::hover()),
        ]);

        for _ in 0..3 {
            orchestrator.initialize(&mut page);
            assert_eq!(page.active_observers(), 4);
            assert_eq!(page.active_listeners(), 2);
            assert_eq!(orchestrator.active_tweens(), 6);

            scroll(&mut orchestrator, &mut page, 500.0);
            run(&mut orchestrator, &mut page, 100.0);
            orchestrator.teardown(&mut page);

            assert!(!orchestrator.is_mounted());
            assert_eq!(page.active_observers(), 0);
            assert_eq!(page.active_listeners(), 0);
            assert_eq!(orchestrator.active_tweens(), 0);
            scroll(&mut orchestrator, &mut page, 0.0);
        }

        // Second teardown is a no-op
        orchestrator.teardown(&mut page);
    }

    #[test]
    fn test_no_visual_change_after_teardown() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("cards", Role::ServiceCard).trigger(Trigger::viewport(0.8))
        ]);
        orchestrator.initialize(&mut page);
        scroll(&mut orchestrator, &mut page, 400.0);
        run(&mut orchestrator, &mut page, 100.0);

        let card = page.tree().first(Role::ServiceCard).unwrap();
        let frozen = page.tree().get(card).unwrap().visual();
        let stale = page.scroll_to(0.0);
        orchestrator.teardown(&mut page);

        for signal in stale {
            orchestrator.dispatch(&mut page, signal);
        }
        assert!(!orchestrator.frame(&mut page, 16.0));
        assert_eq!(page.tree().get(card).unwrap().visual(), frozen);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("cards", Role::ServiceCard).trigger(Trigger::viewport(0.8)),
            Rule::new("social", Role::SocialButton).trigger(Trigger::hover()),
        ]);
        orchestrator.initialize(&mut page);
        orchestrator.initialize(&mut page);

        assert_eq!(page.active_observers(), 3);
        assert_eq!(page.active_listeners(), 2);
        assert_eq!(orchestrator.active_tweens(), 5);
        assert_eq!(orchestrator.bound_rules().as_slice(), &["cards", "social"]);
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("projects", Role::ProjectCard).trigger(Trigger::viewport(0.8)),
            fade_in("badges", Role::ServiceCard)
                .trigger(Trigger::viewport_container(0.8, Role::Technologies)),
            fade_in("title", Role::HeroTitle),
        ]);
        orchestrator.initialize(&mut page);

        assert_eq!(orchestrator.bound_rules().as_slice(), &["title"]);
        assert!(orchestrator.rule_states("projects").is_empty());
        assert_eq!(page.active_observers(), 0);
    }

    #[test]
    fn test_targets_already_in_view_enter_on_mount() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            fade_in("hero", Role::Hero).trigger(Trigger::viewport(0.8))
        ]);
        orchestrator.initialize(&mut page);
        let hero = page.tree().first(Role::Hero).unwrap();
        assert_eq!(orchestrator.target_state("hero", hero), Some(TargetState::Entering));
    }

    #[test]
    fn test_unrelated_pointer_events_are_ignored() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            Rule::new("social", Role::SocialButton).trigger(Trigger::hover())
        ]);
        orchestrator.initialize(&mut page);
        let button = page.tree().first(Role::SocialButton).unwrap();

        // A listener registered by someone else
        let foreign = page.listen(button, Interaction::Focus);
        orchestrator.dispatch(
            &mut page,
            PageSignal::Pointer {
                listener: foreign,
                element: button,
                event: event_types::FOCUS,
            },
        );
        assert_eq!(orchestrator.target_state("social", button), Some(TargetState::Idle));
    }

    #[test]
    fn test_idle_pointer_rule_leaves_entrance_alone() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![
            Rule::new("intro", Role::SocialButton)
                .from(VisualProps::new().with_scale(0.5))
                .to(VisualProps::new().with_scale(1.0))
                .duration(400)
                .delay(100),
            Rule::new("hover", Role::SocialButton)
                .to(VisualProps::new().with_scale(1.2))
                .trigger(Trigger::hover()),
        ]);
        orchestrator.initialize(&mut page);
        let button = page.tree().first(Role::SocialButton).unwrap();
        assert_eq!(page.tree().get(button).unwrap().visual().scale, 0.5);

        // Still waiting out the delay
        orchestrator.frame(&mut page, 48.0);
        assert_eq!(page.tree().get(button).unwrap().visual().scale, 0.5);

        run(&mut orchestrator, &mut page, 300.0);
        let scale = page.tree().get(button).unwrap().visual().scale;
        assert!(scale > 0.5 && scale < 1.0);

        run(&mut orchestrator, &mut page, 200.0);
        assert_eq!(page.tree().get(button).unwrap().visual().scale, 1.0);
        assert_eq!(orchestrator.target_state("hover", button), Some(TargetState::Idle));
    }

    #[test]
    fn test_huge_delay_with_stagger_saturates() {
        let mut page = page();
        let mut orchestrator = Orchestrator::new(vec![fade_in("slow", Role::ServiceCard)
            .delay(u32::MAX)
            .stagger(Stagger::new(100))
            .trigger(Trigger::viewport(0.8))]);
        orchestrator.initialize(&mut page);

        let cards = page.tree().query_role(Role::ServiceCard);
        assert_eq!(cards.len(), 3);
        for &card in &cards {
            assert_eq!(orchestrator.target_state("slow", card), Some(TargetState::Idle));
        }

        scroll(&mut orchestrator, &mut page, 1200.0);
        run(&mut orchestrator, &mut page, 100.0);
        let last = cards[2];
        assert_eq!(orchestrator.target_state("slow", last), Some(TargetState::Entering));
        assert_eq!(page.tree().get(last).unwrap().visual().opacity, 0.0);
    }
}
