//! Headless page session
//!
//! A `Stage` owns the laid-out portfolio page and its orchestrator, and
//! stands in for the browser: it scrolls, moves the pointer, moves focus and
//! ticks frames at the configured rate. Every input is routed through the
//! orchestrator the same way a host event loop would.

use folio_layout::{Element, ElementId, Orchestrator, Page, PageSignal, Role, TargetState};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::error::{Result, SiteError};
use crate::page::build_page;
use crate::rules::portfolio_rules;

pub struct Stage {
    page: Page,
    orchestrator: Orchestrator,
    frame_ms: f32,
    elapsed_ms: f64,
    frames: u64,
}

/// Target counts per state for one bound rule
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub targets: usize,
    pub idle: usize,
    pub entering: usize,
    pub settled: usize,
    pub leaving: usize,
    pub oscillating: usize,
}

/// Snapshot of a stage for reporting
#[derive(Clone, Debug, Serialize)]
pub struct StageSummary {
    pub mounted: bool,
    pub frames: u64,
    pub elapsed_ms: f64,
    pub scroll_y: f32,
    pub max_scroll: f32,
    pub observers: usize,
    pub listeners: usize,
    pub tweens: usize,
    pub rules: Vec<RuleSummary>,
    /// Displayed text of every stat counter
    pub counters: Vec<String>,
}

impl Stage {
    /// Lay out `content` and prepare the portfolio rules, unmounted
    pub fn new(config: &SiteConfig, content: &SiteContent) -> Result<Self> {
        config.validate()?;
        let page = build_page(content, &config.viewport)?;
        let rules = portfolio_rules(&config.animation)?;
        debug!(
            elements = page.tree().len(),
            document_height = page.tree().document_height(),
            rules = rules.len(),
            "stage built"
        );

        Ok(Self {
            page,
            orchestrator: Orchestrator::new(rules),
            frame_ms: config.animation.frame_ms(),
            elapsed_ms: 0.0,
            frames: 0,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    pub fn mount(&mut self) {
        self.orchestrator.initialize(&mut self.page);
    }

    pub fn unmount(&mut self) {
        self.orchestrator.teardown(&mut self.page);
    }

    pub fn is_mounted(&self) -> bool {
        self.orchestrator.is_mounted()
    }

    /// Advance one frame; returns true while anything animates
    pub fn frame(&mut self) -> bool {
        self.frames += 1;
        self.elapsed_ms += self.frame_ms as f64;
        self.orchestrator.frame(&mut self.page, self.frame_ms)
    }

    pub fn run_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// Run until no triggered transition is in flight, at most `max_frames`
    ///
    /// Returns the number of frames run. Ambient loops don't hold this up.
    pub fn settle(&mut self, max_frames: usize) -> usize {
        let mut ran = 0;
        while ran < max_frames && self.orchestrator.is_transitioning() {
            self.frame();
            ran += 1;
        }
        ran
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn scroll_to(&mut self, y: f32) {
        let signals = self.page.scroll_to(y);
        self.route(signals);
    }

    pub fn scroll_by(&mut self, dy: f32) {
        let signals = self.page.scroll_by(dy);
        self.route(signals);
    }

    /// Pointer at `(x, y)` in viewport space
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let signals = self.page.pointer_move(x, y);
        self.route(signals);
    }

    pub fn pointer_leave(&mut self) {
        let signals = self.page.pointer_leave();
        self.route(signals);
    }

    pub fn focus(&mut self, element: Option<ElementId>) {
        let signals = self.page.focus(element);
        self.route(signals);
    }

    /// Scroll `element` into view if needed and put the pointer on its center
    ///
    /// Returns whether the element ends up hovered.
    pub fn hover(&mut self, element: ElementId) -> bool {
        let Some(bounds) = self.page.tree().get(element).map(Element::bounds) else {
            return false;
        };

        let visible = self.page.viewport().visible_rect();
        if bounds.top() < visible.top() || bounds.bottom() > visible.bottom() {
            let height = self.page.viewport().height();
            self.scroll_to(bounds.center().y - height / 2.0);
        }

        let center = bounds.center();
        let y = center.y - self.page.viewport().scroll_y();
        self.pointer_move(center.x, y);
        self.page.router().is_hovered(element)
    }

    /// [`hover`](Self::hover) an element by label
    pub fn hover_label(&mut self, label: &str) -> Result<bool> {
        let element = self.find(label)?;
        Ok(self.hover(element))
    }

    /// Element with the given label
    pub fn find(&self, label: &str) -> Result<ElementId> {
        self.page
            .tree()
            .find_label(label)
            .ok_or_else(|| SiteError::UnknownElement(label.to_string()))
    }

    /// Scroll from the top to the bottom in `step` pixel increments, running
    /// `frames_per_step` frames after each
    pub fn scroll_through(&mut self, step: f32, frames_per_step: usize) {
        let step = step.max(1.0);
        self.scroll_to(0.0);
        loop {
            self.run_frames(frames_per_step);
            if self.page.viewport().at_end() {
                break;
            }
            self.scroll_by(step);
        }
        info!(
            scroll_y = self.page.viewport().scroll_y(),
            frames = self.frames,
            "scrolled to end"
        );
    }

    fn route(&mut self, signals: Vec<PageSignal>) {
        for signal in signals {
            self.orchestrator.dispatch(&mut self.page, signal);
        }
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    pub fn summary(&self) -> StageSummary {
        let rules = self
            .orchestrator
            .bound_rules()
            .into_iter()
            .map(|name| {
                let mut summary = RuleSummary {
                    name: name.to_string(),
                    ..RuleSummary::default()
                };
                for (_, state) in self.orchestrator.rule_states(name) {
                    summary.targets += 1;
                    match state {
                        TargetState::Idle => summary.idle += 1,
                        TargetState::Entering => summary.entering += 1,
                        TargetState::Settled => summary.settled += 1,
                        TargetState::Leaving => summary.leaving += 1,
                        TargetState::Oscillating => summary.oscillating += 1,
                    }
                }
                summary
            })
            .collect();

        let tree = self.page.tree();
        let counters = tree
            .query_role(Role::StatCounter)
            .into_iter()
            .filter_map(|id| tree.displayed_text(id))
            .collect();

        StageSummary {
            mounted: self.is_mounted(),
            frames: self.frames,
            elapsed_ms: self.elapsed_ms,
            scroll_y: self.page.viewport().scroll_y(),
            max_scroll: self.page.viewport().max_scroll(),
            observers: self.page.active_observers(),
            listeners: self.page.active_listeners(),
            tweens: self.orchestrator.active_tweens(),
            rules,
            counters,
        }
    }
}
