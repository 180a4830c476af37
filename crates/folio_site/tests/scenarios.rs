//! End-to-end page scenarios driven through a headless stage

use folio_layout::{ElementId, Role, TargetState};
use folio_site::{SiteConfig, SiteContent, Stage};

fn stage() -> Stage {
    let mut config = SiteConfig::default();
    config.animation.stagger_seed = 11;
    Stage::new(&config, &SiteContent::default()).unwrap()
}

fn first(stage: &Stage, role: Role) -> ElementId {
    stage.page().tree().first(role).unwrap()
}

/// Scroll so the top of `role`'s first element sits just above the default
/// trigger line
fn scroll_past(stage: &mut Stage, role: Role) {
    let top = stage
        .page()
        .tree()
        .get(first(stage, role))
        .unwrap()
        .bounds()
        .top();
    let line = stage.page().viewport().height() * 0.8;
    stage.scroll_to(top - line + 1.0);
}

fn snapshot(stage: &Stage) -> Vec<(ElementId, folio_core::VisualState, Option<String>)> {
    let tree = stage.page().tree();
    tree.iter()
        .map(|(id, _)| (id, tree.composed_visual(id).unwrap(), tree.displayed_text(id)))
        .collect()
}

#[test]
fn service_cards_reveal_on_scroll() {
    let mut stage = stage();
    stage.mount();

    let cards = stage.page().tree().query_role(Role::ServiceCard);
    for &card in &cards {
        assert_eq!(
            stage.orchestrator().target_state("services-reveal", card),
            Some(TargetState::Idle)
        );
        assert_eq!(stage.page().tree().get(card).unwrap().visual().opacity, 0.0);
    }

    scroll_past(&mut stage, Role::Services);
    assert_eq!(
        stage.orchestrator().target_state("services-reveal", cards[0]),
        Some(TargetState::Entering)
    );

    stage.run_frames(10);
    let first_opacity = stage.page().tree().get(cards[0]).unwrap().visual().opacity;
    let last_opacity = stage.page().tree().get(cards[5]).unwrap().visual().opacity;
    assert!(first_opacity > 0.0 && first_opacity < 1.0);
    // The last card is still waiting out its stagger offset
    assert_eq!(last_opacity, 0.0);

    stage.settle(600);
    for &card in &cards {
        assert_eq!(
            stage.orchestrator().target_state("services-reveal", card),
            Some(TargetState::Settled)
        );
        let visual = stage.page().tree().get(card).unwrap().visual();
        assert_eq!(visual.opacity, 1.0);
        assert_eq!(visual.translate_y, 0.0);
    }
}

#[test]
fn scrolling_back_up_plays_the_reveal_backward() {
    let mut stage = stage();
    stage.mount();
    scroll_past(&mut stage, Role::Services);
    stage.settle(600);

    stage.scroll_to(0.0);
    let card = first(&stage, Role::ServiceCard);
    assert_eq!(
        stage.orchestrator().target_state("services-reveal", card),
        Some(TargetState::Leaving)
    );

    stage.settle(600);
    assert_eq!(
        stage.orchestrator().target_state("services-reveal", card),
        Some(TargetState::Idle)
    );
    assert_eq!(stage.page().tree().get(card).unwrap().visual().opacity, 0.0);
}

#[test]
fn social_hover_reverses_mid_flight() {
    let mut stage = stage();
    stage.mount();

    let button = stage.find("social:LinkedIn").unwrap();
    assert!(stage.hover(button));
    stage.run_frames(5);

    let scale = stage.page().tree().get(button).unwrap().visual().scale;
    assert!(scale > 1.0 && scale < 1.2, "scale {scale}");

    stage.pointer_leave();
    assert_eq!(
        stage.orchestrator().target_state("social-hover", button),
        Some(TargetState::Leaving)
    );
    // Reversal starts from where the forward leg left off
    assert_eq!(stage.page().tree().get(button).unwrap().visual().scale, scale);

    stage.run_frames(1);
    let next = stage.page().tree().get(button).unwrap().visual().scale;
    assert!(next < scale);

    stage.settle(600);
    assert_eq!(
        stage.orchestrator().target_state("social-hover", button),
        Some(TargetState::Idle)
    );
    let visual = stage.page().tree().get(button).unwrap().visual();
    assert!((visual.scale - 1.0).abs() < 1e-5);
    assert!(visual.rotation.abs() < 1e-4);
}

#[test]
fn unmount_mid_transition_releases_everything() {
    let mut stage = stage();
    stage.mount();
    stage.run_frames(5);

    let hero_title = first(&stage, Role::HeroTitle);
    let in_flight = ["hero-title", "hero-subtitle", "hero-cta"]
        .iter()
        .filter(|name| {
            stage
                .orchestrator()
                .rule_states(name)
                .iter()
                .all(|(_, state)| *state == TargetState::Entering)
        })
        .count();
    assert_eq!(in_flight, 3);
    let opacity = stage.page().tree().get(hero_title).unwrap().visual().opacity;
    assert!(opacity > 0.0 && opacity < 1.0);

    stage.unmount();
    assert!(!stage.is_mounted());
    assert_eq!(stage.page().active_observers(), 0);
    assert_eq!(stage.page().active_listeners(), 0);
    assert_eq!(stage.orchestrator().active_tweens(), 0);
    assert!(stage.summary().rules.is_empty());

    let before = snapshot(&stage);
    stage.run_frames(120);
    stage.scroll_through(300.0, 5);
    stage.hover_label("social:GitHub").unwrap();
    stage.pointer_leave();
    assert_eq!(snapshot(&stage), before);
}

#[test]
fn repeated_mount_cycles_do_not_accumulate() {
    let mut stage = stage();

    let mut counts = Vec::new();
    for _ in 0..3 {
        stage.mount();
        counts.push((
            stage.page().active_observers(),
            stage.page().active_listeners(),
            stage.orchestrator().active_tweens(),
        ));
        stage.scroll_through(400.0, 3);
        stage.unmount();
        assert_eq!(stage.page().active_observers(), 0);
        assert_eq!(stage.page().active_listeners(), 0);
        assert_eq!(stage.orchestrator().active_tweens(), 0);
    }

    // Per-target projects and about, containers for the rest
    assert_eq!(counts[0].0, 4 + 1 + 4);
    // CTA, service cards, project cards, contact fields, social buttons
    assert_eq!(counts[0].1, 1 + 6 + 4 + 4 + 3);
    assert!(counts.iter().all(|c| *c == counts[0]));
}

#[test]
fn mounting_twice_does_not_double_register() {
    let mut stage = stage();
    stage.mount();
    let observers = stage.page().active_observers();
    let listeners = stage.page().active_listeners();
    let tweens = stage.orchestrator().active_tweens();

    stage.mount();
    assert_eq!(stage.page().active_observers(), observers);
    assert_eq!(stage.page().active_listeners(), listeners);
    assert_eq!(stage.orchestrator().active_tweens(), tweens);
}

#[test]
fn counters_count_up_and_land_on_literal_text() {
    let mut stage = stage();
    stage.mount();
    assert_eq!(stage.summary().counters, vec!["0+", "0%", "0", "24/7"]);

    scroll_past(&mut stage, Role::Stats);
    stage.run_frames(30);
    let counter = first(&stage, Role::StatCounter);
    let midway = stage.page().tree().displayed_text(counter).unwrap();
    let figure: u64 = midway.trim_end_matches('+').parse().unwrap();
    assert!(figure > 0 && figure < 150, "{midway}");

    stage.settle(600);
    assert_eq!(stage.summary().counters, vec!["150+", "98%", "12", "24/7"]);
}

#[test]
fn full_scroll_settles_every_reveal() {
    let mut stage = stage();
    stage.mount();
    stage.scroll_through(250.0, 20);
    stage.settle(1000);

    assert!(stage.page().viewport().at_end());
    let summary = stage.summary();
    for rule in &summary.rules {
        match rule.name.as_str() {
            "tech-float" | "social-bob" => assert_eq!(rule.oscillating, rule.targets),
            name if name.ends_with("-hover") || name.ends_with("-focus") => {
                assert_eq!(rule.idle, rule.targets, "{name}")
            }
            name => assert_eq!(rule.settled, rule.targets, "{name}"),
        }
    }

    // Ambient motion keeps running on top of the settled reveal
    stage.run_frames(30);
    let badge = first(&stage, Role::TechBadge);
    let element = stage.page().tree().get(badge).unwrap();
    assert_eq!(element.visual().opacity, 1.0);
    assert_ne!(element.ambient().rotation, 0.0);
}

#[test]
fn focus_rule_follows_focus_and_blur() {
    let mut stage = stage();
    stage.mount();
    let email = stage.find("field:Email").unwrap();

    stage.focus(Some(email));
    assert_eq!(
        stage.orchestrator().target_state("contact-field-focus", email),
        Some(TargetState::Entering)
    );
    stage.settle(600);
    assert!((stage.page().tree().get(email).unwrap().visual().scale - 1.02).abs() < 1e-5);

    stage.focus(None);
    stage.settle(600);
    assert_eq!(
        stage.orchestrator().target_state("contact-field-focus", email),
        Some(TargetState::Idle)
    );
}

#[test]
fn overshooting_entrance_never_exceeds_full_opacity() {
    let mut stage = stage();
    stage.mount();
    let cta = first(&stage, Role::HeroCta);

    let mut peak_opacity = 0.0f32;
    let mut peak_scale = 0.0f32;
    for _ in 0..120 {
        stage.run_frames(1);
        let visual = stage.page().tree().composed_visual(cta).unwrap();
        peak_opacity = peak_opacity.max(visual.opacity);
        peak_scale = peak_scale.max(visual.scale);
    }

    assert_eq!(peak_opacity, 1.0);
    // Scale keeps the overshoot
    assert!(peak_scale > 1.0, "scale {peak_scale}");
    assert_eq!(
        stage.orchestrator().target_state("hero-cta", cta),
        Some(TargetState::Settled)
    );
}
