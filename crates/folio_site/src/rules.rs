//! The portfolio rule set
//!
//! Every section's motion is described here as data. Timings are the
//! nominal values; [`AnimationConfig::duration_scale`] stretches them all.

use folio_animation::{Easing, Stagger, VisualProps};
use folio_layout::{Role, Rule, Trigger};

use crate::config::AnimationConfig;
use crate::error::Result;

fn hidden_below(dy: f32) -> VisualProps {
    VisualProps::new().with_opacity(0.0).with_translate_y(dy)
}

fn shown() -> VisualProps {
    VisualProps::new().with_opacity(1.0).with_translate_y(0.0)
}

/// Build the rules for the whole page
///
/// Ambient rules are left out when `config.ambient` is off.
pub fn portfolio_rules(config: &AnimationConfig) -> Result<Vec<Rule>> {
    let ease = config.ease()?;
    let threshold = config.default_threshold;

    let rules = vec![
        // Hero entrance, sequenced by delay
        Rule::new("hero-title", Role::HeroTitle)
            .from(hidden_below(40.0))
            .to(shown())
            .duration(1000)
            .easing(ease),
        Rule::new("hero-subtitle", Role::HeroSubtitle)
            .from(hidden_below(30.0))
            .to(shown())
            .duration(900)
            .delay(300)
            .easing(ease),
        Rule::new("hero-cta", Role::HeroCta)
            .from(VisualProps::new().with_opacity(0.0).with_scale(0.9))
            .to(VisualProps::new().with_opacity(1.0).with_scale(1.0))
            .duration(700)
            .delay(600)
            .easing(Easing::BackOut),
        Rule::new("hero-cta-hover", Role::HeroCta)
            .from(VisualProps::new().with_scale(1.0).with_shadow(0.0))
            .to(VisualProps::new().with_scale(1.05).with_shadow(12.0))
            .duration(250)
            .easing(Easing::EaseOut)
            .trigger(Trigger::hover()),
        // Services
        Rule::new("services-reveal", Role::ServiceCard)
            .from(hidden_below(60.0))
            .to(shown())
            .duration(800)
            .easing(ease)
            .trigger(Trigger::viewport_container(threshold, Role::Services))
            .stagger(Stagger::new(300)),
        Rule::new("service-hover", Role::ServiceCard)
            .from(VisualProps::new().with_translate_y(0.0).with_shadow(0.0))
            .to(VisualProps::new().with_translate_y(-8.0).with_shadow(24.0))
            .duration(300)
            .easing(Easing::EaseOut)
            .trigger(Trigger::hover()),
        // Projects
        Rule::new("projects-reveal", Role::ProjectCard)
            .from(
                VisualProps::new()
                    .with_opacity(0.0)
                    .with_translate_y(80.0)
                    .with_scale(0.96),
            )
            .to(
                VisualProps::new()
                    .with_opacity(1.0)
                    .with_translate_y(0.0)
                    .with_scale(1.0),
            )
            .duration(900)
            .easing(ease)
            .trigger(Trigger::viewport(threshold)),
        Rule::new("project-hover", Role::ProjectCard)
            .from(VisualProps::new().with_scale(1.0).with_shadow(0.0))
            .to(VisualProps::new().with_scale(1.03).with_shadow(32.0))
            .duration(350)
            .easing(Easing::EaseOut)
            .trigger(Trigger::hover()),
        // Technologies
        Rule::new("tech-reveal", Role::TechBadge)
            .from(VisualProps::new().with_opacity(0.0).with_scale(0.6))
            .to(VisualProps::new().with_opacity(1.0).with_scale(1.0))
            .duration(600)
            .easing(Easing::BackOut)
            .trigger(Trigger::viewport_container(threshold, Role::Technologies))
            .stagger(Stagger::new(600).random(config.stagger_seed)),
        Rule::new("tech-float", Role::TechBadge)
            .from(VisualProps::new().with_rotation(-3.0).with_translate_y(0.0))
            .to(VisualProps::new().with_rotation(3.0).with_translate_y(-4.0))
            .duration(2400)
            .easing(Easing::SineInOut)
            .trigger(Trigger::Ambient)
            .stagger(Stagger::new(1200).from_center()),
        // Stats
        Rule::new("stats-count", Role::StatCounter)
            .from(VisualProps::new().with_opacity(0.0))
            .to(VisualProps::new().with_opacity(1.0))
            .counter()
            .duration(1800)
            .easing(Easing::CubicOut)
            .trigger(Trigger::viewport_container(threshold, Role::Stats))
            .stagger(Stagger::new(400)),
        // About
        Rule::new("about-reveal", Role::About)
            .from(hidden_below(50.0))
            .to(shown())
            .duration(1000)
            .easing(ease)
            .trigger(Trigger::viewport(threshold)),
        // Contact
        Rule::new("contact-fields", Role::ContactField)
            .from(VisualProps::new().with_opacity(0.0).with_translate_x(-30.0))
            .to(VisualProps::new().with_opacity(1.0).with_translate_x(0.0))
            .duration(600)
            .easing(ease)
            .trigger(Trigger::viewport_container(threshold, Role::Contact))
            .stagger(Stagger::new(300)),
        Rule::new("contact-field-focus", Role::ContactField)
            .from(VisualProps::new().with_scale(1.0).with_shadow(0.0))
            .to(VisualProps::new().with_scale(1.02).with_shadow(8.0))
            .duration(200)
            .easing(Easing::EaseOut)
            .trigger(Trigger::focus()),
        Rule::new("social-hover", Role::SocialButton)
            .from(VisualProps::new().with_scale(1.0).with_rotation(0.0))
            .to(VisualProps::new().with_scale(1.2).with_rotation(8.0))
            .duration(300)
            .easing(Easing::BackOut)
            .trigger(Trigger::hover()),
        Rule::new("social-bob", Role::SocialButton)
            .from(VisualProps::new().with_translate_y(0.0))
            .to(VisualProps::new().with_translate_y(-6.0))
            .duration(1600)
            .easing(Easing::SineInOut)
            .trigger(Trigger::Ambient)
            .stagger(Stagger::new(400)),
    ];

    Ok(rules
        .into_iter()
        .filter(|rule| config.ambient || !rule.is_ambient())
        .map(|rule| rule.scaled(config.duration_scale))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::StaggerFrom;

    fn rule<'a>(rules: &'a [Rule], name: &str) -> &'a Rule {
        rules.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_rule_names_are_unique() {
        let rules = portfolio_rules(&AnimationConfig::default()).unwrap();
        let mut names: Vec<_> = rules.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_defaults_flow_into_rules() {
        let mut config = AnimationConfig::default();
        config.default_threshold = 0.6;
        config.default_ease = "power2.out".to_string();
        config.stagger_seed = 42;
        let rules = portfolio_rules(&config).unwrap();

        let services = rule(&rules, "services-reveal");
        assert_eq!(services.easing, Easing::CubicOut);
        assert!(matches!(
            services.trigger,
            Trigger::Viewport { threshold, .. } if threshold == 0.6
        ));

        let tech = rule(&rules, "tech-reveal");
        assert_eq!(
            tech.stagger.map(|s| s.from),
            Some(StaggerFrom::Random { seed: 42 })
        );
    }

    #[test]
    fn test_ambient_can_be_disabled() {
        let mut config = AnimationConfig::default();
        let with = portfolio_rules(&config).unwrap();
        assert!(with.iter().any(Rule::is_ambient));

        config.ambient = false;
        let without = portfolio_rules(&config).unwrap();
        assert!(!without.iter().any(Rule::is_ambient));
        assert_eq!(with.len() - without.len(), 2);
    }

    #[test]
    fn test_duration_scale() {
        let mut config = AnimationConfig::default();
        config.duration_scale = 0.5;
        let rules = portfolio_rules(&config).unwrap();

        let subtitle = rule(&rules, "hero-subtitle");
        assert_eq!(subtitle.duration_ms, 450);
        assert_eq!(subtitle.delay_ms, 150);
        assert_eq!(rule(&rules, "stats-count").stagger.unwrap().spread_ms, 200);
    }

    #[test]
    fn test_bad_ease_is_an_error() {
        let mut config = AnimationConfig::default();
        config.default_ease = "bounce.sideways".to_string();
        assert!(portfolio_rules(&config).is_err());
    }
}
