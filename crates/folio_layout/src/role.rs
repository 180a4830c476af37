//! Structural element roles
//!
//! Every element in the page tree carries a role. Animation rules target
//! elements by role, so the rule set never refers to concrete element IDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Document root
    Page,
    /// Plain layout wrapper with no meaning of its own
    Group,
    Heading,
    Text,

    // Sections
    Hero,
    Services,
    Projects,
    Technologies,
    Stats,
    About,
    Contact,

    // Animation targets
    HeroTitle,
    HeroSubtitle,
    HeroCta,
    ServiceCard,
    ProjectCard,
    TechBadge,
    StatCounter,
    ContactField,
    SocialButton,
}

impl Role {
    pub const ALL: [Role; 20] = [
        Role::Page,
        Role::Group,
        Role::Heading,
        Role::Text,
        Role::Hero,
        Role::Services,
        Role::Projects,
        Role::Technologies,
        Role::Stats,
        Role::About,
        Role::Contact,
        Role::HeroTitle,
        Role::HeroSubtitle,
        Role::HeroCta,
        Role::ServiceCard,
        Role::ProjectCard,
        Role::TechBadge,
        Role::StatCounter,
        Role::ContactField,
        Role::SocialButton,
    ];

    /// Top-level page section
    pub fn is_section(self) -> bool {
        matches!(
            self,
            Role::Hero
                | Role::Services
                | Role::Projects
                | Role::Technologies
                | Role::Stats
                | Role::About
                | Role::Contact
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Page => "page",
            Role::Group => "group",
            Role::Heading => "heading",
            Role::Text => "text",
            Role::Hero => "hero",
            Role::Services => "services",
            Role::Projects => "projects",
            Role::Technologies => "technologies",
            Role::Stats => "stats",
            Role::About => "about",
            Role::Contact => "contact",
            Role::HeroTitle => "hero_title",
            Role::HeroSubtitle => "hero_subtitle",
            Role::HeroCta => "hero_cta",
            Role::ServiceCard => "service_card",
            Role::ProjectCard => "project_card",
            Role::TechBadge => "tech_badge",
            Role::StatCounter => "stat_counter",
            Role::ContactField => "contact_field",
            Role::SocialButton => "social_button",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role `{}`", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts `snake_case` and `kebab-case` names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
