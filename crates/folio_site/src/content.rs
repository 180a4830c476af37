//! Static site content
//!
//! Read-only records rendered into the page. The built-in defaults describe
//! the consultancy; a TOML content file can replace them wholesale. Nothing
//! here has behavior: project domains in particular are display data only.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SiteContent {
    pub hero: Hero,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    pub about: About,
    pub contact: Contact,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub cta: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Service {
    pub title: String,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub name: String,
    /// Industry label shown on the card
    pub domain: String,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A headline figure such as "150+ projects delivered"
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Stat {
    /// Terminal text, counted up when it contains a number
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct About {
    pub heading: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Contact {
    pub heading: String,
    /// Form field labels (the form has no submit handler)
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub socials: Vec<Social>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Social {
    pub name: String,
    pub url: String,
}

impl SiteContent {
    /// Load content from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SiteError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise the built-in content
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

fn service(title: &str, summary: &str) -> Service {
    Service {
        title: title.to_string(),
        summary: summary.to_string(),
    }
}

fn project(name: &str, domain: &str, summary: &str, tags: &[&str]) -> Project {
    Project {
        name: name.to_string(),
        domain: domain.to_string(),
        summary: summary.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn social(name: &str, url: &str) -> Social {
    Social {
        name: name.to_string(),
        url: url.to_string(),
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            hero: Hero {
                title: "We build software that ships".to_string(),
                subtitle: "Product engineering, cloud platforms and security for teams that \
                           need to move fast without breaking things."
                    .to_string(),
                cta: "Start a project".to_string(),
            },
            services: vec![
                service(
                    "Web Platforms",
                    "Fast, accessible web applications from first prototype to production scale.",
                ),
                service(
                    "Mobile Apps",
                    "Native and cross-platform apps with offline-first sync and smooth UX.",
                ),
                service(
                    "Cloud & DevOps",
                    "Infrastructure as code, CI/CD pipelines and cost-aware cloud architecture.",
                ),
                service(
                    "Security Engineering",
                    "Threat modeling, audits and hardening built into the delivery process.",
                ),
                service(
                    "Data & AI",
                    "Pipelines, analytics and applied machine learning that pay for themselves.",
                ),
                service(
                    "Product Design",
                    "Research-driven UX and design systems that engineering teams can adopt.",
                ),
            ],
            projects: vec![
                project(
                    "Sentinel",
                    "Cybersecurity",
                    "Network anomaly detection console for a managed security provider.",
                    &["Rust", "Kafka", "React"],
                ),
                project(
                    "Cartwheel",
                    "E-commerce",
                    "Headless storefront serving two million monthly shoppers.",
                    &["Next.js", "PostgreSQL", "Stripe"],
                ),
                project(
                    "Pulse",
                    "Health",
                    "Mobile companion app for remote patient monitoring.",
                    &["Flutter", "Firebase"],
                ),
                project(
                    "Ledgerline",
                    "Fintech",
                    "Real-time reconciliation engine for a payments processor.",
                    &["Go", "gRPC", "Kubernetes"],
                ),
            ],
            technologies: [
                "Rust",
                "TypeScript",
                "React",
                "Next.js",
                "Node.js",
                "Go",
                "Python",
                "Flutter",
                "PostgreSQL",
                "Redis",
                "Kubernetes",
                "Terraform",
                "AWS",
                "GCP",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            stats: vec![
                stat("150+", "Projects delivered"),
                stat("98%", "Client retention"),
                stat("12", "Years in business"),
                stat("24/7", "Support coverage"),
            ],
            about: About {
                heading: "About us".to_string(),
                body: "A senior team of engineers and designers working as an extension of \
                       yours. We favor small teams, short feedback loops and boring technology \
                       where it counts."
                    .to_string(),
            },
            contact: Contact {
                heading: "Let's talk".to_string(),
                fields: ["Name", "Email", "Company", "Message"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                socials: vec![
                    social("GitHub", "https://github.com"),
                    social("LinkedIn", "https://www.linkedin.com"),
                    social("X", "https://x.com"),
                ],
            },
        }
    }
}
