//! Page builder
//!
//! Realizes [`SiteContent`] into a role-tagged element tree. Sizes are
//! fixed where the real page would use its stylesheet, so the layout is
//! deterministic for a given viewport.

use folio_layout::{node, NodeBuilder, Page, PageTree, Role};

use crate::config::ViewportConfig;
use crate::content::SiteContent;
use crate::error::Result;

const SECTION_PADDING: f32 = 80.0;

fn section(role: Role, heading: &str) -> NodeBuilder {
    node(role)
        .w_full()
        .padding_xy(SECTION_PADDING, SECTION_PADDING)
        .gap(32.0)
        .child(node(Role::Heading).text(heading).font_size(36.0))
}

fn hero(content: &SiteContent, viewport_height: f32) -> NodeBuilder {
    node(Role::Hero)
        .w_full()
        .min_h(viewport_height)
        .padding(SECTION_PADDING)
        .gap(24.0)
        .child(
            node(Role::HeroTitle)
                .label("hero-title")
                .text(&content.hero.title)
                .font_size(56.0),
        )
        .child(
            node(Role::HeroSubtitle)
                .label("hero-subtitle")
                .text(&content.hero.subtitle)
                .font_size(20.0),
        )
        .child(
            node(Role::HeroCta)
                .label("hero-cta")
                .text(&content.hero.cta)
                .w(220.0)
                .h(56.0),
        )
}

fn services(content: &SiteContent) -> NodeBuilder {
    section(Role::Services, "Services").child(
        node(Role::Group).row().wrap().gap(24.0).children(content.services.iter().map(|s| {
            node(Role::ServiceCard)
                .label(format!("service:{}", s.title))
                .w(340.0)
                .h(240.0)
                .padding(24.0)
                .gap(12.0)
                .child(node(Role::Heading).text(&s.title).font_size(22.0))
                .child(node(Role::Text).text(&s.summary))
        })),
    )
}

fn projects(content: &SiteContent) -> NodeBuilder {
    section(Role::Projects, "Selected work").child(
        node(Role::Group).row().wrap().gap(24.0).children(content.projects.iter().map(|p| {
            node(Role::ProjectCard)
                .label(format!("project:{}", p.name))
                .w(520.0)
                .h(300.0)
                .padding(28.0)
                .gap(10.0)
                .child(node(Role::Text).text(&p.domain).font_size(13.0))
                .child(node(Role::Heading).text(&p.name).font_size(26.0))
                .child(node(Role::Text).text(&p.summary))
                .child(
                    node(Role::Group)
                        .row()
                        .gap(8.0)
                        .children(p.tags.iter().map(|t| node(Role::Text).text(t).font_size(12.0))),
                )
        })),
    )
}

fn technologies(content: &SiteContent) -> NodeBuilder {
    section(Role::Technologies, "Technologies").child(
        node(Role::Group).row().wrap().gap(16.0).children(content.technologies.iter().map(|t| {
            node(Role::TechBadge)
                .label(format!("tech:{t}"))
                .text(t)
                .w(140.0)
                .h(48.0)
        })),
    )
}

fn stats(content: &SiteContent) -> NodeBuilder {
    node(Role::Stats)
        .w_full()
        .padding(SECTION_PADDING)
        .child(
            node(Role::Group).row().wrap().gap(24.0).children(content.stats.iter().map(|s| {
                node(Role::Group)
                    .w(240.0)
                    .gap(8.0)
                    .child(
                        node(Role::StatCounter)
                            .label(format!("stat:{}", s.label))
                            .counter(&s.value)
                            .font_size(48.0),
                    )
                    .child(node(Role::Text).text(&s.label))
            })),
        )
}

fn about(content: &SiteContent) -> NodeBuilder {
    section(Role::About, &content.about.heading)
        .child(node(Role::Text).text(&content.about.body).font_size(18.0))
}

fn contact(content: &SiteContent) -> NodeBuilder {
    let contact = &content.contact;
    section(Role::Contact, &contact.heading)
        .child(node(Role::Group).gap(16.0).children(contact.fields.iter().map(|f| {
            node(Role::ContactField)
                .label(format!("field:{f}"))
                .text(f)
                .w(480.0)
                .h(48.0)
        })))
        .child(node(Role::Group).row().gap(16.0).children(contact.socials.iter().map(|s| {
            node(Role::SocialButton)
                .label(format!("social:{}", s.name))
                .w(48.0)
                .h(48.0)
        })))
}

/// Describe the whole page
pub fn page_tree(content: &SiteContent, viewport_height: f32) -> NodeBuilder {
    node(Role::Page)
        .w_full()
        .child(hero(content, viewport_height))
        .child(services(content))
        .child(projects(content))
        .child(technologies(content))
        .child(stats(content))
        .child(about(content))
        .child(contact(content))
}

/// Lay out the page and host it in a viewport
pub fn build_page(content: &SiteContent, viewport: &ViewportConfig) -> Result<Page> {
    let tree = PageTree::build(page_tree(content, viewport.height), viewport.width)?;
    Ok(Page::new(tree, viewport.width, viewport.height))
}
