//! Folio Site
//!
//! The consultancy portfolio page: its content, its layout, the rules that
//! animate it, and a headless [`Stage`] that drives it frame by frame.
//!
//! # Example
//!
//! ```
//! use folio_site::{SiteConfig, SiteContent, Stage};
//!
//! let mut stage = Stage::new(&SiteConfig::default(), &SiteContent::default()).unwrap();
//! stage.mount();
//! stage.scroll_through(200.0, 30);
//! stage.settle(600);
//!
//! let summary = stage.summary();
//! assert_eq!(summary.counters, vec!["150+", "98%", "12", "24/7"]);
//!
//! stage.unmount();
//! assert_eq!(stage.page().active_observers(), 0);
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod page;
pub mod rules;
pub mod stage;

pub use config::{AnimationConfig, SiteConfig, ViewportConfig, CONFIG_FILE};
pub use content::SiteContent;
pub use error::{Result, SiteError};
pub use page::{build_page, page_tree};
pub use rules::portfolio_rules;
pub use stage::{RuleSummary, Stage, StageSummary};
