//! Folio CLI
//!
//! Drive the portfolio page headlessly and inspect its animation rules.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_layout::{Role, Rule, Trigger};
use folio_site::{portfolio_rules, SiteConfig, SiteContent, Stage, StageSummary, CONFIG_FILE};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll-reactive portfolio page simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount the page, scroll it top to bottom and report the result
    Simulate {
        /// Config file (defaults to ./folio.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Content file replacing the built-in content
        #[arg(long)]
        content: Option<PathBuf>,

        /// Pixels per scroll step
        #[arg(short, long, default_value = "200")]
        scroll_step: f32,

        /// Frames to run after each scroll step
        #[arg(short, long, default_value = "20")]
        frames: usize,

        /// Hover the first element of this role at the end (e.g. social_button)
        #[arg(long)]
        hover: Option<Role>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the portfolio rule set
    Rules {
        /// Config file (defaults to ./folio.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default folio.toml
    Init {
        /// Where to write the config
        #[arg(default_value = CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            content,
            scroll_step,
            frames,
            hover,
            json,
        } => cmd_simulate(
            config.as_deref(),
            content.as_deref(),
            scroll_step,
            frames,
            hover,
            json,
        ),

        Commands::Rules { config, json } => cmd_rules(config.as_deref(), json),

        Commands::Init { path, force } => cmd_init(&path, force),
    }
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    SiteConfig::load_or_default(path).context("Failed to load config")
}

fn cmd_simulate(
    config: Option<&Path>,
    content: Option<&Path>,
    scroll_step: f32,
    frames: usize,
    hover: Option<Role>,
    json: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let content = SiteContent::load_or_default(content).context("Failed to load content")?;
    let mut stage = Stage::new(&config, &content).context("Failed to build page")?;

    info!(
        "Simulating {}x{} at {} fps",
        config.viewport.width, config.viewport.height, config.animation.frame_rate
    );

    stage.mount();
    stage.scroll_through(scroll_step, frames);

    if let Some(role) = hover {
        let element = stage
            .page()
            .tree()
            .first(role)
            .with_context(|| format!("No element with role '{role}'"))?;
        let hovered = stage.hover(element);
        info!("Hovering {} (hit: {})", role, hovered);
        stage.run_frames(frames);
    }

    let settle_frames = config.animation.frame_rate as usize * 10;
    stage.settle(settle_frames);

    let mounted = stage.summary();
    stage.unmount();
    let unmounted = stage.summary();

    if json {
        let report = serde_json::json!({
            "mounted": mounted,
            "unmounted": unmounted,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&mounted, &unmounted);
    }

    Ok(())
}

fn print_summary(mounted: &StageSummary, unmounted: &StageSummary) {
    println!("Simulation");
    println!("==========");
    println!("Frames: {} ({:.0} ms)", mounted.frames, mounted.elapsed_ms);
    println!("Scroll: {:.0} / {:.0}", mounted.scroll_y, mounted.max_scroll);
    println!();
    println!(
        "{:<22} {:>7} {:>5} {:>8} {:>7} {:>7} {:>11}",
        "rule", "targets", "idle", "entering", "settled", "leaving", "oscillating"
    );
    for rule in &mounted.rules {
        println!(
            "{:<22} {:>7} {:>5} {:>8} {:>7} {:>7} {:>11}",
            rule.name,
            rule.targets,
            rule.idle,
            rule.entering,
            rule.settled,
            rule.leaving,
            rule.oscillating
        );
    }
    println!();
    println!("Counters: {}", mounted.counters.join(", "));
    println!();
    println!("Bindings     mounted  unmounted");
    println!("  observers  {:>7}  {:>9}", mounted.observers, unmounted.observers);
    println!("  listeners  {:>7}  {:>9}", mounted.listeners, unmounted.listeners);
    println!("  tweens     {:>7}  {:>9}", mounted.tweens, unmounted.tweens);
}

fn describe_trigger(rule: &Rule) -> String {
    match rule.trigger {
        Trigger::Immediate => "immediate".to_string(),
        Trigger::Viewport { threshold, .. } => format!("viewport@{threshold}"),
        Trigger::Pointer { interaction } => format!("{interaction:?}").to_lowercase(),
        Trigger::Ambient => "ambient".to_string(),
    }
}

fn cmd_rules(config: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let rules = portfolio_rules(&config.animation).context("Failed to build rules")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    for rule in &rules {
        let stagger = rule
            .stagger
            .map(|s| format!(" stagger {}ms", s.spread_ms))
            .unwrap_or_default();
        println!(
            "{:<22} {:<16} {:<14} {:>5}ms {}{}",
            rule.name,
            rule.target.as_str(),
            describe_trigger(rule),
            rule.duration_ms,
            String::from(rule.easing),
            stagger
        );
    }

    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    SiteConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}
