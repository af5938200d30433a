//! cutewiki - wiki markup renderer
//!
//! A CLI tool that renders the pages of a flat-file wiki to HTML, print
//! HTML, RTF and RSS, and checks them for broken links.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]
#![allow(dead_code)]

mod cli;
mod wiki_config;

// Page store and revisions
mod history;
mod store;

// Markup parser and renderers
mod markup;
mod output;

// Request handling
mod feed;
mod site;
mod validate;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ViewMode};
use history::{NoHistory, Rcs, RevisionLog};
use markup::{RenderContext, SystemFacts};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use store::{special, PageStore, Wiki};
use wiki_config::{HistoryBackend, WikiConfig, CONFIG_FILE};

/// Main entry point for the cutewiki CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force, name } => {
            handle_init_command(path, force, name)?;
        }

        Commands::Render {
            page,
            wiki,
            mode,
            output,
            user,
            vars,
            verbose,
        } => {
            handle_render_command(&page, &wiki, mode, output, user, vars, verbose)?;
        }

        Commands::Feed {
            wiki,
            output,
            verbose,
        } => {
            handle_feed_command(&wiki, output, verbose)?;
        }

        Commands::Validate {
            wiki,
            verbose,
            check_links,
            check_images,
        } => {
            handle_validate_command(&wiki, verbose, check_links, check_images)?;
        }
    }

    Ok(())
}

/// Initialize logging when asked for
fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }
}

/// A loaded wiki with everything a render needs
struct Site {
    config: WikiConfig,
    root: PathBuf,
    wiki: Wiki,
    history: Box<dyn RevisionLog>,
}

impl Site {
    fn open(root: &Path) -> Result<Self> {
        let config = WikiConfig::load_or_default(root)
            .with_context(|| format!("Failed to read {}", root.join(CONFIG_FILE).display()))?;
        let pages_dir = config.pages_path(root);
        let wiki = Wiki::load(&pages_dir)
            .with_context(|| format!("Failed to load pages from {}", pages_dir.display()))?;

        let history: Box<dyn RevisionLog> = match config.history {
            HistoryBackend::Off => Box::new(NoHistory),
            HistoryBackend::Rcs => Box::new(Rcs::detect(&pages_dir)),
        };

        Ok(Self {
            config,
            root: root.to_path_buf(),
            wiki,
            history,
        })
    }

    fn context(&self, user: &str) -> RenderContext<'_> {
        let facts = SystemFacts::detect(&self.config.wiki_name, &self.config.host, self.config.port);
        let mut ctx = RenderContext::new(&self.wiki, self.history.as_ref(), facts);
        ctx.user = user.to_string();
        ctx.image_dir = self.config.image_path(&self.root);
        ctx.admins = self.config.admins.clone();
        ctx.blank_lines = self.config.blank_lines;
        ctx
    }
}

/// Open the output file, or stdout when none is given
fn open_output(output: &Option<PathBuf>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Handle the init command
fn handle_init_command(path: Option<PathBuf>, force: bool, name: Option<String>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));

    println!("Initializing wiki");
    println!("Target path: {}", target_path.display());

    // Create the target directory if it doesn't exist
    if !target_path.exists() {
        std::fs::create_dir_all(&target_path)
            .with_context(|| format!("Failed to create directory {}", target_path.display()))?;
    }

    // Check if directory is empty (unless force flag is set)
    if !force {
        check_directory_empty(&target_path)?;
    }

    let mut config = WikiConfig::default();
    if let Some(name) = name {
        println!("Wiki name: {}", name);
        config.wiki_name = name;
    }
    let config_path = target_path.join(CONFIG_FILE);
    config
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let pages_dir = config.pages_path(&target_path);
    let image_dir = config.image_path(&target_path);
    for dir in [&pages_dir, &image_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let now = chrono::Utc::now().timestamp();
    for builtin in special::SPECIAL_PAGES {
        store::save_page(&pages_dir, &builtin.build(now))
            .with_context(|| format!("Failed to create page {}", builtin.name))?;
    }

    println!("\n✓ Successfully created {} pages", special::SPECIAL_PAGES.len());
    println!("\nNext steps:");
    println!("  1. Edit {} to configure your wiki", CONFIG_FILE);
    println!("  2. Write pages as <WikiWord>.wik files in {}", pages_dir.display());
    println!("  3. Run 'cutewiki render StartPage' to see a page");

    Ok(())
}

/// Handle the render command
fn handle_render_command(
    page: &str,
    wiki: &Path,
    mode: ViewMode,
    output: Option<PathBuf>,
    user: String,
    vars: Vec<(String, String)>,
    verbose: bool,
) -> Result<()> {
    init_logging(verbose);

    let site = Site::open(wiki)?;
    let mut ctx = site.context(&user);
    for (key, value) in &vars {
        ctx.set_var(key, value);
    }

    let mut sink = open_output(&output)?;
    site::render_named(page, mode.into(), &mut ctx, sink.as_mut())
        .with_context(|| format!("Failed to render {}", page))?;
    sink.flush().context("Failed to flush output")?;

    if let Some(path) = &output {
        println!("✓ Successfully wrote: {}", path.display());
    }
    Ok(())
}

/// Handle the feed command
fn handle_feed_command(wiki: &Path, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    init_logging(verbose);

    let site = Site::open(wiki)?;
    let ctx = site.context("Guest");
    let settings = feed::FeedSettings {
        description: site.config.description.clone(),
        hours: site.config.feed_hours,
    };

    let mut sink = open_output(&output)?;
    feed::write_channel(&ctx, &settings, sink.as_mut()).context("Failed to write feed")?;
    sink.flush().context("Failed to flush output")?;

    if let Some(path) = &output {
        println!("✓ Successfully wrote: {}", path.display());
    }
    Ok(())
}

/// Handle the validate command
fn handle_validate_command(wiki: &Path, verbose: bool, check_links: bool, check_images: bool) -> Result<()> {
    init_logging(verbose);

    // Without a selection every check runs
    let (check_links, check_images) = if check_links || check_images {
        (check_links, check_images)
    } else {
        (true, true)
    };

    println!("Validating wiki...");
    println!("Wiki: {}", wiki.display());

    let site = Site::open(wiki)?;
    println!("✓ Loaded {} pages", site.wiki.count());

    let mut problems = Vec::new();
    if check_links {
        let broken = validate::broken_links(&site.wiki);
        if verbose {
            println!("Checked links: {} broken", broken.len());
        }
        problems.extend(broken);
    }
    if check_images {
        let image_dir = site.config.image_path(&site.root);
        let missing = validate::missing_images(&site.wiki, &image_dir)
            .context("Failed to scan for image fields")?;
        if verbose {
            println!("Checked images in {}: {} missing", image_dir.display(), missing.len());
        }
        problems.extend(missing);
    }

    if problems.is_empty() {
        println!("\n✓ No problems found");
        return Ok(());
    }

    for problem in &problems {
        println!("  {}", problem);
    }
    anyhow::bail!("Found {} problems", problems.len())
}

/// Check if a directory is empty
fn check_directory_empty(path: &Path) -> Result<()> {
    if let Ok(entries) = std::fs::read_dir(path) {
        if entries.count() > 0 {
            anyhow::bail!("Target directory is not empty. Use --force to overwrite existing files");
        }
    }
    Ok(())
}
