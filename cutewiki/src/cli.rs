//! Command-line interface definitions for cutewiki

use crate::output::RenderMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How a page is rendered
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ViewMode {
    /// Interactive HTML
    #[default]
    Normal,
    /// HTML with the edit form chrome
    Edit,
    /// HTML showing the page source
    Source,
    /// HTML for printing, links as endnotes
    Print,
    /// Rich Text Format
    Rtf,
    /// The feed headline only
    Rss,
}

impl From<ViewMode> for RenderMode {
    fn from(mode: ViewMode) -> Self {
        match mode {
            ViewMode::Normal => RenderMode::Normal,
            ViewMode::Edit => RenderMode::Edit,
            ViewMode::Source => RenderMode::Source,
            ViewMode::Print => RenderMode::Print,
            ViewMode::Rtf => RenderMode::Rtf,
            ViewMode::Rss => RenderMode::Rss,
        }
    }
}

/// CLI structure for the cutewiki application
#[derive(Parser)]
#[command(name = "cutewiki")]
#[command(version)]
#[command(about = "Wiki markup renderer for HTML, print, RTF and RSS", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for cutewiki
#[derive(Subcommand)]
pub enum Commands {
    /// Create a wiki with its configuration and built-in pages
    Init {
        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Wiki name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Render one page
    Render {
        /// Page name, a WikiWord
        page: String,

        /// Wiki root directory
        #[arg(short, long, value_name = "PATH", default_value = ".")]
        wiki: PathBuf,

        /// Output format and page chrome
        #[arg(short, long, value_enum, default_value = "normal")]
        mode: ViewMode,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Logged in user
        #[arg(short, long, default_value = "Guest")]
        user: String,

        /// Request variable as KEY=VALUE, may be repeated
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the RSS 2.0 feed of recent changes
    Feed {
        /// Wiki root directory
        #[arg(short, long, value_name = "PATH", default_value = ".")]
        wiki: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check pages for broken links and missing images
    Validate {
        /// Wiki root directory
        #[arg(short, long, value_name = "PATH", default_value = ".")]
        wiki: PathBuf,

        /// Show detailed validation results
        #[arg(short, long)]
        verbose: bool,

        /// Report WikiWords without a page
        #[arg(long)]
        check_links: bool,

        /// Report `[image]` fields without a PNG file
        #[arg(long)]
        check_images: bool,
    },
}

/// Split `KEY=VALUE`
fn parse_var(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", arg)),
    }
}
