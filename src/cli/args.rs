//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trellis - theme template resolution and output enhancement.
#[derive(Debug, Parser)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .trellis/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the template hierarchy for a request
    Hierarchy(HierarchyArgs),

    /// Find the theme template that would render a request
    Locate(LocateArgs),

    /// Render a request through the enhancement buffer
    Render(RenderArgs),
}

/// Arguments for the `hierarchy` command.
#[derive(Debug, Clone, clap::Args)]
pub struct HierarchyArgs {
    /// Query context file (YAML)
    pub context: PathBuf,

    /// Print only the merged candidate list
    #[arg(long)]
    pub merged: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `locate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LocateArgs {
    /// Query context file (YAML)
    pub context: PathBuf,

    /// Theme directory to search instead of the configured one
    #[arg(long, value_name = "DIR")]
    pub theme: Option<PathBuf>,

    /// Parent theme directory, searched after the theme
    #[arg(long, value_name = "DIR", requires = "theme")]
    pub parent_theme: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `render` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RenderArgs {
    /// Query context file (YAML)
    pub context: PathBuf,

    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output a JSON report (template, buffering, transforms, document)
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}
