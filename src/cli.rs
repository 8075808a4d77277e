//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio essay publishing pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// Published collection directory (relative to project root)
    #[arg(short, long)]
    pub posts: Option<PathBuf>,

    /// Draft collection directory (relative to project root)
    #[arg(short = 'd', long = "drafts-dir")]
    pub drafts_dir: Option<PathBuf>,

    /// Layouts directory (relative to project root)
    #[arg(short, long)]
    pub layouts: Option<PathBuf>,

    /// Output directory for the render manifest (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ingest the corpus and write the render manifest
    Build {
        /// also write drafts.json for preview tooling
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        drafts: Option<bool>,
    },

    /// Ingest the corpus and report every problem without writing anything
    Check,

    /// Print the published listing in index order
    List {
        /// list drafts instead of published documents
        #[arg(long)]
        drafts: bool,
    },

    /// Print one document (published or draft) as JSON, e.g. `2018-02-09-on-ink`
    Show {
        /// document identifier: `YYYY-MM-DD-slug`, or `slug` for undated drafts
        id: String,
    },
}
