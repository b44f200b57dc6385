//! Command-line interface
//!
//! `serve` (the default) runs the web server; `prune` and `list` operate on
//! the image directory once and exit.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::images::ImageStore;

/// qrdrop - hand out freshly drawn images through a QR code
#[derive(Debug, Parser)]
#[command(name = "qrdrop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// The command to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the web server
    Serve,

    /// Delete images older than the configured (or given) age
    Prune {
        /// Maximum age in minutes, overrides `images.max_age_minutes`
        #[arg(long)]
        minutes: Option<u64>,
    },

    /// Print the images in the managed directory
    List {
        /// Extension filter, overrides `images.list_extension`
        #[arg(long)]
        ext: Option<String>,
    },
}

/// Prune once and print what was removed
pub fn run_prune(
    config: &Config,
    minutes: Option<u64>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ImageStore::open(&config.images.directory)?;
    let max_age = minutes.map_or_else(
        || config.images.max_age(),
        |m| Duration::from_secs(m.saturating_mul(60)),
    );

    let report = store.prune_older_than(max_age)?;
    for name in &report.removed {
        writeln!(out, "removed {name}")?;
    }
    writeln!(
        out,
        "{} removed, {} kept in {}",
        report.removed.len(),
        report.kept,
        store.directory().display()
    )?;
    Ok(())
}

/// Print one matching image name per line
pub fn run_list(
    config: &Config,
    ext: Option<&str>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ImageStore::open(&config.images.directory)?;
    let ext = ext.unwrap_or(&config.images.list_extension);

    for name in store.list_images(ext)? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}
