//! Forma CLI
//!
//! Replay, check, and list field interaction stories.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod player;
mod story;

use player::{Player, StepRecord};
use story::Story;

mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[32m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const CYAN: &str = "\x1b[36m";
}

#[derive(Parser)]
#[command(name = "forma")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Forma field controller CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a story and print the field state after every event
    Play {
        /// Story file
        story: PathBuf,

        /// Print one JSON object per step instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate a story without replaying it
    Check {
        /// Story file
        story: PathBuf,
    },

    /// List the stories in a directory
    List {
        /// Directory to scan
        #[arg(default_value = "stories")]
        dir: PathBuf,
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
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Play { story, json } => cmd_play(&story, json),
        Commands::Check { story } => cmd_check(&story),
        Commands::List { dir } => cmd_list(&dir),
    }
}

fn cmd_play(path: &Path, json: bool) -> Result<()> {
    let story = story::load(path)?;

    info!(
        "Playing {} ({} field, {} events)",
        story.name,
        story.field,
        story.events.len()
    );

    let records = Player::replay(&story)
        .with_context(|| format!("Failed to replay {}", path.display()))?;

    if json {
        for record in &records {
            let line = serde_json::to_string(record).context("Failed to serialize step")?;
            println!("{}", line);
        }
    } else {
        print_table(&story, &records);
    }

    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let story = story::load(path)?;

    println!(
        "{}✓{} {}: {} events on a {} field",
        colors::GREEN,
        colors::RESET,
        story.name,
        story.events.len(),
        story.field
    );

    Ok(())
}

fn cmd_list(dir: &Path) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        warn!("No stories found in {}", dir.display());
        return Ok(());
    }

    for path in &paths {
        let file = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        match story::load(path) {
            Ok(story) => println!(
                "{:<28} {:<9} {:>3} events  {}",
                file,
                story.field,
                story.events.len(),
                story.name
            ),
            Err(e) => warn!("{}: {:#}", path.display(), e),
        }
    }

    Ok(())
}

fn print_table(story: &Story, records: &[StepRecord]) {
    println!("{}{}{}{}", colors::BOLD, colors::CYAN, story.name, colors::RESET);
    if let Some(description) = &story.description {
        println!("{}{}{}", colors::GRAY, description, colors::RESET);
    }
    println!();

    for record in records {
        println!(
            "{:>3}  {:<22} {:<18} {}",
            record.step,
            record.event,
            response_flags(record),
            record.state.summary()
        );
        for note in &record.notifications {
            println!("     {}→ {}{}", colors::CYAN, note, colors::RESET);
        }
    }
}

fn response_flags(record: &StepRecord) -> String {
    if record.step == 0 {
        return String::new();
    }
    let response = &record.response;
    let mut flags = String::from(if response.handled { "handled" } else { "ignored" });
    if response.prevent_default {
        flags.push_str(" +prevent");
    }
    if response.release_focus {
        flags.push_str(" +blur");
    }
    flags
}
