mod countdown;
mod target;
mod theme;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;

use crate::target::parse_target;
use crate::theme::{Theme, load_theme};

#[derive(Parser, Debug)]
#[command(
    name = "walltimer",
    version,
    about = "Full-window countdown clock ticking toward a target time"
)]
struct Cli {
    /// Target time: "HH:MM" (next future occurrence) or "YYYY-MM-DD HH:MM:SS"
    /// (taken literally).
    target: Option<String>,

    /// JSON theme file overriding the built-in black/white/red styling.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Run in a regular decorated window instead of borderless fullscreen.
    #[arg(long)]
    windowed: bool,

    /// Validate the arguments, print the computed target, and exit without
    /// opening a window.
    #[arg(long)]
    check: bool,
}

fn main() {
    // Parse failures are reported on stdout, matching the original tool.
    if let Err(err) = run() {
        println!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let Some(raw_target) = cli.target else {
        bail!("missing target time; supported formats: \"HH:MM\", \"YYYY-MM-DD HH:MM:SS\"");
    };
    let target = parse_target(&raw_target)?;

    let theme = match &cli.theme {
        Some(path) => load_theme(path)
            .with_context(|| format!("failed to load theme {}", path.display()))?,
        None => Theme::default(),
    };

    if cli.check {
        let snap = countdown::snapshot(target, Local::now());
        println!("Target local time: {}", target.format("%Y-%m-%d %H:%M:%S"));
        println!("Remaining: {}", snap.remaining_text);
        return Ok(());
    }

    ui::app::run_gui(target, theme, cli.windowed)
}
