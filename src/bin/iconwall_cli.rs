//! IconWall CLI - build one checkerboard wallpaper from a folder of icons
//!
//! Prints a status line, or the run report as JSON with --json.
//! Returns non-zero on any fatal error; "no images" is not an error.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use iconwall_core::{DecodePolicy, RunOutcome, WallpaperConfig, WallpaperPipeline};

#[derive(Parser)]
#[command(name = "iconwall-cli", version)]
#[command(about = "IconWall CLI - deduplicate icons into a checkerboard wallpaper")]
struct Cli {
    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding the icons
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Folder to write the wallpaper into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Output file name, numbered when taken
    #[arg(short, long)]
    base_name: Option<String>,

    /// Shuffle seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Abort on files that fail to decode instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn build_config(cli: &Cli) -> Result<WallpaperConfig, iconwall_core::ConfigError> {
    let mut cfg = match &cli.config {
        Some(path) => WallpaperConfig::load(path)?,
        None => WallpaperConfig::default(),
    };
    if let Some(v) = &cli.source { cfg.source_dir = v.clone(); }
    if let Some(v) = &cli.output { cfg.output_dir = v.clone(); }
    if let Some(v) = cli.width { cfg.canvas_size[0] = v; }
    if let Some(v) = cli.height { cfg.canvas_size[1] = v; }
    if let Some(v) = &cli.base_name { cfg.base_filename = v.clone(); }
    if let Some(v) = cli.seed { cfg.seed = Some(v); }
    if cli.strict { cfg.decode_policy = DecodePolicy::Abort; }
    Ok(cfg)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let cfg = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match WallpaperPipeline::new(cfg).and_then(|p| p.run()) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(outcome.report()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", outcome.report().summary());
    }

    if let RunOutcome::NoImages(_) = outcome {
        log::info!("Nothing written");
    }
    ExitCode::SUCCESS
}
