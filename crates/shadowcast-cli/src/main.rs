//! shadowcast CLI - run kernel queries and deploy the native library
//!
//! Queries read JSON files; deploy reads `shadowcast.toml`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

mod config;
mod deploy;
mod scene;

use config::Config;
use scene::{Scene, TrianglePair};

#[derive(Parser)]
#[command(name = "shadowcast")]
#[command(about = "Triangle intersection and silhouette queries for the shadowcast kernel", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "shadowcast.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Intersect two triangles read from a JSON file
    Intersect {
        /// JSON file with `a` and `b`, each three [x, y, z] points
        input: PathBuf,
    },
    /// Compute silhouette edges of the casters in a JSON scene
    Silhouette {
        /// JSON file with a `light` and a list of `casters`
        input: PathBuf,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy the built library into the host project under a timestamped name
    Deploy {
        /// Remove earlier timestamped copies first
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Intersect { input } => {
            let pair: TrianglePair = serde_json::from_str(&read(&input)?)
                .with_context(|| format!("invalid triangle pair in {}", input.display()))?;
            println!(
                "{}",
                scene::describe_intersection(&pair, &config.kernel.tolerance())
            );
        }
        Commands::Silhouette { input, json } => {
            let scene = Scene::parse(&read(&input)?)?;
            let reports = scene.silhouettes(&config.kernel.silhouette_options())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    print_silhouette(report);
                }
            }
        }
        Commands::Deploy { clear } => {
            let Some(deploy_config) = &config.deploy else {
                anyhow::bail!("no [deploy] section in {}", cli.config.display());
            };
            let report = deploy::deploy(deploy_config, clear, deploy::now_timestamp()?)?;
            if clear {
                println!("Removed {} previous copies", report.removed);
            }
            println!(
                "Deployed {} as {}",
                deploy_config.library.display(),
                report.copied_to.display()
            );
            println!(
                "Wrote {} (version {})",
                deploy_config.binding_file.display(),
                report.versioned_name
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_silhouette(report: &scene::CasterReport) {
    let s = &report.silhouette;
    println!(
        "{}: {} silhouette edges ({} triangles)",
        report.name,
        s.len(),
        s.triangle_count
    );
    if s.has_non_manifold() {
        println!("  warning: {} non-manifold edges", s.non_manifold_edges);
    }
    for e in &s.edges {
        println!(
            "  {:?} v{}-v{}: ({}, {}, {}) -> ({}, {}, {})",
            e.kind, e.v0, e.v1, e.start.x, e.start.y, e.start.z, e.end.x, e.end.y, e.end.z
        );
    }
}
