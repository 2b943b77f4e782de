// AnimalAI curriculum builder
// Merges arena configuration files into a single training curriculum

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aai_curriculum::{assemble, assemble_in_parts, discover, stratify, write_manifest};

#[derive(Parser)]
#[command(name = "aai-curriculum")]
#[command(about = "Combine AnimalAI arena files into a curriculum", version)]
struct Cli {
    /// Directory searched recursively for .yml/.yaml task files
    #[arg(long)]
    dir: PathBuf,

    /// Destination of the merged configuration
    #[arg(long)]
    temp_file: PathBuf,

    /// Shuffle task order before merging
    #[arg(long)]
    shuffle: bool,

    /// Random seed
    #[arg(long, default_value = "1234")]
    seed: u64,

    /// Split the curriculum into this many numbered files
    #[arg(long)]
    n_parts: Option<usize>,

    /// Sample files proportionally to task category
    #[arg(long)]
    stratify: bool,

    /// Number of files to sample when stratifying
    #[arg(long, default_value = "300")]
    num_files: usize,

    /// Write a CSV recording which files were selected
    #[arg(long)]
    curriculum_overview_path: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let all = discover(&cli.dir)
        .with_context(|| format!("Failed to search {}", cli.dir.display()))?;
    let mut selected = if cli.stratify {
        stratify(&all, cli.num_files, &mut rng)
    } else {
        all.clone()
    };
    info!(discovered = all.len(), selected = selected.len(), "task files found");

    if let Some(path) = &cli.curriculum_overview_path {
        write_manifest(path, &all, &selected).context("Failed to write curriculum overview")?;
    }

    if let Some(n_parts) = cli.n_parts {
        let parts = assemble_in_parts(&selected, &cli.temp_file, n_parts, cli.shuffle, &mut rng)
            .context("Failed to combine task files")?;
        let written = parts.iter().flatten().count();
        info!(parts = parts.len(), written, "curriculum written in parts");
        if written < parts.len() {
            bail!("{} of {} parts could not be written", parts.len() - written, parts.len());
        }
    } else {
        if cli.shuffle {
            selected.shuffle(&mut rng);
        }
        if assemble(&selected, &cli.temp_file).is_none() {
            bail!("no curriculum written to {}", cli.temp_file.display());
        }
    }

    Ok(())
}
