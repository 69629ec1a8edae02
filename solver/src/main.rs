use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use switchback::graph::TrailGraph;
use switchback::solver::HikeSolver;
use switchback::{Board, Mode, Strategy};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Finds the longest hike across a trail map without stepping on any cell twice.", long_about = None)]
struct Cli {
    /// Trail map to read; standard input if absent
    trails: Option<PathBuf>,

    /// Treat slopes as ordinary ground instead of one-way ice
    #[clap(long)]
    dry: bool,

    /// Enumerate every hike instead of pruning with the spanning forest bound
    #[clap(long)]
    exhaustive: bool,

    /// Print the compacted trail graph in Graphviz dot format instead of solving
    #[clap(long)]
    dot: bool,

    /// Log search progress to stderr
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let text = match &cli.trails {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading standard input")?;
            text
        }
    };

    let board: Board = text.parse()?;
    let mode = if cli.dry { Mode::Dry } else { Mode::Slippery };
    let strategy = if cli.exhaustive { Strategy::Exhaustive } else { Strategy::BranchAndBound };
    let (width, height) = board.dims();
    debug!(width, height, %mode, %strategy, "parsed trail map");

    let graph = TrailGraph::compact(&board.trails(mode))?;
    if cli.dot {
        print!("{}", graph.to_dot());
        return Ok(());
    }

    match HikeSolver::new(&graph).longest_path(strategy) {
        Some(steps) => println!("{steps}"),
        None => {
            info!("finish is unreachable from start");
            println!("unreachable");
            std::process::exit(1);
        }
    }

    Ok(())
}
