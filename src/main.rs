use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{LevelFilter, debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use antenna_graph::codec::{GridLayout, binary, text_grid};
use antenna_graph::graph::{AntennaView, Coord, Frequency, Registry, Traversal, frequency_intersections};
use antenna_graph::{Config, loader, report};

/// Query and convert antenna graphs.
///
/// INPUT is either a text grid or an `ANTG` binary file; binaries are
/// recognised by their magic bytes. Grids get their adjacency built on load.
#[derive(Debug, Parser)]
#[command(name = "antenna-graph", version)]
struct Cli {
    /// Configuration file (defaults to ./antenna-graph.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for query results.
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every antenna with its connections.
    List { input: PathBuf },
    /// Depth-first traversal from X Y.
    Dfs { input: PathBuf, x: i32, y: i32 },
    /// Breadth-first traversal from X Y.
    Bfs { input: PathBuf, x: i32, y: i32 },
    /// Every simple path between two antennas.
    Paths {
        input: PathBuf,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
    },
    /// Coordinates shared by antennas of two frequencies.
    Intersect { input: PathBuf, first: char, second: char },
    /// Save as an `ANTG` binary file.
    SaveBin { input: PathBuf, output: PathBuf },
    /// Save as a dense text grid.
    SaveGrid { input: PathBuf, output: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;

    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("antenna_graph"), config.level_filter())
        .parse_default_env()
        .init();
    debug!("Using configuration: {:?}", config);

    run(&cli, &config)
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let layout = GridLayout::from(config);

    match &cli.command {
        Command::List { input } => {
            let registry = load_input(input, config)?;
            print!("{}", report::render_listing(&registry));
        }
        Command::Dfs { input, x, y } => {
            let registry = load_input(input, config)?;
            let mut traversal = Traversal::new(&registry);
            let visited: Vec<AntennaView> = traversal.dfs(*x, *y)?.into_iter().map(AntennaView::from).collect();
            emit(cli.format, &visited, |v| format!("({}, {}) [{}]", v.x, v.y, v.frequency))?;
        }
        Command::Bfs { input, x, y } => {
            let registry = load_input(input, config)?;
            let mut traversal = Traversal::new(&registry);
            let visited: Vec<AntennaView> = traversal.bfs(*x, *y)?.map(AntennaView::from).collect();
            emit(cli.format, &visited, |v| format!("({}, {}) [{}]", v.x, v.y, v.frequency))?;
        }
        Command::Paths {
            input,
            from_x,
            from_y,
            to_x,
            to_y,
        } => {
            let registry = load_input(input, config)?;
            let mut traversal = Traversal::new(&registry);
            let paths = traversal.all_paths((*from_x, *from_y), (*to_x, *to_y))?;
            let paths: Vec<Vec<Coord>> = match config.max_paths {
                Some(limit) => paths.take(limit).collect(),
                None => paths.collect(),
            };
            if paths.is_empty() && cli.format == Format::Text {
                println!("no path between ({}, {}) and ({}, {})", from_x, from_y, to_x, to_y);
            }
            emit(cli.format, &paths, |path| {
                path.iter().map(Coord::to_string).collect::<Vec<_>>().join(" -> ")
            })?;
        }
        Command::Intersect { input, first, second } => {
            let registry = load_input(input, config)?;
            let hits = frequency_intersections(&registry, Frequency::try_from(*first)?, Frequency::try_from(*second)?);
            emit(cli.format, &hits, |c| format!("intersection at {}", c))?;
        }
        Command::SaveBin { input, output } => {
            let registry = load_input(input, config)?;
            binary::save(&registry, output)?;
        }
        Command::SaveGrid { input, output } => {
            let registry = load_input(input, config)?;
            text_grid::save(&registry, output, layout)?;
        }
    }
    Ok(())
}

/// Load a binary or grid file; grids get their adjacency built.
fn load_input(path: &Path, config: &Config) -> anyhow::Result<Registry> {
    let mut header = Vec::with_capacity(binary::MAGIC.len());
    File::open(path)
        .and_then(|file| file.take(binary::MAGIC.len() as u64).read_to_end(&mut header))
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    if binary::has_magic(&header) {
        return binary::load(path).with_context(|| format!("Invalid antenna graph file: {}", path.display()));
    }

    let mut registry =
        loader::load_grid_file(path, config.blank_cell).with_context(|| format!("Failed to import {}", path.display()))?;
    if registry.is_empty() {
        bail!("{} contains no antennas", path.display());
    }
    let summary = registry.build_adjacency();
    info!("{}: {} antennas, {}", path.display(), registry.count(), summary);
    Ok(registry)
}

fn emit<T: Serialize>(format: Format, items: &[T], line: impl Fn(&T) -> String) -> anyhow::Result<()> {
    match format {
        Format::Text => {
            for item in items {
                println!("{}", line(item));
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}
