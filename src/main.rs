#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use conv_life::io::{self, seed};
use conv_life::{
    Automata, AutomataConfig, BackendKind, Board, Boundary, NeighborhoodMask, Rule, Strategy,
    presets,
};
use tracing::info;

/// Run a binary cellular automaton and report its throughput.
#[derive(Debug, Parser)]
#[command(name = "conv-life", version)]
struct Args {
    /// Board side length.
    #[arg(long, default_value_t = 1024)]
    size: usize,

    /// Named automaton (conway, life34, amoeba, anneal, highlife, day-and-night, bugs).
    #[arg(long, conflicts_with = "rule")]
    preset: Option<String>,

    /// B/S rulestring over the 3x3 Moore neighborhood, e.g. B36/S23.
    #[arg(long)]
    rule: Option<String>,

    /// Initial state: `random`, `square`, or a path to a saved board.
    #[arg(long, default_value = "random")]
    init: String,

    /// Alive probability for `--init random`.
    #[arg(long, default_value_t = 0.5)]
    density: f64,

    #[arg(long, default_value_t = 123)]
    seed: u64,

    #[arg(long, default_value_t = 1000)]
    iterations: u64,

    /// toroidal or fixed.
    #[arg(long, default_value = "toroidal")]
    boundary: Boundary,

    /// spectral or spatial.
    #[arg(long, default_value = "spectral")]
    strategy: Strategy,

    /// serial or rayon.
    #[arg(long, env = "CONV_LIFE_BACKEND", default_value = "serial")]
    backend: BackendKind,

    /// Threads for the rayon backend (default: physical cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Write the final board (`.life`/`.lif` for Life 1.06, otherwise JSON).
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the final board.
    #[arg(long)]
    show: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn initial_board(args: &Args) -> Result<Board> {
    let board = match args.init.as_str() {
        "random" => seed::random(args.size, args.density, args.seed)?,
        "square" => seed::square(args.size, 2)?,
        path => io::load_board(path, args.size)
            .with_context(|| format!("failed to load initial board from {path}"))?,
    };
    Ok(board)
}

fn configuration(args: &Args) -> Result<(NeighborhoodMask, Rule)> {
    match (&args.preset, &args.rule) {
        (Some(name), _) => {
            let preset = presets::preset(name).with_context(|| {
                let known: Vec<_> = presets::names().collect();
                format!("known presets: {}", known.join(", "))
            })?;
            Ok((preset.mask, preset.rule))
        }
        (None, Some(rule)) => Ok((NeighborhoodMask::moore(1), rule.parse()?)),
        (None, None) => Ok((NeighborhoodMask::moore(1), Rule::conway())),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    if args.size == 0 {
        bail!("--size must be at least 1");
    }

    let board = initial_board(&args)?;
    let (mask, rule) = configuration(&args)?;
    let mut config = AutomataConfig::default()
        .strategy(args.strategy)
        .boundary(args.boundary)
        .backend(args.backend);
    if let Some(n) = args.threads {
        config = config.thread_count(n);
    }

    info!(
        size = board.size(),
        population = board.population(),
        rule = %rule,
        "starting"
    );
    let mut automata = Automata::new(board, mask, rule, config)?;
    let report = automata.run(args.iterations);
    println!("{report}");

    if args.show {
        print!("{}", automata.board());
    }
    if let Some(path) = &args.save {
        io::save_board(automata.board(), path)
            .with_context(|| format!("failed to save board to {}", path.display()))?;
        info!(path = %path.display(), "saved final board");
    }
    Ok(())
}
