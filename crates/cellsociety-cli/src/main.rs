use anyhow::{Context, Result};
use cellsociety_core::config::{SimConfig, SimulationKind};
use cellsociety_core::grid::Grid;
use cellsociety_core::layout::Layout;
use cellsociety_core::rng::create_rng;
use cellsociety_core::CellType;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

const WARMUP_STEPS: usize = 10;
const BENCHMARK_STEPS: usize = 200;
const BENCHMARK_SIZES: [usize; 3] = [32, 64, 128];

#[derive(Parser)]
#[command(name = "cellsociety")]
#[command(about = "Cellular automaton engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation from a config file
    Run {
        /// Path to config file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Layout text file; a random layout is generated when omitted
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Width of a generated random layout
        #[arg(long, default_value_t = 20)]
        width: usize,

        /// Height of a generated random layout
        #[arg(long, default_value_t = 20)]
        height: usize,

        /// Output directory for results (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of ticks to run
        #[arg(long, default_value_t = 100)]
        steps: usize,

        /// Record counts every N ticks
        #[arg(long, default_value_t = 10)]
        sample_every: usize,
    },
    /// Time every rule family on random layouts
    Benchmark,
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn all_types(kind: SimulationKind) -> Vec<CellType> {
    (0..=kind.max_state()).collect()
}

fn load_layout(path: &Path) -> Result<Layout> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    Layout::parse(&text).with_context(|| format!("failed to parse layout {}", path.display()))
}

fn run_benchmark(kind: SimulationKind, size: usize) -> Result<()> {
    let config = SimConfig {
        kind,
        ..SimConfig::default()
    };
    let mut rng = create_rng(config.seed);
    let layout = Layout::random(size, size, &all_types(kind), &mut rng)?;
    let mut grid = Grid::new(&layout, config).context("failed to build benchmark grid")?;

    for _ in 0..WARMUP_STEPS {
        grid.advance()?;
    }

    let mut total_decide = 0u64;
    let mut total_commit = 0u64;
    let mut total_time = 0u64;
    for _ in 0..BENCHMARK_STEPS {
        let timings = grid.advance()?;
        total_decide += timings.decide_us;
        total_commit += timings.commit_us;
        total_time += timings.total_us;
    }

    let avg_step_us = total_time as f64 / BENCHMARK_STEPS as f64;
    let steps_per_sec = 1_000_000.0 / avg_step_us.max(1.0);
    println!("--- {kind:?} {size}x{size} ---");
    println!("  Avg step:      {avg_step_us:.0} us ({steps_per_sec:.1} steps/sec)");
    println!(
        "  Breakdown:     decide={:.0} us, commit={:.0} us",
        total_decide as f64 / BENCHMARK_STEPS as f64,
        total_commit as f64 / BENCHMARK_STEPS as f64,
    );
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Benchmark => {
            if cfg!(debug_assertions) {
                eprintln!("WARNING: running in debug mode. Results are not representative.");
                eprintln!("         Use: cargo run -p cellsociety-cli --release -- benchmark");
                eprintln!();
            }
            println!("Warmup: {WARMUP_STEPS} steps, Benchmark: {BENCHMARK_STEPS} steps");
            println!();
            // Random genes never form a loop, so Langton has nothing to time.
            for kind in SimulationKind::ALL
                .into_iter()
                .filter(|k| *k != SimulationKind::Langton)
            {
                for size in BENCHMARK_SIZES {
                    run_benchmark(kind, size)?;
                }
            }
        }
        Commands::Run {
            config,
            layout,
            width,
            height,
            out,
            steps,
            sample_every,
        } => {
            let file = File::open(&config).context("failed to open config file")?;
            let reader = BufReader::new(file);
            let sim_config: SimConfig =
                serde_json::from_reader(reader).context("failed to parse config")?;
            sim_config.validate().context("Config validation error")?;
            info!(path = %config.display(), kind = ?sim_config.kind, "loaded config");

            let layout = match layout {
                Some(path) => load_layout(&path)?,
                None => {
                    let mut rng = create_rng(sim_config.seed);
                    Layout::random(width, height, &all_types(sim_config.kind), &mut rng)?
                }
            };
            println!(
                "Simulating {:?} on {}x{} for {steps} steps...",
                sim_config.kind, layout.width, layout.height
            );

            let mut grid = Grid::new(&layout, sim_config).context("failed to build grid")?;
            let summary = grid
                .try_run_experiment(steps, sample_every)
                .context("simulation failed")?;

            if let Some(out_dir) = out {
                std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
                let summary_path = out_dir.join("summary.json");
                let file = File::create(summary_path).context("failed to create summary file")?;
                serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
                std::fs::write(
                    out_dir.join("final_layout.txt"),
                    Layout::from_grid(&grid).render(),
                )
                .context("failed to write final layout")?;
                println!("Run complete. Results saved to {:?}", out_dir);
            } else {
                println!("Run complete. Final counts: {:?}", summary.final_counts);
            }
        }
    }
    Ok(())
}
