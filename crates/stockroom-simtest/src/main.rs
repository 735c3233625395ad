//! Stockroom Headless Comparison Harness
//!
//! Compares the two configured layouts with a seeded Monte Carlo run, or
//! sweeps the pure logic with a set of self-checks. Runs entirely
//! in-process: no rendering, no persistence.
//!
//! Usage:
//!   cargo run -p stockroom-simtest -- compare --trials 10000 --seed 42
//!   cargo run -p stockroom-simtest -- compare --config data/warehouse.json --json
//!   cargo run -p stockroom-simtest -- check --verbose

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stockroom_logic::config::{validate_config, Gender, WarehouseConfig};
use stockroom_logic::constants::{categories, picking};
use stockroom_logic::layout::Coord;
use stockroom_logic::picker::{trips_for, PickContext, Picker};
use stockroom_logic::routing::{locate, score, DEFAULT_BAY};
use stockroom_logic::simulation::{SimError, Simulation};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stockroom-simtest")]
#[command(about = "Compare footwear warehouse layouts by picker trips")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Monte Carlo comparison and print both averages
    Compare {
        /// Number of randomized trials
        #[arg(short, long, default_value_t = picking::DEFAULT_TRIALS)]
        trials: u32,

        /// RNG seed
        #[arg(short, long, default_value_t = picking::DEFAULT_SEED)]
        seed: u64,

        /// JSON warehouse config (defaults to the reference warehouse)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Evaluate trials on all cores
        #[arg(short, long)]
        parallel: bool,

        /// Print the full comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sweep the layout, routing and picker logic with self-checks
    Check {
        /// Print passing checks too
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Compare {
        trials: picking::DEFAULT_TRIALS,
        seed: picking::DEFAULT_SEED,
        config: None,
        parallel: false,
        json: false,
    }) {
        Commands::Compare {
            trials,
            seed,
            config,
            parallel,
            json,
        } => run_compare(trials, seed, config, parallel, json),
        Commands::Check { verbose } => run_check(verbose),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<WarehouseConfig> {
    let Some(path) = path else {
        return Ok(WarehouseConfig::reference());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = WarehouseConfig::from_json(&text)
        .map_err(SimError::from)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

fn run_compare(
    trials: u32,
    seed: u64,
    config: Option<PathBuf>,
    parallel: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let sim = Simulation::new(config)?;
    let comparison = if parallel {
        sim.compare_parallel(trials, seed)?
    } else {
        sim.compare(trials, seed)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print!("{}", comparison);
        println!(
            "Average route score: {} {:.2}, {} {:.2}",
            comparison.layout_a.name,
            comparison.layout_a.avg_route_score,
            comparison.layout_b.name,
            comparison.layout_b.avg_route_score
        );
    }
    Ok(())
}

// ── Self-check harness ──────────────────────────────────────────────────

struct CheckResult {
    name: String,
    passed: bool,
    detail: String,
}

fn run_check(verbose: bool) -> Result<()> {
    println!("=== Stockroom Logic Checks ===\n");

    let config = WarehouseConfig::reference();
    let sim = Simulation::new(config.clone())?;

    let mut results = Vec::new();
    results.extend(check_config(&config));
    results.extend(check_grids(&sim));
    results.extend(check_routing(&sim));
    results.extend(check_picker(&sim));
    results.extend(check_comparison(&sim));

    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn check_config(config: &WarehouseConfig) -> Vec<CheckResult> {
    println!("--- Config ---");
    let errors = validate_config(config);
    let mut broken = config.clone();
    broken.rows = 0;
    broken.categories.clear();
    let broken_errors = validate_config(&broken);

    vec![
        CheckResult {
            name: "reference_config_valid".into(),
            passed: errors.is_empty(),
            detail: format!("{} errors", errors.len()),
        },
        CheckResult {
            name: "broken_config_rejected".into(),
            passed: broken_errors.len() >= 2,
            detail: format!("{} errors reported", broken_errors.len()),
        },
    ]
}

// ── 2. Grids ────────────────────────────────────────────────────────────

fn check_grids(sim: &Simulation) -> Vec<CheckResult> {
    println!("--- Grids ---");
    let mut results = Vec::new();
    let config = sim.config();
    let expected = config.rows * config.cols;

    for (layout, grid) in [(&config.layout_a, sim.grid_a()), (&config.layout_b, sim.grid_b())] {
        let mut ids: Vec<u32> = grid.iter().map(|(_, b)| b.id).collect();
        ids.sort_unstable();
        let contiguous = ids.iter().copied().eq(1..=expected as u32);
        results.push(CheckResult {
            name: format!("{}_ids_contiguous", layout.name),
            passed: contiguous && ids.len() == expected,
            detail: format!("{} bays", ids.len()),
        });

        let rows = grid.category_rows();
        results.push(CheckResult {
            name: format!("{}_zone_rows", layout.name),
            passed: rows.values().sum::<usize>() == config.rows,
            detail: rows
                .iter()
                .map(|(c, n)| format!("{c}={n}"))
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    let front = sim.grid_a().bay(Coord::new(0, 0));
    results.push(CheckResult {
        name: "current_front_rows_uncategorized".into(),
        passed: front.is_some_and(|b| {
            b.category == categories::UNCATEGORIZED && b.gender == Gender::Unspecified
        }),
        detail: front
            .map(|b| format!("row 0 is {} / {}", b.category, b.gender))
            .unwrap_or_else(|| "no bay at (0, 0)".into()),
    });

    let shadowed = sim.grid_b().iter().all(|(_, b)| b.gender == Gender::Men);
    results.push(CheckResult {
        name: "alternate_women_rules_shadowed".into(),
        passed: shadowed,
        detail: "first match wins on overlapping ranges".into(),
    });

    results
}

// ── 3. Routing ──────────────────────────────────────────────────────────

fn check_routing(sim: &Simulation) -> Vec<CheckResult> {
    println!("--- Routing ---");
    let config = sim.config();
    let entries = &config.entry_points;
    let penalties = &config.penalties;

    let entry_zero = score(Coord::new(3, 1), false, 0, Coord::new(0, 0), penalties);
    let floor = score(Coord::new(3, 2), false, 1, entries[entries.len() - 1], penalties);
    let ladder = score(Coord::new(3, 2), true, 1, entries[entries.len() - 1], penalties);
    let unknown = locate(sim.grid_a(), "Sandals", entries, penalties);
    let mid = locate(sim.grid_b(), categories::MID_HIKERS, entries, penalties);

    vec![
        CheckResult {
            name: "entry_zero_penalty".into(),
            passed: (entry_zero - 4.6).abs() < 1e-9,
            detail: format!("d=4 scores {entry_zero:.2}"),
        },
        CheckResult {
            name: "ladder_penalty".into(),
            passed: ladder > floor,
            detail: format!("{floor:.2} → {ladder:.2}"),
        },
        CheckResult {
            name: "unknown_category_default_bay".into(),
            passed: unknown == DEFAULT_BAY,
            detail: format!("Sandals → ({}, {})", unknown.row, unknown.col),
        },
        CheckResult {
            name: "alternate_mid_hikers_at_back".into(),
            passed: mid == Coord::new(config.rows - 1, 0),
            detail: format!("MidHikers → ({}, {})", mid.row, mid.col),
        },
    ]
}

// ── 4. Picker ───────────────────────────────────────────────────────────

fn check_picker(sim: &Simulation) -> Vec<CheckResult> {
    println!("--- Picker ---");
    let ctx = PickContext::new(sim.config(), sim.grid_a());
    let four = trips_for(&["A"; 4], &ctx);
    let five = trips_for(&["A"; 5], &ctx);
    let none = trips_for::<&str>(&[], &ctx);

    let mut picker = Picker::new(sim.config(), sim.grid_b());
    let trips = picker.fetch(&[categories::LIFESTYLE, categories::MID_HIKERS]);

    vec![
        CheckResult {
            name: "capacity_exact_one_trip".into(),
            passed: four == 1,
            detail: format!("4 items → {four} trips"),
        },
        CheckResult {
            name: "capacity_overflow_two_trips".into(),
            passed: five == 2,
            detail: format!("5 items → {five} trips"),
        },
        CheckResult {
            name: "empty_request_no_trips".into(),
            passed: none == 0,
            detail: format!("0 items → {none} trips"),
        },
        CheckResult {
            name: "picker_path_logged".into(),
            passed: trips == 1 && picker.path().len() == 2 && picker.load_len() == 0,
            detail: format!("{} stops, ends at {:?}", picker.path().len(), picker.position()),
        },
    ]
}

// ── 5. Comparison ───────────────────────────────────────────────────────

fn check_comparison(sim: &Simulation) -> Vec<CheckResult> {
    println!("--- Comparison ---");
    let mut results = Vec::new();

    match (sim.compare(1000, 42), sim.compare(1000, 42)) {
        (Ok(a), Ok(b)) => results.push(CheckResult {
            name: "seeded_run_reproducible".into(),
            passed: a == b,
            detail: format!(
                "{} {:.2} / {} {:.2}",
                a.layout_a.name, a.layout_a.avg_trips, a.layout_b.name, a.layout_b.avg_trips
            ),
        }),
        (Err(e), _) | (_, Err(e)) => results.push(CheckResult {
            name: "seeded_run_reproducible".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    let parallel_matches = match (sim.compare(500, 7), sim.compare_parallel(500, 7)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    results.push(CheckResult {
        name: "parallel_matches_sequential".into(),
        passed: parallel_matches,
        detail: "500 trials, seed 7".into(),
    });

    results.push(CheckResult {
        name: "zero_trials_rejected".into(),
        passed: matches!(sim.compare(0, 42), Err(SimError::NoTrials)),
        detail: "compare(0, _) fails fast".into(),
    });

    results
}
