//! Monte Carlo comparison of two layouts.
//!
//! A run seeds one RNG, draws `num_trials` random fetch requests and replays
//! each request against both layouts with a fresh picker. Both grids are
//! compiled once up front; rules are static so this matches compiling them
//! per trial.
//!
//! ```
//! use stockroom_logic::config::WarehouseConfig;
//! use stockroom_logic::simulation::Simulation;
//!
//! let sim = Simulation::new(WarehouseConfig::reference()).unwrap();
//! let first = sim.compare(200, 7).unwrap();
//! let second = sim.compare(200, 7).unwrap();
//! assert_eq!(first, second);
//! ```

use std::fmt;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{validate_config, ConfigError, RequestSampling, WarehouseConfig};
use crate::layout::Grid;
use crate::picker::{step, PickContext, PickerState};

/// Trials whose requests are held in memory at once by `compare_parallel`.
const PARALLEL_BATCH: u32 = 4096;

/// Errors that stop a run before any trial starts.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),
    #[error("number of trials must be positive")]
    NoTrials,
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Aggregated cost of one layout over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOutcome {
    pub name: String,
    pub total_trips: u64,
    pub avg_trips: f64,
    /// Mean per-request sum of routing scores; unstocked items add nothing.
    pub avg_route_score: f64,
}

/// Result of [`Simulation::compare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub num_trials: u32,
    pub seed: u64,
    pub layout_a: LayoutOutcome,
    pub layout_b: LayoutOutcome,
}

impl Comparison {
    /// Average trips of layout B minus layout A. Negative favours B.
    pub fn difference(&self) -> f64 {
        self.layout_b.avg_trips - self.layout_a.avg_trips
    }

    /// Average route score of layout B minus layout A.
    pub fn route_score_difference(&self) -> f64 {
        self.layout_b.avg_route_score - self.layout_a.avg_route_score
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in [&self.layout_a, &self.layout_b] {
            writeln!(
                f,
                "Average trips for {} layout: {:.2}",
                outcome.name, outcome.avg_trips
            )?;
        }
        Ok(())
    }
}

/// Per-trial cost of one layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct TrialCost {
    trips: u32,
    route_score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    trips: u64,
    route_score: f64,
}

impl Totals {
    fn add(mut self, cost: TrialCost) -> Self {
        self.trips += u64::from(cost.trips);
        self.route_score += cost.route_score;
        self
    }
}

#[derive(Debug, Clone)]
enum Sampler {
    Uniform,
    Weighted(WeightedIndex<u32>),
}

/// Validated configuration plus both compiled grids.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: WarehouseConfig,
    grid_a: Grid,
    grid_b: Grid,
    sampler: Sampler,
}

impl Simulation {
    /// Validate `config` and compile both layouts. Every configuration
    /// problem is reported at once.
    pub fn new(config: WarehouseConfig) -> Result<Self, SimError> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(SimError::InvalidConfig(errors));
        }

        let sampler = match config.sampling {
            RequestSampling::Uniform => Sampler::Uniform,
            RequestSampling::SalesWeighted => {
                let weights = config.categories.iter().map(|c| config.sales_weight(c));
                let index = WeightedIndex::new(weights)
                    .map_err(|_| SimError::InvalidConfig(vec![ConfigError::NoSamplingWeight]))?;
                Sampler::Weighted(index)
            }
        };

        let grid_a = Grid::compile(&config, &config.layout_a.rules);
        let grid_b = Grid::compile(&config, &config.layout_b.rules);
        log::debug!(
            "compiled layouts '{}' and '{}' ({}x{})",
            config.layout_a.name,
            config.layout_b.name,
            config.rows,
            config.cols
        );

        Ok(Self {
            config,
            grid_a,
            grid_b,
            sampler,
        })
    }

    /// Parse a JSON config and build a simulation from it.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Self::new(WarehouseConfig::from_json(json)?)
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    pub fn grid_a(&self) -> &Grid {
        &self.grid_a
    }

    pub fn grid_b(&self) -> &Grid {
        &self.grid_b
    }

    /// Draw one request of `request_length` categories, with replacement.
    pub fn generate_request<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let categories = &self.config.categories;
        (0..self.config.request_length)
            .map(|_| {
                let i = match &self.sampler {
                    Sampler::Uniform => rng.gen_range(0..categories.len()),
                    Sampler::Weighted(index) => index.sample(rng),
                };
                categories[i].clone()
            })
            .collect()
    }

    /// Run `num_trials` trials from `seed` on the calling thread.
    pub fn compare(&self, num_trials: u32, seed: u64) -> Result<Comparison, SimError> {
        if num_trials == 0 {
            return Err(SimError::NoTrials);
        }
        log::info!("comparing layouts over {} trials (seed {})", num_trials, seed);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut total_a = Totals::default();
        let mut total_b = Totals::default();
        for _ in 0..num_trials {
            let request = self.generate_request(&mut rng);
            let (a, b) = self.run_trial(&request);
            total_a = total_a.add(a);
            total_b = total_b.add(b);
        }

        Ok(self.summarize(num_trials, seed, total_a, total_b))
    }

    /// Same result as [`compare`](Self::compare), trials spread over rayon
    /// workers. Requests are still drawn in order from one RNG.
    pub fn compare_parallel(&self, num_trials: u32, seed: u64) -> Result<Comparison, SimError> {
        if num_trials == 0 {
            return Err(SimError::NoTrials);
        }
        log::info!(
            "comparing layouts over {} trials (seed {}, {} threads)",
            num_trials,
            seed,
            rayon::current_num_threads()
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut totals = (Totals::default(), Totals::default());
        let mut remaining = num_trials;
        while remaining > 0 {
            let batch = remaining.min(PARALLEL_BATCH);
            let requests: Vec<Vec<String>> = (0..batch)
                .map(|_| self.generate_request(&mut rng))
                .collect();
            let costs: Vec<(TrialCost, TrialCost)> =
                requests.par_iter().map(|r| self.run_trial(r)).collect();

            // fold in trial order so float sums match the sequential run
            totals = costs
                .into_iter()
                .fold(totals, |(ta, tb), (a, b)| (ta.add(a), tb.add(b)));
            remaining -= batch;
        }
        let (total_a, total_b) = totals;

        Ok(self.summarize(num_trials, seed, total_a, total_b))
    }

    fn run_trial(&self, request: &[String]) -> (TrialCost, TrialCost) {
        (
            self.trial_cost(&self.grid_a, request),
            self.trial_cost(&self.grid_b, request),
        )
    }

    /// Fresh, empty-handed picker per layout per trial.
    fn trial_cost(&self, grid: &Grid, request: &[String]) -> TrialCost {
        let ctx = PickContext::new(&self.config, grid);
        let mut route_score = 0.0;
        let (_, trips) = step(PickerState::default(), request, &ctx, |visit| {
            route_score += visit.score.unwrap_or(0.0);
        });
        TrialCost { trips, route_score }
    }

    fn summarize(&self, num_trials: u32, seed: u64, a: Totals, b: Totals) -> Comparison {
        let n = f64::from(num_trials);
        let outcome = |name: &str, t: Totals| LayoutOutcome {
            name: name.to_string(),
            total_trips: t.trips,
            avg_trips: t.trips as f64 / n,
            avg_route_score: t.route_score / n,
        };
        let comparison = Comparison {
            num_trials,
            seed,
            layout_a: outcome(&self.config.layout_a.name, a),
            layout_b: outcome(&self.config.layout_b.name, b),
        };
        log::info!(
            "avg trips {}={:.2} {}={:.2}",
            comparison.layout_a.name,
            comparison.layout_a.avg_trips,
            comparison.layout_b.name,
            comparison.layout_b.avg_trips
        );
        comparison
    }
}

/// Build a simulation from `config` and run [`Simulation::compare`].
pub fn compare(
    config: &WarehouseConfig,
    num_trials: u32,
    seed: u64,
) -> Result<Comparison, SimError> {
    Simulation::new(config.clone())?.compare(num_trials, seed)
}
