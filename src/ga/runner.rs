//! The generation loop.
//!
//! [`Environment`] owns a validated search space and configuration and runs
//! the evolutionary process:
//! initialization → evaluation → ranking → (selection → breeding →
//! mutation → merge → evaluation → ranking)* → stop.

use super::config::{EnvironmentConfig, OptimizeOptions, StoppingCriteria};
use super::evaluation::evaluate_population;
use super::population::{initialize_population, SeenGenomes};
use super::ranking::Ranker;
use super::result::{GenerationRecord, OptimizationResult, RankedIndividual, ResultSink, StopReason};
use super::types::{Individual, Objective, Score};
use crate::error::{BoxError, GenetistError, Result};
use crate::space::{Params, SearchSpace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Steps of one run, reported at debug level when `verbose >= 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initializing,
    Evaluating,
    Ranking,
    Selecting,
    Breeding,
    Mutating,
    Merging,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initializing => "initializing population",
            Phase::Evaluating => "evaluating fitness",
            Phase::Ranking => "ranking population",
            Phase::Selecting => "selecting parents",
            Phase::Breeding => "breeding offspring",
            Phase::Mutating => "mutating offspring",
            Phase::Merging => "merging offspring with elite",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Log gate for the `verbose` level.
#[derive(Debug, Clone, Copy)]
struct Progress {
    verbose: u8,
}

impl Progress {
    fn phase(self, generation: usize, phase: Phase) {
        if self.verbose >= 2 {
            log::debug!("generation {generation}: {phase}");
        }
    }

    fn generation(self, record: &GenerationRecord) {
        if self.verbose >= 1 {
            log::info!(
                "generation {}: best score {} with {}",
                record.generation,
                record.best_score,
                record.best_params
            );
        }
    }

    fn stopped(self, reason: StopReason) {
        if self.verbose >= 1 {
            log::info!("stopping optimization: {reason}");
        }
    }
}

/// An evolutionary environment: a search space plus the operators and
/// rates used to explore it.
///
/// # Example
///
/// ```
/// use genetist::ga::{EnvironmentConfig, OptimizeOptions};
/// use genetist::{BoxError, Environment, Params, SearchSpace};
///
/// let space = SearchSpace::builder()
///     .int("x", -10, 10)
///     .int("y", -10, 10)
///     .build()
///     .unwrap();
/// let config = EnvironmentConfig::default()
///     .with_population_size(30)
///     .with_seed(7)
///     .with_verbose(0);
/// let env = Environment::new(space, config).unwrap();
///
/// let options = OptimizeOptions::minimize().with_max_generations(20);
/// let result = env
///     .optimize(
///         |p: &Params| -> Result<f64, BoxError> {
///             let (x, y) = (p.int("x")? as f64, p.int("y")? as f64);
///             Ok((x - 3.0).powi(2) + (y + 2.0).powi(2))
///         },
///         &options,
///     )
///     .unwrap();
///
/// assert_eq!(result.history.len(), 20);
/// assert!(result.best_score.as_single().unwrap() <= 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    space: Arc<SearchSpace>,
    config: EnvironmentConfig,
}

impl Environment {
    /// Creates an environment, validating the configuration against the
    /// search space.
    ///
    /// # Errors
    /// Configuration errors from [`EnvironmentConfig::validate`], and
    /// [`GenetistError::Crossover`] if the genome is too short for the
    /// configured crossover.
    pub fn new(space: SearchSpace, config: EnvironmentConfig) -> Result<Self> {
        config.validate()?;
        config.crossover.check_genome_len(space.len())?;
        Ok(Self {
            space: Arc::new(space),
            config,
        })
    }

    /// Creates an environment from a raw JSON parameter map (see
    /// [`SearchSpace::from_json`]).
    pub fn from_json(params: &serde_json::Value, config: EnvironmentConfig) -> Result<Self> {
        Self::new(SearchSpace::from_json(params)?, config)
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Runs the optimization with a closure objective and no result sink.
    pub fn optimize<F, S>(&self, objective: F, options: &OptimizeOptions) -> Result<OptimizationResult>
    where
        F: Fn(&Params) -> std::result::Result<S, BoxError> + Sync,
        S: Into<Score>,
    {
        self.optimize_with(&objective, options, &mut ())
    }

    /// Runs the optimization, streaming every generation record to `sink`.
    ///
    /// # Errors
    /// Any [`GenetistError`]; the run stops at the first one and no result
    /// is produced.
    pub fn optimize_with<O, K>(
        &self,
        objective: &O,
        options: &OptimizeOptions,
        sink: &mut K,
    ) -> Result<OptimizationResult>
    where
        O: Objective + ?Sized,
        K: ResultSink + ?Sized,
    {
        let start = Instant::now();
        options.validate()?;
        let ranker = Ranker::new(&options.objectives, options.weights.as_deref())?;

        let config = &self.config;
        let progress = Progress {
            verbose: config.verbose,
        };
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let size = config.population_size;
        let elite_count = config.elite_count();
        let pair_count = config.parent_pairs();
        let generation_cap = options.stopping.generation_cap();

        progress.phase(0, Phase::Initializing);
        let mut seen = SeenGenomes::new();
        let mut population = initialize_population(&self.space, size, &mut seen, &mut rng);

        progress.phase(0, Phase::Evaluating);
        evaluate_population(&mut population, objective, options.concurrency)?;
        progress.phase(0, Phase::Ranking);
        ranker.rank(&mut population)?;

        let mut history = Vec::new();
        let mut generation = 0;
        let (stop_reason, best) = loop {
            generation += 1;

            progress.phase(generation, Phase::Selecting);
            let pairs = config
                .selection
                .select_pairs(population.len(), pair_count, &mut rng)?;

            progress.phase(generation, Phase::Breeding);
            let mut offspring: Vec<Individual> = Vec::with_capacity(pairs.len() * 2);
            for (a, b) in pairs {
                let (child1, child2) = config.crossover.breed(&population[a], &population[b], &mut rng)?;
                offspring.push(child1);
                offspring.push(child2);
            }

            progress.phase(generation, Phase::Mutating);
            for child in &mut offspring {
                config.mutation.mutate(child, config.mutation_rate, &mut rng)?;
            }

            progress.phase(generation, Phase::Merging);
            offspring.truncate(size - elite_count);
            offspring.extend(population.drain(..elite_count).map(|mut elite| {
                elite.clear_fitness();
                elite
            }));
            population = offspring;

            progress.phase(generation, Phase::Evaluating);
            evaluate_population(&mut population, objective, options.concurrency)?;
            progress.phase(generation, Phase::Ranking);
            ranker.rank(&mut population)?;

            let best = population
                .first()
                .and_then(RankedIndividual::of)
                .ok_or_else(|| GenetistError::Ranking("population is empty".into()))?;
            let record = GenerationRecord {
                generation,
                best_score: best.score.clone(),
                best_params: best.params.clone(),
            };
            progress.generation(&record);
            sink.on_generation(&record);
            history.push(record);

            if let Some(reason) =
                check_stopping(&options.stopping, &ranker, &best.score, start, generation, generation_cap)
            {
                break (reason, best);
            }
        };
        progress.phase(generation, Phase::Stopped);
        progress.stopped(stop_reason);

        let result = OptimizationResult {
            best_score: best.score,
            best_params: best.params,
            elapsed: start.elapsed(),
            generations: generation,
            stop_reason,
            history,
            last_generation: population.iter().filter_map(RankedIndividual::of).collect(),
            objectives: options.objectives.clone(),
            weights: ranker.weights().to_vec(),
            score_names: options.score_names.clone(),
            ranker,
        };
        sink.on_finish(&result);
        Ok(result)
    }
}

/// First criterion that fires, in the order target, timeout, cap.
fn check_stopping(
    stopping: &StoppingCriteria,
    ranker: &Ranker,
    best: &Score,
    start: Instant,
    generation: usize,
    generation_cap: usize,
) -> Option<StopReason> {
    if let Some(target) = stopping.target_score {
        if ranker.target_reached(best, target) {
            return Some(StopReason::TargetScore);
        }
    }
    if let Some(timeout) = stopping.timeout {
        if start.elapsed() >= timeout {
            return Some(StopReason::Timeout);
        }
    }
    if generation >= generation_cap {
        return Some(StopReason::MaxGenerations);
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
