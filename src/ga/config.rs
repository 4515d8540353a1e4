//! GA configuration.
//!
//! [`EnvironmentConfig`] holds the parameters fixed for the lifetime of an
//! [`Environment`](super::Environment): population size, operators and
//! rates. [`OptimizeOptions`] holds the per-run parameters: directions,
//! weights, stopping criteria and evaluation concurrency.

use super::crossover::Crossover;
use super::mutation::Mutation;
use super::selection::Selection;
use super::types::{Direction, Objectives};
use crate::error::{GenetistError, Result};
use std::time::Duration;

/// Slack applied before rounding rate products up, so that e.g.
/// `10 * 0.7 = 7.000000000000001` counts as 7.
const CEIL_EPSILON: f64 = 1e-9;

fn ceil_count(x: f64) -> usize {
    (x - CEIL_EPSILON).ceil().max(0.0) as usize
}

/// Configuration of the evolutionary environment.
///
/// # Defaults
///
/// ```
/// use genetist::ga::{Crossover, EnvironmentConfig, Mutation, Selection};
///
/// let config = EnvironmentConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.crossover, Crossover::OnePoint);
/// assert_eq!(config.mutation, Mutation::SingleGene);
/// assert_eq!(config.selection, Selection::Roulette);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use genetist::ga::{Crossover, EnvironmentConfig, Selection};
///
/// let config = EnvironmentConfig::default()
///     .with_population_size(50)
///     .with_crossover(Crossover::Uniform)
///     .with_selection(Selection::Tournament(5))
///     .with_mutation_rate(0.25)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentConfig {
    /// Number of individuals in every generation.
    pub population_size: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Crossover operator.
    pub crossover: Crossover,

    /// Mutation operator.
    pub mutation: Mutation,

    /// Probability that an offspring is mutated at all (0.0–1.0).
    pub mutation_rate: f64,

    /// Fraction of the population carried unchanged to the next
    /// generation (0.0–1.0), rounded up.
    pub elite_rate: f64,

    /// Random seed for reproducibility. `None` draws a random seed.
    pub seed: Option<u64>,

    /// Diagnostic level: 0 silent, 1 one line per generation, 2 phase
    /// tracing. Has no effect on the search.
    pub verbose: u8,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            selection: Selection::default(),
            crossover: Crossover::default(),
            mutation: Mutation::default(),
            mutation_rate: 0.1,
            elite_rate: 0.1,
            seed: None,
            verbose: 1,
        }
    }
}

impl EnvironmentConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite rate.
    pub fn with_elite_rate(mut self, rate: f64) -> Self {
        self.elite_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the diagnostic level.
    pub fn with_verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Number of elite individuals: `ceil(population_size * elite_rate)`.
    pub fn elite_count(&self) -> usize {
        ceil_count(self.population_size as f64 * self.elite_rate).min(self.population_size)
    }

    /// Number of parent pairs bred per generation.
    ///
    /// `ceil(population_size * (1 - elite_rate)) / 2`, raised when needed so
    /// that elite plus offspring cover the whole population. Surplus
    /// children are dropped by the runner.
    pub fn parent_pairs(&self) -> usize {
        let formula = ceil_count(self.population_size as f64 * (1.0 - self.elite_rate)) / 2;
        let needed = self.population_size - self.elite_count();
        formula.max(needed.div_ceil(2))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(GenetistError::Configuration(
                "population_size must be at least 2".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GenetistError::Configuration(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.elite_rate) {
            return Err(GenetistError::Configuration(format!(
                "elite_rate must be in [0, 1], got {}",
                self.elite_rate
            )));
        }
        self.selection.validate()
    }
}

/// How many workers evaluate fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Concurrency {
    /// Evaluate in population order on the calling thread.
    #[default]
    Sequential,
    /// A pool of exactly this many worker threads.
    Threads(usize),
    /// One worker per available core.
    AllCores,
}

impl Concurrency {
    /// Maps a job count to a concurrency level: `1` is sequential, `-1` is
    /// all cores, `n > 1` is a pool of `n` threads.
    pub fn from_jobs(jobs: i64) -> Result<Self> {
        match jobs {
            1 => Ok(Concurrency::Sequential),
            -1 => Ok(Concurrency::AllCores),
            n if n > 1 => Ok(Concurrency::Threads(n as usize)),
            n => Err(GenetistError::Configuration(format!(
                "concurrency must be -1 or a positive job count, got {n}"
            ))),
        }
    }

    /// Resolved number of worker threads.
    pub fn workers(self) -> usize {
        match self {
            Concurrency::Sequential => 1,
            Concurrency::Threads(n) => n.max(1),
            Concurrency::AllCores => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Stopping criteria of a run. At least one must be set; any one firing
/// ends the run at the next generation boundary.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoppingCriteria {
    /// Stop once this many generations have been recorded.
    pub max_generations: Option<usize>,
    /// Stop once this much wall-clock time has elapsed since the run began.
    pub timeout: Option<Duration>,
    /// Stop once the best score reaches this value in the run's direction.
    pub target_score: Option<f64>,
}

impl StoppingCriteria {
    /// Generation cap, effectively unbounded when only other criteria are set.
    pub fn generation_cap(&self) -> usize {
        self.max_generations.unwrap_or(usize::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_generations.is_none() && self.timeout.is_none() && self.target_score.is_none()
        {
            return Err(GenetistError::Configuration(
                "no stopping criterion: set max_generations, timeout or target_score".into(),
            ));
        }
        if self.max_generations == Some(0) {
            return Err(GenetistError::Configuration(
                "max_generations must be at least 1".into(),
            ));
        }
        if let Some(target) = self.target_score {
            if target.is_nan() {
                return Err(GenetistError::Configuration(
                    "target_score must not be NaN".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Per-run options of [`Environment::optimize`](super::Environment::optimize).
///
/// ```
/// use genetist::ga::{Concurrency, Direction, OptimizeOptions};
///
/// let options = OptimizeOptions::new(Direction::Minimize)
///     .with_max_generations(50)
///     .with_target_score(0.0)
///     .with_concurrency(Concurrency::AllCores);
/// assert!(options.validate().is_ok());
///
/// let multi = OptimizeOptions::new([Direction::Minimize, Direction::Maximize])
///     .with_weights([0.5, 0.5])
///     .with_score_names(["error", "accuracy"])
///     .with_timeout_secs(10.0);
/// assert!(multi.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizeOptions {
    /// Direction(s) of the objective(s).
    pub objectives: Objectives,
    /// Weight per objective (multi-objective only). Defaults to `1/k` each.
    pub weights: Option<Vec<f64>>,
    /// Labels for the score columns, kept on the result for renderers.
    pub score_names: Option<Vec<String>>,
    pub stopping: StoppingCriteria,
    pub concurrency: Concurrency,
}

impl OptimizeOptions {
    pub fn new(objectives: impl Into<Objectives>) -> Self {
        Self {
            objectives: objectives.into(),
            weights: None,
            score_names: None,
            stopping: StoppingCriteria::default(),
            concurrency: Concurrency::default(),
        }
    }

    /// Single-objective minimization.
    pub fn minimize() -> Self {
        Self::new(Direction::Minimize)
    }

    /// Single-objective maximization.
    pub fn maximize() -> Self {
        Self::new(Direction::Maximize)
    }

    pub fn with_weights(mut self, weights: impl IntoIterator<Item = f64>) -> Self {
        self.weights = Some(weights.into_iter().collect());
        self
    }

    pub fn with_score_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.score_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.stopping.max_generations = Some(n);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.stopping.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in (fractional) seconds. Negative values and NaN
    /// clamp to 0; values too large for a `Duration` clamp to `Duration::MAX`.
    pub fn with_timeout_secs(self, secs: f64) -> Self {
        let timeout = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);
        self.with_timeout(timeout)
    }

    pub fn with_target_score(mut self, target: f64) -> Self {
        self.stopping.target_score = Some(target);
        self
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Validates the options before a run starts.
    pub fn validate(&self) -> Result<()> {
        self.stopping.validate()?;

        let k = self.objectives.len();
        if k == 0 {
            return Err(GenetistError::Ranking(
                "at least one direction is required".into(),
            ));
        }
        if let Some(weights) = &self.weights {
            if self.objectives.is_multi() && weights.len() != k {
                return Err(GenetistError::Ranking(format!(
                    "direction length ({k}) does not match weights length ({})",
                    weights.len()
                )));
            }
            if weights.iter().any(|w| !w.is_finite()) {
                return Err(GenetistError::Ranking("weights must be finite".into()));
            }
        }
        if let Some(names) = &self.score_names {
            if names.len() != k {
                return Err(GenetistError::Ranking(format!(
                    "score_names length ({}) does not match the number of objectives ({k})",
                    names.len()
                )));
            }
        }
        if self.objectives.is_multi() && self.stopping.target_score.is_some() {
            return Err(GenetistError::Configuration(
                "target_score is only defined for single-objective runs".into(),
            ));
        }
        if let Concurrency::Threads(0) = self.concurrency {
            return Err(GenetistError::Configuration(
                "concurrency must use at least one thread".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.selection, Selection::Roulette);
        assert_eq!(config.crossover, Crossover::OnePoint);
        assert_eq!(config.mutation, Mutation::SingleGene);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert!((config.elite_rate - 0.1).abs() < 1e-10);
        assert!(config.seed.is_none());
        assert_eq!(config.verbose, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EnvironmentConfig::default()
            .with_population_size(30)
            .with_selection(Selection::Ranking)
            .with_crossover(Crossover::ThreePoint)
            .with_mutation(Mutation::MultipleGenes)
            .with_mutation_rate(0.5)
            .with_elite_rate(0.2)
            .with_seed(7)
            .with_verbose(0);

        assert_eq!(config.population_size, 30);
        assert_eq!(config.selection, Selection::Ranking);
        assert_eq!(config.crossover, Crossover::ThreePoint);
        assert_eq!(config.mutation, Mutation::MultipleGenes);
        assert!((config.mutation_rate - 0.5).abs() < 1e-10);
        assert!((config.elite_rate - 0.2).abs() < 1e-10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.verbose, 0);
    }

    #[test]
    fn test_clamp_rates() {
        let config = EnvironmentConfig::default()
            .with_mutation_rate(2.0)
            .with_elite_rate(-0.5);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
        assert!(config.elite_rate.abs() < 1e-10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EnvironmentConfig::default().with_population_size(1);
        assert!(config.validate().is_err());

        config = EnvironmentConfig::default();
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());

        config = EnvironmentConfig::default();
        config.elite_rate = f64::NAN;
        assert!(config.validate().is_err());

        config = EnvironmentConfig::default().with_selection(Selection::Tournament(1));
        assert!(matches!(config.validate(), Err(GenetistError::Selection(_))));
    }

    #[test]
    fn test_elite_and_pair_counts() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.elite_count(), 10);
        assert_eq!(config.parent_pairs(), 45);

        let config = EnvironmentConfig::default()
            .with_population_size(10)
            .with_elite_rate(0.7);
        assert_eq!(config.elite_count(), 7);
    }

    #[test]
    fn test_pairs_always_fill_population() {
        for n in 2..60 {
            for rate in [0.0, 0.05, 0.1, 0.25, 0.33, 0.5, 0.9, 1.0] {
                let config = EnvironmentConfig::default()
                    .with_population_size(n)
                    .with_elite_rate(rate);
                let total = config.elite_count() + 2 * config.parent_pairs();
                assert!(total >= n, "n={n} rate={rate} total={total}");
                assert!(total <= n + 2, "n={n} rate={rate} total={total}");
            }
        }
    }

    #[test]
    fn test_concurrency_from_jobs() {
        assert_eq!(Concurrency::from_jobs(1).unwrap(), Concurrency::Sequential);
        assert_eq!(Concurrency::from_jobs(-1).unwrap(), Concurrency::AllCores);
        assert_eq!(Concurrency::from_jobs(4).unwrap(), Concurrency::Threads(4));
        assert!(Concurrency::from_jobs(0).is_err());
        assert!(Concurrency::from_jobs(-3).is_err());
        assert!(Concurrency::AllCores.workers() >= 1);
    }

    #[test]
    fn test_stopping_criteria_required() {
        let options = OptimizeOptions::minimize();
        assert!(matches!(
            options.validate(),
            Err(GenetistError::Configuration(_))
        ));
        assert!(OptimizeOptions::minimize().with_timeout_secs(1.0).validate().is_ok());
        assert!(OptimizeOptions::minimize().with_target_score(0.0).validate().is_ok());
        assert!(OptimizeOptions::minimize().with_max_generations(0).validate().is_err());
    }

    #[test]
    fn test_timeout_secs_clamps() {
        let timeout = |secs: f64| OptimizeOptions::minimize().with_timeout_secs(secs).stopping.timeout;
        assert_eq!(timeout(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(timeout(-3.0), Some(Duration::ZERO));
        assert_eq!(timeout(f64::NAN), Some(Duration::ZERO));
        assert_eq!(timeout(f64::INFINITY), Some(Duration::MAX));
        assert_eq!(timeout(1e30), Some(Duration::MAX));
    }

    #[test]
    fn test_generation_cap() {
        let stopping = StoppingCriteria {
            timeout: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        assert_eq!(stopping.generation_cap(), usize::MAX);
    }

    #[test]
    fn test_multi_objective_option_checks() {
        let base = OptimizeOptions::new([Direction::Minimize, Direction::Maximize])
            .with_max_generations(3);
        assert!(base.clone().validate().is_ok());
        assert!(matches!(
            base.clone().with_weights([1.0]).validate(),
            Err(GenetistError::Ranking(_))
        ));
        assert!(matches!(
            base.clone().with_score_names(["a"]).validate(),
            Err(GenetistError::Ranking(_))
        ));
        assert!(matches!(
            base.with_target_score(1.0).validate(),
            Err(GenetistError::Configuration(_))
        ));
    }
}
