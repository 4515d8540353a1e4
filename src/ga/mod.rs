//! Genetic algorithm engine.
//!
//! [`Environment`] evolves a population of genomes drawn from a
//! [`SearchSpace`](crate::SearchSpace) toward one or more objectives. The
//! user supplies an [`Objective`] (any `Fn(&Params) -> Result<S, BoxError>`
//! whose `S` converts into a [`Score`]); the engine handles selection,
//! crossover, mutation, evaluation and ranking.
//!
//! # Key Types
//!
//! - [`EnvironmentConfig`]: population size, operators and rates
//! - [`OptimizeOptions`]: directions, weights, stopping criteria, concurrency
//! - [`OptimizationResult`]: best solution, per-generation log, final population
//! - [`Ranker`]: single- and weighted multi-objective ordering
//!
//! # Operators
//!
//! - [`Selection`]: rank-weighted roulette, tournament, consecutive ranking
//! - [`Crossover`]: one-, two-, three-point and uniform
//! - [`Mutation`]: single gene or a random subset of genes
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod crossover;
mod evaluation;
pub mod mutation;
mod population;
mod ranking;
mod result;
mod runner;
mod selection;
mod types;

pub use config::{Concurrency, EnvironmentConfig, OptimizeOptions, StoppingCriteria};
pub use crossover::Crossover;
pub use evaluation::evaluate_population;
pub use mutation::Mutation;
pub use population::{initialize_population, SeenGenomes, MAX_ATTEMPTS_PER_INDIVIDUAL};
pub use ranking::{normalize, Ranker};
pub use result::{GenerationRecord, OptimizationResult, RankedIndividual, ResultSink, StopReason};
pub use runner::Environment;
pub use selection::Selection;
pub use types::{Direction, Individual, Objective, Objectives, Score};
