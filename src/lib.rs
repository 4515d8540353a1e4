//! Evolutionary hyper-parameter optimization.
//!
//! Declare a search space, hand the engine a scoring function, and let a
//! genetic algorithm evolve parameter assignments toward one or more
//! objectives:
//!
//! - **Search space** ([`space`]): fixed value lists or typed int / float /
//!   categorical ranges, built in code or inferred from a JSON map.
//! - **Engine** ([`ga`]): rank-weighted, tournament or ranking selection;
//!   one-, two-, three-point or uniform crossover; single- or multi-gene
//!   mutation; elitism; optional parallel fitness evaluation.
//! - **Ranking**: single objective by raw score, multiple objectives by a
//!   weighted sum of min-max normalized scores.
//! - **Stopping**: generation cap, wall-clock timeout, target score.
//!
//! # Example
//!
//! ```
//! use genetist::ga::{EnvironmentConfig, OptimizeOptions};
//! use genetist::{BoxError, Environment, Params, SearchSpace};
//!
//! let space = SearchSpace::builder()
//!     .float("learning_rate", 0.001, 0.3)
//!     .int("depth", 2, 12)
//!     .categorical("booster", ["gbtree", "dart"])
//!     .build()
//!     .unwrap();
//! let env = Environment::new(space, EnvironmentConfig::default().with_seed(1).with_verbose(0)).unwrap();
//!
//! let objective = |p: &Params| -> Result<f64, BoxError> {
//!     let lr = p.float("learning_rate")?;
//!     let depth = p.int("depth")? as f64;
//!     let bonus = if p.str("booster")? == "dart" { 0.1 } else { 0.0 };
//!     Ok(-(lr - 0.1).abs() - (depth - 6.0).abs() / 10.0 + bonus)
//! };
//! let result = env
//!     .optimize(objective, &OptimizeOptions::maximize().with_max_generations(10))
//!     .unwrap();
//! assert_eq!(result.generations, 10);
//! ```

mod error;
pub mod ga;
pub mod space;

pub use error::{BoxError, GenetistError, ParamLookupError, Result};
pub use ga::{Environment, EnvironmentConfig, OptimizationResult, OptimizeOptions};
pub use space::{ParamKey, ParamSpec, Params, SearchSpace, SearchSpaceKind, Value};
