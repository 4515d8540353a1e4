//! Error types.
//!
//! Every failure surfaced by an optimization run is a [`GenetistError`].
//! All variants are fatal to the `optimize` call that produced them; the
//! engine never retries internally.

/// Boxed error returned by user objective functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used across the crate.
pub type Result<T, E = GenetistError> = std::result::Result<T, E>;

/// Errors raised while building a search space or running the optimizer.
#[derive(Debug, thiserror::Error)]
pub enum GenetistError {
    /// Malformed, ambiguous, or mixed-style parameter specification.
    #[error("invalid search space: {0}")]
    SearchSpace(String),

    /// Genome too short for the requested cut points, or mismatched parents.
    #[error("crossover failed: {0}")]
    Crossover(String),

    /// Unknown mutation type or a genome that does not match its search space.
    #[error("mutation failed: {0}")]
    Mutation(String),

    /// Unknown or unusable selection strategy.
    #[error("selection failed: {0}")]
    Selection(String),

    /// Direction / weights / score-name length mismatches, unknown direction.
    #[error("ranking failed: {0}")]
    Ranking(String),

    /// Invalid run configuration (no stopping criterion, bad rates, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The user objective function returned an error.
    #[error("objective function failed: {0}")]
    Objective(#[source] BoxError),
}

/// Error returned by the typed accessors on [`Params`](crate::Params).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamLookupError {
    #[error("parameter `{0}` not found")]
    Missing(String),
    #[error("parameter `{key}` is {found}, expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}
