//! Run output: the per-generation log, the final result, and the sink
//! interface through which renderers receive them.

use super::ranking::Ranker;
use super::types::{Individual, Objectives, Score};
use crate::error::Result;
use crate::space::Params;
use std::fmt;
use std::time::Duration;

/// Best individual of one completed generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationRecord {
    /// Generation number, starting at 1.
    pub generation: usize,
    pub best_score: Score,
    pub best_params: Params,
}

/// One member of a ranked population snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedIndividual {
    pub params: Params,
    pub score: Score,
}

impl RankedIndividual {
    /// Snapshot of an evaluated individual; `None` if it has no fitness.
    pub fn of(individual: &Individual) -> Option<Self> {
        individual.fitness().map(|score| Self {
            params: individual.params(),
            score: score.clone(),
        })
    }
}

/// Why a run stopped. When several criteria fire at the same generation
/// boundary the first of `TargetScore`, `Timeout`, `MaxGenerations` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The generation cap was reached.
    MaxGenerations,
    /// The wall-clock budget ran out.
    Timeout,
    /// The best score reached the target.
    TargetScore,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::MaxGenerations => f.write_str("max generations reached"),
            StopReason::Timeout => f.write_str("timeout reached"),
            StopReason::TargetScore => f.write_str("target score reached"),
        }
    }
}

/// Outcome of [`Environment::optimize`](super::Environment::optimize).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptimizationResult {
    /// Score of the best individual of the final generation.
    pub best_score: Score,
    /// Parameters of the best individual of the final generation.
    pub best_params: Params,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    /// Number of completed generations.
    pub generations: usize,
    pub stop_reason: StopReason,
    /// One record per generation, in generation order.
    pub history: Vec<GenerationRecord>,
    /// Final population, best first.
    pub last_generation: Vec<RankedIndividual>,
    pub objectives: Objectives,
    /// Effective weights (defaults filled in).
    pub weights: Vec<f64>,
    pub score_names: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) ranker: Ranker,
}

impl OptimizationResult {
    /// The generation log ordered best first.
    ///
    /// Single objective: by raw best score in the run's direction.
    /// Multi objective: by weighted overall score, normalized across the
    /// logged generations. Ties keep generation order.
    pub fn ranked_history(&self) -> Result<Vec<&GenerationRecord>> {
        let scores: Vec<&Score> = self.history.iter().map(|r| &r.best_score).collect();
        let order = self.ranker.order(&scores)?;
        Ok(order.into_iter().map(|i| &self.history[i]).collect())
    }

    /// Elapsed time as `"H hours MM minutes SS.ffffff seconds"`.
    pub fn elapsed_display(&self) -> String {
        let total = self.elapsed.as_secs_f64();
        let hours = (total / 3600.0).floor();
        let minutes = ((total - hours * 3600.0) / 60.0).floor();
        let seconds = total - hours * 3600.0 - minutes * 60.0;
        format!("{hours} hours {minutes:02} minutes {seconds:09.6} seconds")
    }
}

/// Receiver of run output, e.g. a table renderer or a progress bar.
///
/// Both callbacks default to no-ops; `()` is the null sink and
/// `Vec<GenerationRecord>` collects the log as it is produced.
pub trait ResultSink {
    /// Called once per completed generation, in order.
    fn on_generation(&mut self, _record: &GenerationRecord) {}

    /// Called once after the run stops successfully.
    fn on_finish(&mut self, _result: &OptimizationResult) {}
}

impl ResultSink for () {}

impl ResultSink for Vec<GenerationRecord> {
    fn on_generation(&mut self, record: &GenerationRecord) {
        self.push(record.clone());
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn on_generation(&mut self, record: &GenerationRecord) {
        (**self).on_generation(record);
    }

    fn on_finish(&mut self, result: &OptimizationResult) {
        (**self).on_finish(result);
    }
}
