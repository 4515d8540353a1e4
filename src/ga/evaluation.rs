//! Fitness evaluation.
//!
//! The only concurrent region of a run. Workers each get `&mut` to a
//! disjoint individual and `&` to the objective; the call returns after
//! every worker has finished.

use super::config::Concurrency;
use super::types::{Individual, Objective};
use crate::error::{GenetistError, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Scores every individual that has no fitness yet.
///
/// Individuals keep their positions, so the population order after the
/// call is the input order whatever the worker scheduling. Returns the
/// number of objective calls made.
///
/// # Errors
/// The first objective failure aborts the call with
/// [`GenetistError::Objective`]; individuals scored before it keep their
/// fitness but the run is expected to stop.
pub fn evaluate_population<O>(
    population: &mut [Individual],
    objective: &O,
    concurrency: Concurrency,
) -> Result<usize>
where
    O: Objective + ?Sized,
{
    let pending = population.iter().filter(|ind| !ind.is_evaluated()).count();
    if pending == 0 {
        return Ok(0);
    }

    let workers = concurrency.workers();
    if workers <= 1 || pending == 1 {
        for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
            evaluate_one(ind, objective)?;
        }
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| {
                GenetistError::Configuration(format!("cannot start {workers} evaluation workers: {e}"))
            })?;
        pool.install(|| {
            population
                .par_iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .try_for_each(|ind| evaluate_one(ind, objective))
        })?;
    }

    Ok(pending)
}

fn evaluate_one<O: Objective + ?Sized>(ind: &mut Individual, objective: &O) -> Result<()> {
    let score = objective
        .evaluate(&ind.params())
        .map_err(GenetistError::Objective)?;
    ind.set_fitness(score);
    Ok(())
}
