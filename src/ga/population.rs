//! Initial population with bounded duplicate avoidance.

use super::types::Individual;
use crate::space::{SearchSpace, Value};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// Draws allowed per individual before a duplicate genome is accepted.
pub const MAX_ATTEMPTS_PER_INDIVIDUAL: usize = 5;

/// Genomes already handed out during one run's initialization.
#[derive(Debug, Clone, Default)]
pub struct SeenGenomes {
    genomes: HashSet<Vec<Value>>,
}

impl SeenGenomes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, genome: &[Value]) -> bool {
        self.genomes.contains(genome)
    }

    /// Records a genome. Returns `false` if it was already present.
    pub fn insert(&mut self, genome: &[Value]) -> bool {
        self.genomes.insert(genome.to_vec())
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }
}

/// Creates `size` random individuals.
///
/// A draw whose genome is already in `seen` is retried, up to
/// [`MAX_ATTEMPTS_PER_INDIVIDUAL`] draws in total; the last draw is then
/// kept even if it repeats. Every kept genome is recorded in `seen`.
pub fn initialize_population<R: Rng>(
    space: &Arc<SearchSpace>,
    size: usize,
    seen: &mut SeenGenomes,
    rng: &mut R,
) -> Vec<Individual> {
    let mut population = Vec::with_capacity(size);
    let mut duplicates = 0usize;

    for _ in 0..size {
        let mut candidate = Individual::random(space, rng);
        let mut attempts = 1;
        while seen.contains(candidate.genome()) && attempts < MAX_ATTEMPTS_PER_INDIVIDUAL {
            candidate = Individual::random(space, rng);
            attempts += 1;
        }
        if !seen.insert(candidate.genome()) {
            duplicates += 1;
        }
        population.push(candidate);
    }

    if duplicates > 0 {
        log::debug!(
            "initial population: accepted {duplicates} duplicate genome(s) after {MAX_ATTEMPTS_PER_INDIVIDUAL} attempts"
        );
    }
    population
}
