//! Crossover operators.
//!
//! The point and uniform crossovers work on any `&[T]` genome and are
//! exposed as free functions; [`Crossover`] selects one of them and applies
//! it to two [`Individual`]s.
//!
//! # Operators
//!
//! - [`one_point_crossover`]: swap tails after one cut
//! - [`multi_point_crossover`]: alternate segments between 2 or 3 cuts
//! - [`uniform_crossover`]: per-gene coin flip for each child
//!
//! Cut points are drawn from `[1, L-1)`, so the first and last gene are
//! never cut off on their own.

use super::types::Individual;
use crate::error::{GenetistError, Result};
use rand::seq::index;
use rand::Rng;
use std::str::FromStr;

/// Crossover operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    #[default]
    OnePoint,
    TwoPoint,
    ThreePoint,
    Uniform,
}

impl Crossover {
    /// Shortest genome this operator can recombine.
    pub fn min_genome_len(&self) -> usize {
        match self {
            Crossover::OnePoint | Crossover::Uniform => 2,
            Crossover::TwoPoint => 4,
            Crossover::ThreePoint => 5,
        }
    }

    /// Fails with [`GenetistError::Crossover`] if genomes of length `len`
    /// leave no room for this operator's cut points.
    pub fn check_genome_len(&self, len: usize) -> Result<()> {
        if len < self.min_genome_len() {
            return Err(GenetistError::Crossover(format!(
                "{self:?} crossover needs a genome of at least {} genes, got {len}",
                self.min_genome_len()
            )));
        }
        Ok(())
    }

    /// Recombines two genomes into two children.
    pub fn apply<T: Clone, R: Rng>(
        &self,
        parent1: &[T],
        parent2: &[T],
        rng: &mut R,
    ) -> Result<(Vec<T>, Vec<T>)> {
        if parent1.len() != parent2.len() {
            return Err(GenetistError::Crossover(format!(
                "parents must have equal length ({} vs {})",
                parent1.len(),
                parent2.len()
            )));
        }
        match self {
            Crossover::OnePoint => one_point_crossover(parent1, parent2, rng),
            Crossover::TwoPoint => multi_point_crossover(parent1, parent2, 2, rng),
            Crossover::ThreePoint => multi_point_crossover(parent1, parent2, 3, rng),
            Crossover::Uniform => {
                self.check_genome_len(parent1.len())?;
                Ok(uniform_crossover(parent1, parent2, rng))
            }
        }
    }

    /// Produces two unevaluated children. Each child shares its parent's
    /// search space; only the genome is new.
    pub fn breed<R: Rng>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut R,
    ) -> Result<(Individual, Individual)> {
        let (genome1, genome2) = self.apply(parent1.genome(), parent2.genome(), rng)?;
        Ok((parent1.with_genome(genome1), parent2.with_genome(genome2)))
    }
}

impl FromStr for Crossover {
    type Err = GenetistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "one-point" => Ok(Crossover::OnePoint),
            "two-point" => Ok(Crossover::TwoPoint),
            "three-point" => Ok(Crossover::ThreePoint),
            "uniform" => Ok(Crossover::Uniform),
            other => Err(GenetistError::Crossover(format!(
                "crossover `{other}` is not supported"
            ))),
        }
    }
}

/// One-point crossover.
///
/// The cut is uniform in `[1, L-1)` (`1` when `L == 2`); child A takes
/// `parent1[..cut] + parent2[cut..]`, child B the complement.
///
/// # Errors
/// Fails if the genomes have fewer than two genes.
pub fn one_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> Result<(Vec<T>, Vec<T>)> {
    let n = parent1.len();
    if n < 2 {
        return Err(GenetistError::Crossover(format!(
            "one-point crossover needs at least 2 genes, got {n}"
        )));
    }
    let cut = if n == 2 { 1 } else { rng.random_range(1..n - 1) };
    Ok(cut_crossover(parent1, parent2, &[cut]))
}

/// Multi-point crossover with `points` distinct cuts.
///
/// Cuts are drawn without replacement from `[1, L-1)` and sorted; children
/// alternate parent segments between consecutive cuts.
///
/// # Errors
/// Fails if `L - 2 < points` (not enough room for distinct cuts).
pub fn multi_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    points: usize,
    rng: &mut R,
) -> Result<(Vec<T>, Vec<T>)> {
    let n = parent1.len();
    let room = n.saturating_sub(2);
    if room < points || points == 0 {
        return Err(GenetistError::Crossover(format!(
            "cannot place {points} distinct cut points in a genome of {n} genes"
        )));
    }

    let mut cuts: Vec<usize> = index::sample(rng, room, points)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    cuts.sort_unstable();
    Ok(cut_crossover(parent1, parent2, &cuts))
}

/// Uniform crossover: each child independently takes each gene from a
/// fair-coin-chosen parent.
pub fn uniform_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let mut pick = |a: &T, b: &T| {
        if rng.random_bool(0.5) {
            a.clone()
        } else {
            b.clone()
        }
    };
    let child1 = parent1.iter().zip(parent2).map(|(a, b)| pick(a, b)).collect();
    let child2 = parent1.iter().zip(parent2).map(|(a, b)| pick(a, b)).collect();
    (child1, child2)
}

/// Builds both children from sorted cut positions: genes switch parent at
/// every cut.
fn cut_crossover<T: Clone>(parent1: &[T], parent2: &[T], cuts: &[usize]) -> (Vec<T>, Vec<T>) {
    let n = parent1.len();
    let mut child1 = Vec::with_capacity(n);
    let mut child2 = Vec::with_capacity(n);
    let mut next_cut = 0;
    let mut swapped = false;

    for i in 0..n {
        while next_cut < cuts.len() && cuts[next_cut] == i {
            swapped = !swapped;
            next_cut += 1;
        }
        if swapped {
            child1.push(parent2[i].clone());
            child2.push(parent1[i].clone());
        } else {
            child1.push(parent1[i].clone());
            child2.push(parent2[i].clone());
        }
    }

    (child1, child2)
}

// ============================================================================
// Tests
// ============================================================================
