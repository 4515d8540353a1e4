//! Mutation operators.
//!
//! One Bernoulli trial with the configured rate decides whether a call
//! mutates at all; the operator then picks which positions change and
//! [`mutate_gene`] picks the new value for each.
//!
//! # Per-type rule
//!
//! | Parameter                 | New value                      |
//! |---------------------------|--------------------------------|
//! | fixed, 2 values           | the other value                |
//! | fixed, more values        | uniform redraw (may repeat)    |
//! | int over exactly `{0, 1}` | flip                           |
//! | int                       | uniform redraw in `[low, high]`|
//! | float                     | uniform redraw in `[low, high]`|
//! | categorical, 2 choices    | the other choice               |
//! | categorical, more choices | uniform redraw (may repeat)    |

use super::types::Individual;
use crate::error::{GenetistError, Result};
use crate::space::{ParamSpec, Value};
use rand::seq::index;
use rand::Rng;
use std::str::FromStr;

/// Mutation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Mutate one uniformly chosen gene.
    #[default]
    SingleGene,
    /// Mutate a random subset of `1..=L` distinct genes.
    MultipleGenes,
}

impl Mutation {
    /// Mutates `individual` in place with probability `rate`.
    ///
    /// Returns `true` if the genome was touched; the fitness is then
    /// cleared even if every redraw landed on the old value.
    ///
    /// # Errors
    /// Fails with [`GenetistError::Mutation`] if the genome does not line up
    /// with its search space.
    pub fn mutate<R: Rng>(&self, individual: &mut Individual, rate: f64, rng: &mut R) -> Result<bool> {
        if individual.len() != individual.space().len() {
            return Err(GenetistError::Mutation(format!(
                "genome has {} genes but the search space declares {}",
                individual.len(),
                individual.space().len()
            )));
        }
        if individual.is_empty() || rng.random_range(0.0..1.0) >= rate {
            return Ok(false);
        }

        let len = individual.len();
        let positions = match self {
            Mutation::SingleGene => vec![rng.random_range(0..len)],
            Mutation::MultipleGenes => {
                let count = rng.random_range(1..=len);
                index::sample(rng, len, count).into_vec()
            }
        };

        let mut genes = Vec::with_capacity(positions.len());
        for &pos in &positions {
            let (_, spec) = &individual.space().params()[pos];
            genes.push(mutate_gene(spec, &individual.genome()[pos], rng)?);
        }

        let genome = individual.genome_mut();
        for (pos, gene) in positions.into_iter().zip(genes) {
            genome[pos] = gene;
        }
        Ok(true)
    }
}

impl FromStr for Mutation {
    type Err = GenetistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "single-gene" => Ok(Mutation::SingleGene),
            "multiple-genes" => Ok(Mutation::MultipleGenes),
            other => Err(GenetistError::Mutation(format!(
                "mutation `{other}` is not supported"
            ))),
        }
    }
}

/// Draws the replacement for one gene.
///
/// # Errors
/// Fails with [`GenetistError::Mutation`] if `current` is not a legal
/// value of `spec`.
pub fn mutate_gene<R: Rng>(spec: &ParamSpec, current: &Value, rng: &mut R) -> Result<Value> {
    if !spec.accepts(current) {
        return Err(GenetistError::Mutation(format!(
            "gene {current} ({}) does not belong to {spec:?}",
            current.type_name()
        )));
    }

    let value = match spec {
        ParamSpec::Fixed(values) if values.len() == 2 => other_of(values, current).clone(),
        ParamSpec::Int { low: 0, high: 1 } => match current {
            Value::Int(0) => Value::Int(1),
            _ => Value::Int(0),
        },
        ParamSpec::Categorical { choices } if choices.len() == 2 => {
            let idx = usize::from(choices[0] == current.as_str().unwrap_or_default());
            Value::Str(choices[idx].clone())
        }
        _ => spec.sample(rng),
    };
    Ok(value)
}

fn other_of<'a>(pair: &'a [Value], current: &Value) -> &'a Value {
    if pair[0] == *current {
        &pair[1]
    } else {
        &pair[0]
    }
}
