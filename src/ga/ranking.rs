//! Single- and multi-objective ranking.
//!
//! A [`Ranker`] turns each score into one sort key and stable-sorts by it:
//!
//! - single objective: the raw value, ascending for
//!   [`Direction::Minimize`], descending for [`Direction::Maximize`];
//! - multi objective: a weighted sum of per-objective min-max normalized
//!   values, always descending. Normalization is relative to the scores
//!   being ranked together (the current population, or the generation log).
//!
//! NaN keys always sort last. Equal keys keep their input order.
//!
//! # Example
//!
//! ```
//! use genetist::ga::{Direction, Objectives, Ranker, Score};
//!
//! let objectives = Objectives::Multi(vec![Direction::Minimize, Direction::Maximize]);
//! let ranker = Ranker::new(&objectives, Some(&[0.5, 0.5][..])).unwrap();
//!
//! let scores = [
//!     Score::from((1.0, 10.0)),
//!     Score::from((5.0, 2.0)),
//!     Score::from((3.0, 6.0)),
//! ];
//! let refs: Vec<&Score> = scores.iter().collect();
//! assert_eq!(ranker.overall_scores(&refs).unwrap(), vec![1.0, 0.0, 0.5]);
//! assert_eq!(ranker.order(&refs).unwrap(), vec![0, 2, 1]);
//! ```

use super::types::{Direction, Individual, Objectives, Score};
use crate::error::{GenetistError, Result};
use std::cmp::Ordering;

/// Orders scores best-first for a fixed set of directions and weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranker {
    objectives: Objectives,
    weights: Vec<f64>,
}

impl Ranker {
    /// Creates a ranker.
    ///
    /// For multi-objective directions, missing weights default to `1/k`
    /// each. Weights passed for a single objective are ignored.
    ///
    /// # Errors
    /// [`GenetistError::Ranking`] if there are no directions, or the weight
    /// count differs from the direction count, or a weight is not finite.
    pub fn new(objectives: &Objectives, weights: Option<&[f64]>) -> Result<Self> {
        let weights = match (objectives, weights) {
            (Objectives::Single(_), Some(_)) => {
                log::warn!("weights are only used with multiple objectives; ignoring them");
                vec![1.0]
            }
            (Objectives::Single(_), None) => vec![1.0],
            (Objectives::Multi(ds), _) if ds.is_empty() => {
                return Err(GenetistError::Ranking(
                    "at least one direction is required".into(),
                ));
            }
            (Objectives::Multi(ds), None) => {
                let k = ds.len();
                log::warn!("no weights given for {k} objectives; using 1/{k} each");
                vec![1.0 / k as f64; k]
            }
            (Objectives::Multi(ds), Some(ws)) => {
                if ws.len() != ds.len() {
                    return Err(GenetistError::Ranking(format!(
                        "{} directions but {} weights",
                        ds.len(),
                        ws.len()
                    )));
                }
                if let Some(w) = ws.iter().find(|w| !w.is_finite()) {
                    return Err(GenetistError::Ranking(format!("weight {w} is not finite")));
                }
                ws.to_vec()
            }
        };

        Ok(Self {
            objectives: objectives.clone(),
            weights,
        })
    }

    pub fn objectives(&self) -> &Objectives {
        &self.objectives
    }

    /// Effective weights (`[1.0]` for a single objective).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// One sort key per score, in input order.
    ///
    /// Single objective: the raw value. Multi objective: the weighted sum
    /// of normalized values (see [`Ranker::overall_scores`]).
    pub fn keys(&self, scores: &[&Score]) -> Result<Vec<f64>> {
        match &self.objectives {
            Objectives::Single(_) => scores
                .iter()
                .map(|s| {
                    s.as_single().ok_or_else(|| {
                        GenetistError::Configuration(format!(
                            "single-objective direction but the objective returned {s}"
                        ))
                    })
                })
                .collect(),
            Objectives::Multi(_) => self.overall_scores(scores),
        }
    }

    /// Weighted overall score of each multi-objective score.
    ///
    /// Each objective is min-max normalized across `scores` into `[0, 1]`,
    /// oriented so that higher is better, then combined with the weights.
    ///
    /// # Errors
    /// [`GenetistError::Configuration`] for a single-objective ranker or a
    /// scalar score; [`GenetistError::Ranking`] when a score's width differs
    /// from the number of directions.
    pub fn overall_scores(&self, scores: &[&Score]) -> Result<Vec<f64>> {
        let directions = match &self.objectives {
            Objectives::Multi(ds) => ds,
            Objectives::Single(_) => {
                return Err(GenetistError::Configuration(
                    "overall scores need multiple objectives".into(),
                ));
            }
        };

        for score in scores {
            match score {
                Score::Single(_) => {
                    return Err(GenetistError::Configuration(format!(
                        "multi-objective directions but the objective returned a scalar {score}"
                    )));
                }
                Score::Multi(vs) if vs.len() != directions.len() => {
                    return Err(GenetistError::Ranking(format!(
                        "{} directions but the objective returned {} values",
                        directions.len(),
                        vs.len()
                    )));
                }
                Score::Multi(_) => {}
            }
        }

        let mut overall = vec![0.0; scores.len()];
        for (i, (&direction, &weight)) in directions.iter().zip(&self.weights).enumerate() {
            let column: Vec<f64> = scores.iter().map(|s| s.values()[i]).collect();
            for (total, n) in overall.iter_mut().zip(normalize(&column, direction)) {
                *total += weight * n;
            }
        }
        Ok(overall)
    }

    /// Positions of `scores`, best first.
    pub fn order(&self, scores: &[&Score]) -> Result<Vec<usize>> {
        let keys = self.keys(scores)?;
        let direction = self.key_direction();
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| compare(keys[a], keys[b], direction));
        Ok(order)
    }

    /// Sorts an evaluated population best-first in place.
    ///
    /// # Errors
    /// [`GenetistError::Ranking`] if any individual has no fitness, plus the
    /// shape errors of [`Ranker::keys`].
    pub fn rank(&self, population: &mut Vec<Individual>) -> Result<()> {
        let scores = population
            .iter()
            .map(|ind| {
                ind.fitness().ok_or_else(|| {
                    GenetistError::Ranking("cannot rank an unevaluated individual".into())
                })
            })
            .collect::<Result<Vec<&Score>>>()?;
        let keys = self.keys(&scores)?;

        let direction = self.key_direction();
        let mut keyed: Vec<(f64, Individual)> = keys.into_iter().zip(population.drain(..)).collect();
        keyed.sort_by(|a, b| compare(a.0, b.0, direction));
        population.extend(keyed.into_iter().map(|(_, ind)| ind));
        Ok(())
    }

    /// Whether `best` has reached `target`. Always `false` for multiple
    /// objectives, where a scalar target has no meaning.
    pub fn target_reached(&self, best: &Score, target: f64) -> bool {
        match (&self.objectives, best.as_single()) {
            (Objectives::Single(direction), Some(v)) => direction.reached(v, target),
            _ => false,
        }
    }

    fn key_direction(&self) -> Direction {
        match &self.objectives {
            Objectives::Single(d) => *d,
            Objectives::Multi(_) => Direction::Maximize,
        }
    }
}

/// Min-max normalizes `values` into `[0, 1]` so that higher is better.
///
/// The range is taken over finite values only. Infinities take the endpoint
/// of their side: `1.0` when they are the better extreme for `direction`,
/// `0.0` otherwise. When every finite value is equal the range is zero and
/// each of them normalizes to `1.0`. NaN stays NaN.
pub fn normalize(values: &[f64], direction: Direction) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    // Halved so that spans wider than f64::MAX stay finite.
    let half_range = max / 2.0 - min / 2.0;

    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if v.is_infinite() {
                let better = match direction {
                    Direction::Maximize => v > 0.0,
                    Direction::Minimize => v < 0.0,
                };
                if better { 1.0 } else { 0.0 }
            } else if half_range <= 0.0 {
                1.0
            } else {
                let norm = match direction {
                    Direction::Maximize => (v / 2.0 - min / 2.0) / half_range,
                    Direction::Minimize => (max / 2.0 - v / 2.0) / half_range,
                };
                norm.clamp(0.0, 1.0)
            }
        })
        .collect()
}

/// Best-first comparison of two keys; NaN is worst in either direction.
fn compare(a: f64, b: f64, direction: Direction) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                Direction::Minimize => ord,
                Direction::Maximize => ord.reverse(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{SearchSpace, Value};
    use std::sync::Arc;

    fn refs(scores: &[Score]) -> Vec<&Score> {
        scores.iter().collect()
    }

    fn min_max() -> Objectives {
        Objectives::Multi(vec![Direction::Minimize, Direction::Maximize])
    }

    #[test]
    fn test_multi_objective_hand_computed() {
        let ranker = Ranker::new(&min_max(), Some(&[0.5, 0.5][..])).unwrap();
        let scores = [
            Score::from((1.0, 10.0)),
            Score::from((5.0, 2.0)),
            Score::from((3.0, 6.0)),
        ];
        // obj0 (minimize): 1 -> 1.0, 5 -> 0.0, 3 -> 0.5
        // obj1 (maximize): 10 -> 1.0, 2 -> 0.0, 6 -> 0.5
        let overall = ranker.overall_scores(&refs(&scores)).unwrap();
        assert_eq!(overall, vec![1.0, 0.0, 0.5]);

        let order = ranker.order(&refs(&scores)).unwrap();
        assert_eq!(order, vec![0, 2, 1]);
        let sorted: Vec<f64> = order.iter().map(|&i| overall[i]).collect();
        assert!(sorted.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_uneven_weights_change_winner() {
        let ranker = Ranker::new(&min_max(), Some(&[0.1, 0.9][..])).unwrap();
        let scores = [Score::from((1.0, 2.0)), Score::from((5.0, 10.0))];
        assert_eq!(ranker.order(&refs(&scores)).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_default_weights() {
        let ranker = Ranker::new(&min_max(), None).unwrap();
        assert_eq!(ranker.weights(), &[0.5, 0.5]);
    }

    #[test]
    fn test_zero_width_range_is_neutral() {
        assert_eq!(normalize(&[3.0, 3.0, 3.0], Direction::Minimize), vec![1.0; 3]);

        // All tied on the first objective: the second decides.
        let ranker = Ranker::new(&min_max(), Some(&[0.5, 0.5][..])).unwrap();
        let scores = [
            Score::from((2.0, 1.0)),
            Score::from((2.0, 3.0)),
            Score::from((2.0, 2.0)),
        ];
        let overall = ranker.overall_scores(&refs(&scores)).unwrap();
        assert!(overall.iter().all(|v| v.is_finite()));
        assert_eq!(ranker.order(&refs(&scores)).unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranker = Ranker::new(&Objectives::Single(Direction::Minimize), None).unwrap();
        let scores = [
            Score::Single(2.0),
            Score::Single(1.0),
            Score::Single(2.0),
            Score::Single(1.0),
        ];
        assert_eq!(ranker.order(&refs(&scores)).unwrap(), vec![1, 3, 0, 2]);

        let ranker = Ranker::new(&Objectives::Single(Direction::Maximize), None).unwrap();
        assert_eq!(ranker.order(&refs(&scores)).unwrap(), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_nan_ranks_last() {
        for direction in [Direction::Minimize, Direction::Maximize] {
            let ranker = Ranker::new(&Objectives::Single(direction), None).unwrap();
            let scores = [Score::Single(f64::NAN), Score::Single(1.0), Score::Single(0.0)];
            let order = ranker.order(&refs(&scores)).unwrap();
            assert_eq!(order[2], 0, "{direction}");
        }
    }

    #[test]
    fn test_infinite_scores_take_their_endpoint() {
        let values = [1.0, f64::INFINITY, 3.0, f64::NEG_INFINITY];
        assert_eq!(normalize(&values, Direction::Minimize), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(normalize(&values, Direction::Maximize), vec![0.0, 1.0, 1.0, 0.0]);
        assert_eq!(
            normalize(&[f64::INFINITY, 2.0, 2.0], Direction::Minimize),
            vec![0.0, 1.0, 1.0]
        );
        assert_eq!(normalize(&[-f64::MAX, f64::MAX], Direction::Maximize), vec![0.0, 1.0]);
    }

    #[test]
    fn test_infinite_penalty_keeps_multi_objective_ranking() {
        let ranker = Ranker::new(&min_max(), Some(&[0.5, 0.5][..])).unwrap();
        let scores = [
            Score::from((1.0, 0.0)),
            Score::from((2.0, 5.0)),
            Score::from((f64::INFINITY, 10.0)),
        ];
        // obj0 (minimize, finite range 1..2): 1 -> 1.0, 2 -> 0.0, inf -> 0.0
        // obj1 (maximize): 0 -> 0.0, 5 -> 0.5, 10 -> 1.0
        let overall = ranker.overall_scores(&refs(&scores)).unwrap();
        assert_eq!(overall, vec![0.5, 0.25, 0.5]);
        assert_eq!(ranker.order(&refs(&scores)).unwrap(), vec![0, 2, 1]);
    }

    #[test]
    fn test_length_mismatches() {
        assert!(matches!(
            Ranker::new(&min_max(), Some(&[1.0][..])),
            Err(GenetistError::Ranking(_))
        ));
        assert!(matches!(
            Ranker::new(&Objectives::Multi(vec![]), None),
            Err(GenetistError::Ranking(_))
        ));

        let ranker = Ranker::new(&min_max(), None).unwrap();
        let wide = [Score::from((1.0, 2.0, 3.0))];
        assert!(matches!(ranker.order(&refs(&wide)), Err(GenetistError::Ranking(_))));
    }

    #[test]
    fn test_shape_mismatches() {
        let multi = Ranker::new(&min_max(), None).unwrap();
        assert!(matches!(
            multi.order(&refs(&[Score::Single(1.0)])),
            Err(GenetistError::Configuration(_))
        ));

        let single = Ranker::new(&Objectives::Single(Direction::Minimize), None).unwrap();
        assert!(matches!(
            single.order(&refs(&[Score::from((1.0, 2.0))])),
            Err(GenetistError::Configuration(_))
        ));
    }

    #[test]
    fn test_rank_population() {
        let space = Arc::new(SearchSpace::builder().int("x", 0, 9).build().unwrap());
        let mut pop: Vec<Individual> = [4, 1, 3]
            .into_iter()
            .map(|x| {
                let mut ind = Individual::new(Arc::clone(&space), vec![Value::Int(x)]);
                ind.set_fitness(Score::Single(x as f64));
                ind
            })
            .collect();

        let ranker = Ranker::new(&Objectives::Single(Direction::Maximize), None).unwrap();
        ranker.rank(&mut pop).unwrap();
        let xs: Vec<_> = pop.iter().map(|i| i.genome()[0].clone()).collect();
        assert_eq!(xs, vec![Value::Int(4), Value::Int(3), Value::Int(1)]);

        pop.push(Individual::new(Arc::clone(&space), vec![Value::Int(0)]));
        assert!(matches!(ranker.rank(&mut pop), Err(GenetistError::Ranking(_))));
    }

    #[test]
    fn test_target_reached() {
        let min = Ranker::new(&Objectives::Single(Direction::Minimize), None).unwrap();
        assert!(min.target_reached(&Score::Single(0.0), 0.0));
        assert!(!min.target_reached(&Score::Single(0.1), 0.0));

        let multi = Ranker::new(&min_max(), None).unwrap();
        assert!(!multi.target_reached(&Score::from((0.0, 0.0)), 1.0));
    }
}
