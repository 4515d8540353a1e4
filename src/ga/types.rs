//! Core type definitions for the GA engine.
//!
//! - [`Score`]: what an objective function returns
//! - [`Direction`] / [`Objectives`]: how scores are compared
//! - [`Individual`]: a genome bound to the shared search space and its fitness
//! - [`Objective`]: the contract between the engine and the user's scoring code

use crate::error::{BoxError, GenetistError};
use crate::space::{Params, SearchSpace, Value};
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Score returned by an objective function.
///
/// Single-objective runs return [`Score::Single`]; multi-objective runs
/// return one value per objective, in the order of the configured
/// directions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Score {
    Single(f64),
    Multi(Vec<f64>),
}

impl Score {
    /// All objective values as a slice.
    pub fn values(&self) -> &[f64] {
        match self {
            Score::Single(v) => std::slice::from_ref(v),
            Score::Multi(vs) => vs,
        }
    }

    /// Number of objective values.
    pub fn width(&self) -> usize {
        self.values().len()
    }

    /// The value of a one-objective score.
    pub fn as_single(&self) -> Option<f64> {
        match self.values() {
            [v] => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Single(v) => write!(f, "{v}"),
            Score::Multi(vs) => {
                f.write_str("(")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<f64> for Score {
    fn from(v: f64) -> Self {
        Score::Single(v)
    }
}

impl From<i64> for Score {
    fn from(v: i64) -> Self {
        Score::Single(v as f64)
    }
}

impl From<Vec<f64>> for Score {
    fn from(vs: Vec<f64>) -> Self {
        Score::Multi(vs)
    }
}

impl<const N: usize> From<[f64; N]> for Score {
    fn from(vs: [f64; N]) -> Self {
        Score::Multi(vs.to_vec())
    }
}

impl From<(f64, f64)> for Score {
    fn from((a, b): (f64, f64)) -> Self {
        Score::Multi(vec![a, b])
    }
}

impl From<(f64, f64, f64)> for Score {
    fn from((a, b, c): (f64, f64, f64)) -> Self {
        Score::Multi(vec![a, b, c])
    }
}

/// Optimization direction of one objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Returns `true` when `best` has reached or passed `target`.
    pub fn reached(self, best: f64, target: f64) -> bool {
        match self {
            Direction::Minimize => best <= target,
            Direction::Maximize => best >= target,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Minimize => f.write_str("minimize"),
            Direction::Maximize => f.write_str("maximize"),
        }
    }
}

impl FromStr for Direction {
    type Err = GenetistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimize" | "min" => Ok(Direction::Minimize),
            "maximize" | "max" => Ok(Direction::Maximize),
            other => Err(GenetistError::Ranking(format!(
                "direction `{other}` is not supported"
            ))),
        }
    }
}

/// Directions of all objectives of a run.
///
/// `Single` means the objective returns one scalar; `Multi` means it
/// returns one value per direction and individuals are ranked by a
/// weighted sum of normalized scores.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objectives {
    Single(Direction),
    Multi(Vec<Direction>),
}

impl Objectives {
    pub fn is_multi(&self) -> bool {
        matches!(self, Objectives::Multi(_))
    }

    /// Number of objective values expected from the objective function.
    pub fn len(&self) -> usize {
        match self {
            Objectives::Single(_) => 1,
            Objectives::Multi(ds) => ds.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Direction> for Objectives {
    fn from(d: Direction) -> Self {
        Objectives::Single(d)
    }
}

impl From<Vec<Direction>> for Objectives {
    fn from(ds: Vec<Direction>) -> Self {
        Objectives::Multi(ds)
    }
}

impl<const N: usize> From<[Direction; N]> for Objectives {
    fn from(ds: [Direction; N]) -> Self {
        Objectives::Multi(ds.to_vec())
    }
}

/// Parses `"minimize"` as a single objective and a comma-separated list
/// such as `"minimize,maximize"` as multiple objectives.
impl FromStr for Objectives {
    type Err = GenetistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(',') {
            s.split(',')
                .map(str::parse::<Direction>)
                .collect::<Result<Vec<Direction>, _>>()
                .map(Objectives::Multi)
        } else {
            s.parse().map(Objectives::Single)
        }
    }
}

/// A candidate solution: a genome aligned with a shared search space, plus
/// its fitness once evaluated.
///
/// Fitness is `None` at construction and after any genome change; the
/// engine never carries fitness over from a parent to a child.
#[derive(Debug, Clone)]
pub struct Individual {
    genome: Vec<Value>,
    space: Arc<SearchSpace>,
    fitness: Option<Score>,
}

impl Individual {
    /// Creates an unevaluated individual.
    pub fn new(space: Arc<SearchSpace>, genome: Vec<Value>) -> Self {
        Self {
            genome,
            space,
            fitness: None,
        }
    }

    /// Creates an individual with a uniformly random genome.
    pub fn random<R: Rng>(space: &Arc<SearchSpace>, rng: &mut R) -> Self {
        Self::new(Arc::clone(space), space.random_genome(rng))
    }

    pub fn genome(&self) -> &[Value] {
        &self.genome
    }

    /// Mutable access to the genome. Clears the fitness.
    pub fn genome_mut(&mut self) -> &mut [Value] {
        self.fitness = None;
        &mut self.genome
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn fitness(&self) -> Option<&Score> {
        self.fitness.as_ref()
    }

    pub fn set_fitness(&mut self, fitness: Score) {
        self.fitness = Some(fitness);
    }

    /// Forgets the fitness so the next evaluation scores this genome again.
    pub fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Genome length.
    pub fn len(&self) -> usize {
        self.genome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genome.is_empty()
    }

    /// The genome as named parameters, in search-space order.
    pub fn params(&self) -> Params {
        self.space.name_genes(&self.genome)
    }

    /// A child sharing this individual's search space, with a new genome
    /// and no fitness.
    pub fn with_genome(&self, genome: Vec<Value>) -> Self {
        Self::new(Arc::clone(&self.space), genome)
    }
}

/// A scoring function over named parameters.
///
/// Implemented for every `Fn(&Params) -> Result<S, BoxError> + Sync` where
/// `S: Into<Score>`, so closures work directly. Objectives are shared by
/// reference across evaluation workers and must not rely on shared mutable
/// state for correctness.
pub trait Objective: Sync {
    /// Scores one parameter assignment.
    fn evaluate(&self, params: &Params) -> Result<Score, BoxError>;
}

impl<F, S> Objective for F
where
    F: Fn(&Params) -> Result<S, BoxError> + Sync,
    S: Into<Score>,
{
    fn evaluate(&self, params: &Params) -> Result<Score, BoxError> {
        self(params).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_score_conversions() {
        assert_eq!(Score::from(1.5), Score::Single(1.5));
        assert_eq!(Score::from((1.0, 2.0)), Score::Multi(vec![1.0, 2.0]));
        assert_eq!(Score::from([1.0, 2.0, 3.0]).width(), 3);
        assert_eq!(Score::Multi(vec![4.0]).as_single(), Some(4.0));
        assert_eq!(Score::Multi(vec![4.0, 5.0]).as_single(), None);
        assert_eq!(Score::from((1.0, 2.5)).to_string(), "(1, 2.5)");
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("minimize".parse::<Direction>().unwrap(), Direction::Minimize);
        assert_eq!("Maximize".parse::<Direction>().unwrap(), Direction::Maximize);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(GenetistError::Ranking(_))
        ));
    }

    #[test]
    fn test_objectives_parsing() {
        assert_eq!(
            "minimize".parse::<Objectives>().unwrap(),
            Objectives::Single(Direction::Minimize)
        );
        assert_eq!(
            "minimize, maximize".parse::<Objectives>().unwrap(),
            Objectives::Multi(vec![Direction::Minimize, Direction::Maximize])
        );
    }

    #[test]
    fn test_direction_reached() {
        assert!(Direction::Minimize.reached(0.0, 0.0));
        assert!(Direction::Minimize.reached(-1.0, 0.0));
        assert!(!Direction::Minimize.reached(1.0, 0.0));
        assert!(Direction::Maximize.reached(2.0, 1.0));
        assert!(!Direction::Maximize.reached(0.5, 1.0));
    }

    #[test]
    fn test_fixed_search_params_round_trip() {
        let space = Arc::new(SearchSpace::builder().fixed("x", [1, 2, 3]).build().unwrap());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let ind = Individual::random(&space, &mut rng);
            let params = ind.params();
            let keys: Vec<String> = params.keys().map(|k| k.to_string()).collect();
            assert_eq!(keys, vec!["x"]);
            let x = params.int("x").unwrap();
            assert!([1, 2, 3].contains(&x));
        }
    }

    #[test]
    fn test_genome_change_clears_fitness() {
        let space = Arc::new(SearchSpace::builder().int("x", 0, 9).build().unwrap());
        let mut ind = Individual::new(Arc::clone(&space), vec![Value::Int(1)]);
        assert!(!ind.is_evaluated());
        ind.set_fitness(Score::Single(3.0));
        assert!(ind.is_evaluated());

        let child = ind.with_genome(vec![Value::Int(2)]);
        assert!(!child.is_evaluated());

        ind.genome_mut()[0] = Value::Int(5);
        assert!(!ind.is_evaluated());
    }

    #[test]
    fn test_closure_objective() {
        let objective = |p: &Params| -> Result<f64, BoxError> { Ok(p.float("x")? * 2.0) };
        let params = Params::new(vec![("x".into(), Value::Float(1.5))]);
        assert_eq!(objective.evaluate(&params).unwrap(), Score::Single(3.0));

        let missing = Params::new(vec![]);
        assert!(objective.evaluate(&missing).is_err());
    }
}
