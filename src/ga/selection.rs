//! Selection strategies for the GA.
//!
//! Selection determines which individuals are paired as parents for
//! crossover. Every strategy works on a population that is already
//! **ranked best-first**, so it only needs positions, not fitness values.
//!
//! # References
//!
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use crate::error::{GenetistError, Result};
use rand::seq::index;
use rand::Rng;
use std::str::FromStr;

/// Selection strategy for choosing parent pairs.
///
/// # Examples
///
/// ```
/// use genetist::ga::Selection;
///
/// let sel: Selection = "tournament".parse().unwrap();
/// assert_eq!(sel, Selection::Tournament(5));
///
/// let sel: Selection = "roulette".parse().unwrap();
/// assert_eq!(sel, Selection::Roulette);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Rank-weighted roulette: the individual at rank `i` (0 = best) has
    /// weight `len - i`. Both parents are drawn independently with
    /// replacement, so self-pairing is possible.
    ///
    /// # Complexity
    /// O(n) per parent (linear scan)
    #[default]
    Roulette,

    /// Tournament: draw `k` distinct positions, keep the two lowest (best
    /// ranked) as the pair.
    ///
    /// # Complexity
    /// O(k log k) per pair
    Tournament(usize),

    /// Deterministic pairing of consecutive ranks: `(0, 1), (2, 3), …`,
    /// wrapping around when more pairs are requested than fit.
    Ranking,
}

impl Selection {
    /// Tournament size used when parsed from a bare `"tournament"` tag.
    pub const DEFAULT_TOURNAMENT_SIZE: usize = 5;

    /// Checks strategy parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            Selection::Tournament(k) if *k < 2 => Err(GenetistError::Selection(format!(
                "tournament size must be at least 2, got {k}"
            ))),
            _ => Ok(()),
        }
    }

    /// Selects `pairs` parent pairs from a ranked population of length
    /// `population_len`. Returned values are positions into the population.
    ///
    /// # Errors
    /// Fails with [`GenetistError::Selection`] on an empty population.
    pub fn select_pairs<R: Rng>(
        &self,
        population_len: usize,
        pairs: usize,
        rng: &mut R,
    ) -> Result<Vec<(usize, usize)>> {
        if population_len == 0 {
            return Err(GenetistError::Selection(
                "cannot select from empty population".into(),
            ));
        }

        let selected = match self {
            Selection::Roulette => (0..pairs)
                .map(|_| (roulette(population_len, rng), roulette(population_len, rng)))
                .collect(),
            Selection::Tournament(k) => (0..pairs)
                .map(|_| tournament(population_len, *k, rng))
                .collect(),
            Selection::Ranking => (0..pairs)
                .map(|i| {
                    (
                        (2 * i) % population_len,
                        (2 * i + 1) % population_len,
                    )
                })
                .collect(),
        };
        Ok(selected)
    }
}

impl FromStr for Selection {
    type Err = GenetistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "roulette" => Ok(Selection::Roulette),
            "tournament" => Ok(Selection::Tournament(Self::DEFAULT_TOURNAMENT_SIZE)),
            "ranking" | "rank" => Ok(Selection::Ranking),
            other => Err(GenetistError::Selection(format!(
                "selection `{other}` is not supported"
            ))),
        }
    }
}

/// Rank-weighted roulette over a best-first population.
///
/// Weight of rank `i` is `n - i`; the total is `n(n+1)/2`.
fn roulette<R: Rng>(n: usize, rng: &mut R) -> usize {
    if n == 1 {
        return 0;
    }

    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for rank in 0..n {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return rank;
        }
    }

    n - 1 // floating-point fallback
}

/// Tournament over a best-first population: the two lowest of `k` distinct
/// random positions.
fn tournament<R: Rng>(n: usize, k: usize, rng: &mut R) -> (usize, usize) {
    if n == 1 {
        return (0, 0);
    }

    let mut drawn = index::sample(rng, n, k.clamp(2, n)).into_vec();
    drawn.sort_unstable();
    (drawn[0], drawn[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_roulette_favors_best() {
        let mut rng = rng();
        let mut counts = [0u32; 4];
        let pairs = Selection::Roulette.select_pairs(4, 5000, &mut rng).unwrap();
        for (a, b) in pairs {
            counts[a] += 1;
            counts[b] += 1;
        }
        // Expected shares 4:3:2:1
        assert!(
            counts[0] > counts[1] && counts[1] > counts[2] && counts[2] > counts[3],
            "expected rank-ordered counts, got {counts:?}"
        );
        assert!(counts[3] > 0, "worst rank must still be selectable");
    }

    #[test]
    fn test_tournament_returns_two_best_of_draw() {
        let mut rng = rng();
        // With k == n every position is drawn, so the pair is always (0, 1).
        let pairs = Selection::Tournament(6).select_pairs(6, 200, &mut rng).unwrap();
        assert!(pairs.iter().all(|&p| p == (0, 1)));
    }

    #[test]
    fn test_tournament_pairs_are_distinct_and_ordered() {
        let mut rng = rng();
        let pairs = Selection::Tournament(3).select_pairs(20, 1000, &mut rng).unwrap();
        for (a, b) in pairs {
            assert!(a < b, "expected a < b, got ({a}, {b})");
            assert!(b < 20);
        }
    }

    #[test]
    fn test_tournament_favors_top_ranks() {
        let mut rng = rng();
        let mut counts = [0u32; 10];
        for (a, _) in Selection::Tournament(5).select_pairs(10, 5000, &mut rng).unwrap() {
            counts[a] += 1;
        }
        assert!(counts[0] > counts[5], "counts: {counts:?}");
        // The first parent is the minimum of 5 distinct draws, never in the last four ranks.
        assert!(counts[6..].iter().all(|&c| c == 0), "counts: {counts:?}");
    }

    #[test]
    fn test_tournament_larger_than_population() {
        let mut rng = rng();
        let pairs = Selection::Tournament(5).select_pairs(3, 10, &mut rng).unwrap();
        assert!(pairs.iter().all(|&p| p == (0, 1)));
    }

    #[test]
    fn test_ranking_pairs_consecutive() {
        let mut rng = rng();
        let pairs = Selection::Ranking.select_pairs(5, 4, &mut rng).unwrap();
        assert_eq!(pairs, vec![(0, 1), (2, 3), (4, 0), (1, 2)]);
    }

    #[test]
    fn test_single_individual() {
        let mut rng = rng();
        for sel in [Selection::Roulette, Selection::Tournament(3), Selection::Ranking] {
            let pairs = sel.select_pairs(1, 3, &mut rng).unwrap();
            assert_eq!(pairs, vec![(0, 0); 3], "{sel:?}");
        }
    }

    #[test]
    fn test_empty_population_fails() {
        let mut rng = rng();
        assert!(matches!(
            Selection::Roulette.select_pairs(0, 1, &mut rng),
            Err(GenetistError::Selection(_))
        ));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("ranking".parse::<Selection>().unwrap(), Selection::Ranking);
        assert_eq!("Roulette".parse::<Selection>().unwrap(), Selection::Roulette);
        assert!(matches!(
            "lottery".parse::<Selection>(),
            Err(GenetistError::Selection(_))
        ));
    }

    #[test]
    fn test_validate_tournament_size() {
        assert!(Selection::Tournament(1).validate().is_err());
        assert!(Selection::Tournament(2).validate().is_ok());
        assert!(Selection::Roulette.validate().is_ok());
    }
}
