use std::str::FromStr;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use lotto645_db::models::PICK_COUNT;

use crate::candidate::Candidate;
use crate::config::RetryBudgets;
use crate::constraints;
use crate::error::EngineError;
use crate::frequency::Pools;
use crate::sampler::{
    uniform_draw, weighted_draw, Acceptance, RetryPolicy, SampleOutcome, Sampled, WeightedOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StrategyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl StrategyCode {
    pub const ALL: [StrategyCode; 7] = [
        StrategyCode::A,
        StrategyCode::B,
        StrategyCode::C,
        StrategyCode::D,
        StrategyCode::E,
        StrategyCode::F,
        StrategyCode::G,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyCode::A => "Aléatoire",
            StrategyCode::B => "Pondéré",
            StrategyCode::C => "Équilibre",
            StrategyCode::D => "Somme",
            StrategyCode::E => "Dispersion",
            StrategyCode::F => "IA précision",
            StrategyCode::G => "Anti-surapprentissage",
        }
    }
}

impl std::fmt::Display for StrategyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for StrategyCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(StrategyCode::A),
            "B" => Ok(StrategyCode::B),
            "C" => Ok(StrategyCode::C),
            "D" => Ok(StrategyCode::D),
            "E" => Ok(StrategyCode::E),
            "F" => Ok(StrategyCode::F),
            "G" => Ok(StrategyCode::G),
            _ => Err(EngineError::UnknownStrategy(s.to_string())),
        }
    }
}

pub struct CandidateGenerator<'a> {
    pools: &'a Pools,
    budgets: &'a RetryBudgets,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(pools: &'a Pools, budgets: &'a RetryBudgets) -> Self {
        Self { pools, budgets }
    }

    /// `None` quand le pool chaud compte moins de 6 numéros.
    pub fn generate<R: Rng + ?Sized>(&self, code: StrategyCode, rng: &mut R) -> Option<Sampled> {
        let hot = &self.pools.hot;
        if hot.len() < PICK_COUNT {
            debug!(strategy = %code, hot = hot.len(), "pool chaud insuffisant");
            return None;
        }

        let sampled = match code {
            StrategyCode::A => Sampled {
                candidate: uniform_draw(hot, rng),
                acceptance: Acceptance::Accepted { attempts: 1 },
            },
            StrategyCode::B => self.weighted(rng),
            StrategyCode::C => self.filtered(rng, self.budgets.parity, |c| {
                constraints::parity_balanced(c.numbers())
            }),
            StrategyCode::D => self.filtered(rng, self.budgets.sum, |c| {
                constraints::sum_in_band(c.numbers())
            }),
            StrategyCode::E => self.filtered(rng, self.budgets.section, |c| {
                constraints::section_dispersed(c.numbers())
                    && !constraints::has_consecutive_triple(c.numbers())
            }),
            StrategyCode::F => self.precision(rng),
            StrategyCode::G => self.mixed(rng),
        };

        debug!(strategy = %code, numbers = %sampled.candidate, acceptance = %sampled.acceptance, "grille générée");
        Some(sampled)
    }

    fn weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Sampled {
        match weighted_draw(&self.pools.hot, &self.pools.weights, rng) {
            WeightedOutcome::Sampled(candidate) => Sampled {
                candidate,
                acceptance: Acceptance::Accepted { attempts: 1 },
            },
            WeightedOutcome::Unavailable(reason) => {
                warn!(%reason, "tirage pondéré impossible, repli uniforme");
                Sampled {
                    candidate: uniform_draw(&self.pools.hot, rng),
                    acceptance: Acceptance::UniformSubstitute,
                }
            }
        }
    }

    /// Rejet simple sur le pool chaud ; à l'épuisement, le dernier tirage est rendu tel quel.
    fn filtered<R, P>(&self, rng: &mut R, budget: u32, accept: P) -> Sampled
    where
        R: Rng + ?Sized,
        P: Fn(&Candidate) -> bool,
    {
        let hot = &self.pools.hot;
        match RetryPolicy::new(budget).sample_or_fallback(rng, |r| uniform_draw(hot, r), accept) {
            SampleOutcome::Accepted { candidate, attempts } => Sampled {
                candidate,
                acceptance: Acceptance::Accepted { attempts },
            },
            SampleOutcome::Exhausted { last } => Sampled {
                candidate: last,
                acceptance: Acceptance::Fallback,
            },
        }
    }

    fn precision<R: Rng + ?Sized>(&self, rng: &mut R) -> Sampled {
        let hot = &self.pools.hot;
        let strict = RetryPolicy::new(self.budgets.precision).sample_or_fallback(
            rng,
            |r| uniform_draw(hot, r),
            |c| constraints::precision_ok(c.numbers()),
        );
        if let SampleOutcome::Accepted { candidate, attempts } = strict {
            return Sampled {
                candidate,
                acceptance: Acceptance::Accepted { attempts },
            };
        }

        debug!(budget = self.budgets.precision, "contraintes F épuisées, somme seule");
        let relaxed = RetryPolicy::new(self.budgets.precision_relaxed).sample_or_fallback(
            rng,
            |r| uniform_draw(hot, r),
            |c| constraints::sum_in_band(c.numbers()),
        );
        match relaxed {
            SampleOutcome::Accepted { candidate, attempts } => Sampled {
                candidate,
                acceptance: Acceptance::Relaxed { attempts },
            },
            SampleOutcome::Exhausted { last } => Sampled {
                candidate: last,
                acceptance: Acceptance::Fallback,
            },
        }
    }

    fn mixed<R: Rng + ?Sized>(&self, rng: &mut R) -> Sampled {
        let hot = &self.pools.hot;
        let cold = &self.pools.cold;

        if cold.len() < 2 {
            debug!(cold = cold.len(), "pool froid trop petit, tirage uniforme sur 1..=45");
            return Sampled {
                candidate: uniform_draw(&self.pools.all_numbers(), rng),
                acceptance: Acceptance::UniformSubstitute,
            };
        }

        let outcome = RetryPolicy::new(self.budgets.mixed).sample_or_fallback(
            rng,
            |r| mixed_draw(hot, cold, r),
            |c| {
                constraints::mixed_sum_in_band(c.numbers())
                    && !constraints::has_consecutive_triple(c.numbers())
            },
        );
        match outcome {
            SampleOutcome::Accepted { candidate, attempts } => Sampled {
                candidate,
                acceptance: Acceptance::Accepted { attempts },
            },
            SampleOutcome::Exhausted { .. } => Sampled {
                candidate: uniform_draw(&self.pools.all_numbers(), rng),
                acceptance: Acceptance::Fallback,
            },
        }
    }
}

/// Chaud:froid en 4:2 ou 5:1, tiré au sort à chaque essai. Les deux pools sont disjoints.
fn mixed_draw<R: Rng + ?Sized>(hot: &[u8], cold: &[u8], rng: &mut R) -> Candidate {
    let (n_hot, n_cold) = if rng.random_bool(0.5) { (4, 2) } else { (5, 1) };
    let mut picked: Vec<u8> = hot.choose_multiple(rng, n_hot).copied().collect();
    picked.extend(cold.choose_multiple(rng, n_cold).copied());
    Candidate::from_pool_pick(&picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::classify;
    use lotto645_db::models::Draw;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    /// Pools construits à la main : chaud = {1,7,13,22,34,41,45}, poids {3,2,2,4,2,3,2}.
    fn scenario_pools() -> Pools {
        let hot = vec![1, 7, 13, 22, 34, 41, 45];
        let weights = vec![3, 2, 2, 4, 2, 3, 2];
        let cold: Vec<u8> = (1..=45).filter(|n| !hot.contains(n)).collect();
        let table: BTreeMap<u8, u32> = hot.iter().copied().zip(weights.iter().copied()).collect();
        Pools { table, hot, weights, cold }
    }

    fn pools_with_hot(hot: Vec<u8>) -> Pools {
        let weights = vec![2; hot.len()];
        let cold: Vec<u8> = (1..=45).filter(|n| !hot.contains(n)).collect();
        let table = hot.iter().map(|&n| (n, 2)).collect();
        Pools { table, hot, weights, cold }
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("a".parse::<StrategyCode>().unwrap(), StrategyCode::A);
        assert_eq!(" G ".parse::<StrategyCode>().unwrap(), StrategyCode::G);
        assert!("H".parse::<StrategyCode>().is_err());
        assert!("".parse::<StrategyCode>().is_err());
    }

    #[test]
    fn test_all_codes_ordered() {
        let letters: String = StrategyCode::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(letters, "ABCDEFG");
    }

    #[test]
    fn test_uniform_picks_from_hot_pool() {
        let pools = scenario_pools();
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = generator.generate(StrategyCode::A, &mut rng).unwrap();
            assert!(s.candidate.numbers().iter().all(|n| pools.hot.contains(n)));
            assert!(s.candidate.numbers().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_weighted_favors_heavier_numbers() {
        let pools = scenario_pools();
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(2024);

        let trials = 5000;
        let mut hits = BTreeMap::new();
        for _ in 0..trials {
            let s = generator.generate(StrategyCode::B, &mut rng).unwrap();
            assert_eq!(s.acceptance, Acceptance::Accepted { attempts: 1 });
            for &n in s.candidate.numbers() {
                *hits.entry(n).or_insert(0u32) += 1;
            }
        }
        assert!(hits[&22] > hits[&7], "22: {} vs 7: {}", hits[&22], hits[&7]);
        assert!(hits[&22] > hits[&13], "22: {} vs 13: {}", hits[&22], hits[&13]);
    }

    #[test]
    fn test_weighted_degenerate_weights_fall_back() {
        let mut pools = scenario_pools();
        pools.weights = vec![0; pools.hot.len()];
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(1);
        let s = generator.generate(StrategyCode::B, &mut rng).unwrap();
        assert_eq!(s.acceptance, Acceptance::UniformSubstitute);
        assert!(s.candidate.numbers().iter().all(|n| pools.hot.contains(n)));
    }

    #[test]
    fn test_small_hot_pool_yields_none() {
        let pools = pools_with_hot(vec![1, 2, 3, 4, 5]);
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(1);
        for code in StrategyCode::ALL {
            assert!(generator.generate(code, &mut rng).is_none(), "{code}");
        }
    }

    #[test]
    fn test_parity_strategy_satisfies_predicate() {
        let pools = pools_with_hot((1..=45).collect());
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let s = generator.generate(StrategyCode::C, &mut rng).unwrap();
            assert!(constraints::parity_balanced(s.candidate.numbers()));
        }
    }

    #[test]
    fn test_sum_strategy_satisfies_band() {
        let pools = pools_with_hot((1..=45).collect());
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..50 {
            let s = generator.generate(StrategyCode::D, &mut rng).unwrap();
            assert!(constraints::sum_in_band(s.candidate.numbers()));
        }
    }

    #[test]
    fn test_sum_strategy_fallback_is_last_draw() {
        // somme max = 2+3+4+5+6+7 = 27 : la bande 100..=170 est inatteignable
        let pools = pools_with_hot(vec![1, 2, 3, 4, 5, 6, 7]);
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);

        let mut rng = StdRng::seed_from_u64(99);
        let mut replay = rng.clone();
        let s = generator.generate(StrategyCode::D, &mut rng).unwrap();

        let expected = (0..budgets.sum)
            .map(|_| uniform_draw(&pools.hot, &mut replay))
            .last()
            .unwrap();
        assert_eq!(s.acceptance, Acceptance::Fallback);
        assert_eq!(s.candidate, expected);
    }

    #[test]
    fn test_section_strategy() {
        let pools = pools_with_hot((1..=45).collect());
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..50 {
            let s = generator.generate(StrategyCode::E, &mut rng).unwrap();
            assert!(constraints::section_dispersed(s.candidate.numbers()));
            assert!(!constraints::has_consecutive_triple(s.candidate.numbers()));
        }
    }

    #[test]
    fn test_precision_strategy_accepted_on_full_pool() {
        let pools = pools_with_hot((1..=45).collect());
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(14);
        for _ in 0..20 {
            let s = generator.generate(StrategyCode::F, &mut rng).unwrap();
            assert!(matches!(s.acceptance, Acceptance::Accepted { .. }));
            let nums = s.candidate.numbers();
            assert!(constraints::precision_ok(nums));
            assert!(constraints::parity_balanced(nums));
            assert!(constraints::sum_in_band(nums));
        }
    }

    #[test]
    fn test_precision_strategy_relaxed_stage() {
        // Numéros tous pairs : la parité échoue toujours, la somme seule est atteignable.
        let pools = pools_with_hot(vec![20, 22, 24, 26, 28, 30, 32]);
        let budgets = RetryBudgets { precision: 200, ..RetryBudgets::default() };
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(15);
        let s = generator.generate(StrategyCode::F, &mut rng).unwrap();
        assert!(matches!(s.acceptance, Acceptance::Relaxed { .. }));
        assert!(constraints::sum_in_band(s.candidate.numbers()));
    }

    #[test]
    fn test_precision_strategy_final_fallback() {
        let pools = pools_with_hot(vec![1, 2, 3, 4, 5, 6, 7]);
        let budgets = RetryBudgets { precision: 50, precision_relaxed: 50, ..RetryBudgets::default() };
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(16);
        let s = generator.generate(StrategyCode::F, &mut rng).unwrap();
        assert_eq!(s.acceptance, Acceptance::Fallback);
        assert!(s.candidate.numbers().iter().all(|n| pools.hot.contains(n)));
    }

    #[test]
    fn test_mixed_strategy_ratio() {
        let pools = scenario_pools();
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let s = generator.generate(StrategyCode::G, &mut rng).unwrap();
            if let Acceptance::Accepted { .. } = s.acceptance {
                let nums = s.candidate.numbers();
                let cold = nums.iter().filter(|&&n| pools.is_cold(n)).count();
                assert!(cold == 1 || cold == 2, "{:?}", nums);
                assert!(constraints::mixed_sum_in_band(nums));
                assert!(!constraints::has_consecutive_triple(nums));
            }
        }
    }

    #[test]
    fn test_mixed_strategy_small_cold_pool() {
        // 44 numéros chauds, 1 froid : pas de mélange
        let hot: Vec<u8> = (1..=44).collect();
        let pools = pools_with_hot(hot);
        assert_eq!(pools.cold, vec![45]);
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(18);
        let s = generator.generate(StrategyCode::G, &mut rng).unwrap();
        assert_eq!(s.acceptance, Acceptance::UniformSubstitute);
    }

    #[test]
    fn test_mixed_strategy_exhaustion_falls_back_to_uniform() {
        // chaud 1..=6, froid {7,8} : somme maximale 33, la bande 80..=200 est inatteignable
        let hot: Vec<u8> = (1..=6).collect();
        let pools = Pools {
            table: hot.iter().map(|&n| (n, 2)).collect(),
            weights: vec![2; hot.len()],
            hot,
            cold: vec![7, 8],
        };
        let budgets = RetryBudgets { mixed: 50, ..RetryBudgets::default() };
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(19);

        let all = pools.all_numbers();
        for _ in 0..20 {
            let s = generator.generate(StrategyCode::G, &mut rng).unwrap();
            assert_eq!(s.acceptance, Acceptance::Fallback);
            let nums = s.candidate.numbers();
            assert!(nums.iter().all(|n| all.contains(n)), "{:?}", nums);
            assert!(nums.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_generation_from_classified_history() {
        let draws: Vec<Draw> = (0..20u32)
            .map(|i| {
                let base = (i % 7) as u8 * 6;
                Draw {
                    round: 100 - i,
                    date: format!("2025-03-{:02}", i + 1),
                    numbers: [base + 1, base + 2, base + 3, base + 4, base + 5, base + 6],
                }
            })
            .collect();
        let pools = classify(&draws);
        assert!(pools.hot.len() >= PICK_COUNT);
        let budgets = RetryBudgets::default();
        let generator = CandidateGenerator::new(&pools, &budgets);
        let mut rng = StdRng::seed_from_u64(19);
        for code in StrategyCode::ALL {
            assert!(generator.generate(code, &mut rng).is_some(), "{code}");
        }
    }
}
