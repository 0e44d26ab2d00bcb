use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use lotto645_db::models::PICK_COUNT;

use crate::candidate::Candidate;

/// Comment une grille a été obtenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Acceptance {
    /// Critère principal satisfait au tirage n° `attempts`.
    Accepted { attempts: u32 },
    /// Critère principal épuisé, critère allégé satisfait.
    Relaxed { attempts: u32 },
    /// Budget épuisé : dernier tirage uniforme, sans contrôle.
    Fallback,
    /// Mécanisme indisponible (poids dégénérés, pool froid trop petit) : tirage uniforme.
    UniformSubstitute,
}

impl Acceptance {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Acceptance::Accepted { .. })
    }
}

impl std::fmt::Display for Acceptance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Acceptance::Accepted { attempts } => write!(f, "OK ({attempts})"),
            Acceptance::Relaxed { attempts } => write!(f, "ALLÉGÉ ({attempts})"),
            Acceptance::Fallback => write!(f, "REPLI"),
            Acceptance::UniformSubstitute => write!(f, "UNIFORME"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampled {
    pub candidate: Candidate,
    pub acceptance: Acceptance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Accepted { candidate: Candidate, attempts: u32 },
    Exhausted { last: Candidate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub budget: u32,
}

impl RetryPolicy {
    pub fn new(budget: u32) -> Self {
        Self { budget }
    }

    /// Tire jusqu'à `budget` grilles et rend la première acceptée, sinon la
    /// dernière tirée. Un budget nul effectue quand même un tirage.
    pub fn sample_or_fallback<R, D, P>(&self, rng: &mut R, mut draw: D, accept: P) -> SampleOutcome
    where
        R: Rng + ?Sized,
        D: FnMut(&mut R) -> Candidate,
        P: Fn(&Candidate) -> bool,
    {
        let mut last = None;
        for attempt in 1..=self.budget {
            let candidate = draw(rng);
            if accept(&candidate) {
                return SampleOutcome::Accepted { candidate, attempts: attempt };
            }
            last = Some(candidate);
        }
        let last = match last {
            Some(c) => c,
            None => draw(rng),
        };
        SampleOutcome::Exhausted { last }
    }
}

/// 6 numéros sans remise, uniformément. Le pool doit contenir au moins 6 numéros distincts.
pub(crate) fn uniform_draw<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> Candidate {
    let picked: Vec<u8> = pool.choose_multiple(rng, PICK_COUNT).copied().collect();
    Candidate::from_pool_pick(&picked)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightedOutcome {
    Sampled(Candidate),
    Unavailable(String),
}

/// 6 numéros sans remise, avec probabilité proportionnelle au poids.
pub fn weighted_draw<R: Rng + ?Sized>(pool: &[u8], weights: &[u32], rng: &mut R) -> WeightedOutcome {
    if pool.len() != weights.len() {
        return WeightedOutcome::Unavailable(format!(
            "{} poids pour {} numéros",
            weights.len(),
            pool.len()
        ));
    }
    if pool.len() < PICK_COUNT {
        return WeightedOutcome::Unavailable(format!("pool de {} numéros", pool.len()));
    }

    let mut available: Vec<(u8, f64)> = pool
        .iter()
        .zip(weights)
        .map(|(&n, &w)| (n, w as f64))
        .collect();
    let mut selected = Vec::with_capacity(PICK_COUNT);

    for _ in 0..PICK_COUNT {
        let w: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = match WeightedIndex::new(&w) {
            Ok(d) => d,
            Err(e) => return WeightedOutcome::Unavailable(e.to_string()),
        };
        let idx = dist.sample(rng);
        let (number, _) = available.remove(idx);
        selected.push(number);
    }

    WeightedOutcome::Sampled(Candidate::from_pool_pick(&selected))
}
