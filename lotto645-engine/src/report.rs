use serde::Serialize;

use crate::candidate::Candidate;
use crate::constraints::{self, BallColor, SECTION_COUNT};
use crate::frequency::Pools;
use crate::sampler::{Acceptance, Sampled};
use crate::strategies::StrategyCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintReport {
    pub sum: u32,
    pub odd_count: usize,
    pub low_count: usize,
    pub ac_value: u32,
    pub last_digit_sum: u32,
    pub last_digit_ok: bool,
    pub section: [u8; SECTION_COUNT],
    pub has_consecutive_triple: bool,
    pub cold_count: usize,
}

impl ConstraintReport {
    pub fn evaluate(candidate: &Candidate, pools: &Pools) -> Self {
        let nums = candidate.numbers();
        Self {
            sum: constraints::sum(nums),
            odd_count: constraints::odd_count(nums),
            low_count: constraints::high_low(nums).0,
            ac_value: constraints::ac_value(nums),
            last_digit_sum: constraints::last_digit_sum(nums),
            last_digit_ok: constraints::last_digit_ok(nums),
            section: constraints::section_histogram(nums),
            has_consecutive_triple: constraints::has_consecutive_triple(nums),
            cold_count: nums.iter().filter(|&&n| pools.is_cold(n)).count(),
        }
    }

    /// « impairs:pairs », ex. "3:3"
    pub fn odd_even(&self) -> String {
        format!("{}:{}", self.odd_count, 6 - self.odd_count)
    }

    /// « bas:hauts », ex. "2:4"
    pub fn high_low(&self) -> String {
        format!("{}:{}", self.low_count, 6 - self.low_count)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub code: StrategyCode,
    pub name: &'static str,
    pub numbers: Candidate,
    pub colors: Vec<BallColor>,
    #[serde(flatten)]
    pub report: ConstraintReport,
    pub odd_even: String,
    pub high_low: String,
    pub acceptance: Acceptance,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyChart {
    pub numbers: Vec<u8>,
    pub counts: Vec<u32>,
    pub colors: Vec<BallColor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub latest_round: u32,
    pub window: u32,
    pub draws_used: usize,
    pub hot_pool_size: usize,
    pub cold_pool_size: usize,
    pub hot_pool: Vec<u8>,
    pub cold_pool: Vec<u8>,
    pub predictions: Vec<PredictionRecord>,
    pub frequency_data: FrequencyChart,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WindowOutcome {
    Ready(Box<Analysis>),
    NoData { error: String },
}

impl WindowOutcome {
    pub fn no_data() -> Self {
        WindowOutcome::NoData {
            error: "Aucune donnée de tirage disponible".to_string(),
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            WindowOutcome::Ready(a) => Some(a),
            WindowOutcome::NoData { .. } => None,
        }
    }
}

pub fn prediction_record(code: StrategyCode, sampled: &Sampled, pools: &Pools) -> PredictionRecord {
    let report = ConstraintReport::evaluate(&sampled.candidate, pools);
    PredictionRecord {
        code,
        name: code.name(),
        numbers: sampled.candidate,
        colors: constraints::ball_colors(sampled.candidate.numbers()),
        odd_even: report.odd_even(),
        high_low: report.high_low(),
        report,
        acceptance: sampled.acceptance,
    }
}

pub fn frequency_chart(pools: &Pools) -> FrequencyChart {
    FrequencyChart {
        numbers: pools.hot.clone(),
        counts: pools.weights.clone(),
        colors: constraints::ball_colors(&pools.hot),
    }
}

/// Les stratégies sans grille (`None`) sont omises.
pub fn assemble(
    latest_round: u32,
    window: u32,
    draws_used: usize,
    pools: &Pools,
    results: &[(StrategyCode, Option<Sampled>)],
) -> Analysis {
    let predictions = results
        .iter()
        .filter_map(|(code, sampled)| {
            sampled.as_ref().map(|s| prediction_record(*code, s, pools))
        })
        .collect();

    Analysis {
        latest_round,
        window,
        draws_used,
        hot_pool_size: pools.hot.len(),
        cold_pool_size: pools.cold.len(),
        hot_pool: pools.hot.clone(),
        cold_pool: pools.cold.clone(),
        predictions,
        frequency_data: frequency_chart(pools),
    }
}
