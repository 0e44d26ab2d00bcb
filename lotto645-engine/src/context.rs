use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use lotto645_db::models::Draw;

use crate::config::{clamp_window, EngineConfig};
use crate::constraints::{ball_colors, BallColor};
use crate::frequency::classify;
use crate::report::{assemble, WindowOutcome};
use crate::strategies::{CandidateGenerator, StrategyCode};

/// Historique immuable des tirages, chargé une fois et partagé par référence.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    /// draws[0] = le plus récent
    draws: Vec<Draw>,
    config: EngineConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentDraw {
    pub round: u32,
    pub date: String,
    pub numbers: [u8; 6],
    pub colors: Vec<BallColor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub latest_round: u32,
    pub total_records: usize,
    pub recent_numbers: Vec<RecentDraw>,
}

impl AnalysisContext {
    pub fn new(mut draws: Vec<Draw>, config: EngineConfig) -> Self {
        draws.sort_by(|a, b| b.round.cmp(&a.round));
        Self { draws, config }
    }

    pub fn empty(config: EngineConfig) -> Self {
        Self::new(Vec::new(), config)
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// 0 si l'historique est vide.
    pub fn latest_round(&self) -> u32 {
        self.draws.first().map(|d| d.round).unwrap_or(0)
    }

    pub fn analyze_and_predict<R: Rng + ?Sized>(&self, window: u32, rng: &mut R) -> WindowOutcome {
        if self.draws.is_empty() {
            return WindowOutcome::no_data();
        }

        let window = clamp_window(window);
        let used = (window as usize).min(self.draws.len());
        let pools = classify(&self.draws[..used]);
        debug!(window, used, hot = pools.hot.len(), cold = pools.cold.len(), "pools calculés");

        let generator = CandidateGenerator::new(&pools, &self.config.budgets);
        let results: Vec<(StrategyCode, Option<_>)> = StrategyCode::ALL
            .iter()
            .map(|&code| (code, generator.generate(code, rng)))
            .collect();

        let analysis = assemble(self.latest_round(), window, used, &pools, &results);
        WindowOutcome::Ready(Box::new(analysis))
    }

    /// Chaque fenêtre est analysée indépendamment, clé = valeur demandée.
    pub fn get_multi_window_results<R: Rng + ?Sized>(
        &self,
        windows: &[u32],
        rng: &mut R,
    ) -> BTreeMap<u32, WindowOutcome> {
        windows
            .iter()
            .map(|&w| (w, self.analyze_and_predict(w, rng)))
            .collect()
    }

    pub fn dataset_info(&self) -> DatasetInfo {
        let recent_numbers = self
            .draws
            .iter()
            .take(5)
            .map(|d| {
                let numbers = d.sorted_numbers();
                RecentDraw {
                    round: d.round,
                    date: d.date.clone(),
                    numbers,
                    colors: ball_colors(&numbers),
                }
            })
            .collect();

        DatasetInfo {
            latest_round: self.latest_round(),
            total_records: self.draws.len(),
            recent_numbers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rotating_draws(n: u32) -> Vec<Draw> {
        (0..n)
            .map(|i| {
                let base = (i % 7) as u8 * 6;
                Draw {
                    round: i + 1,
                    date: format!("2025-{:02}-01", i % 12 + 1),
                    numbers: [base + 6, base + 2, base + 3, base + 4, base + 5, base + 1],
                }
            })
            .collect()
    }

    #[test]
    fn test_sorted_most_recent_first() {
        let ctx = AnalysisContext::new(rotating_draws(30), EngineConfig::default());
        assert_eq!(ctx.latest_round(), 30);
        assert_eq!(ctx.draws()[0].round, 30);
        assert_eq!(ctx.draws()[29].round, 1);
    }

    #[test]
    fn test_empty_context_reports_no_data() {
        let ctx = AnalysisContext::empty(EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(ctx.analyze_and_predict(50, &mut rng), WindowOutcome::NoData { .. }));
        assert_eq!(ctx.latest_round(), 0);
        let info = ctx.dataset_info();
        assert_eq!(info.total_records, 0);
        assert!(info.recent_numbers.is_empty());
    }

    #[test]
    fn test_analysis_contains_all_strategies() {
        let ctx = AnalysisContext::new(rotating_draws(60), EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = ctx.analyze_and_predict(50, &mut rng);
        let analysis = outcome.analysis().unwrap();
        assert_eq!(analysis.latest_round, 60);
        assert_eq!(analysis.window, 50);
        assert_eq!(analysis.draws_used, 50);
        let codes: Vec<StrategyCode> = analysis.predictions.iter().map(|p| p.code).collect();
        assert_eq!(codes, StrategyCode::ALL.to_vec());
    }

    #[test]
    fn test_window_is_clamped() {
        let ctx = AnalysisContext::new(rotating_draws(30), EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = ctx.analyze_and_predict(3, &mut rng);
        let analysis = outcome.analysis().unwrap();
        assert_eq!(analysis.window, 10);
        assert_eq!(analysis.draws_used, 10);

        let outcome = ctx.analyze_and_predict(900, &mut rng);
        let analysis = outcome.analysis().unwrap();
        assert_eq!(analysis.window, 500);
        assert_eq!(analysis.draws_used, 30);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let ctx = AnalysisContext::new(rotating_draws(80), EngineConfig::default());
        let a = ctx.analyze_and_predict(50, &mut StdRng::seed_from_u64(77));
        let b = ctx.analyze_and_predict(50, &mut StdRng::seed_from_u64(77));
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn test_dataset_info_recent_five() {
        let ctx = AnalysisContext::new(rotating_draws(12), EngineConfig::default());
        let info = ctx.dataset_info();
        assert_eq!(info.latest_round, 12);
        assert_eq!(info.total_records, 12);
        assert_eq!(info.recent_numbers.len(), 5);
        assert_eq!(info.recent_numbers[0].round, 12);
        assert!(info.recent_numbers[0].numbers.windows(2).all(|w| w[0] < w[1]));
    }
}
