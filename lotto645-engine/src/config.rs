use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const MIN_WINDOW: u32 = 10;
pub const MAX_WINDOW: u32 = 500;

/// Ramène une fenêtre demandée dans [10, 500].
pub fn clamp_window(window: u32) -> u32 {
    window.clamp(MIN_WINDOW, MAX_WINDOW)
}

/// Plafonds d'itérations de l'échantillonnage par rejet, fixés pour le processus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryBudgets {
    pub parity: u32,
    pub sum: u32,
    pub section: u32,
    pub precision: u32,
    pub precision_relaxed: u32,
    pub mixed: u32,
}

impl Default for RetryBudgets {
    fn default() -> Self {
        Self {
            parity: 500,
            sum: 500,
            section: 500,
            precision: 10_000,
            precision_relaxed: 1_000,
            mixed: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub budgets: RetryBudgets,
    pub default_window: u32,
    pub multi_windows: Vec<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budgets: RetryBudgets::default(),
            default_window: 50,
            multi_windows: vec![30, 50, 100],
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let b = &self.budgets;
        let budgets = [
            ("parity", b.parity),
            ("sum", b.sum),
            ("section", b.section),
            ("precision", b.precision),
            ("precision_relaxed", b.precision_relaxed),
            ("mixed", b.mixed),
        ];
        if let Some((name, _)) = budgets.iter().find(|(_, v)| *v == 0) {
            return Err(EngineError::InvalidConfig(format!("budget '{name}' nul")));
        }
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&self.default_window) {
            return Err(EngineError::InvalidConfig(format!(
                "fenêtre par défaut {} hors de [{MIN_WINDOW}, {MAX_WINDOW}]",
                self.default_window
            )));
        }
        if self.multi_windows.is_empty() {
            return Err(EngineError::InvalidConfig("aucune fenêtre multiple".into()));
        }
        Ok(())
    }
}
