use serde::Serialize;

use crate::error::EngineError;
use crate::strategies::StrategyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub strength: &'static str,
    pub icon: &'static str,
}

pub fn describe(code: StrategyCode) -> AlgorithmInfo {
    let (description, strength, icon) = match code {
        StrategyCode::A => (
            "Tirage entièrement aléatoire dans le pool chaud (numéros sortis au moins 2 fois)",
            "Imprévisibilité",
            "🎲",
        ),
        StrategyCode::B => (
            "Probabilité de sélection proportionnelle au nombre de sorties",
            "Analyse des fréquences",
            "📊",
        ),
        StrategyCode::C => (
            "Ratio impairs/pairs maintenu entre 2:4 et 4:2",
            "Équilibre pair/impair",
            "⚖️",
        ),
        StrategyCode::D => (
            "Somme des 6 numéros limitée à 100~170",
            "Statistique des sommes",
            "🎯",
        ),
        StrategyCode::E => (
            "Pas de concentration sur une dizaine + aucune suite de 3 numéros",
            "Répartition homogène",
            "🔀",
        ),
        StrategyCode::F => (
            "Somme, pair/impair, bas/haut, valeur AC, unités et suites : toutes les conditions",
            "Combinaison statistique complète",
            "🌟",
        ),
        StrategyCode::G => (
            "Mélange de numéros chauds et froids pour garder une part d'imprévu",
            "Protection contre le biais des données",
            "🛡️",
        ),
    };
    AlgorithmInfo {
        name: code.name(),
        description,
        strength,
        icon,
    }
}

/// Recherche par code (insensible à la casse).
pub fn algorithm_description(code: &str) -> Result<AlgorithmInfo, EngineError> {
    let code: StrategyCode = code.parse()?;
    Ok(describe(code))
}
