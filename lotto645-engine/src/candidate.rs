use serde::{Serialize, Serializer};

use lotto645_db::models::{MAX_NUMBER, MIN_NUMBER, PICK_COUNT};

use crate::error::EngineError;

/// Grille de 6 numéros distincts dans [1,45], toujours triée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate([u8; PICK_COUNT]);

impl Candidate {
    pub fn new(numbers: [u8; PICK_COUNT]) -> Result<Self, EngineError> {
        let mut sorted = numbers;
        sorted.sort_unstable();
        if let Some(&n) = sorted.iter().find(|&&n| !(MIN_NUMBER..=MAX_NUMBER).contains(&n)) {
            return Err(EngineError::InvalidCandidate(format!(
                "numéro {n} hors limites ({MIN_NUMBER}-{MAX_NUMBER})"
            )));
        }
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(EngineError::InvalidCandidate(format!("numéro en double : {}", w[0])));
        }
        Ok(Self(sorted))
    }

    /// Construit une grille depuis un tirage sans remise sur un pool valide.
    /// Les numéros sont supposés distincts et dans les bornes.
    pub(crate) fn from_pool_pick(picked: &[u8]) -> Self {
        debug_assert_eq!(picked.len(), PICK_COUNT);
        let mut numbers = [0u8; PICK_COUNT];
        numbers.copy_from_slice(picked);
        numbers.sort_unstable();
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }
}

impl Serialize for Candidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:2}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}
