use std::collections::BTreeMap;

use lotto645_db::models::{Draw, MAX_NUMBER, MIN_NUMBER};

/// Seuil d'occurrences à partir duquel un numéro est « chaud ».
pub const HOT_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pools {
    /// numéro -> occurrences, uniquement les numéros vus au moins une fois
    pub table: BTreeMap<u8, u32>,
    pub hot: Vec<u8>,
    /// parallèle à `hot`
    pub weights: Vec<u32>,
    pub cold: Vec<u8>,
}

impl Pools {
    pub fn is_cold(&self, number: u8) -> bool {
        self.cold.binary_search(&number).is_ok()
    }

    /// Union chaud ∪ froid, soit 1..=45 dans l'ordre croissant.
    pub fn all_numbers(&self) -> Vec<u8> {
        let mut all: Vec<u8> = self.hot.iter().chain(self.cold.iter()).copied().collect();
        all.sort_unstable();
        all
    }
}

/// Compte les occurrences sur la fenêtre (draws[0] = le plus récent) et
/// sépare les numéros chauds (>= 2) des froids.
pub fn classify(window: &[Draw]) -> Pools {
    let mut counts = [0u32; MAX_NUMBER as usize];

    for draw in window {
        for &n in &draw.numbers {
            if (MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                counts[(n - 1) as usize] += 1;
            }
        }
    }

    let mut table = BTreeMap::new();
    let mut hot = Vec::new();
    let mut weights = Vec::new();
    let mut cold = Vec::new();

    for n in MIN_NUMBER..=MAX_NUMBER {
        let count = counts[(n - 1) as usize];
        if count > 0 {
            table.insert(n, count);
        }
        if count >= HOT_THRESHOLD {
            hot.push(n);
            weights.push(count);
        } else {
            cold.push(n);
        }
    }

    Pools { table, hot, weights, cold }
}
