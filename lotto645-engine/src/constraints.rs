//! Indicateurs statistiques d'une grille. Toutes les fonctions sont pures.

use serde::Serialize;

/// Frontière basse/haute : 1-22 = bas, 23-45 = haut.
pub const LOW_MAX: u8 = 22;
pub const SUM_BAND: (u32, u32) = (100, 170);
pub const MIXED_SUM_BAND: (u32, u32) = (80, 200);
pub const LAST_DIGIT_BAND: (u32, u32) = (15, 35);
pub const MIN_AC: u32 = 7;
pub const SECTION_COUNT: usize = 5;

pub fn sum(numbers: &[u8]) -> u32 {
    numbers.iter().map(|&n| n as u32).sum()
}

pub fn odd_count(numbers: &[u8]) -> usize {
    numbers.iter().filter(|&&n| n % 2 != 0).count()
}

/// (bas, haut)
pub fn high_low(numbers: &[u8]) -> (usize, usize) {
    let low = numbers.iter().filter(|&&n| n <= LOW_MAX).count();
    (low, numbers.len() - low)
}

/// Valeur AC : nombre de différences absolues distinctes entre paires, moins 5.
pub fn ac_value(numbers: &[u8]) -> u32 {
    let mut seen = [false; 256];
    let mut distinct = 0u32;
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            let d = numbers[i].abs_diff(numbers[j]) as usize;
            if d > 0 && !seen[d] {
                seen[d] = true;
                distinct += 1;
            }
        }
    }
    distinct.saturating_sub(numbers.len().saturating_sub(1) as u32)
}

pub fn last_digit_sum(numbers: &[u8]) -> u32 {
    numbers.iter().map(|&n| (n % 10) as u32).sum()
}

/// Somme des unités dans [15,35] et aucune unité répétée 3 fois ou plus.
pub fn last_digit_ok(numbers: &[u8]) -> bool {
    let s = last_digit_sum(numbers);
    if s < LAST_DIGIT_BAND.0 || s > LAST_DIGIT_BAND.1 {
        return false;
    }
    let mut counts = [0u8; 10];
    for &n in numbers {
        counts[(n % 10) as usize] += 1;
    }
    counts.iter().all(|&c| c < 3)
}

fn section_of(n: u8) -> usize {
    match n {
        1..=10 => 0,
        11..=20 => 1,
        21..=30 => 2,
        31..=40 => 3,
        _ => 4,
    }
}

pub fn section_histogram(numbers: &[u8]) -> [u8; SECTION_COUNT] {
    let mut sections = [0u8; SECTION_COUNT];
    for &n in numbers {
        sections[section_of(n)] += 1;
    }
    sections
}

/// Trois numéros consécutifs (n, n+1, n+2) dans la grille triée.
pub fn has_consecutive_triple(numbers: &[u8]) -> bool {
    numbers
        .windows(3)
        .any(|w| w[1] == w[0] + 1 && w[2] == w[0] + 2)
}

// ── Prédicats d'acceptation ─────────────────────────────────────────

pub fn parity_balanced(numbers: &[u8]) -> bool {
    (2..=4).contains(&odd_count(numbers))
}

pub fn sum_in_band(numbers: &[u8]) -> bool {
    (SUM_BAND.0..=SUM_BAND.1).contains(&sum(numbers))
}

pub fn mixed_sum_in_band(numbers: &[u8]) -> bool {
    (MIXED_SUM_BAND.0..=MIXED_SUM_BAND.1).contains(&sum(numbers))
}

pub fn low_balanced(numbers: &[u8]) -> bool {
    (2..=4).contains(&high_low(numbers).0)
}

pub fn section_dispersed(numbers: &[u8]) -> bool {
    section_histogram(numbers).iter().all(|&c| c < 5)
}

/// Toutes les contraintes de la stratégie F.
pub fn precision_ok(numbers: &[u8]) -> bool {
    sum_in_band(numbers)
        && parity_balanced(numbers)
        && low_balanced(numbers)
        && ac_value(numbers) >= MIN_AC
        && last_digit_ok(numbers)
        && !has_consecutive_triple(numbers)
}

// ── Couleurs d'affichage ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallColor {
    Yellow,
    Blue,
    Red,
    Gray,
    Green,
}

impl BallColor {
    pub fn of(number: u8) -> Self {
        match section_of(number) {
            0 => BallColor::Yellow,
            1 => BallColor::Blue,
            2 => BallColor::Red,
            3 => BallColor::Gray,
            _ => BallColor::Green,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BallColor::Yellow => "#FBC400",
            BallColor::Blue => "#69C8F2",
            BallColor::Red => "#FF7272",
            BallColor::Gray => "#AAAAAA",
            BallColor::Green => "#B0D840",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            BallColor::Yellow => (0xFB, 0xC4, 0x00),
            BallColor::Blue => (0x69, 0xC8, 0xF2),
            BallColor::Red => (0xFF, 0x72, 0x72),
            BallColor::Gray => (0xAA, 0xAA, 0xAA),
            BallColor::Green => (0xB0, 0xD8, 0x40),
        }
    }
}

impl Serialize for BallColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

pub fn ball_colors(numbers: &[u8]) -> Vec<BallColor> {
    numbers.iter().map(|&n| BallColor::of(n)).collect()
}
