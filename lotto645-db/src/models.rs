use anyhow::{bail, Result};

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub round: u32,
    pub date: String,
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    /// Numéros triés par ordre croissant (l'ordre de tirage n'est pas conservé).
    pub fn sorted_numbers(&self) -> [u8; PICK_COUNT] {
        let mut numbers = self.numbers;
        numbers.sort_unstable();
        numbers
    }
}

pub fn validate_draw(round: u32, numbers: &[u8; PICK_COUNT]) -> Result<()> {
    if round == 0 {
        bail!("Numéro de tirage invalide : 0");
    }
    for &n in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            bail!("Numéro {} hors limites ({}-{})", n, MIN_NUMBER, MAX_NUMBER);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}
