use serde_json::Value;

use crate::models::{GameConfig, PICK_COUNT};
use crate::validate::parse_draw;

/// Compteurs denses sur `1..=domain`, indexés par `numéro - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u32>,
}

impl FrequencyTable {
    pub fn new(domain: u8) -> Self {
        Self {
            counts: vec![0; domain as usize],
        }
    }

    pub fn domain(&self) -> u8 {
        self.counts.len() as u8
    }

    pub fn increment(&mut self, number: u8) {
        let idx = (number as usize).wrapping_sub(1);
        if idx < self.counts.len() {
            self.counts[idx] += 1;
        }
    }

    pub fn get(&self, number: u8) -> u32 {
        let idx = (number as usize).wrapping_sub(1);
        self.counts.get(idx).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(numéro, compteur)` par numéro croissant.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(idx, &count)| ((idx + 1) as u8, count))
    }

    /// Numéros du plus fréquent au moins fréquent ; à égalité, le plus petit d'abord.
    pub fn ranked(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = (1..=self.domain()).collect();
        numbers.sort_by(|&a, &b| self.get(b).cmp(&self.get(a)));
        numbers
    }
}

/// Fréquences agrégées sur les tirages valides d'une variante.
#[derive(Debug, Clone)]
pub struct Frequencies {
    pub valid_draws: u32,
    pub overall: FrequencyTable,
    pub by_position: [FrequencyTable; PICK_COUNT],
    pub special: FrequencyTable,
}

impl Frequencies {
    pub fn empty(config: &GameConfig) -> Self {
        Self {
            valid_draws: 0,
            overall: FrequencyTable::new(config.max_regular()),
            by_position: std::array::from_fn(|_| FrequencyTable::new(config.max_regular())),
            special: FrequencyTable::new(config.max_special()),
        }
    }

    /// Vérifie les totaux attendus ; un écart est journalisé, jamais fatal.
    pub fn totals_consistent(&self) -> bool {
        if self.valid_draws == 0 {
            return true;
        }
        let mut consistent = true;

        let expected_regular = self.valid_draws * PICK_COUNT as u32;
        let total_regular = self.overall.total();
        if total_regular != expected_regular {
            log::warn!(
                "Total des fréquences régulières incohérent ({} au lieu de {})",
                total_regular,
                expected_regular
            );
            consistent = false;
        }

        let total_special = self.special.total();
        if total_special != self.valid_draws {
            log::warn!(
                "Total des fréquences spéciales incohérent ({} au lieu de {})",
                total_special,
                self.valid_draws
            );
            consistent = false;
        }

        for (position, table) in self.by_position.iter().enumerate() {
            let total = table.total();
            if total != self.valid_draws {
                log::warn!(
                    "Position {} : total incohérent ({} au lieu de {})",
                    position,
                    total,
                    self.valid_draws
                );
                consistent = false;
            }
        }

        consistent
    }
}

/// Valide et compte en une seule passe. Un tirage invalide ne touche aucun compteur.
pub fn aggregate(draws: &[Value], config: &GameConfig) -> Frequencies {
    let mut freqs = Frequencies::empty(config);

    for draw in draws.iter().filter_map(|value| parse_draw(value, config)) {
        freqs.valid_draws += 1;
        // numbers est trié : l'index est le rang
        for (rank, &n) in draw.numbers.iter().enumerate() {
            freqs.overall.increment(n);
            freqs.by_position[rank].increment(n);
        }
        freqs.special.increment(draw.special);
    }

    freqs.totals_consistent();
    freqs
}
