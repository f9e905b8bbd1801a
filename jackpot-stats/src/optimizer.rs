use std::collections::HashSet;

use crate::frequency::{FrequencyTable, Frequencies};
use crate::models::{Combination, PICK_COUNT};

/// Numéros réguliers les plus fréquents explorés par la recherche globale.
pub const GENERAL_REGULAR_POOL: usize = 20;
pub const GENERAL_SPECIAL_POOL: usize = 10;
/// Candidats retenus à chaque rang pour la recherche par position.
pub const POSITION_CANDIDATES: usize = 5;
pub const POSITION_SPECIAL_POOL: usize = 5;
/// Nombre maximal de combinaisons comparées à l'historique par recherche.
pub const MAX_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizedCombinations {
    pub general_repeat: Combination,
    pub general_no_repeat: Combination,
    pub position_repeat: Combination,
    pub position_no_repeat: Combination,
}

impl OptimizedCombinations {
    pub fn placeholder() -> Self {
        Self {
            general_repeat: Combination::PLACEHOLDER,
            general_no_repeat: Combination::PLACEHOLDER,
            position_repeat: Combination::PLACEHOLDER,
            position_no_repeat: Combination::PLACEHOLDER,
        }
    }
}

/// Calcule les quatre stratégies. Sans tirage valide, toutes renvoient la grille par défaut.
pub fn optimize(freqs: &Frequencies, existing: &HashSet<Combination>) -> OptimizedCombinations {
    if freqs.valid_draws == 0 {
        return OptimizedCombinations::placeholder();
    }
    OptimizedCombinations {
        general_repeat: general_frequency_repeat(&freqs.overall, &freqs.special),
        general_no_repeat: general_frequency_no_repeat(&freqs.overall, &freqs.special, existing),
        position_repeat: position_frequency_repeat(&freqs.by_position, &freqs.special),
        position_no_repeat: position_frequency_no_repeat(&freqs.by_position, &freqs.special, existing),
    }
}

/// Les 5 numéros les plus fréquents (triés) et le numéro spécial le plus fréquent.
pub fn general_frequency_repeat(overall: &FrequencyTable, special: &FrequencyTable) -> Combination {
    let ranked = overall.ranked();
    let mut regular = [0u8; PICK_COUNT];
    for (slot, &n) in regular.iter_mut().zip(ranked.iter()) {
        *slot = n;
    }
    regular.sort_unstable();
    Combination::new(regular, top_number(special))
}

/// Meilleure combinaison jamais sortie parmi les plus fréquents, sinon repli sur
/// [`general_frequency_repeat`].
pub fn general_frequency_no_repeat(
    overall: &FrequencyTable,
    special: &FrequencyTable,
    existing: &HashSet<Combination>,
) -> Combination {
    let regular_pool = top_numbers(overall, GENERAL_REGULAR_POOL);
    let special_pool = top_numbers(special, GENERAL_SPECIAL_POOL);
    let mut attempts = 0;

    'search: for subset in Subsets::<PICK_COUNT>::new(regular_pool.len()) {
        let mut regular = subset.map(|idx| regular_pool[idx]);
        regular.sort_unstable();
        for &s in &special_pool {
            if attempts >= MAX_ATTEMPTS {
                break 'search;
            }
            attempts += 1;
            let candidate = Combination::new(regular, s);
            if !existing.contains(&candidate) {
                return candidate;
            }
        }
    }

    log::debug!("Aucune combinaison inédite après {attempts} essais (fréquence globale), repli");
    general_frequency_repeat(overall, special)
}

/// Numéro le plus fréquent à chaque rang. Croissant par construction.
pub fn position_frequency_repeat(
    by_position: &[FrequencyTable; PICK_COUNT],
    special: &FrequencyTable,
) -> Combination {
    let regular = std::array::from_fn(|p| top_number(&by_position[p]));
    Combination::new(regular, top_number(special))
}

/// Produit cartésien des meilleurs candidats par rang, numéros distincts et combinaison
/// inédite ; l'ordre des rangs est conservé. Repli sur [`position_frequency_repeat`].
pub fn position_frequency_no_repeat(
    by_position: &[FrequencyTable; PICK_COUNT],
    special: &FrequencyTable,
    existing: &HashSet<Combination>,
) -> Combination {
    let candidates: [Vec<u8>; PICK_COUNT] =
        std::array::from_fn(|p| top_numbers(&by_position[p], POSITION_CANDIDATES));
    let special_pool = top_numbers(special, POSITION_SPECIAL_POOL);
    let radices = std::array::from_fn(|p| candidates[p].len());
    let mut attempts = 0;

    'search: for digits in Odometer::<PICK_COUNT>::new(radices) {
        let numbers: [u8; PICK_COUNT] = std::array::from_fn(|p| candidates[p][digits[p]]);
        let key = Combination::new(numbers, 0).sorted().regular;
        if key.windows(2).any(|w| w[0] == w[1]) {
            continue;
        }
        for &s in &special_pool {
            if attempts >= MAX_ATTEMPTS {
                break 'search;
            }
            attempts += 1;
            if !existing.contains(&Combination::new(key, s)) {
                return Combination::new(numbers, s);
            }
        }
    }

    log::debug!("Aucune combinaison inédite après {attempts} essais (fréquence par position), repli");
    position_frequency_repeat(by_position, special)
}

fn top_numbers(table: &FrequencyTable, count: usize) -> Vec<u8> {
    let mut ranked = table.ranked();
    ranked.truncate(count);
    ranked
}

fn top_number(table: &FrequencyTable) -> u8 {
    table.ranked().first().copied().unwrap_or(1)
}

/// Sous-ensembles de taille `K` de `0..n`, en ordre lexicographique.
struct Subsets<const K: usize> {
    n: usize,
    indices: [usize; K],
    done: bool,
}

impl<const K: usize> Subsets<K> {
    fn new(n: usize) -> Self {
        Self {
            n,
            indices: std::array::from_fn(|i| i),
            done: K == 0 || K > n,
        }
    }
}

impl<const K: usize> Iterator for Subsets<K> {
    type Item = [usize; K];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices;

        // Indice le plus à droite encore incrémentable
        let mut i = K;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - K + i {
                self.indices[i] += 1;
                for j in (i + 1)..K {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(current)
    }
}

/// Compteur à base mixte : le dernier chiffre varie le plus vite.
struct Odometer<const K: usize> {
    radices: [usize; K],
    digits: [usize; K],
    done: bool,
}

impl<const K: usize> Odometer<K> {
    fn new(radices: [usize; K]) -> Self {
        Self {
            radices,
            digits: [0; K],
            done: radices.iter().any(|&r| r == 0),
        }
    }
}

impl<const K: usize> Iterator for Odometer<K> {
    type Item = [usize; K];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.digits;

        let mut i = K;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            self.digits[i] += 1;
            if self.digits[i] < self.radices[i] {
                break;
            }
            self.digits[i] = 0;
        }

        Some(current)
    }
}
