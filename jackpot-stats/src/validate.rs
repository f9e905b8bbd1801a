use std::collections::HashSet;

use serde_json::Value;

use crate::models::{Combination, GameConfig, ValidDraw, PICK_COUNT};

/// Valide un tirage brut. Retourne `None` pour tout enregistrement mal formé,
/// sans jamais échouer.
pub fn parse_draw(value: &Value, config: &GameConfig) -> Option<ValidDraw> {
    let (mut numbers, special) = raw_shape(value)?;

    if !numbers.iter().all(|&n| config.regular_in_range(n)) {
        return None;
    }
    if !config.special_in_range(special) {
        return None;
    }

    numbers.sort_unstable();
    if numbers.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }

    let mut sorted = [0u8; PICK_COUNT];
    for (slot, &n) in sorted.iter_mut().zip(numbers.iter()) {
        *slot = n as u8;
    }
    Some(ValidDraw {
        numbers: sorted,
        special: special as u8,
    })
}

/// Combinaisons déjà sorties, sur tous les tirages de forme correcte (bornes non vérifiées).
pub fn existing_combinations(draws: &[Value]) -> HashSet<Combination> {
    draws
        .iter()
        .filter_map(raw_shape)
        .filter_map(|(numbers, special)| {
            // Hors u8 : ne peut coïncider avec aucun candidat
            let special = u8::try_from(special).ok()?;
            let mut regular = [0u8; PICK_COUNT];
            for (slot, &n) in regular.iter_mut().zip(numbers.iter()) {
                *slot = u8::try_from(n).ok()?;
            }
            Some(Combination::new(regular, special).sorted())
        })
        .collect()
}

/// Objet avec `numbers` (5 entiers) et `specialBall` (entier).
fn raw_shape(value: &Value) -> Option<([i64; PICK_COUNT], i64)> {
    let object = value.as_object()?;
    let raw_numbers = object.get("numbers")?.as_array()?;
    if raw_numbers.len() != PICK_COUNT {
        return None;
    }
    let mut numbers = [0i64; PICK_COUNT];
    for (slot, raw) in numbers.iter_mut().zip(raw_numbers) {
        *slot = raw.as_i64()?;
    }
    let special = object.get("specialBall")?.as_i64()?;
    Some((numbers, special))
}
