//! Probabilité exacte qu'un numéro occupe un rang donné parmi 5 numéros
//! tirés sans remise dans `1..=max_regular`.

use crate::models::PICK_COUNT;

const LAST_RANK: usize = PICK_COUNT - 1;

/// Coefficient binomial exact C(n, k) par la forme multiplicative.
///
/// Chaque produit intermédiaire `C(n, i) * (n - i)` est divisible par `i + 1`,
/// le calcul reste donc entier à chaque étape. Sature à `u64::MAX` si le
/// résultat (ou un produit intermédiaire) dépasse la capacité.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = match result.checked_mul((n - i) as u128) {
            Some(product) => product / (i + 1) as u128,
            None => return u64::MAX,
        };
    }
    u64::try_from(result).unwrap_or(u64::MAX)
}

/// P(k, p) = C(k-1, p) * C(max_regular - k, 4-p) / C(max_regular, 5)
///
/// Vaut 0.0 dès que `k` ne peut pas occuper le rang `p` (0 = plus petit).
pub fn position_probability(k: u32, position: usize, max_regular: u32) -> f64 {
    if position > LAST_RANK || k < 1 || k > max_regular {
        return 0.0;
    }
    let p = position as u32;
    let above = (LAST_RANK - position) as u32;
    if k < p + 1 || k + above > max_regular {
        return 0.0;
    }

    let total = binomial(max_regular as u64, PICK_COUNT as u64);
    if total == 0 {
        return 0.0;
    }
    let below_ways = binomial((k - 1) as u64, p as u64);
    let above_ways = binomial((max_regular - k) as u64, above as u64);

    (below_ways as f64 * above_ways as f64) / total as f64
}

/// Distribution complète du rang `position` sur `1..=max_regular`.
pub fn position_distribution(position: usize, max_regular: u32) -> Vec<f64> {
    (1..=max_regular)
        .map(|k| position_probability(k, position, max_regular))
        .collect()
}
