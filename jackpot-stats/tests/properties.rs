//! Property-based tests for aggregation, probabilities and strategies.

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::{json, Value};

use jackpot_stats::frequency::aggregate;
use jackpot_stats::optimizer::{general_frequency_no_repeat, general_frequency_repeat};
use jackpot_stats::position::position_probability;
use jackpot_stats::residuals::{position_residuals, uniform_residuals};
use jackpot_stats::validate::existing_combinations;
use jackpot_stats::{compute_for_game, verify, DrawRecord, Game};

/// Strategy: 5 distinct numbers in `1..=max` plus a special number in `1..=special`.
fn valid_draw(max: u8, special: u8) -> impl Strategy<Value = Value> {
    (prop::sample::subsequence((1..=max).collect::<Vec<u8>>(), 5), 1..=special, any::<bool>())
        .prop_map(|(numbers, special, reversed)| {
            let mut numbers: [u8; 5] = numbers.try_into().unwrap();
            if reversed {
                numbers.reverse();
            }
            let record = DrawRecord {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                numbers,
                special_ball: special,
            };
            serde_json::to_value(record).unwrap()
        })
}

/// Strategy: draws that are usually malformed or out of range.
fn noisy_draw() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        prop::collection::vec(-5i64..80, 0..7)
            .prop_map(|numbers| json!({"numbers": numbers, "specialBall": 1})),
        (prop::collection::vec(1i64..=70, 5), -3i64..30)
            .prop_map(|(numbers, special)| json!({"numbers": numbers, "specialBall": special})),
    ]
}

fn draw_list() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(prop_oneof![3 => valid_draw(70, 25), 1 => noisy_draw()], 0..60)
}

proptest! {
    // 1. Table totals match the number of valid draws
    #[test]
    fn totals_match_valid_draws(draws in draw_list()) {
        let config = Game::MegaMillions.config();
        let freqs = aggregate(&draws, &config);
        prop_assert_eq!(freqs.overall.total(), freqs.valid_draws * 5);
        prop_assert_eq!(freqs.special.total(), freqs.valid_draws);
        for table in &freqs.by_position {
            prop_assert_eq!(table.total(), freqs.valid_draws);
        }
        prop_assert!(freqs.totals_consistent());
    }

    // 2. Every assembled record passes the consistency check
    #[test]
    fn records_verify(draws in draw_list()) {
        let record = compute_for_game(&draws, Game::MegaMillions);
        prop_assert!(verify(&record).is_ok());
    }

    // 3. Impossible ranks have zero probability
    #[test]
    fn impossible_rank_is_zero(max in 5u32..=120, k in 0u32..=130, p in 0usize..5) {
        let possible = k >= p as u32 + 1 && k + (4 - p as u32) <= max;
        let prob = position_probability(k, p, max);
        if possible {
            prop_assert!(prob > 0.0);
        } else {
            prop_assert_eq!(prob, 0.0);
        }
    }

    // 4. Each rank distribution sums to one
    #[test]
    fn rank_distribution_sums_to_one(max in 5u32..=120, p in 0usize..5) {
        let sum: f64 = (1..=max).map(|k| position_probability(k, p, max)).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9, "max={} p={} sum={}", max, p, sum);
    }

    // 5. Residual computation is deterministic down to the bit
    #[test]
    fn residuals_are_pure(draws in draw_list()) {
        let config = Game::Powerball.config();
        let freqs = aggregate(&draws, &config);
        let trials = freqs.valid_draws;
        let a = uniform_residuals(&freqs.special, trials);
        let b = uniform_residuals(&freqs.special, trials);
        prop_assert_eq!(&a, &b);
        for p in 0..5 {
            let x = position_residuals(&freqs.by_position[p], trials, p);
            let y = position_residuals(&freqs.by_position[p], trials, p);
            for ((_, ex), (_, ey)) in x.iter().zip(y.iter()) {
                prop_assert_eq!(ex.residual.to_bits(), ey.residual.to_bits());
            }
        }
    }

    // 6. No-repeat strategies never return a drawn combination unless they fell back
    #[test]
    fn no_repeat_avoids_history(draws in prop::collection::vec(valid_draw(70, 25), 1..60)) {
        let record = compute_for_game(&draws, Game::MegaMillions);
        let existing = existing_combinations(&draws);
        for combo in [
            record.optimized_by_general_frequency_no_repeat,
            record.optimized_by_position_frequency_no_repeat,
        ] {
            let mut regular = combo.regular;
            regular.sort_unstable();
            prop_assert!(regular.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(!existing.contains(&combo.sorted()), "{:?}", combo);
        }
    }
}

#[test]
fn no_repeat_moves_away_from_most_frequent_tuple() {
    let draws: Vec<Value> = (0..6)
        .map(|_| json!({"numbers": [8, 16, 24, 32, 40], "specialBall": 12}))
        .chain([json!({"numbers": [1, 2, 3, 4, 5], "specialBall": 3})])
        .collect();
    let config = Game::MegaMillions.config();
    let freqs = aggregate(&draws, &config);
    let existing = existing_combinations(&draws);

    let repeat = general_frequency_repeat(&freqs.overall, &freqs.special);
    assert_eq!(repeat.to_array(), [8, 16, 24, 32, 40, 12]);
    assert!(existing.contains(&repeat));

    let fresh = general_frequency_no_repeat(&freqs.overall, &freqs.special, &existing);
    assert_ne!(fresh, repeat);
    assert!(!existing.contains(&fresh.sorted()));
    assert_eq!(fresh.to_array(), [8, 16, 24, 32, 40, 3]);
}

#[test]
fn empty_history_search_is_unconstrained() {
    let draws = vec![json!({"numbers": [9, 19, 29, 39, 49], "specialBall": 4})];
    let freqs = aggregate(&draws, &Game::Powerball.config());
    let combo = general_frequency_no_repeat(&freqs.overall, &freqs.special, &HashSet::new());
    assert_eq!(combo.to_array(), [9, 19, 29, 39, 49, 4]);
}

#[test]
fn position_repeat_is_ascending_on_spread_history() {
    let draws = vec![
        json!({"numbers": [2, 14, 33, 51, 66], "specialBall": 8}),
        json!({"numbers": [5, 14, 29, 47, 69], "specialBall": 8}),
        json!({"numbers": [2, 19, 33, 58, 62], "specialBall": 1}),
        json!({"numbers": [9, 21, 40, 51, 69], "specialBall": 20}),
        json!({"numbers": [2, 11, 37, 44, 66], "specialBall": 8}),
    ];
    let record = compute_for_game(&draws, Game::Powerball);
    let combo = record.optimized_by_position_frequency_repeat;
    assert_eq!(combo.to_array(), [2, 14, 33, 51, 66, 8]);
    for i in 0..4 {
        assert!(combo.regular[i] <= combo.regular[i + 1]);
    }
}
