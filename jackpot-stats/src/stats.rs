use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::frequency::aggregate;
use crate::models::{Combination, Game, GameConfig, PICK_COUNT};
use crate::optimizer::optimize;
use crate::residuals::{position_residuals, uniform_residuals, ResidualTable};
use crate::validate::existing_combinations;

/// Résidus des cinq rangs, sérialisés sous les clés `position0` à `position4`.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionResiduals(pub [ResidualTable; PICK_COUNT]);

impl PositionResiduals {
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ResidualTable)> + '_ {
        self.0.iter().enumerate()
    }
}

impl Serialize for PositionResiduals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PICK_COUNT))?;
        for (position, table) in self.iter() {
            map.serialize_entry(&format!("position{position}"), table)?;
        }
        map.end()
    }
}

/// Statistiques complètes d'une variante, prêtes à être écrites en JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    #[serde(rename = "type")]
    pub game_type: String,
    pub total_draws: u32,
    pub optimized_by_general_frequency_repeat: Combination,
    pub optimized_by_general_frequency_no_repeat: Combination,
    pub optimized_by_position_frequency_repeat: Combination,
    pub optimized_by_position_frequency_no_repeat: Combination,
    pub regular_numbers: ResidualTable,
    pub special_ball_numbers: ResidualTable,
    pub by_position: PositionResiduals,
}

pub fn compute_statistics(draws: &[Value], game_type: &str, config: &GameConfig) -> StatisticsRecord {
    let existing = existing_combinations(draws);
    let freqs = aggregate(draws, config);
    let optimized = optimize(&freqs, &existing);
    let valid = freqs.valid_draws;

    log::debug!(
        "{game_type} : {valid} tirages valides sur {}, {} combinaisons connues",
        draws.len(),
        existing.len()
    );

    StatisticsRecord {
        game_type: game_type.to_string(),
        total_draws: valid,
        optimized_by_general_frequency_repeat: optimized.general_repeat,
        optimized_by_general_frequency_no_repeat: optimized.general_no_repeat,
        optimized_by_position_frequency_repeat: optimized.position_repeat,
        optimized_by_position_frequency_no_repeat: optimized.position_no_repeat,
        regular_numbers: uniform_residuals(&freqs.overall, valid * PICK_COUNT as u32),
        special_ball_numbers: uniform_residuals(&freqs.special, valid),
        by_position: PositionResiduals(std::array::from_fn(|p| {
            position_residuals(&freqs.by_position[p], valid, p)
        })),
    }
}

pub fn compute_for_game(draws: &[Value], game: Game) -> StatisticsRecord {
    compute_statistics(draws, game.type_name(), &game.config())
}
