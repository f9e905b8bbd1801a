use thiserror::Error;

use crate::stats::StatisticsRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("Position {position} : somme des fréquences {sum}, attendu {expected}")]
    Position { position: usize, sum: u64, expected: u64 },
    #[error("Numéros spéciaux : somme des fréquences {sum}, attendu {expected}")]
    Special { sum: u64, expected: u64 },
}

/// Contrôle structurel : chaque rang et la vue spéciale comptent le même nombre de tirages.
pub fn verify(record: &StatisticsRecord) -> Result<(), ConsistencyError> {
    if record.total_draws == 0 {
        log::debug!("{} : aucun tirage à vérifier", record.game_type);
        return Ok(());
    }

    let expected = record.by_position.0[0].observed_total();
    for (position, table) in record.by_position.iter() {
        let sum = table.observed_total();
        if sum != expected {
            return Err(ConsistencyError::Position { position, sum, expected });
        }
        log::debug!("{} : position {position} vérifiée ({sum})", record.game_type);
    }

    let sum = record.special_ball_numbers.observed_total();
    if sum != expected {
        return Err(ConsistencyError::Special { sum, expected });
    }
    log::debug!("{} : numéros spéciaux vérifiés ({sum})", record.game_type);

    Ok(())
}
