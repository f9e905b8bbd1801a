use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::frequency::FrequencyTable;
use crate::position::position_distribution;

/// Seuils de significativité appliqués aux résidus standardisés.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thresholds {
    /// |z| > 2.0, sans niveau "très significatif" (vues globale et spéciale).
    Single,
    /// |z| > 1.96 (95 %) et |z| > 2.576 (99 %) (vues par position).
    TwoTailed,
}

impl Thresholds {
    const SINGLE: f64 = 2.0;
    const SIGNIFICANT: f64 = 1.96;
    const VERY_SIGNIFICANT: f64 = 2.576;

    fn classify(&self, residual: f64) -> (bool, Option<bool>) {
        let z = residual.abs();
        match self {
            Thresholds::Single => (z > Self::SINGLE, None),
            Thresholds::TwoTailed => (z > Self::SIGNIFICANT, Some(z > Self::VERY_SIGNIFICANT)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualEntry {
    pub observed: u32,
    pub expected: f64,
    pub residual: f64,
    pub significant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub very_significant: Option<bool>,
    pub percent: f64,
}

/// Résidu standardisé sous un modèle binomial (`trials` épreuves de probabilité `p`).
pub fn residual_entry(observed: u32, trials: u32, probability: f64, thresholds: Thresholds) -> ResidualEntry {
    let n = trials as f64;
    let expected = probability * n;
    let std_dev = (n * probability * (1.0 - probability)).sqrt();

    let residual = if trials == 0 || std_dev == 0.0 || !std_dev.is_finite() {
        0.0
    } else {
        (observed as f64 - expected) / std_dev
    };
    let (significant, very_significant) = thresholds.classify(residual);

    let percent = if trials == 0 {
        0.0
    } else {
        observed as f64 / n * 100.0
    };

    ResidualEntry {
        observed,
        expected,
        residual,
        significant,
        very_significant,
        percent,
    }
}

/// Résidus d'une table, indexés par `numéro - 1`. Sérialisé comme `{"1": ..., "2": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualTable {
    entries: Vec<ResidualEntry>,
}

impl ResidualTable {
    pub fn get(&self, number: u8) -> Option<&ResidualEntry> {
        self.entries.get((number as usize).wrapping_sub(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &ResidualEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| ((idx + 1) as u8, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn observed_total(&self) -> u64 {
        self.entries.iter().map(|e| e.observed as u64).sum()
    }
}

impl Serialize for ResidualTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (number, entry) in self.iter() {
            map.serialize_entry(&number.to_string(), entry)?;
        }
        map.end()
    }
}

/// Vue globale ou spéciale : probabilité uniforme `1 / domaine` par épreuve.
pub fn uniform_residuals(table: &FrequencyTable, trials: u32) -> ResidualTable {
    let probability = 1.0 / table.domain() as f64;
    let entries = table
        .iter()
        .map(|(_, observed)| residual_entry(observed, trials, probability, Thresholds::Single))
        .collect();
    ResidualTable { entries }
}

/// Vue par rang : probabilité exacte P(k, position).
pub fn position_residuals(table: &FrequencyTable, trials: u32, position: usize) -> ResidualTable {
    let distribution = position_distribution(position, table.domain() as u32);
    let entries = table
        .iter()
        .zip(distribution)
        .map(|((_, observed), probability)| {
            residual_entry(observed, trials, probability, Thresholds::TwoTailed)
        })
        .collect();
    ResidualTable { entries }
}
