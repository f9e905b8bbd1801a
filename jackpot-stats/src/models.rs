use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Nombre de numéros réguliers tirés à chaque tirage.
pub const PICK_COUNT: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Plage des numéros réguliers invalide : 1-{0} (attendu entre 5 et 255)")]
    RegularRange(u32),
    #[error("Plage des numéros spéciaux invalide : 1-{0} (attendu entre 1 et 255)")]
    SpecialRange(u32),
    #[error("Jeu inconnu : '{0}'")]
    UnknownGame(String),
}

/// Bornes d'une variante de jeu. La borne basse vaut toujours 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    max_regular: u8,
    max_special: u8,
}

impl GameConfig {
    pub fn new(max_regular: u32, max_special: u32) -> Result<Self, ConfigError> {
        if !(PICK_COUNT as u32..=u8::MAX as u32).contains(&max_regular) {
            return Err(ConfigError::RegularRange(max_regular));
        }
        if !(1..=u8::MAX as u32).contains(&max_special) {
            return Err(ConfigError::SpecialRange(max_special));
        }
        Ok(Self {
            max_regular: max_regular as u8,
            max_special: max_special as u8,
        })
    }

    pub fn max_regular(&self) -> u8 {
        self.max_regular
    }

    pub fn max_special(&self) -> u8 {
        self.max_special
    }

    pub fn regular_in_range(&self, n: i64) -> bool {
        (1..=self.max_regular as i64).contains(&n)
    }

    pub fn special_in_range(&self, n: i64) -> bool {
        (1..=self.max_special as i64).contains(&n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    MegaMillions,
    Powerball,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::MegaMillions, Game::Powerball];

    pub fn config(&self) -> GameConfig {
        match self {
            Game::MegaMillions => GameConfig {
                max_regular: 70,
                max_special: 25,
            },
            Game::Powerball => GameConfig {
                max_regular: 69,
                max_special: 26,
            },
        }
    }

    /// Identifiant écrit dans le champ `type` des statistiques.
    pub fn type_name(&self) -> &'static str {
        match self {
            Game::MegaMillions => "mega-millions",
            Game::Powerball => "powerball",
        }
    }

    /// Préfixe des fichiers de données (`mm.json`, `mm-stats.json`, ...).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Game::MegaMillions => "mm",
            Game::Powerball => "pb",
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Game::MegaMillions => write!(f, "Mega Millions"),
            Game::Powerball => write!(f, "Powerball"),
        }
    }
}

impl FromStr for Game {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Game::ALL
            .into_iter()
            .find(|g| g.type_name() == key || g.file_stem() == key)
            .ok_or_else(|| ConfigError::UnknownGame(s.to_string()))
    }
}

/// Tirage tel qu'il est stocké dans les fichiers JSON d'historique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRecord {
    pub date: NaiveDate,
    pub numbers: [u8; PICK_COUNT],
    pub special_ball: u8,
}

/// Tirage validé : numéros distincts, dans les bornes, triés par ordre croissant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidDraw {
    pub numbers: [u8; PICK_COUNT],
    pub special: u8,
}

/// Cinq numéros réguliers suivis d'un numéro spécial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combination {
    pub regular: [u8; PICK_COUNT],
    pub special: u8,
}

impl Combination {
    /// Grille renvoyée par toutes les stratégies quand aucun tirage n'est valide.
    pub const PLACEHOLDER: Combination = Combination {
        regular: [1, 2, 3, 4, 5],
        special: 1,
    };

    pub fn new(regular: [u8; PICK_COUNT], special: u8) -> Self {
        Self { regular, special }
    }

    /// Forme canonique utilisée pour comparer avec l'historique.
    pub fn sorted(&self) -> Self {
        let mut regular = self.regular;
        regular.sort_unstable();
        Self {
            regular,
            special: self.special,
        }
    }

    pub fn to_array(&self) -> [u8; PICK_COUNT + 1] {
        let r = self.regular;
        [r[0], r[1], r[2], r[3], r[4], self.special]
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}
