use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use jackpot_stats::validate::parse_draw;
use jackpot_stats::{DrawRecord, Game, StatisticsRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct ImportResult {
    pub total_records: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub filtered: usize,
    pub errors: usize,
}

pub fn draws_path(data_dir: &Path, game: Game) -> PathBuf {
    data_dir.join(format!("{}.json", game.file_stem()))
}

pub fn stats_path(data_dir: &Path, game: Game) -> PathBuf {
    data_dir.join(format!("{}-stats.json", game.file_stem()))
}

/// Lit une liste de tirages bruts. Un fichier absent équivaut à une liste vide ;
/// les éléments mal formés sont écartés plus tard par la validation.
pub fn load_draws(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        log::warn!("Fichier {:?} introuvable, aucun tirage chargé", path);
        return Ok(Vec::new());
    }
    read_draw_list(path)
}

fn read_draw_list(path: &Path) -> Result<Vec<Value>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let value: Value = serde_json::from_str(&json)
        .with_context(|| format!("JSON invalide dans {:?}", path))?;
    match value {
        Value::Array(draws) => Ok(draws),
        _ => bail!("{:?} : une liste de tirages est attendue", path),
    }
}

/// Fusionne les tirages de `source` dans l'historique `target`.
///
/// Un tirage dont la date figure déjà dans l'historique est ignoré, de même que
/// ceux antérieurs ou égaux à `since`. Les tirages hors bornes pour `game` sont
/// comptés en erreur. L'historique est réécrit du plus récent au plus ancien.
pub fn import_draws(
    target: &Path,
    source: &Path,
    game: Game,
    since: Option<NaiveDate>,
) -> Result<ImportResult> {
    let incoming = read_draw_list(source)?;
    let mut draws = if target.exists() {
        read_draw_list(target)?
    } else {
        Vec::new()
    };
    let mut known_dates: HashSet<String> = draws
        .iter()
        .filter_map(|draw| draw_date(draw).map(str::to_string))
        .collect();

    let config = game.config();
    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        filtered: 0,
        errors: 0,
    };

    for (idx, value) in incoming.into_iter().enumerate() {
        result.total_records += 1;
        let record = match serde_json::from_value::<DrawRecord>(value) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Tirage {} ignoré : {}", idx + 1, e);
                result.errors += 1;
                continue;
            }
        };
        let normalized = serde_json::to_value(&record)?;
        if parse_draw(&normalized, &config).is_none() {
            log::warn!("Tirage du {} invalide pour {game}", record.date);
            result.errors += 1;
            continue;
        }
        if since.is_some_and(|start| record.date <= start) {
            result.filtered += 1;
            continue;
        }
        if known_dates.insert(record.date.format(DATE_FORMAT).to_string()) {
            draws.push(normalized);
            result.inserted += 1;
        } else {
            result.skipped += 1;
        }
    }

    draws.sort_by(|a, b| draw_date(b).unwrap_or("").cmp(draw_date(a).unwrap_or("")));

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(&draws)?;
    std::fs::write(target, json).with_context(|| format!("Impossible d'écrire {:?}", target))?;
    Ok(result)
}

fn draw_date(draw: &Value) -> Option<&str> {
    draw.get("date")?.as_str()
}

pub fn save_stats(record: &StatisticsRecord, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

/// Date la plus récente parmi les tirages (`YYYY-MM-DD`), dates illisibles ignorées.
pub fn latest_draw_date(draws: &[Value]) -> Option<NaiveDate> {
    draws
        .iter()
        .filter_map(draw_date)
        .filter_map(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jackpot_stats::compute_for_game;
    use serde_json::json;

    #[test]
    fn test_paths() {
        let dir = Path::new("data");
        assert_eq!(draws_path(dir, Game::MegaMillions), Path::new("data/mm.json"));
        assert_eq!(stats_path(dir, Game::Powerball), Path::new("data/pb-stats.json"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let draws = load_draws(&dir.path().join("mm.json")).unwrap();
        assert!(draws.is_empty());
    }

    #[test]
    fn test_load_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pb.json");
        std::fs::write(&path, r#"{"numbers": [1, 2, 3, 4, 5]}"#).unwrap();
        assert!(load_draws(&path).is_err());
        std::fs::write(&path, "not json").unwrap();
        assert!(load_draws(&path).is_err());
    }

    #[test]
    fn test_load_keeps_malformed_elements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mm.json");
        std::fs::write(
            &path,
            r#"[{"date": "2025-03-25", "numbers": [1, 2, 3, 4, 5], "specialBall": 1}, 12, null]"#,
        )
        .unwrap();
        let draws = load_draws(&path).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(compute_for_game(&draws, Game::MegaMillions).total_draws, 1);
    }

    #[test]
    fn test_save_stats_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mm-stats.json");
        let record = compute_for_game(&[], Game::MegaMillions);
        save_stats(&record, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains('\n'));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["type"], json!("mega-millions"));
        assert_eq!(value["totalDraws"], json!(0));
        assert_eq!(value["optimizedByPositionFrequencyNoRepeat"], json!([1, 2, 3, 4, 5, 1]));
    }

    #[test]
    fn test_latest_draw_date() {
        let draws = vec![
            json!({"date": "2025-03-21", "numbers": [1, 2, 3, 4, 5], "specialBall": 1}),
            json!({"date": "2025-03-25"}),
            json!({"date": "25/03/2026"}),
            json!({"date": 20260101}),
            json!(7),
        ];
        assert_eq!(latest_draw_date(&draws), NaiveDate::from_ymd_opt(2025, 3, 25));
        assert_eq!(latest_draw_date(&[]), None);
    }

    #[test]
    fn test_import_merges_and_dedups_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let target = draws_path(dir.path(), Game::Powerball);
        std::fs::write(
            &target,
            json!([
                {"date": "2025-03-22", "numbers": [5, 11, 22, 33, 44], "specialBall": 3},
                {"date": "2025-03-19", "numbers": [1, 2, 3, 4, 5], "specialBall": 1},
            ])
            .to_string(),
        )
        .unwrap();
        let source = dir.path().join("nouveaux.json");
        std::fs::write(
            &source,
            json!([
                {"date": "2025-03-26", "numbers": [60, 7, 19, 42, 28], "specialBall": 26},
                {"date": "2025-03-22", "numbers": [9, 10, 11, 12, 13], "specialBall": 4},
                {"date": "2025-03-24", "numbers": [2, 8, 16, 32, 64], "specialBall": 12},
                {"date": "2025-03-26", "numbers": [1, 2, 3, 4, 6], "specialBall": 2},
                {"date": "2025-03-29", "numbers": [1, 2, 3, 4, 70], "specialBall": 2},
                {"date": "bientôt", "numbers": [1, 2, 3, 4, 5], "specialBall": 2},
            ])
            .to_string(),
        )
        .unwrap();

        let result = import_draws(&target, &source, Game::Powerball, None).unwrap();
        assert_eq!(result.total_records, 6);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.filtered, 0);
        assert_eq!(result.errors, 2);

        let draws = load_draws(&target).unwrap();
        let dates: Vec<&str> = draws.iter().filter_map(draw_date).collect();
        assert_eq!(dates, ["2025-03-26", "2025-03-24", "2025-03-22", "2025-03-19"]);
        // Le tirage déjà connu n'est pas remplacé
        assert_eq!(draws[2]["numbers"], json!([5, 11, 22, 33, 44]));
        assert_eq!(draws[0]["specialBall"], json!(26));

        let again = import_draws(&target, &source, Game::Powerball, None).unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.skipped, 4);
        assert_eq!(load_draws(&target).unwrap().len(), 4);
    }

    #[test]
    fn test_import_since_keeps_later_draws_only() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data").join("mm.json");
        let source = dir.path().join("scrape.json");
        std::fs::write(
            &source,
            json!([
                {"date": "2025-03-18", "numbers": [1, 2, 3, 4, 5], "specialBall": 1},
                {"date": "2025-03-21", "numbers": [4, 18, 27, 41, 60], "specialBall": 9},
                {"date": "2025-03-25", "numbers": [4, 11, 27, 33, 66], "specialBall": 9},
            ])
            .to_string(),
        )
        .unwrap();

        let since = NaiveDate::from_ymd_opt(2025, 3, 21);
        let result = import_draws(&target, &source, Game::MegaMillions, since).unwrap();
        assert_eq!(result.inserted, 1);
        assert_eq!(result.filtered, 2);

        let draws = load_draws(&target).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(latest_draw_date(&draws), NaiveDate::from_ymd_opt(2025, 3, 25));
        assert_eq!(compute_for_game(&draws, Game::MegaMillions).total_draws, 1);
    }

    #[test]
    fn test_import_requires_source_list() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mm.json");
        assert!(import_draws(&target, &dir.path().join("absent.json"), Game::MegaMillions, None).is_err());
        assert!(!target.exists());
    }
}
