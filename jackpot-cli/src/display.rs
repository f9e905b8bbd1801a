use chrono::NaiveDate;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::loader::ImportResult;
use crate::GameOutcome;
use jackpot_stats::residuals::ResidualTable;
use jackpot_stats::{Combination, Game};

pub fn format_combination(combo: &Combination) -> String {
    let regular = combo
        .regular
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ");
    format!("{} | {:2}", regular, combo.special)
}

pub fn display_import_summary(game: Game, result: &ImportResult) {
    println!("Import {game} terminé :");
    println!("  Total tirages lus : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.filtered > 0 {
        println!("  Antérieurs écartés: {}", result.filtered);
    }
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_summary(outcomes: &[GameOutcome]) {
    println!("\n📊 Statistiques des tirages\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Jeu", "Tirages", "Stratégie", "Combinaison", "Vérification"]);

    for outcome in outcomes {
        let record = &outcome.record;
        let strategies = [
            ("Fréquence globale", &record.optimized_by_general_frequency_repeat),
            ("Fréquence globale, inédite", &record.optimized_by_general_frequency_no_repeat),
            ("Fréquence par rang", &record.optimized_by_position_frequency_repeat),
            ("Fréquence par rang, inédite", &record.optimized_by_position_frequency_no_repeat),
        ];
        let check = if outcome.verified {
            Cell::new("OK").fg(Color::Green)
        } else {
            Cell::new("ÉCHEC").fg(Color::Red)
        };

        for (i, (name, combo)) in strategies.iter().enumerate() {
            let (game, draws, check) = if i == 0 {
                (outcome.game.to_string(), record.total_draws.to_string(), check.clone())
            } else {
                (String::new(), String::new(), Cell::new(""))
            };
            table.add_row(vec![
                Cell::new(game),
                Cell::new(draws),
                Cell::new(name),
                Cell::new(format_combination(combo)),
                check,
            ]);
        }
    }
    println!("{table}");

    for outcome in outcomes {
        println!("  {} → {}", outcome.game, outcome.output.display());
    }
}

pub fn display_residuals(title: &str, residuals: &ResidualTable, significant_only: bool) {
    println!("\n🎯 {title}\n");

    let mut rows: Vec<_> = residuals
        .iter()
        .filter(|(_, entry)| !significant_only || entry.significant)
        .collect();
    if rows.is_empty() {
        println!("Aucun écart significatif.");
        return;
    }
    rows.sort_by(|a, b| b.1.observed.cmp(&a.1.observed));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Observé", "Attendu", "Résidu z", "%", "Signif."]);

    for (number, entry) in rows {
        let color = match (entry.significant, entry.residual > 0.0) {
            (true, true) => Color::Green,
            (true, false) => Color::Red,
            (false, _) => Color::White,
        };
        let flag = match (entry.significant, entry.very_significant) {
            (_, Some(true)) => "**",
            (true, _) => "*",
            _ => "-",
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", number)),
            Cell::new(entry.observed.to_string()),
            Cell::new(format!("{:.2}", entry.expected)),
            Cell::new(format!("{:+.3}", entry.residual)).fg(color),
            Cell::new(format!("{:.2}", entry.percent)),
            Cell::new(flag).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_latest(rows: &[(Game, usize, Option<NaiveDate>)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Jeu", "Tirages", "Dernier tirage"]);

    for (game, count, latest) in rows {
        let latest = latest
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![game.to_string(), count.to_string(), latest]);
    }
    println!("{table}");
}
