mod display;
mod loader;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use crate::display::{display_import_summary, display_latest, display_residuals, display_summary};
use crate::loader::{
    draws_path, import_draws, latest_draw_date, load_draws, save_stats, stats_path,
};
use jackpot_stats::{compute_for_game, verify, Game, StatisticsRecord};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum View {
    #[default]
    Regular,
    Special,
    Position,
}

#[derive(Parser)]
#[command(name = "jackpot", about = "Statistiques des tirages Mega Millions et Powerball")]
struct Cli {
    /// Répertoire des fichiers de tirages (mm.json, pb.json) et de statistiques
    #[arg(long, env = "JACKPOT_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Niveau de journalisation (RUST_LOG est prioritaire)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fusionner des tirages JSON dans l'historique d'un jeu
    Import {
        /// Jeu (mega-millions, powerball)
        game: Game,

        /// Fichier JSON contenant une liste de tirages
        #[arg(short, long)]
        file: PathBuf,

        /// Ne garder que les tirages postérieurs à cette date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
    },

    /// Calculer, vérifier et enregistrer les statistiques
    Stats {
        /// Jeu à traiter (mega-millions, powerball) ; les deux par défaut
        #[arg(short, long)]
        game: Option<Game>,
    },

    /// Afficher les résidus standardisés d'une vue
    Show {
        /// Jeu (mega-millions, powerball)
        game: Game,

        /// Vue à afficher
        #[arg(short, long, default_value = "regular")]
        view: View,

        /// Rang pour la vue par position (0 = plus petit numéro)
        #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..5))]
        position: u8,

        /// N'afficher que les écarts significatifs
        #[arg(long)]
        significant: bool,
    },

    /// Date du dernier tirage connu pour chaque jeu
    Latest,
}

/// Résultat du traitement d'un jeu par la commande `stats`.
pub struct GameOutcome {
    pub game: Game,
    pub record: StatisticsRecord,
    pub verified: bool,
    pub output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Command::Import { game, file, since } => cmd_import(&cli.data_dir, game, &file, since),
        Command::Stats { game } => cmd_stats(&cli.data_dir, game),
        Command::Show {
            game,
            view,
            position,
            significant,
        } => cmd_show(&cli.data_dir, game, view, position, significant),
        Command::Latest => cmd_latest(&cli.data_dir),
    }
}

fn cmd_import(data_dir: &Path, game: Game, file: &Path, since: Option<NaiveDate>) -> Result<()> {
    let target = draws_path(data_dir, game);
    let result = import_draws(&target, file, game, since)?;
    log::info!("{game} : historique mis à jour dans {:?}", target);
    display_import_summary(game, &result);
    Ok(())
}

fn cmd_stats(data_dir: &Path, game: Option<Game>) -> Result<()> {
    let games: Vec<Game> = match game {
        Some(g) => vec![g],
        None => Game::ALL.to_vec(),
    };

    let outcomes = games
        .par_iter()
        .map(|&g| process_game(data_dir, g))
        .collect::<Result<Vec<_>>>()?;

    if outcomes.iter().all(|o| o.record.total_draws == 0) {
        println!("Aucun tirage valide : statistiques initialisées avec les valeurs par défaut.");
    }
    display_summary(&outcomes);
    Ok(())
}

fn process_game(data_dir: &Path, game: Game) -> Result<GameOutcome> {
    let input = draws_path(data_dir, game);
    let draws = load_draws(&input)?;
    log::info!("{game} : {} tirages lus depuis {:?}", draws.len(), input);

    let record = compute_for_game(&draws, game);
    let verified = match verify(&record) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{game} : vérification des fréquences échouée : {e}");
            false
        }
    };

    let output = stats_path(data_dir, game);
    save_stats(&record, &output)?;
    log::info!("{game} : statistiques enregistrées dans {:?}", output);

    Ok(GameOutcome {
        game,
        record,
        verified,
        output,
    })
}

fn cmd_show(data_dir: &Path, game: Game, view: View, position: u8, significant: bool) -> Result<()> {
    let draws = load_draws(&draws_path(data_dir, game))?;
    let record = compute_for_game(&draws, game);
    if record.total_draws == 0 {
        println!("Aucun tirage valide pour {game}.");
        return Ok(());
    }

    let (title, residuals) = match view {
        View::Regular => (
            format!("{game} : numéros réguliers ({} tirages)", record.total_draws),
            &record.regular_numbers,
        ),
        View::Special => (
            format!("{game} : numéros spéciaux ({} tirages)", record.total_draws),
            &record.special_ball_numbers,
        ),
        View::Position => (
            format!("{game} : rang {position} ({} tirages)", record.total_draws),
            &record.by_position.0[position as usize],
        ),
    };
    display_residuals(&title, residuals, significant);
    Ok(())
}

fn cmd_latest(data_dir: &Path) -> Result<()> {
    let mut rows = Vec::with_capacity(Game::ALL.len());
    for game in Game::ALL {
        let draws = load_draws(&draws_path(data_dir, game))?;
        rows.push((game, draws.len(), latest_draw_date(&draws)));
    }
    display_latest(&rows);
    Ok(())
}
