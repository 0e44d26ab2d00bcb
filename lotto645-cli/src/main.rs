mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lotto645_db::db::{count_draws, db_path, fetch_all_draws, fetch_last_draws, migrate, open_db};
use lotto645_db::rusqlite::Connection;
use lotto645_engine::catalog::{algorithm_description, describe};
use lotto645_engine::config::EngineConfig;
use lotto645_engine::{AnalysisContext, StrategyCode};

use crate::display::{
    display_algorithms, display_draws, display_import_summary, display_info, display_multi,
    display_outcome,
};

#[derive(Parser)]
#[command(name = "lotto645", about = "Analyseur statistique Lotto 6/45")]
struct Cli {
    /// Logs détaillés (équivaut à RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Fichier de configuration JSON du moteur (budgets, fenêtres)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "data/new_1206.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Dernier tirage, nombre de tirages et 5 derniers résultats
    Info {
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Générer les 7 grilles pour une fenêtre d'analyse
    Predict {
        /// Fenêtre d'analyse (10-500, défaut : configuration)
        #[arg(short, long)]
        window: Option<u32>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Générer les grilles pour plusieurs fenêtres
    Multi {
        /// Fenêtres (séparées par des virgules, défaut : configuration)
        #[arg(short, long)]
        windows: Option<String>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Décrire un algorithme (A~G), ou tous si aucun code n'est donné
    Algo {
        code: Option<String>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).without_time())
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.command.wants_json() => return print_json::<()>(Err(e)),
        Err(e) => return Err(e),
    };
    let path = db_path();

    match cli.command {
        Command::Import { file } => cmd_import(&open_store(&path)?, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&open_store(&path)?, last),
        Command::Info { json } => cmd_info(&path, config, json),
        Command::Predict { window, seed, json } => cmd_predict(&path, config, window, seed, json),
        Command::Multi { windows, seed, json } => {
            cmd_multi(&path, config, windows.as_deref(), seed, json)
        }
        Command::Algo { code, json } => cmd_algo(code.as_deref(), json),
    }
}

impl Command {
    fn wants_json(&self) -> bool {
        match self {
            Command::Info { json }
            | Command::Predict { json, .. }
            | Command::Multi { json, .. }
            | Command::Algo { json, .. } => *json,
            Command::Import { .. } | Command::DbPath | Command::List { .. } => false,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load(p)
            .with_context(|| format!("Configuration invalide {:?}", p)),
        None => Ok(EngineConfig::default()),
    }
}

fn open_store(path: &Path) -> Result<Connection> {
    let conn = open_db(path)?;
    migrate(&conn)?;
    Ok(conn)
}

/// Base absente ou corrompue : contexte vide, comme pour une lecture en échec.
fn load_context_from(path: &Path, config: EngineConfig) -> AnalysisContext {
    match open_store(path) {
        Ok(conn) => load_context(&conn, config),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "base de données inutilisable, jeu de données vide");
            AnalysisContext::empty(config)
        }
    }
}

/// Un historique illisible donne un contexte vide : les analyses rendront « aucune donnée ».
fn load_context(conn: &Connection, config: EngineConfig) -> AnalysisContext {
    match fetch_all_draws(conn) {
        Ok(draws) => {
            debug!(draws = draws.len(), "historique chargé");
            AnalysisContext::new(draws, config)
        }
        Err(e) => {
            warn!(error = %e, "lecture de l'historique impossible, jeu de données vide");
            AnalysisContext::empty(config)
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Enveloppe de réponse JSON : `{"success": true, "data": ...}` ou `{"success": false, "error": ...}`.
#[derive(Serialize)]
#[serde(untagged)]
enum Envelope<T: Serialize> {
    Success { success: bool, data: T },
    Failure { success: bool, error: String },
}

fn print_json<T: Serialize>(result: Result<T>) -> Result<()> {
    let (envelope, failed) = match result {
        Ok(data) => (Envelope::Success { success: true, data }, false),
        Err(e) => (Envelope::Failure { success: false, error: format!("{e:#}") }, true),
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_windows(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .context("Format de fenêtres invalide")
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lotto645 import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_info(path: &Path, config: EngineConfig, json: bool) -> Result<()> {
    let ctx = load_context_from(path, config);
    let info = ctx.dataset_info();
    if json {
        return print_json(Ok(info));
    }
    if ctx.is_empty() {
        println!("Base vide. Lancez d'abord : lotto645 import");
        return Ok(());
    }
    display_info(&info);
    Ok(())
}

fn cmd_predict(
    path: &Path,
    config: EngineConfig,
    window: Option<u32>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let window = window.unwrap_or(config.default_window);
    let ctx = load_context_from(path, config);
    let mut rng = make_rng(seed);
    let outcome = ctx.analyze_and_predict(window, &mut rng);

    if json {
        return print_json(Ok(outcome));
    }
    display_outcome(&outcome);
    Ok(())
}

fn cmd_multi(
    path: &Path,
    config: EngineConfig,
    windows: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let windows = match windows {
        Some(raw) => parse_windows(raw),
        None => Ok(config.multi_windows.clone()),
    };
    let windows = match (windows, json) {
        (Ok(w), _) => w,
        (Err(e), true) => return print_json::<()>(Err(e)),
        (Err(e), false) => return Err(e),
    };

    let ctx = load_context_from(path, config);
    let mut rng = make_rng(seed);
    let results = ctx.get_multi_window_results(&windows, &mut rng);

    if json {
        return print_json(Ok(results));
    }
    display_multi(&results);
    Ok(())
}

fn cmd_algo(code: Option<&str>, json: bool) -> Result<()> {
    match code {
        Some(code) => {
            let info = algorithm_description(code).map_err(anyhow::Error::from);
            if json {
                return print_json(info);
            }
            let info = info?;
            let code: StrategyCode = code.parse()?;
            display_algorithms(&[(code, info)]);
        }
        None => {
            let entries: Vec<_> = StrategyCode::ALL.iter().map(|&c| (c, describe(c))).collect();
            if json {
                let map: std::collections::BTreeMap<String, _> = entries
                    .iter()
                    .map(|(c, info)| (c.to_string(), *info))
                    .collect();
                return print_json(Ok(map));
            }
            display_algorithms(&entries);
        }
    }
    Ok(())
}
