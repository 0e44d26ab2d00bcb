use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use lotto645_db::rusqlite::Connection;
use std::path::Path;
use tracing::warn;

use lotto645_db::db::insert_draw;
use lotto645_db::models::{validate_draw, Draw, PICK_COUNT};

/// Positions des colonnes utiles, repérées par leur en-tête.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Columns {
    round: usize,
    date: usize,
    numbers: [usize; PICK_COUNT],
}

fn locate_columns(headers: &csv::StringRecord) -> Result<Columns> {
    let find = |names: &[&str]| -> Option<usize> {
        headers.iter().position(|h| {
            let h = h.trim().to_ascii_lowercase();
            names.iter().any(|n| h == *n)
        })
    };

    let round = find(&["round"]).context("Colonne 'round' absente")?;
    let date = find(&["draw date", "date"]).context("Colonne 'draw date' absente")?;
    let mut numbers = [0usize; PICK_COUNT];
    for (i, slot) in numbers.iter_mut().enumerate() {
        let name = format!("num{}", i + 1);
        *slot = find(&[name.as_str()]).with_context(|| format!("Colonne '{}' absente", name))?;
    }
    Ok(Columns { round, date, numbers })
}

/// Normalise une date AAAA-MM-JJ, AAAA.MM.JJ ou AAAA/MM/JJ en AAAA-MM-JJ.
pub fn parse_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }
    bail!("Format de date invalide: '{}'", raw);
}

fn parse_record(record: &csv::StringRecord, columns: &Columns) -> Result<Draw> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(|s| s.trim())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let round_str = get(columns.round)?;
    let round: u32 = round_str
        .parse()
        .with_context(|| format!("Numéro de tirage invalide: '{}'", round_str))?;
    let date = parse_date(get(columns.date)?)?;

    let mut numbers = [0u8; PICK_COUNT];
    for (slot, &idx) in numbers.iter_mut().zip(columns.numbers.iter()) {
        let s = get(idx)?;
        *slot = s
            .parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))?;
    }

    validate_draw(round, &numbers)?;
    Ok(Draw { round, date, numbers })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let headers = reader.headers().context("En-tête CSV illisible")?.clone();
    let columns = locate_columns(&headers)?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        let line = result.total_records;
        match record_result {
            Ok(record) => match parse_record(&record, &columns) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        warn!(line, error = %e, "erreur d'insertion");
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    warn!(line, error = %e, "ligne ignorée");
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!(line, error = %e, "ligne illisible");
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
