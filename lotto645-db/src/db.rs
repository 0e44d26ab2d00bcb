use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    round   INTEGER PRIMARY KEY,
    date    TEXT NOT NULL,
    num_1   INTEGER NOT NULL,
    num_2   INTEGER NOT NULL,
    num_3   INTEGER NOT NULL,
    num_4   INTEGER NOT NULL,
    num_5   INTEGER NOT NULL,
    num_6   INTEGER NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto645.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (round, date, num_1, num_2, num_3, num_4, num_5, num_6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.round,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        round: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
    })
}

/// Les `limit` derniers tirages, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT round, date, num_1, num_2, num_3, num_4, num_5, num_6
         FROM draws ORDER BY round DESC LIMIT ?1"
    )?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tout l'historique, du plus récent au plus ancien.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT round, date, num_1, num_2, num_3, num_4, num_5, num_6
         FROM draws ORDER BY round DESC"
    )?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
