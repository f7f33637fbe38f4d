use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// A fully correct attempt, handed to the reporting side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedRecord {
    pub sentence_id: i64,
    pub user_id: i64,
    pub wpm: u32,
    pub recorded_at: DateTime<Local>,
}

impl CompletedRecord {
    /// `wpm` is converted with saturation: an infinite score becomes
    /// `u32::MAX` and NaN becomes 0.
    pub fn new(sentence_id: i64, user_id: i64, wpm: f64, recorded_at: DateTime<Local>) -> Self {
        Self {
            sentence_id,
            user_id,
            wpm: wpm as u32,
            recorded_at,
        }
    }
}

/// Best score per sentence for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceBest {
    pub sentence_id: i64,
    pub best_wpm: u32,
    pub attempts: i64,
}

const CREATE_TYPING_LOG: &str = r#"
    CREATE TABLE IF NOT EXISTS typing_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sentence_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        wpm INTEGER NOT NULL,
        recorded_at TEXT NOT NULL
    )
"#;

/// SQLite-backed store of completed records
#[derive(Debug)]
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path.as_ref())?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(CREATE_TYPING_LOG, [])?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_typing_log_user ON typing_log(user_id)",
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn insert(&self, record: &CompletedRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO typing_log (sentence_id, user_id, wpm, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.sentence_id,
                record.user_id,
                record.wpm,
                record.recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Records of one user, newest first
    pub fn for_user(&self, user_id: i64) -> Result<Vec<CompletedRecord>> {
        self.query(
            "SELECT sentence_id, user_id, wpm, recorded_at FROM typing_log WHERE user_id = ?1 ORDER BY id DESC",
            [user_id],
        )
    }

    /// Every record, newest first
    pub fn all(&self) -> Result<Vec<CompletedRecord>> {
        self.query(
            "SELECT sentence_id, user_id, wpm, recorded_at FROM typing_log ORDER BY id DESC",
            params![],
        )
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<CompletedRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            let recorded_at: String = row.get(3)?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        3,
                        "recorded_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(CompletedRecord {
                sentence_id: row.get(0)?,
                user_id: row.get(1)?,
                wpm: row.get(2)?,
                recorded_at,
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    pub fn best_per_sentence(&self, user_id: i64) -> Result<Vec<SentenceBest>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT sentence_id, MAX(wpm), COUNT(*)
            FROM typing_log
            WHERE user_id = ?1
            GROUP BY sentence_id
            ORDER BY sentence_id
            "#,
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(SentenceBest {
                sentence_id: row.get(0)?,
                best_wpm: row.get(1)?,
                attempts: row.get(2)?,
            })
        })?;

        let mut best = Vec::new();
        for row in rows {
            best.push(row?);
        }
        Ok(best)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM typing_log", [])?;
        Ok(())
    }
}

const CSV_HEADER: [&str; 4] = ["sentence_id", "user_id", "wpm", "recorded_at"];

/// Write records as CSV. The header row is written even when `records` is empty.
pub fn export_csv<W: Write>(records: &[CompletedRecord], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
