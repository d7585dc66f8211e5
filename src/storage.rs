//! The storage module persists analysis reports in SQLite.

use std::convert::TryFrom;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

/// Storage provides database operations for analysis reports.
#[derive(Clone)]
pub struct Storage {
    /// The underlying SQLite connection, locked for one statement at a time
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Opens or creates the database at the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot be created
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .with_context(|| format!("Unable to open database {database_path}"))?;
        Self::from_connection(conn)
    }

    /// Creates a throwaway database living in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initializes the reports table if it doesn't exist.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                score INTEGER NOT NULL,
                suggestions TEXT NOT NULL,
                analyzed_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_reports_url ON reports(url);",
        )?;

        Ok(())
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage mutex poisoned"))
    }

    /// Stores a new report and returns it with its assigned id.
    ///
    /// Ids are never reused, so later reports always get larger ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn insert_report(&self, report: &NewReport) -> Result<Report> {
        // Second precision, as stored.
        let analyzed_at = DateTime::from_timestamp_secs(Utc::now().timestamp())
            .context("Unable to initialize analyzed_at")?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO reports (url, score, suggestions, analyzed_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                report.url,
                report.score,
                report.suggestions,
                analyzed_at.timestamp()
            ],
        )?;

        Ok(Report {
            id: conn.last_insert_rowid(),
            url: report.url.clone(),
            score: report.score,
            suggestions: report.suggestions.clone(),
            analyzed_at,
        })
    }

    /// Returns every stored report, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a row is corrupt
    pub fn list_reports(&self) -> Result<Vec<Report>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, url, score, suggestions, analyzed_at FROM reports ORDER BY id ASC",
        )?;
        let rows: Result<Vec<ReportRow>, rusqlite::Error> =
            stmt.query_map([], ReportRow::from_row)?.collect();

        rows?.into_iter().map(Report::try_from).collect()
    }

    /// Gets a single report by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the row is corrupt
    pub fn get_report(&self, id: i64) -> Result<Option<Report>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, url, score, suggestions, analyzed_at FROM reports WHERE id = ?1",
        )?;
        let row: Option<ReportRow> = stmt
            .query_row([id], ReportRow::from_row)
            .optional()
            .map_err(|e| anyhow::anyhow!("Unable to fetch report row: {e}"))?;

        row.map(Report::try_from).transpose()
    }
}

/// A report ready to be stored.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewReport {
    pub url: String,
    pub score: u8,
    pub suggestions: String,
}

/// Represents a report stored in the database
#[derive(Debug)]
pub struct ReportRow {
    pub id: i64,
    pub url: String,
    pub score: i64,
    pub suggestions: String,
    pub analyzed_at: i64,
}

impl ReportRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            score: row.get(2)?,
            suggestions: row.get(3)?,
            analyzed_at: row.get(4)?,
        })
    }
}

/// A persisted analysis report.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub url: String,
    pub score: u8,
    pub suggestions: String,
    pub analyzed_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = anyhow::Error;

    fn try_from(row: ReportRow) -> Result<Self> {
        Ok(Report {
            id: row.id,
            url: row.url,
            score: u8::try_from(row.score)
                .with_context(|| format!("Score {} out of range", row.score))?,
            suggestions: row.suggestions,
            analyzed_at: DateTime::from_timestamp_secs(row.analyzed_at)
                .context("Unable to initialize analyzed_at from database")?,
        })
    }
}
