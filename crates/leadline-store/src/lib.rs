//! Leadline Storage Layer
//!
//! Implements the `LeadStore` trait on SQLite.
//!
//! # Architecture
//!
//! - One row per lead; the canonical record is stored as a JSON document
//! - UUIDv7 ids and a microsecond insert timestamp give most-recent-first
//!   ordering
//! - Deal values are copied to their own column so statistics don't need
//!   to decode every document
//!
//! # Examples
//!
//! ```no_run
//! use leadline_store::SqliteStore;
//!
//! let store = SqliteStore::new("leadline.db").unwrap();
//! // Store is now ready for lead operations
//! ```

#![warn(missing_docs)]

use leadline_domain::confidence::is_filled;
use leadline_domain::traits::LeadStore;
use leadline_domain::{CanonicalLead, LeadId, LeadStats, StoredLead};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The connection mutex was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// SQLite-based implementation of LeadStore
///
/// # Thread Safety
///
/// The connection is guarded by a mutex, so one store can be shared across
/// request handlers. Concurrent inserts and reads are serialized.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use leadline_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("leadline.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        info!("Opened lead store at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Create an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl LeadStore for SqliteStore {
    type Error = StoreError;

    fn insert(&self, lead: &CanonicalLead) -> Result<LeadId, Self::Error> {
        let id = LeadId::new();
        let record = serde_json::to_string(lead)?;
        let deal_value = lead
            .deal
            .value
            .as_deref()
            .filter(|v| is_filled(Some(*v)));

        self.conn()?.execute(
            "INSERT INTO leads (id, created_at_us, confidence, deal_value, record)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.to_string(),
                lead.processed_at.timestamp_micros(),
                lead.confidence,
                deal_value,
                record,
            ],
        )?;

        debug!("Inserted lead {}", id);
        Ok(id)
    }

    fn list(&self, limit: Option<usize>) -> Result<Vec<StoredLead>, Self::Error> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let rows = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(
                "SELECT id, record FROM leads
                 ORDER BY created_at_us DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map(params![limit], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        rows.into_iter()
            .map(|(id, record)| -> Result<StoredLead, StoreError> {
                let lead: CanonicalLead = serde_json::from_str(&record)?;
                Ok(StoredLead {
                    id: LeadId::from_string(&id).map_err(StoreError::InvalidData)?,
                    created_at: lead.processed_at,
                    lead,
                })
            })
            .collect()
    }

    fn stats(&self) -> Result<LeadStats, Self::Error> {
        let conn = self.conn()?;

        let total_leads: i64 = conn.query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?;

        let mut stmt = conn.prepare("SELECT deal_value FROM leads WHERE deal_value IS NOT NULL")?;
        let values = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let total_value = values
            .iter()
            .map(|v| {
                parse_deal_value(v).unwrap_or_else(|| {
                    debug!("Deal value {:?} is not numeric, counting as 0", v);
                    0.0
                })
            })
            .sum();

        Ok(LeadStats {
            total_leads: total_leads as u64,
            total_deals: values.len() as u64,
            total_value,
        })
    }

    fn clear(&self) -> Result<u64, Self::Error> {
        let deleted = self.conn()?.execute("DELETE FROM leads", [])?;
        info!("Cleared {} leads", deleted);
        Ok(deleted as u64)
    }
}

/// Numeric interpretation of a free-text deal value
///
/// Strips surrounding whitespace, a leading currency symbol, thousands
/// separators and inner spaces. Returns `None` if what remains is not a
/// number.
///
/// # Examples
///
/// ```
/// use leadline_store::parse_deal_value;
///
/// assert_eq!(parse_deal_value("$50,000"), Some(50_000.0));
/// assert_eq!(parse_deal_value("TBD"), None);
/// ```
pub fn parse_deal_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches(['$', '€', '£', '¥']);
    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
