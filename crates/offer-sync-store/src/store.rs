use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use offer_sync::{Offer, OfferRepository, PlatformFlags, SaveError, StoredOffer};
use rusqlite::{Connection, OptionalExtension};

use crate::schema;

const SELECT_COLUMNS: &str = "SELECT id, external_offer_id, name, slug, description, requirements,
        thumbnail, offer_url_template, provider_name, is_desktop, is_android, is_ios,
        created_at, updated_at
     FROM offers";

/// A SQLite-backed offer store keyed by slug.
pub struct OfferStore {
    conn: Mutex<Connection>,
}

impl OfferStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let mut store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<(), StoreError> {
        let conn = self.conn.get_mut().map_err(|_| StoreError::Poisoned)?;
        schema::migrations()
            .to_latest(conn)
            .map_err(|e| StoreError::Migration(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SaveError> {
        self.conn
            .lock()
            .map_err(|_| SaveError::Database(StoreError::Poisoned.to_string()))
    }

    fn read(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Number of stored offers.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.read()?;
        conn.query_row("SELECT COUNT(*) FROM offers", [], |row| row.get::<_, i64>(0))
            .map(|n| u64::try_from(n).unwrap_or_default())
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Every stored offer, ordered by provider then name.
    pub fn list_all(&self) -> Result<Vec<StoredOffer>, StoreError> {
        let conn = self.read()?;
        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY provider_name, name"))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        stmt.query_map([], row_to_offer)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

#[async_trait::async_trait]
impl OfferRepository for OfferStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredOffer>, SaveError> {
        let conn = self.lock()?;
        find_in(&conn, slug).map_err(database_error)
    }

    async fn find_by_provider(&self, provider_name: &str) -> Result<Vec<StoredOffer>, SaveError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_COLUMNS} WHERE provider_name = ?1 ORDER BY name"
            ))
            .map_err(database_error)?;

        stmt.query_map([provider_name], row_to_offer)
            .map_err(database_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(database_error)
    }

    async fn save_offer(&self, offer: &Offer) -> Result<StoredOffer, SaveError> {
        let conn = self.lock()?;
        upsert(&conn, offer, now_epoch_secs()).map_err(database_error)
    }

    async fn save_many(&self, offers: &[Offer]) -> Result<Vec<StoredOffer>, SaveError> {
        if offers.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(transaction_error)?;
        let now = now_epoch_secs();

        let mut saved = Vec::with_capacity(offers.len());
        for offer in offers {
            // Dropping `tx` on error rolls the whole batch back.
            saved.push(upsert(&tx, offer, now).map_err(transaction_error)?);
        }

        tx.commit().map_err(transaction_error)?;
        tracing::debug!(count = saved.len(), "committed offer batch");

        Ok(saved)
    }
}

/// Update the row sharing `offer.slug`, or insert a new one.
fn upsert(conn: &Connection, offer: &Offer, now: u64) -> rusqlite::Result<StoredOffer> {
    match find_in(conn, &offer.slug)? {
        Some(mut existing) => {
            existing.reconcile(offer, now);
            update_row(conn, &existing)?;
            Ok(existing)
        }
        None => insert_row(conn, offer, now),
    }
}

fn find_in(conn: &Connection, slug: &str) -> rusqlite::Result<Option<StoredOffer>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE slug = ?1"),
        [slug],
        row_to_offer,
    )
    .optional()
}

fn insert_row(conn: &Connection, offer: &Offer, now: u64) -> rusqlite::Result<StoredOffer> {
    conn.execute(
        "INSERT INTO offers
            (external_offer_id, name, slug, description, requirements, thumbnail,
             offer_url_template, provider_name, is_desktop, is_android, is_ios,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
        rusqlite::params![
            offer.external_offer_id,
            offer.name,
            offer.slug,
            offer.description,
            offer.requirements,
            offer.thumbnail,
            offer.offer_url_template,
            offer.provider_name,
            offer.platforms.desktop,
            offer.platforms.android,
            offer.platforms.ios,
            secs_to_sql(now),
        ],
    )?;

    Ok(StoredOffer::new(conn.last_insert_rowid(), offer, now))
}

fn update_row(conn: &Connection, stored: &StoredOffer) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE offers SET
            external_offer_id = ?2, name = ?3, slug = ?4, description = ?5,
            requirements = ?6, thumbnail = ?7, offer_url_template = ?8,
            provider_name = ?9, is_desktop = ?10, is_android = ?11, is_ios = ?12,
            updated_at = ?13
         WHERE id = ?1",
        rusqlite::params![
            stored.id,
            stored.external_offer_id,
            stored.name,
            stored.slug,
            stored.description,
            stored.requirements,
            stored.thumbnail,
            stored.offer_url_template,
            stored.provider_name,
            stored.platforms.desktop,
            stored.platforms.android,
            stored.platforms.ios,
            secs_to_sql(stored.updated_at),
        ],
    )?;
    Ok(())
}

fn row_to_offer(row: &rusqlite::Row) -> rusqlite::Result<StoredOffer> {
    Ok(StoredOffer {
        id: row.get(0)?,
        external_offer_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        requirements: row.get(5)?,
        thumbnail: row.get(6)?,
        offer_url_template: row.get(7)?,
        provider_name: row.get(8)?,
        platforms: PlatformFlags::new(row.get(9)?, row.get(10)?, row.get(11)?),
        created_at: secs_from_sql(row.get(12)?),
        updated_at: secs_from_sql(row.get(13)?),
    })
}

/// Errors from opening, migrating or directly reading the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("store connection lock poisoned")]
    Poisoned,
}

fn database_error(e: rusqlite::Error) -> SaveError {
    SaveError::Database(e.to_string())
}

fn transaction_error(e: rusqlite::Error) -> SaveError {
    SaveError::Transaction(e.to_string())
}

fn now_epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn secs_to_sql(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

fn secs_from_sql(secs: i64) -> u64 {
    u64::try_from(secs).unwrap_or_default()
}
