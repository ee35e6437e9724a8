// Historical store module

pub mod import;
pub mod migrations;
pub mod schema;


use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::constants::{DB_FILENAME, STORE_BUSY_TIMEOUT_MS};
use crate::video::{NormalizedVideo, Platform, Profile};
use schema::{RankedVideo, StoredVideo};

/// Open or create a database at the given path
pub fn open_db(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure(&conn)?;

    // Enable WAL mode so readers keep a consistent snapshot during a write
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Per-connection settings
fn configure(conn: &Connection) -> Result<()> {
    // Enable foreign keys (must be done per connection)
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Readers wait out a writer instead of failing immediately
    conn.busy_timeout(Duration::from_millis(STORE_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Get the database path inside a data directory
pub fn get_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILENAME)
}

/// Handle to the historical store. Owns one connection, released on drop.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store file, creating its directory and schema as needed
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow::anyhow!("Cannot create store directory {}: {}", parent.display(), e)
                })?;
            }
        }

        Ok(Self { conn: open_db(db_path)? })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Close explicitly, surfacing any error dropping would swallow
    pub fn close(self) -> crate::error::Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    pub fn upsert_profile(&self, profile: &Profile) -> crate::error::Result<()> {
        schema::upsert_profile(&self.conn, profile)
    }

    pub fn get_profile(&self, id: &str) -> crate::error::Result<Option<Profile>> {
        schema::get_profile(&self.conn, id)
    }

    /// Upsert a video, stamping the collection date with the current time
    pub fn upsert_video(&self, video: &NormalizedVideo) -> crate::error::Result<()> {
        schema::upsert_video(&self.conn, video, &Utc::now().to_rfc3339())
    }

    pub fn get_video(&self, id: &str) -> crate::error::Result<Option<StoredVideo>> {
        schema::get_video(&self.conn, id)
    }

    pub fn count_videos(&self) -> crate::error::Result<i64> {
        schema::count_videos(&self.conn)
    }

    /// Atomically replace the ranking for `date`. Returns the number of ranked rows.
    pub fn replace_daily_ranking(&self, date: NaiveDate, videos: &[NormalizedVideo]) -> crate::error::Result<usize> {
        schema::replace_daily_ranking(&self.conn, date, videos, &Utc::now().to_rfc3339())
    }

    pub fn query_ranking(
        &self,
        date: NaiveDate,
        limit: i64,
        platform: Option<Platform>,
    ) -> crate::error::Result<Vec<RankedVideo>> {
        schema::query_ranking(&self.conn, date, limit, platform)
    }

    pub fn list_dates_with_data(&self, limit: i64) -> crate::error::Result<Vec<NaiveDate>> {
        schema::list_dates_with_data(&self.conn, limit)
    }
}
