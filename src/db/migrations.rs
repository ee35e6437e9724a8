// Database migrations
// Migrations are forward-only. Never edit or delete a migration after it ships.

use rusqlite::Connection;
use anyhow::Result;

/// All migrations in order. Each migration is a SQL string.
const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    -- Creator profiles (latest write wins, no history)
    CREATE TABLE profiles (
        id TEXT PRIMARY KEY,
        platform TEXT NOT NULL,
        name TEXT NOT NULL,
        url TEXT,
        follower_count INTEGER,
        last_updated TEXT
    );

    -- Videos that were ever selected into a daily ranking
    -- profile_id is the creator key; profiles are collected separately, so no FK
    CREATE TABLE videos (
        id TEXT PRIMARY KEY CHECK (id <> ''),
        platform TEXT NOT NULL,
        profile_id TEXT NOT NULL,
        title TEXT NOT NULL,
        url TEXT NOT NULL,
        thumbnail TEXT,
        views INTEGER NOT NULL,
        performance_ratio REAL NOT NULL CHECK (performance_ratio >= 0),
        post_date TEXT NOT NULL,
        collection_date TEXT NOT NULL
    );

    -- Per-date top-N snapshots
    CREATE TABLE daily_rankings (
        date TEXT NOT NULL,
        video_id TEXT NOT NULL REFERENCES videos(id),
        rank INTEGER NOT NULL CHECK (rank >= 1),
        PRIMARY KEY (date, video_id),
        UNIQUE (date, rank)
    );

    CREATE INDEX idx_videos_platform ON videos(platform);
    CREATE INDEX idx_daily_rankings_video ON daily_rankings(video_id);
    "#,
];

/// Get current schema version from database
fn get_schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row(
        "PRAGMA user_version",
        [],
        |row| row.get(0)
    )?;
    Ok(version)
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    let target_version = MIGRATIONS.len() as u32;

    // Refuse to open a store created by a newer build
    if current_version > target_version {
        anyhow::bail!(
            "Store schema version {} is newer than this build supports (max {}).",
            current_version,
            target_version
        );
    }

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as u32;
        if migration_version <= current_version {
            continue;
        }

        // Schema change and version bump commit together
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration)?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", migration_version))?;
        tx.commit()?;

        log::info!("Applied store migration {}", migration_version);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), MIGRATIONS.len() as u32);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 99").unwrap();

        assert!(run_migrations(&conn).is_err());
    }
}
